use nalgebra::{DMatrix, DVector, Matrix2, SymmetricEigen};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{Error, Result};

const SYMMETRY_TOLERANCE: f64 = 1e-9;
const PSD_TOLERANCE: f64 = 1e-9;

// density of the 1D normal distribution N(mean, std_dev^2) at `x`
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * std::f64::consts::PI).sqrt())
}

// `count` evenly spaced values from `start` to `end`, both ends included
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

pub fn correlation_2d(rho: f64) -> Matrix2<f64> {
    Matrix2::new(
        1.0, rho,
        rho, 1.0,
    )
}

pub struct MultivariateNormal {
    mean: DVector<f64>,
    // A such that A * A^T = covariance; built from the eigen decomposition
    // so positive semidefinite (singular) covariances still sample
    transform: DMatrix<f64>,
}

impl MultivariateNormal {
    pub fn new(mean: DVector<f64>, covariance: DMatrix<f64>) -> Result<Self> {
        if !covariance.is_square() {
            return Err(Error::Covariance("not square"));
        }
        if covariance.nrows() != mean.nrows() {
            return Err(Error::Covariance("not the same dimension as the mean"));
        }
        if (&covariance - covariance.transpose()).amax() > SYMMETRY_TOLERANCE {
            return Err(Error::Covariance("not symmetric"));
        }

        let eigen = SymmetricEigen::new(covariance);
        let largest = eigen.eigenvalues.amax().max(1.0);
        if eigen.eigenvalues.iter().any(|&l| l < -PSD_TOLERANCE * largest) {
            return Err(Error::Covariance("not positive semidefinite"));
        }

        let scale = DMatrix::from_diagonal(&eigen.eigenvalues.map(|l| l.max(0.0).sqrt()));
        let transform = eigen.eigenvectors * scale;

        Ok(Self { mean, transform })
    }

    pub fn dim(&self) -> usize {
        self.mean.nrows()
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        let z = DVector::from_fn(self.dim(), |_, _| rng.sample::<f64, _>(StandardNormal));
        &self.mean + &self.transform * z
    }

    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<DVector<f64>> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

pub fn correlated_2d(rho: f64) -> Result<MultivariateNormal> {
    let cov = correlation_2d(rho);
    MultivariateNormal::new(
        DVector::zeros(2),
        DMatrix::from_iterator(2, 2, cov.iter().copied()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_covariance(points: &[DVector<f64>]) -> DMatrix<f64> {
        let d = points[0].nrows();
        let n = points.len() as f64;
        let mean = points.iter().fold(DVector::zeros(d), |acc, p| acc + p) / n;
        points.iter().fold(DMatrix::zeros(d, d), |acc, p| {
            let c = p - &mean;
            acc + &c * c.transpose()
        }) / (n - 1.0)
    }

    #[test]
    fn standard_normal_density() {
        assert!((normal_pdf(0.0, 0.0, 1.0) - 0.398_942_280_4).abs() < 1e-9);
        assert!((normal_pdf(1.0, 0.0, 1.0) - 0.241_970_724_5).abs() < 1e-9);
        assert_eq!(normal_pdf(-1.3, 0.0, 1.0), normal_pdf(1.3, 0.0, 1.0));
        // shifting and scaling
        assert!((normal_pdf(5.0, 5.0, 2.0) - 0.398_942_280_4 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn linspace_includes_both_ends() {
        let xs = linspace(-3.0, 3.0, 100);
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0], -3.0);
        assert!((xs[99] - 3.0).abs() < 1e-12);
        assert!(xs.windows(2).all(|w| w[1] > w[0]));

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 7.0, 1), vec![2.0]);
    }

    #[test]
    fn rejects_invalid_covariances() {
        let mean = DVector::zeros(2);

        let asymmetric = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.2, 1.0]);
        assert!(matches!(
            MultivariateNormal::new(mean.clone(), asymmetric),
            Err(Error::Covariance("not symmetric"))
        ));

        let indefinite = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(matches!(
            MultivariateNormal::new(mean.clone(), indefinite),
            Err(Error::Covariance("not positive semidefinite"))
        ));

        let wrong_size = DMatrix::identity(3, 3);
        assert!(MultivariateNormal::new(mean, wrong_size).is_err());
    }

    #[test]
    fn singular_covariance_still_samples() {
        let mut rng = StdRng::seed_from_u64(7);
        let mvn = correlated_2d(1.0).unwrap();
        for p in mvn.sample_n(&mut rng, 50) {
            assert!((p[0] - p[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn samples_match_requested_covariance() {
        let mut rng = StdRng::seed_from_u64(42);
        let cov = DMatrix::from_row_slice(3, 3, &[
            1.0, 0.8, 0.6,
            0.8, 1.0, 0.4,
            0.6, 0.4, 1.0,
        ]);
        let mvn = MultivariateNormal::new(DVector::zeros(3), cov.clone()).unwrap();
        let points = mvn.sample_n(&mut rng, 20_000);

        let estimate = sample_covariance(&points);
        assert!((estimate - cov).amax() < 0.05);
    }

    #[test]
    fn mean_is_honoured() {
        let mut rng = StdRng::seed_from_u64(3);
        let mean = DVector::from_vec(vec![2.0, -1.0]);
        let mvn = MultivariateNormal::new(mean.clone(), DMatrix::identity(2, 2) * 0.25).unwrap();
        let points = mvn.sample_n(&mut rng, 10_000);
        let avg = points.iter().fold(DVector::zeros(2), |acc, p| acc + p) / points.len() as f64;
        assert!((avg - mean).amax() < 0.03);
    }
}
