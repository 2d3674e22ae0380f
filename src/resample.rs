use nalgebra::Vector2;
use rand::Rng;

use crate::error::Result;
use crate::stats;

/*
    throttles how often the correlated point cloud is redrawn from scratch:
    every call to points() counts as one redraw, and the cached sample is
    handed back unchanged unless the redraw counter lands on a multiple of
    `interval`, in which case a fresh sample is drawn for the current rho
*/
pub struct ResampleCache {
    interval: u64,
    sample_count: usize,
    redraws: u64,
    regenerations: u64,
    cached: Option<Vec<Vector2<f64>>>,
}

impl ResampleCache {
    pub fn new(interval: u32, sample_count: usize) -> Self {
        debug_assert!(interval > 0, "regeneration interval must be non-zero");

        Self {
            interval: u64::from(interval.max(1)),
            sample_count,
            redraws: 0,
            regenerations: 0,
            cached: None,
        }
    }

    pub fn points<R: Rng + ?Sized>(&mut self, rho: f64, rng: &mut R) -> Result<&[Vector2<f64>]> {
        self.redraws += 1;

        let stale = self.redraws % self.interval == 0;
        let points = match self.cached.take() {
            Some(points) if !stale => points,
            _ => {
                let mvn = stats::correlated_2d(rho)?;
                self.regenerations += 1;
                log::trace!(
                    "resampling {} points at rho={:.3} (redraw {})",
                    self.sample_count, rho, self.redraws
                );
                mvn.sample_n(rng, self.sample_count)
                    .into_iter()
                    .map(|p| Vector2::new(p[0], p[1]))
                    .collect()
            }
        };

        Ok(self.cached.insert(points).as_slice())
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn reuses_cache_between_interval_boundaries() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cache = ResampleCache::new(3, 300);

        // redraw 1 always samples since nothing is cached yet
        let first = cache.points(0.5, &mut rng).unwrap().to_vec();
        assert_eq!(first.len(), 300);
        let second = cache.points(0.5, &mut rng).unwrap().to_vec();
        assert_eq!(first, second);

        // redraw 3 sits on the boundary
        let third = cache.points(0.5, &mut rng).unwrap().to_vec();
        assert_ne!(second, third);

        let fourth = cache.points(0.5, &mut rng).unwrap().to_vec();
        let fifth = cache.points(0.5, &mut rng).unwrap().to_vec();
        assert_eq!(third, fourth);
        assert_eq!(fourth, fifth);

        let sixth = cache.points(0.5, &mut rng).unwrap().to_vec();
        assert_ne!(fifth, sixth);

        assert_eq!(cache.redraws(), 6);
        assert_eq!(cache.regenerations(), 3);
    }

    #[test]
    fn cached_points_ignore_rho_until_boundary() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut cache = ResampleCache::new(2, 50);

        let at_zero = cache.points(0.0, &mut rng).unwrap().to_vec();
        // redraw 2 is a boundary, so the new rho is picked up
        let regenerated = cache.points(0.9, &mut rng).unwrap().to_vec();
        assert_ne!(at_zero, regenerated);
        let reused = cache.points(0.2, &mut rng).unwrap().to_vec();
        assert_eq!(regenerated, reused);
    }

    #[test]
    fn interval_of_one_resamples_every_redraw() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut cache = ResampleCache::new(1, 10);
        for _ in 0..4 {
            cache.points(0.3, &mut rng).unwrap();
        }
        assert_eq!(cache.regenerations(), 4);
    }

    #[test]
    fn regenerated_sample_follows_current_rho() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut cache = ResampleCache::new(1, 5_000);
        let points = cache.points(0.9, &mut rng).unwrap();

        let n = points.len() as f64;
        let cov_xy = points.iter().map(|p| p.x * p.y).sum::<f64>() / n;
        assert!((cov_xy - 0.9).abs() < 0.06);
    }

    #[test]
    fn invalid_rho_is_an_error() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut cache = ResampleCache::new(3, 10);
        assert!(cache.points(1.5, &mut rng).is_err());
    }
}
