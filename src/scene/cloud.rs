use macroquad::prelude::*;
use nalgebra::{DMatrix, DVector};
use ::rand::rngs::StdRng;

use crate::app::hud::{Typography, font_px};
use crate::app::palette;
use crate::app::renderer::with_alpha;
use crate::error::Result;
use crate::geometry::{FRAME_HEIGHT, Frame, orbit_position};
use crate::stats::MultivariateNormal;
use crate::timeline::{Beat, Moment};

const TITLE: &str = "3D Multivariate Normal Distribution";
const TITLE_SIZE: f32 = 24.0;

const COVARIANCE: [f64; 9] = [
    1.0, 0.8, 0.6,
    0.8, 1.0, 0.4,
    0.6, 0.4, 1.0,
];

const DOT_RADIUS: f32 = 0.05;
const SPHERE_RADIUS: f32 = 2.0;
const SPHERE_OPACITY: f32 = 0.3;

const PHI_DEG: f32 = 75.0;
const THETA_DEG: f32 = 30.0;
const ORBIT_RATE: f32 = 0.1; // rad/s
const FOVY_DEG: f32 = 45.0;

// the 3D segment: a correlated point cloud inside a translucent sphere, seen by an orbiting camera
pub struct Cloud {
    points: Vec<Vec3>,
    // scene time at which the camera starts orbiting
    orbit_start: f32,
}

impl Cloud {
    pub fn new(sample_count: usize, orbit_start: f32, rng: &mut StdRng) -> Result<Self> {
        let mvn = MultivariateNormal::new(DVector::zeros(3), DMatrix::from_row_slice(3, 3, &COVARIANCE))?;
        let points = mvn
            .sample_n(rng, sample_count)
            .into_iter()
            .map(|p| vec3(p[0] as f32, p[1] as f32, p[2] as f32))
            .collect();

        Ok(Self { points, orbit_start })
    }

    // camera azimuth at `elapsed` seconds into the scene
    pub fn theta(&self, elapsed: f32) -> f32 {
        THETA_DEG.to_radians() + ORBIT_RATE * (elapsed - self.orbit_start).max(0.0)
    }

    fn camera(&self, moment: &Moment, frame: &Frame) -> Camera3D {
        let fovy = FOVY_DEG.to_radians();
        // far enough that an 8-unit-tall slab around the origin fills the view
        let distance = (FRAME_HEIGHT / 2.0) / (fovy / 2.0).tan();

        Camera3D {
            position: orbit_position(PHI_DEG.to_radians(), self.theta(moment.elapsed), distance),
            target: Vec3::ZERO,
            up: Vec3::Z,
            fovy,
            aspect: Some(frame.width_px / frame.height_px),
            ..Default::default()
        }
    }

    pub fn draw(&self, moment: &Moment, frame: &Frame, typo: &Typography) {
        if !moment.within(Beat::CloudTitle, Beat::CloudOut) {
            return;
        }

        let alpha = moment.fade(Beat::CloudOut);
        let grow = moment.reveal(Beat::CloudIn);

        set_camera(&self.camera(moment, frame));

        let shown = (self.points.len() as f32 * grow).ceil() as usize;
        let dot = with_alpha(palette::BLUE, alpha);
        for p in self.points.iter().take(shown) {
            draw_sphere(*p, DOT_RADIUS, None, dot);
        }

        // translucent shell last so the cloud shows through it
        if grow > 0.0 {
            let shell = with_alpha(palette::YELLOW, SPHERE_OPACITY * grow * alpha);
            draw_sphere(Vec3::ZERO, SPHERE_RADIUS, None, shell);
            draw_sphere_wires(Vec3::ZERO, SPHERE_RADIUS, None, with_alpha(palette::YELLOW, 0.5 * grow * alpha));
        }

        set_default_camera();

        // fixed in frame
        let size = font_px(TITLE_SIZE, frame);
        let pos = typo.top_center(TITLE, size, frame);
        typo.draw_centered(TITLE, pos, size, with_alpha(palette::WHITE, alpha), moment.reveal(Beat::CloudTitle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;

    #[test]
    fn camera_orbits_only_after_the_cloud_is_drawn() {
        let mut rng = StdRng::seed_from_u64(8);
        let cloud = Cloud::new(300, 35.0, &mut rng).unwrap();
        assert_eq!(cloud.points.len(), 300);

        let start = THETA_DEG.to_radians();
        assert_eq!(cloud.theta(0.0), start);
        assert_eq!(cloud.theta(35.0), start);
        assert!((cloud.theta(40.0) - (start + 0.5)).abs() < 1e-5);
    }

    #[test]
    fn cloud_is_mostly_inside_the_sphere() {
        let mut rng = StdRng::seed_from_u64(12);
        let cloud = Cloud::new(2_000, 0.0, &mut rng).unwrap();
        let inside = cloud.points.iter().filter(|p| p.length() <= SPHERE_RADIUS).count();
        // trace 3 => E|x|^2 = 3; a radius-2 ball holds well over half of the draws
        assert!(inside > 1_000);
    }
}
