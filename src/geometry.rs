use macroquad::math::{Vec2, Vec3, vec2, vec3};
use nalgebra::{Matrix2, SymmetricEigen};

// the visible frame is this many scene units tall; the width follows the aspect ratio
pub const FRAME_HEIGHT: f32 = 8.0;
// gap kept between edge-aligned objects and the frame border
pub const EDGE_BUFF: f32 = 0.5;

// screen frame measured in scene units, origin at the centre, y pointing up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width_px: f32,
    pub height_px: f32,
}

impl Frame {
    pub fn new(width_px: f32, height_px: f32) -> Self {
        Self { width_px, height_px }
    }

    // pixels per scene unit
    pub fn unit(&self) -> f32 {
        self.height_px / FRAME_HEIGHT
    }

    // converts scene coordinates to pixel coordinates
    pub fn to_screen(&self, x: f32, y: f32) -> Vec2 {
        let unit = self.unit();
        vec2(self.width_px / 2.0 + x * unit, self.height_px / 2.0 - y * unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl AxisRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn mid(&self) -> f32 {
        0.5 * (self.min + self.max)
    }

    pub fn ticks(&self) -> Vec<f32> {
        let count = (self.span() / self.step + 1e-4).floor() as usize;
        (0..=count).map(|i| self.min + self.step * i as f32).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub x_length: f32,
    pub y_length: f32,
    pub center: Vec2,
}

impl Axes {
    pub fn new(x_range: AxisRange, y_range: AxisRange, x_length: f32, y_length: f32) -> Self {
        Self { x_range, y_range, x_length, y_length, center: Vec2::ZERO }
    }

    pub fn c2s(&self, x: f32, y: f32) -> Vec2 {
        let sx = (x - self.x_range.mid()) / self.x_range.span() * self.x_length;
        let sy = (y - self.y_range.mid()) / self.y_range.span() * self.y_length;
        self.center + vec2(sx, sy)
    }

    // data coordinates to pixels
    pub fn c2p(&self, frame: &Frame, x: f32, y: f32) -> Vec2 {
        let s = self.c2s(x, y);
        frame.to_screen(s.x, s.y)
    }

    // where the x axis sits vertically: y = 0 when inside the range, else the bottom edge
    pub fn x_axis_level(&self) -> f32 {
        0.0f32.clamp(self.y_range.min, self.y_range.max)
    }

    pub fn y_axis_level(&self) -> f32 {
        0.0f32.clamp(self.x_range.min, self.x_range.max)
    }
}

// 1-sigma contour of a 2D covariance; width and height are 2 * sqrt(eigenvalue)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceEllipse {
    pub width: f64,
    pub height: f64,
    // rotation of the major axis from +x, in [0, PI)
    pub angle: f64,
}

impl ConfidenceEllipse {
    pub fn from_covariance(covariance: Matrix2<f64>) -> Self {
        let eigen = SymmetricEigen::new(covariance);
        let (major, minor) = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] { (0, 1) } else { (1, 0) };

        let axis = eigen.eigenvectors.column(major);
        let angle = f64::atan2(axis[1], axis[0]).rem_euclid(std::f64::consts::PI);

        Self {
            width: 2.0 * eigen.eigenvalues[major].max(0.0).sqrt(),
            height: 2.0 * eigen.eigenvalues[minor].max(0.0).sqrt(),
            angle,
        }
    }

    // closed outline with `segments` vertices, centred on `center`
    pub fn outline(&self, center: (f64, f64), segments: usize) -> Vec<(f64, f64)> {
        let (sin, cos) = self.angle.sin_cos();
        (0..segments)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / segments as f64;
                let (a, b) = (0.5 * self.width * t.cos(), 0.5 * self.height * t.sin());
                (center.0 + a * cos - b * sin, center.1 + a * sin + b * cos)
            })
            .collect()
    }
}

// camera position on a sphere around the origin with z up
// `phi` is measured from +z, `theta` around z from +x
pub fn orbit_position(phi: f32, theta: f32, distance: f32) -> Vec3 {
    vec3(
        distance * phi.sin() * theta.cos(),
        distance * phi.sin() * theta.sin(),
        distance * phi.cos(),
    )
}
