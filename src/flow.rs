use std::collections::VecDeque;

use macroquad::math::{Vec2, vec2};
use rand::Rng;
use rand::rngs::StdRng;

const PARTICLE_SPACING: f32 = 0.5;
const MIN_LIFETIME: f32 = 2.0;
const MAX_LIFETIME: f32 = 5.0;
const WARM_UP_STEP: f32 = 1.0 / 30.0;

// background field: sin(x/2) * (1, 1) + cos(y/2) * (-1, 0)
pub fn velocity(p: Vec2) -> Vec2 {
    let s = (p.x / 2.0).sin();
    vec2(s - (p.y / 2.0).cos(), s)
}

pub struct Particle {
    pub trail: VecDeque<Vec2>,
    age: f32,
    lifetime: f32,
}

impl Particle {
    pub fn head(&self) -> Option<Vec2> {
        self.trail.back().copied()
    }
}

pub struct StreamField {
    pub particles: Vec<Particle>,
    half_width: f32,
    half_height: f32,
    flow_speed: f32,
    max_anchors: usize,
    rng: StdRng,
}

impl StreamField {
    // fills a `width` x `height` scene-unit frame centred on the origin
    pub fn new(width: f32, height: f32, flow_speed: f32, max_anchors: usize, rng: StdRng) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            half_width: width / 2.0,
            half_height: height / 2.0,
            flow_speed,
            max_anchors: max_anchors.max(2),
            rng,
        };

        let count = ((width / PARTICLE_SPACING) * (height / PARTICLE_SPACING)) as usize;
        field.particles = (0..count).map(|_| field.spawn()).collect();
        field
    }

    fn spawn(&mut self) -> Particle {
        let start = vec2(
            self.rng.random_range(-self.half_width..=self.half_width),
            self.rng.random_range(-self.half_height..=self.half_height),
        );
        let mut trail = VecDeque::with_capacity(self.max_anchors);
        trail.push_back(start);

        Particle {
            trail,
            // staggered so the field never respawns all at once
            age: self.rng.random_range(0.0..MIN_LIFETIME),
            lifetime: self.rng.random_range(MIN_LIFETIME..MAX_LIFETIME),
        }
    }

    fn contains(&self, p: Vec2) -> bool {
        p.x.abs() <= self.half_width && p.y.abs() <= self.half_height
    }

    // runs the field for `seconds` so trails are fully grown on the first frame
    pub fn warm_up(&mut self, seconds: f32) {
        let steps = (seconds / WARM_UP_STEP).ceil() as usize;
        for _ in 0..steps {
            self.advance(WARM_UP_STEP);
        }
    }

    pub fn advance(&mut self, dt: f32) {
        let flow_speed = self.flow_speed;
        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];
            particle.age += dt;
            let expired = particle.age >= particle.lifetime;
            let next = particle.head().map(|p| p + velocity(p) * flow_speed * dt);

            match next {
                Some(next) if !expired && self.contains(next) => {
                    let particle = &mut self.particles[i];
                    particle.trail.push_back(next);
                    while particle.trail.len() > self.max_anchors {
                        particle.trail.pop_front();
                    }
                }
                _ => {
                    let fresh = self.spawn();
                    self.particles[i] = fresh;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field() -> StreamField {
        StreamField::new(14.0, 8.0, 1.5, 30, StdRng::seed_from_u64(4))
    }

    #[test]
    fn field_values() {
        assert_eq!(velocity(vec2(0.0, 0.0)), vec2(-1.0, 0.0));
        let v = velocity(vec2(std::f32::consts::PI, std::f32::consts::PI));
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn particles_stay_in_frame() {
        let mut field = field();
        assert_eq!(field.particles.len(), 28 * 16);

        for _ in 0..200 {
            field.advance(1.0 / 30.0);
        }
        for particle in &field.particles {
            for p in &particle.trail {
                assert!(p.x.abs() <= 7.0 && p.y.abs() <= 4.0);
            }
        }
    }

    #[test]
    fn trails_are_capped() {
        let mut field = field();
        field.warm_up(3.0);
        assert!(field.particles.iter().all(|p| p.trail.len() <= 30));
        assert!(field.particles.iter().any(|p| p.trail.len() > 1));
    }
}
