use macroquad::prelude::*;
use ::rand::rngs::StdRng;

use crate::app::hud::{Typography, font_px};
use crate::app::palette;
use crate::app::renderer::with_alpha;
use crate::flow::StreamField;
use crate::geometry::{FRAME_HEIGHT, Frame};
use crate::timeline::{Beat, Moment, lerp};

const TITLE: &str = "Exploring Multivariate Normal Distributions: From 1D to 3D";
const TITLE_SIZE: f32 = 28.0;
const CREDIT_SIZE: f32 = 24.0;
const CORNER_SCALE: f32 = 0.677;

const FLOW_SPEED: f32 = 1.5;
const MAX_ANCHORS: usize = 30;
const WARM_UP: f32 = 2.0;

// opening title over flowing stream lines; the credit it turns into stays for the whole scene
pub struct Intro {
    field: StreamField,
    credit: String,
}

impl Intro {
    pub fn new(aspect: f32, credit: String, rng: StdRng) -> Self {
        let mut field = StreamField::new(FRAME_HEIGHT * aspect, FRAME_HEIGHT, FLOW_SPEED, MAX_ANCHORS, rng);
        field.warm_up(WARM_UP);
        Self { field, credit }
    }

    pub fn update(&mut self, moment: &Moment, dt: f32) {
        if moment.beat <= Beat::StreamLinesOut {
            self.field.advance(dt);
        }
    }

    pub fn draw_background(&self, moment: &Moment, frame: &Frame) {
        if moment.beat > Beat::StreamLinesOut {
            return;
        }

        let alpha = moment.fade(Beat::StreamLinesOut);
        let thickness = (0.02 * frame.unit()).max(1.0);

        for particle in &self.field.particles {
            let len = particle.trail.len();
            for (i, (a, b)) in particle.trail.iter().zip(particle.trail.iter().skip(1)).enumerate() {
                // tails fade towards the oldest anchor
                let tail = (i + 1) as f32 / len as f32;
                let p = frame.to_screen(a.x, a.y);
                let q = frame.to_screen(b.x, b.y);
                draw_line(p.x, p.y, q.x, q.y, thickness, with_alpha(palette::STREAM, alpha * tail));
            }
        }
    }

    pub fn draw_overlay(&self, moment: &Moment, frame: &Frame, typo: &Typography) {
        let center = vec2(frame.width_px / 2.0, frame.height_px / 2.0);
        let morph = moment.reveal(Beat::IntroCredit);

        if moment.beat <= Beat::IntroCredit {
            let size = font_px(TITLE_SIZE, frame);
            let color = with_alpha(palette::WHITE, 1.0 - morph);
            typo.draw_shadowed(TITLE, center, size, color, moment.reveal(Beat::IntroTitle));
        }

        if moment.beat < Beat::IntroCredit {
            return;
        }

        let full_size = font_px(CREDIT_SIZE, frame);
        let corner_size = font_px(CREDIT_SIZE * CORNER_SCALE, frame);
        let t = moment.reveal(Beat::CreditToCorner);

        let size = lerp(full_size as f32, corner_size as f32, t).round() as u16;
        let corner = typo.bottom_left(&self.credit, corner_size, frame);
        let pos = center.lerp(corner, t);

        typo.draw_shadowed(&self.credit, pos, size, with_alpha(palette::WHITE, morph), 1.0);
    }
}
