use macroquad::prelude::*;

use crate::app::hud::{FORMULA_1D, Formula, Symbol, Typography, font_px};
use crate::app::palette;
use crate::app::renderer::{AxesStyle, draw_axes, draw_dashed_line, draw_polyline, stroke, with_alpha};
use crate::geometry::{AxisRange, Axes, EDGE_BUFF, Frame};
use crate::stats::{linspace, normal_pdf};
use crate::timeline::{Beat, Moment};

const MEAN: f64 = 0.0;
const STD_DEV: f64 = 1.0;
const CURVE_SAMPLES: usize = 100;

const TITLE: &str = "1D Normal Distribution";
const LABEL_SIZE: f32 = 24.0;
const FORMULA_SIZE: f32 = 20.0;

// the 1D segment: N(0, 1) plotted with its mean and one-sigma markers
pub struct Density {
    axes: Axes,
    curve: Vec<(f64, f64)>,
    formula: Formula,
}

impl Density {
    pub fn new(typo: &Typography) -> Self {
        let axes = Axes::new(AxisRange::new(-3.0, 3.0, 1.0), AxisRange::new(0.0, 0.5, 0.1), 8.0, 4.0);
        let curve = linspace(-3.0, 3.0, CURVE_SAMPLES)
            .into_iter()
            .map(|x| (x, normal_pdf(x, MEAN, STD_DEV)))
            .collect();
        let formula = typo.formula(FORMULA_1D, &[(Symbol::Mu, palette::YELLOW), (Symbol::Sigma, palette::GREEN)]);

        Self { axes, curve, formula }
    }

    fn to_screen(&self, frame: &Frame, x: f64, y: f64) -> Vec2 {
        self.axes.c2p(frame, x as f32, y as f32)
    }

    pub fn draw(&self, moment: &Moment, frame: &Frame, typo: &Typography) {
        if !moment.within(Beat::DensityAxesIn, Beat::DensityOut) {
            return;
        }

        let alpha = moment.fade(Beat::DensityOut);
        let appear = moment.reveal(Beat::DensityAxesIn);

        draw_axes(&self.axes, frame, AxesStyle { color: palette::WHITE, tips_at_start: false }, appear, alpha);

        let white = with_alpha(palette::WHITE, alpha);
        let label_size = font_px(LABEL_SIZE, frame);
        let unit = frame.unit();

        let x_label = self.axes.c2p(frame, self.axes.x_range.max, 0.0) + vec2(0.45 * unit, 0.3 * unit);
        typo.draw_centered("x", x_label, label_size, white, appear);
        let y_label = self.axes.c2p(frame, 0.0, self.axes.y_range.max) + vec2(0.9 * unit, 0.0);
        typo.draw_centered("Density", y_label, label_size, white, appear);

        let title_pos = typo.top_center(TITLE, label_size, frame);
        typo.draw_centered(TITLE, title_pos, label_size, white, appear);

        let formula_size = font_px(FORMULA_SIZE, frame);
        let formula_center = vec2(EDGE_BUFF * unit + typo.formula_width(&self.formula, formula_size) / 2.0, title_pos.y + unit);
        typo.draw_formula(&self.formula, formula_center, formula_size, palette::WHITE, alpha, appear);

        let curve: Vec<Vec2> = self.curve.iter().map(|&(x, y)| self.to_screen(frame, x, y)).collect();
        draw_polyline(&curve, moment.reveal(Beat::DensityCurve), 1.5 * stroke(frame), with_alpha(palette::BLUE, alpha));

        if moment.within(Beat::SigmaLinesIn, Beat::SigmaLinesOut) {
            let grow = moment.reveal(Beat::SigmaLinesIn);
            let marker_alpha = moment.fade(Beat::SigmaLinesOut) * alpha;

            for (x, color) in [
                (MEAN, palette::YELLOW),
                (MEAN - STD_DEV, palette::GREEN),
                (MEAN + STD_DEV, palette::GREEN),
            ] {
                let base = self.to_screen(frame, x, 0.0);
                let top = self.to_screen(frame, x, normal_pdf(x, MEAN, STD_DEV));
                draw_dashed_line(base, top, grow, frame, with_alpha(color, marker_alpha));
            }
        }
    }
}
