use macroquad::prelude::*;
use nalgebra::Vector2;
use ::rand::rngs::StdRng;

use crate::app::hud::{FORMULA_2D, Formula, Symbol, Typography, font_px};
use crate::app::palette;
use crate::app::renderer::{AxesStyle, draw_axes, draw_closed, draw_dots, mix, stroke, with_alpha};
use crate::config::{SceneKind, Settings};
use crate::error::Result;
use crate::geometry::{AxisRange, Axes, ConfidenceEllipse, Frame};
use crate::resample::ResampleCache;
use crate::stats::{correlated_2d, correlation_2d};
use crate::timeline::{Beat, Moment};

const TITLE: &str = "2D Multivariate Normal Distribution";
const NO_CORRELATION: &str = "No Correlation";
const WITH_CORRELATION: &str = "With Correlation";

const TITLE_SIZE: f32 = 24.0;
const LEGEND_SIZE: f32 = 16.0;
const FORMULA_SIZE: f32 = 20.0;
const DOT_RADIUS: f32 = 0.03;
const ELLIPSE_SEGMENTS: usize = 96;
// next_to spacing, scene units
const LEGEND_BUFF: f32 = 0.5;
const LABEL_BUFF: f32 = 0.25;
// how far the title sits below the formula when both share the top edge
const TITLE_DROP: f32 = 0.8;

// the 2D segment: an uncorrelated cloud, then one whose correlation sweeps up to `rho_target`
pub struct Plane {
    axes: Axes,
    style: AxesStyle,
    title_drop: f32,
    formula: Formula,
    uncorrelated: Vec<Vector2<f64>>,
    // first correlated sample, taken at rho = 0 before the sweep starts
    initial: Vec<Vector2<f64>>,
    cache: ResampleCache,
    live: Vec<Vector2<f64>>,
    rho_target: f64,
}

impl Plane {
    pub fn new(settings: &Settings, typo: &Typography, rng: &mut StdRng) -> Result<Self> {
        let (y_length, style, title_drop) = match settings.scene {
            SceneKind::Full => (4.5, AxesStyle { color: palette::GREY, tips_at_start: true }, 0.0),
            SceneKind::Correlation => (4.0, AxesStyle { color: palette::GREY, tips_at_start: false }, TITLE_DROP),
        };
        let axes = Axes::new(AxisRange::new(-4.0, 4.0, 1.0), AxisRange::new(-4.0, 4.0, 1.0), 6.0, y_length);

        let uncorrelated = correlated_2d(0.0)?
            .sample_n(rng, settings.sample_count)
            .into_iter()
            .map(|p| Vector2::new(p[0], p[1]))
            .collect();

        let mut cache = ResampleCache::new(settings.regeneration_interval, settings.sample_count);
        let initial = cache.points(0.0, rng)?.to_vec();

        Ok(Self {
            axes,
            style,
            title_drop,
            formula: typo.formula(FORMULA_2D, &[(Symbol::Rho, palette::RED)]),
            uncorrelated,
            live: initial.clone(),
            initial,
            cache,
            rho_target: settings.rho_target,
        })
    }

    // correlation tracked by the sweep at `moment`
    pub fn rho(&self, moment: &Moment) -> f64 {
        self.rho_target * f64::from(moment.reveal(Beat::RhoSweep))
    }

    // one redraw of the live cloud per frame while it is on screen
    pub fn update(&mut self, moment: &Moment, rng: &mut StdRng) -> Result<()> {
        if moment.within(Beat::RhoSweep, Beat::PlaneOut) {
            let rho = self.rho(moment);
            let points = self.cache.points(rho, rng)?;
            self.live.clear();
            self.live.extend_from_slice(points);
        }
        Ok(())
    }

    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.redraws(), self.cache.regenerations())
    }

    fn to_screen(&self, frame: &Frame, p: &Vector2<f64>) -> Vec2 {
        self.axes.c2p(frame, p.x as f32, p.y as f32)
    }

    // the ellipse lives in scene units around the plane's origin, so rho = 0 is a circle on screen
    fn ellipse_outline(&self, frame: &Frame, rho: f64) -> Vec<Vec2> {
        let origin = self.axes.c2s(0.0, 0.0);
        ConfidenceEllipse::from_covariance(correlation_2d(rho))
            .outline((f64::from(origin.x), f64::from(origin.y)), ELLIPSE_SEGMENTS)
            .into_iter()
            .map(|(x, y)| frame.to_screen(x as f32, y as f32))
            .collect()
    }

    fn draw_ellipse(&self, frame: &Frame, rho: f64, fraction: f32, alpha: f32) {
        let outline = self.ellipse_outline(frame, rho);
        draw_closed(&outline, fraction, stroke(frame), with_alpha(palette::YELLOW, alpha));
    }

    pub fn draw(&self, moment: &Moment, frame: &Frame, typo: &Typography) {
        if !moment.within(Beat::PlaneAxesIn, Beat::PlaneOut) {
            return;
        }

        let alpha = moment.fade(Beat::PlaneOut);
        let unit = frame.unit();
        let radius = DOT_RADIUS * unit;

        draw_axes(&self.axes, frame, self.style, moment.reveal(Beat::PlaneAxesIn), alpha);

        let formula_size = font_px(FORMULA_SIZE, frame);
        let formula_center = vec2(
            frame.width_px / 2.0,
            0.5 * unit + typo.formula_height(&self.formula, formula_size) / 2.0,
        );

        // the formula morphs into the uncorrelated cloud
        let morph = moment.reveal(Beat::UncorrelatedCloud);
        if moment.beat <= Beat::UncorrelatedCloud {
            typo.draw_formula(
                &self.formula,
                formula_center,
                formula_size,
                palette::WHITE,
                1.0 - morph,
                moment.reveal(Beat::JointFormula),
            );
        }

        if moment.beat < Beat::UncorrelatedCloud {
            return;
        }

        let to_correlated = moment.reveal(Beat::CorrelatedCloud);
        let points: Vec<Vec2> = if moment.beat <= Beat::CorrelatedCloud {
            self.uncorrelated
                .iter()
                .zip(&self.initial)
                .map(|(from, to)| {
                    let p = self.to_screen(frame, from).lerp(self.to_screen(frame, to), to_correlated);
                    formula_center.lerp(p, morph)
                })
                .collect()
        } else {
            self.live.iter().map(|p| self.to_screen(frame, p)).collect()
        };
        let dot_color = mix(palette::BLUE, palette::RED, to_correlated);
        draw_dots(&points, radius, with_alpha(dot_color, alpha * morph));

        let title_size = font_px(TITLE_SIZE, frame);
        let mut title_pos = typo.top_center(TITLE, title_size, frame);
        title_pos.y += self.title_drop * unit;
        typo.draw_centered(TITLE, title_pos, title_size, with_alpha(palette::WHITE, alpha), morph);

        let legend_size = font_px(LEGEND_SIZE, frame);
        let legend_width = typo.measure(NO_CORRELATION, legend_size).width;
        let anchor = self.axes.c2p(frame, self.axes.x_range.max, self.axes.y_range.mid());
        let legend_pos = anchor + vec2(LEGEND_BUFF * unit + legend_width / 2.0, 0.0);

        let old_legend = with_alpha(palette::WHITE, alpha * (1.0 - to_correlated));
        typo.draw_centered(NO_CORRELATION, legend_pos, legend_size, old_legend, morph);
        let new_legend = with_alpha(palette::WHITE, alpha * to_correlated);
        typo.draw_centered(WITH_CORRELATION, legend_pos, legend_size, new_legend, 1.0);

        if moment.beat < Beat::CorrelatedCloud {
            return;
        }

        let rho = self.rho(moment);
        self.draw_ellipse(frame, rho, to_correlated, alpha);

        let label = format!("{} = {:.2}", typo.symbol(Symbol::Rho), rho);
        let label_size = font_px(TITLE_SIZE, frame);
        let legend_height = typo.measure(WITH_CORRELATION, legend_size).height;
        let label_height = typo.measure(&label, label_size).height;
        let label_pos = legend_pos + vec2(0.0, legend_height / 2.0 + LABEL_BUFF * unit + label_height / 2.0);
        typo.draw_centered(&label, label_pos, label_size, with_alpha(palette::RED, alpha * to_correlated), 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::timeline::Timeline;
    use ::rand::SeedableRng;

    fn plane(kind: SceneKind) -> (Plane, StdRng) {
        let mut config = Config::default();
        config.scene.kind = kind;
        let settings = config.resolve().unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let plane = Plane::new(&settings, &Typography::plain(), &mut rng).unwrap();
        (plane, rng)
    }

    #[test]
    fn rho_follows_the_sweep() {
        let (plane, _) = plane(SceneKind::Correlation);
        let timeline = Timeline::correlation();
        let sweep = timeline.start_of(Beat::RhoSweep).unwrap();

        assert_eq!(plane.rho(&timeline.at(0.5).unwrap()), 0.0);
        assert!((plane.rho(&timeline.at(sweep + 2.0).unwrap()) - 0.45).abs() < 1e-6);
        assert!((plane.rho(&timeline.at(sweep + 5.0).unwrap()) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn live_cloud_only_redraws_once_on_screen() {
        let (mut plane, mut rng) = plane(SceneKind::Correlation);
        let timeline = Timeline::correlation();
        let sweep = timeline.start_of(Beat::RhoSweep).unwrap();

        // the static rho = 0 sample is the first redraw
        assert_eq!(plane.cache.redraws(), 1);
        assert_eq!(plane.live, plane.initial);

        plane.update(&timeline.at(1.0).unwrap(), &mut rng).unwrap();
        assert_eq!(plane.cache.redraws(), 1);

        // interval 2 for the standalone scene: redraw 2 resamples, redraw 3 reuses it
        plane.update(&timeline.at(sweep).unwrap(), &mut rng).unwrap();
        let second = plane.live.clone();
        assert_ne!(second, plane.initial);
        plane.update(&timeline.at(sweep + 0.1).unwrap(), &mut rng).unwrap();
        assert_eq!(plane.live, second);
        assert_eq!(plane.cache.regenerations(), 2);
    }

    #[test]
    fn layouts_differ_per_scene() {
        let (full, _) = plane(SceneKind::Full);
        let (alone, _) = plane(SceneKind::Correlation);
        assert_eq!(full.axes.y_length, 4.5);
        assert!(full.style.tips_at_start);
        assert_eq!(alone.axes.y_length, 4.0);
        assert_eq!(alone.title_drop, TITLE_DROP);
        assert_eq!(full.uncorrelated.len(), 300);
    }

    #[test]
    fn uncorrelated_ellipse_is_a_circle_on_screen() {
        let (plane, _) = plane(SceneKind::Full);
        let frame = Frame::new(1280.0, 720.0);
        let center = plane.axes.c2p(&frame, 0.0, 0.0);

        for p in plane.ellipse_outline(&frame, 0.0) {
            // radius of one scene unit
            assert!((p.distance(center) - frame.unit()).abs() < 1e-2);
        }
    }

    #[test]
    fn correlated_ellipse_tilts_by_a_quarter_turn_on_screen() {
        let (plane, _) = plane(SceneKind::Correlation);
        let frame = Frame::new(640.0, 360.0);
        let center = plane.axes.c2p(&frame, 0.0, 0.0);
        let outline = plane.ellipse_outline(&frame, 0.9);

        let far = outline
            .iter()
            .copied()
            .max_by(|a, b| a.distance(center).total_cmp(&b.distance(center)))
            .unwrap();
        let near = outline
            .iter()
            .map(|p| p.distance(center))
            .fold(f32::INFINITY, f32::min);

        assert!((far.distance(center) - 1.9f32.sqrt() * frame.unit()).abs() < 0.5);
        assert!((near - 0.1f32.sqrt() * frame.unit()).abs() < 0.5);
        // screen y points down, so the major axis runs to the upper right or lower left
        let d = far - center;
        assert!((d.x.abs() - d.y.abs()).abs() < 1.0);
        assert!(d.x * d.y < 0.0);
    }
}
