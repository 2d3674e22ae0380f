use macroquad::prelude::*;

use crate::geometry::{Axes, Frame};

// scene units
const DASH_LENGTH: f32 = 0.1;
const TICK_SIZE: f32 = 0.1;
const TIP_LENGTH: f32 = 0.2;
const STROKE: f32 = 0.025;

pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, color.a * alpha.clamp(0.0, 1.0))
}

pub fn mix(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color::new(
        from.r + (to.r - from.r) * t,
        from.g + (to.g - from.g) * t,
        from.b + (to.b - from.b) * t,
        from.a + (to.a - from.a) * t,
    )
}

pub fn stroke(frame: &Frame) -> f32 {
    (STROKE * frame.unit()).max(1.0)
}

// splits `a -> b` into dashes of `dash` length separated by equal gaps
pub fn dash_segments(a: Vec2, b: Vec2, dash: f32) -> Vec<(Vec2, Vec2)> {
    let length = a.distance(b);
    if length <= f32::EPSILON || dash <= 0.0 {
        return Vec::new();
    }

    let dir = (b - a) / length;
    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + dash).min(length);
        segments.push((a + dir * start, a + dir * end));
        start += 2.0 * dash;
    }
    segments
}

// the leading `fraction` of a polyline, measured by arc length
pub fn partial_polyline(points: &[Vec2], fraction: f32) -> Vec<Vec2> {
    if points.len() < 2 || fraction >= 1.0 {
        return points.to_vec();
    }
    if fraction <= 0.0 {
        return Vec::new();
    }

    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    let mut remaining = total * fraction;
    let mut out = vec![points[0]];

    for w in points.windows(2) {
        let segment = w[0].distance(w[1]);
        if remaining >= segment {
            out.push(w[1]);
            remaining -= segment;
        } else {
            if segment > 0.0 {
                out.push(w[0].lerp(w[1], remaining / segment));
            }
            break;
        }
    }
    out
}

pub fn draw_polyline(points: &[Vec2], fraction: f32, thickness: f32, color: Color) {
    for w in partial_polyline(points, fraction).windows(2) {
        draw_line(w[0].x, w[0].y, w[1].x, w[1].y, thickness, color);
    }
}

pub fn draw_closed(points: &[Vec2], fraction: f32, thickness: f32, color: Color) {
    let mut closed = points.to_vec();
    if let Some(&first) = points.first() {
        closed.push(first);
    }
    draw_polyline(&closed, fraction, thickness, color);
}

// dashed line grown from `a` towards `b` by `fraction`
pub fn draw_dashed_line(a: Vec2, b: Vec2, fraction: f32, frame: &Frame, color: Color) {
    if fraction <= 0.0 {
        return;
    }
    let end = a.lerp(b, fraction.min(1.0));
    let thickness = stroke(frame);
    for (p, q) in dash_segments(a, end, DASH_LENGTH * frame.unit()) {
        draw_line(p.x, p.y, q.x, q.y, thickness, color);
    }
}

pub fn draw_dots(points: &[Vec2], radius: f32, color: Color) {
    if color.a <= 0.0 {
        return;
    }
    for p in points {
        draw_circle(p.x, p.y, radius, color);
    }
}

fn draw_tip(at: Vec2, dir: Vec2, length: f32, color: Color) {
    let normal = vec2(-dir.y, dir.x) * (length / 2.0);
    let base = at - dir * length;
    draw_triangle(at, base + normal, base - normal, color);
}

#[derive(Debug, Clone, Copy)]
pub struct AxesStyle {
    pub color: Color,
    pub tips_at_start: bool,
}

// draws both axes with ticks and arrow tips, each grown from its lower end by `reveal`
pub fn draw_axes(axes: &Axes, frame: &Frame, style: AxesStyle, reveal: f32, alpha: f32) {
    if reveal <= 0.0 || alpha <= 0.0 {
        return;
    }

    let color = with_alpha(style.color, alpha);
    let thickness = stroke(frame);
    let tick = TICK_SIZE * frame.unit() / 2.0;
    let tip = TIP_LENGTH * frame.unit();

    let x_level = axes.x_axis_level();
    let y_level = axes.y_axis_level();

    let x_start = axes.c2p(frame, axes.x_range.min, x_level);
    let x_end = axes.c2p(frame, axes.x_range.max, x_level);
    let y_start = axes.c2p(frame, y_level, axes.y_range.min);
    let y_end = axes.c2p(frame, y_level, axes.y_range.max);

    for (start, end, horizontal) in [(x_start, x_end, true), (y_start, y_end, false)] {
        let grown = start.lerp(end, reveal.min(1.0));
        draw_line(start.x, start.y, grown.x, grown.y, thickness, color);

        let ticks = if horizontal { axes.x_range.ticks() } else { axes.y_range.ticks() };
        for value in ticks {
            let p = if horizontal {
                axes.c2p(frame, value, x_level)
            } else {
                axes.c2p(frame, y_level, value)
            };
            // ticks appear once the growing axis reaches them
            if start.distance(p) > start.distance(grown) {
                continue;
            }
            let offset = if horizontal { vec2(0.0, tick) } else { vec2(tick, 0.0) };
            draw_line(p.x - offset.x, p.y - offset.y, p.x + offset.x, p.y + offset.y, thickness, color);
        }

        let dir = (end - start).normalize_or_zero();
        if reveal >= 1.0 {
            draw_tip(end + dir * tip, dir, tip, color);
            if style.tips_at_start {
                draw_tip(start - dir * tip, -dir, tip, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_multiplies() {
        let c = with_alpha(Color::new(1.0, 0.5, 0.0, 0.5), 0.5);
        assert_eq!(c.a, 0.25);
        assert_eq!(c.g, 0.5);
        assert_eq!(with_alpha(WHITE, 3.0).a, 1.0);
    }

    #[test]
    fn mix_interpolates_channels() {
        let c = mix(Color::new(0.0, 0.0, 0.0, 1.0), Color::new(1.0, 0.5, 0.0, 1.0), 0.5);
        assert_eq!((c.r, c.g, c.b, c.a), (0.5, 0.25, 0.0, 1.0));
    }

    #[test]
    fn dashes_alternate_with_gaps() {
        let segments = dash_segments(vec2(0.0, 0.0), vec2(10.0, 0.0), 1.0);
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], (vec2(0.0, 0.0), vec2(1.0, 0.0)));
        assert_eq!(segments[4], (vec2(8.0, 0.0), vec2(9.0, 0.0)));

        // last dash is clipped to the end point
        let segments = dash_segments(vec2(0.0, 0.0), vec2(0.0, 2.5), 1.0);
        assert_eq!(segments.last(), Some(&(vec2(0.0, 2.0), vec2(0.0, 2.5))));

        assert!(dash_segments(vec2(1.0, 1.0), vec2(1.0, 1.0), 1.0).is_empty());
    }

    #[test]
    fn partial_polyline_by_arc_length() {
        let points = [vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(2.0, 2.0)];

        assert!(partial_polyline(&points, 0.0).is_empty());
        assert_eq!(partial_polyline(&points, 1.0), points.to_vec());
        assert_eq!(partial_polyline(&points, 0.25), vec![vec2(0.0, 0.0), vec2(1.0, 0.0)]);
        assert_eq!(
            partial_polyline(&points, 0.75),
            vec![vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(2.0, 1.0)]
        );
    }
}
