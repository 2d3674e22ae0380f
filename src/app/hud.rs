use std::path::Path;

use macroquad::prelude::*;

use super::{FONT_SIZE, LINE_SPACING, SHADOW_OFFSET, palette};
use crate::app::renderer::with_alpha;
use crate::geometry::{EDGE_BUFF, Frame};

// text sizes below are given on a 48-point scale relative to an 8-unit-tall frame
const REFERENCE_SIZE: f32 = 48.0;
const REFERENCE_HEIGHT: f32 = 0.6;

pub const FORMULA_1D: &str =
    "f(x) = 1 / {sqrt}(2{pi}{sigma}{sq}) {dot} exp(-(x - {mu}){sq} / 2{sigma}{sq})";

pub const FORMULA_2D: &str = "f(x, y) = 1 / (2{pi}{sigma}X{sigma}Y {sqrt}(1 - {rho}{sq})) {dot} exp(-1 / 2(1 - {rho}{sq}) {dot}\n\
     [ (x - {mu}X){sq}/{sigma}X{sq} - 2{rho}(x - {mu}X)(y - {mu}Y)/{sigma}X{sigma}Y + (y - {mu}Y){sq}/{sigma}Y{sq} ])";

// pixel size for a text of `size` points in the given frame
pub fn font_px(size: f32, frame: &Frame) -> u16 {
    (size / REFERENCE_SIZE * REFERENCE_HEIGHT * frame.unit()).round().max(1.0) as u16
}

// the first `fraction` of `text`, by characters
pub fn written(text: &str, fraction: f32) -> &str {
    let total = text.chars().count();
    let shown = (total as f32 * fraction.clamp(0.0, 1.0)).round() as usize;
    match text.char_indices().nth(shown) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyphs {
    Unicode,
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Mu,
    Sigma,
    Rho,
    Pi,
    Sqrt,
    Squared,
    Dot,
}

impl Symbol {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "mu" => Symbol::Mu,
            "sigma" => Symbol::Sigma,
            "rho" => Symbol::Rho,
            "pi" => Symbol::Pi,
            "sqrt" => Symbol::Sqrt,
            "sq" => Symbol::Squared,
            "dot" => Symbol::Dot,
            _ => return None,
        })
    }
}

impl Glyphs {
    pub fn symbol(self, symbol: Symbol) -> &'static str {
        match (self, symbol) {
            (Glyphs::Unicode, Symbol::Mu) => "μ",
            (Glyphs::Unicode, Symbol::Sigma) => "σ",
            (Glyphs::Unicode, Symbol::Rho) => "ρ",
            (Glyphs::Unicode, Symbol::Pi) => "π",
            (Glyphs::Unicode, Symbol::Sqrt) => "√",
            (Glyphs::Unicode, Symbol::Squared) => "²",
            (Glyphs::Unicode, Symbol::Dot) => "·",
            (Glyphs::Ascii, Symbol::Mu) => "mu",
            (Glyphs::Ascii, Symbol::Sigma) => "sigma",
            (Glyphs::Ascii, Symbol::Rho) => "rho",
            (Glyphs::Ascii, Symbol::Pi) => "*pi*",
            (Glyphs::Ascii, Symbol::Sqrt) => "sqrt",
            (Glyphs::Ascii, Symbol::Squared) => "^2",
            (Glyphs::Ascii, Symbol::Dot) => "*",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    // None draws in the formula's base colour
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub lines: Vec<Vec<Run>>,
}

impl Formula {
    // expands `{name}` placeholders into glyphs, colouring the ones listed in `highlights`
    pub fn parse(template: &str, glyphs: Glyphs, highlights: &[(Symbol, Color)]) -> Self {
        let lines = template
            .lines()
            .map(|line| Self::parse_line(line, glyphs, highlights))
            .collect();
        Self { lines }
    }

    fn parse_line(line: &str, glyphs: Glyphs, highlights: &[(Symbol, Color)]) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        let mut push = |text: &str, color: Option<Color>| match runs.last_mut() {
            Some(last) if last.color == color => last.text.push_str(text),
            _ => runs.push(Run { text: text.to_string(), color }),
        };

        let mut rest = line;
        while let Some(open) = rest.find('{') {
            push(&rest[..open], None);
            let after = &rest[open + 1..];
            match after.find('}').and_then(|close| Symbol::from_name(&after[..close]).map(|s| (close, s))) {
                Some((close, symbol)) => {
                    let color = highlights.iter().find(|(s, _)| *s == symbol).map(|(_, c)| *c);
                    push(glyphs.symbol(symbol), color);
                    rest = &after[close + 1..];
                }
                None => {
                    push("{", None);
                    rest = after;
                }
            }
        }
        push(rest, None);

        runs.retain(|run| !run.text.is_empty());
        runs
    }

    pub fn char_count(&self) -> usize {
        self.lines.iter().flatten().map(|run| run.text.chars().count()).sum()
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|run| run.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct Typography {
    font: Option<Font>,
    pub glyphs: Glyphs,
}

impl Typography {
    // without a font, macroquad's built-in one is used and Greek letters are spelled out
    pub fn plain() -> Self {
        Self { font: None, glyphs: Glyphs::Ascii }
    }

    pub async fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::plain();
        };

        match load_ttf_font(&path.to_string_lossy()).await {
            Ok(font) => {
                log::info!("Loaded font {:?}", path);
                Self { font: Some(font), glyphs: Glyphs::Unicode }
            }
            Err(e) => {
                log::warn!("Failed to load font {:?}: {:?}, falling back to the built-in font.", path, e);
                Self::plain()
            }
        }
    }

    pub fn symbol(&self, symbol: Symbol) -> &'static str {
        self.glyphs.symbol(symbol)
    }

    pub fn formula(&self, template: &str, highlights: &[(Symbol, Color)]) -> Formula {
        Formula::parse(template, self.glyphs, highlights)
    }

    pub fn measure(&self, text: &str, size: u16) -> TextDimensions {
        measure_text(text, self.font.as_ref(), size, 1.0)
    }

    // draws with the baseline starting at `pos`
    pub fn draw(&self, text: &str, pos: Vec2, size: u16, color: Color) {
        draw_text_ex(
            text,
            pos.x,
            pos.y,
            TextParams {
                font: self.font.as_ref(),
                font_size: size,
                color,
                ..Default::default()
            },
        );
    }

    // draws the first `reveal` of `text` where the whole text would be centred on `center`
    pub fn draw_centered(&self, text: &str, center: Vec2, size: u16, color: Color, reveal: f32) {
        if color.a <= 0.0 || reveal <= 0.0 {
            return;
        }
        let dims = self.measure(text, size);
        let origin = vec2(center.x - dims.width / 2.0, center.y - dims.height / 2.0 + dims.offset_y);
        self.draw(written(text, reveal), origin, size, color);
    }

    pub fn draw_shadowed(&self, text: &str, center: Vec2, size: u16, color: Color, reveal: f32) {
        let shadow = with_alpha(palette::SHADOW, color.a);
        self.draw_centered(text, center + vec2(SHADOW_OFFSET, SHADOW_OFFSET), size, shadow, reveal);
        self.draw_centered(text, center, size, color, reveal);
    }

    pub fn top_center(&self, text: &str, size: u16, frame: &Frame) -> Vec2 {
        let dims = self.measure(text, size);
        vec2(frame.width_px / 2.0, EDGE_BUFF * frame.unit() + dims.height / 2.0)
    }

    pub fn bottom_left(&self, text: &str, size: u16, frame: &Frame) -> Vec2 {
        let dims = self.measure(text, size);
        let buff = EDGE_BUFF * frame.unit();
        vec2(buff + dims.width / 2.0, frame.height_px - buff - dims.height / 2.0)
    }

    fn line_size(&self, line: &[Run], size: u16) -> (f32, f32) {
        line.iter().fold((0.0, 0.0), |(w, h), run| {
            let dims = self.measure(&run.text, size);
            (w + dims.width, f32::max(h, dims.height))
        })
    }

    pub fn formula_width(&self, formula: &Formula, size: u16) -> f32 {
        formula
            .lines
            .iter()
            .map(|line| self.line_size(line, size).0)
            .fold(0.0, f32::max)
    }

    pub fn formula_height(&self, formula: &Formula, size: u16) -> f32 {
        formula.lines.len() as f32 * size as f32 * LINE_SPACING
    }

    // draws `formula` centred on `center`, each line centred, the first `reveal` of it written
    pub fn draw_formula(&self, formula: &Formula, center: Vec2, size: u16, base: Color, alpha: f32, reveal: f32) {
        if alpha <= 0.0 || reveal <= 0.0 {
            return;
        }

        let line_height = size as f32 * LINE_SPACING;
        let mut budget = (formula.char_count() as f32 * reveal.clamp(0.0, 1.0)).round() as usize;
        let mut y = center.y - self.formula_height(formula, size) / 2.0 + size as f32;

        for line in &formula.lines {
            let (width, _) = self.line_size(line, size);
            let mut x = center.x - width / 2.0;

            for run in line {
                if budget == 0 {
                    return;
                }
                let chars = run.text.chars().count();
                let shown = if chars <= budget {
                    run.text.as_str()
                } else {
                    written(&run.text, budget as f32 / chars as f32)
                };
                budget = budget.saturating_sub(chars);

                let color = with_alpha(run.color.unwrap_or(base), alpha);
                self.draw(shown, vec2(x, y), size, color);
                x += self.measure(&run.text, size).width;
            }
            y += line_height;
        }
    }

    // small status line in the top-right corner
    pub fn draw_status(&self, text: &str, frame: &Frame) {
        let dims = self.measure(text, FONT_SIZE);
        let pos = vec2(frame.width_px - dims.width - 10.0, dims.offset_y + 10.0);
        self.draw(text, pos, FONT_SIZE, palette::GREY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_reveals_by_characters() {
        assert_eq!(written("hello", 0.0), "");
        assert_eq!(written("hello", 0.4), "he");
        assert_eq!(written("hello", 1.0), "hello");
        assert_eq!(written("ρ = 0.50", 0.25), "ρ ");
        assert_eq!(written("", 0.5), "");
    }

    #[test]
    fn one_d_formula_highlights_parameters() {
        let formula = Formula::parse(FORMULA_1D, Glyphs::Ascii, &[(Symbol::Mu, palette::YELLOW), (Symbol::Sigma, palette::GREEN)]);
        assert_eq!(formula.lines.len(), 1);
        assert_eq!(
            formula.text(),
            "f(x) = 1 / sqrt(2*pi*sigma^2) * exp(-(x - mu)^2 / 2sigma^2)"
        );

        let line = &formula.lines[0];
        assert!(line.iter().any(|r| r.text == "mu" && r.color == Some(palette::YELLOW)));
        assert_eq!(line.iter().filter(|r| r.text == "sigma" && r.color == Some(palette::GREEN)).count(), 2);
        // uncoloured glyphs merge into the neighbouring text
        assert!(line.iter().all(|r| !r.text.is_empty()));
        assert_eq!(line.len(), 7);
    }

    #[test]
    fn two_d_formula_spans_two_lines() {
        let formula = Formula::parse(FORMULA_2D, Glyphs::Unicode, &[(Symbol::Rho, palette::RED)]);
        assert_eq!(formula.lines.len(), 2);
        let rhos = formula.lines.iter().flatten().filter(|r| r.text == "ρ").count();
        assert_eq!(rhos, 3);
        assert!(formula.lines.iter().flatten().filter(|r| r.text == "ρ").all(|r| r.color == Some(palette::RED)));
        assert!(formula.text().starts_with("f(x, y) = 1 / (2πσXσY √(1 - ρ²))"));
    }

    #[test]
    fn unknown_placeholders_stay_literal() {
        let formula = Formula::parse("a {beta} {mu}", Glyphs::Unicode, &[]);
        assert_eq!(formula.text(), "a {beta} μ");
        assert_eq!(formula.lines[0].len(), 1);
        assert_eq!(formula.char_count(), 10);
    }

    #[test]
    fn font_scales_with_frame() {
        assert_eq!(font_px(48.0, &Frame::new(1280.0, 720.0)), 54);
        assert_eq!(font_px(24.0, &Frame::new(640.0, 360.0)), 14);
    }
}
