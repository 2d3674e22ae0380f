pub mod hud;
pub mod renderer;
pub mod user_settings;

const SHADOW_OFFSET: f32 = 2.0;
const FONT_SIZE: u16 = 20;
const LINE_SPACING: f32 = 1.4;

pub mod palette {
    use macroquad::color::Color;

    pub const BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const GREY: Color = Color::new(0.733, 0.733, 0.733, 1.0); // #BBBBBB
    pub const BLUE: Color = Color::new(0.345, 0.769, 0.867, 1.0); // #58C4DD
    pub const RED: Color = Color::new(0.988, 0.384, 0.333, 1.0); // #FC6255
    pub const GREEN: Color = Color::new(0.514, 0.757, 0.404, 1.0); // #83C167
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);
    pub const STREAM: Color = Color::new(0.345, 0.769, 0.867, 0.55);
    pub const SHADOW: Color = Color::new(0.0, 0.0, 0.0, 0.8);
}
