use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Continue,
    Restart,
    Quit,
}

#[derive(Debug, Default)]
pub struct Controls {
    pub paused: bool,
}

impl Controls {
    // Space pauses, R restarts from the top, Escape quits
    pub fn poll(&mut self) -> Command {
        if is_key_pressed(KeyCode::Escape) {
            return Command::Quit;
        }
        if is_key_pressed(KeyCode::R) {
            self.paused = false;
            return Command::Restart;
        }
        if is_key_pressed(KeyCode::Space) {
            self.paused = !self.paused;
            log::debug!("paused: {}", self.paused);
        }
        Command::Continue
    }

    // seconds to advance this frame
    pub fn step(&self, frame_time: f32) -> f32 {
        if self.paused { 0.0 } else { frame_time }
    }
}
