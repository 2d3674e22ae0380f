use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use macroquad::texture::get_screen_data;

use crate::error::{Error, Result};

const FRAME_PATTERN: &str = "frame_%05d.png";

pub struct FrameRecorder {
    dir: PathBuf,
    frame_rate: u32,
    frames: u32,
}

impl FrameRecorder {
    pub fn new<P: AsRef<Path>>(dir: P, frame_rate: u32) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| Error::Capture { path: dir.clone(), source })?;
        log::info!("Recording frames to {:?} at {} fps", dir, frame_rate);

        Ok(Self { dir, frame_rate, frames: 0 })
    }

    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", index))
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    // grabs the current framebuffer; call after drawing, before `next_frame`
    pub fn capture(&mut self) -> Result<()> {
        let path = self.frame_path(self.frames);
        let name = path.to_str().ok_or_else(|| Error::Capture {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path is not valid UTF-8"),
        })?;

        // export_png flips the GL bottom-up rows itself
        get_screen_data().export_png(name);
        self.frames += 1;
        Ok(())
    }

    // command that assembles the written frames into a video file
    pub fn ffmpeg_command(&self) -> String {
        format!(
            "ffmpeg -y -framerate {fps} -i {input} -c:v libx264 -pix_fmt yuv420p {output}",
            fps = self.frame_rate,
            input = self.dir.join(FRAME_PATTERN).display(),
            output = self.dir.join("scene.mp4").display(),
        )
    }

    pub fn finish(self) {
        log::info!("Wrote {} frames to {:?}", self.frames(), self.dir);
        log::info!("Encode with: {}", self.ffmpeg_command());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_output_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("frames");
        let recorder = FrameRecorder::new(&dir, 30).unwrap();
        assert!(dir.is_dir());
        assert_eq!(recorder.frames(), 0);
    }

    #[test]
    fn frames_are_numbered_for_ffmpeg() {
        let root = tempfile::tempdir().unwrap();
        let recorder = FrameRecorder::new(root.path(), 15).unwrap();

        assert_eq!(recorder.frame_path(0), root.path().join("frame_00000.png"));
        assert_eq!(recorder.frame_path(1234), root.path().join("frame_01234.png"));

        let cmd = recorder.ffmpeg_command();
        assert!(cmd.starts_with("ffmpeg -y -framerate 15 "));
        assert!(cmd.contains("frame_%05d.png"));
        assert!(cmd.ends_with("scene.mp4"));
    }

    #[test]
    fn unwritable_directory_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("taken");
        fs::write(&file, b"").unwrap();

        assert!(matches!(FrameRecorder::new(file.join("frames"), 30), Err(Error::Capture { .. })));
    }
}
