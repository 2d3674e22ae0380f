use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Preview,
    Production,
}

impl Quality {
    // (width, height, frame rate)
    pub fn dimensions(self) -> (u32, u32, u32) {
        match self {
            Quality::Preview => (640, 360, 15),
            Quality::Production => (1280, 720, 30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    // 1D density, 2D correlation, then the 3D cloud
    #[default]
    Full,
    // the 2D correlation segment on its own
    Correlation,
}

impl SceneKind {
    fn default_quality(self) -> Quality {
        match self {
            SceneKind::Full => Quality::Production,
            SceneKind::Correlation => Quality::Preview,
        }
    }

    fn default_interval(self) -> u32 {
        match self {
            SceneKind::Full => 3,
            SceneKind::Correlation => 2,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub quality: Option<Quality>,
    pub pixel_width: Option<u32>,
    pub pixel_height: Option<u32>,
    pub frame_rate: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub sample_count: usize,
    pub regeneration_interval: Option<u32>,
    pub rho_target: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub kind: SceneKind,
    pub credit: String,
    // TTF with Greek glyphs; without one, symbols are spelled out
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub record: bool,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub sampling: SamplingConfig,
    pub scene: SceneConfig,
    pub output: OutputConfig,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_count: 300,
            regeneration_interval: None,
            rho_target: 0.9,
            seed: None,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            kind: SceneKind::Full,
            credit: "Made by Mohamed Yossri".into(),
            font_path: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            record: false,
            dir: "frames".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub scene: SceneKind,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub frame_rate: u32,
    pub sample_count: usize,
    pub regeneration_interval: u32,
    pub rho_target: f64,
    pub seed: Option<u64>,
    pub credit: String,
    pub font_path: Option<PathBuf>,
    pub record: bool,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    // reads `path`; a missing file yields the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::warn!("Config file not found at {:?}, using defaults.", path);
            return Ok(Self::default());
        }

        log::info!("Loading config from {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(kind) = overrides.scene() {
            self.scene.kind = kind;
        }
        if let Some(quality) = overrides.quality() {
            self.render.quality = Some(quality);
        }
        if let Some(seed) = overrides.seed {
            self.sampling.seed = Some(seed);
        }
        if overrides.record {
            self.output.record = true;
        }
    }

    pub fn resolve(&self) -> Result<Settings> {
        let kind = self.scene.kind;
        let quality = self.render.quality.unwrap_or_else(|| kind.default_quality());
        let (width, height, fps) = quality.dimensions();

        let settings = Settings {
            scene: kind,
            pixel_width: self.render.pixel_width.unwrap_or(width),
            pixel_height: self.render.pixel_height.unwrap_or(height),
            frame_rate: self.render.frame_rate.unwrap_or(fps),
            sample_count: self.sampling.sample_count,
            regeneration_interval: self
                .sampling
                .regeneration_interval
                .unwrap_or_else(|| kind.default_interval()),
            rho_target: self.sampling.rho_target,
            seed: self.sampling.seed,
            credit: self.scene.credit.clone(),
            font_path: self.scene.font_path.clone(),
            record: self.output.record,
            output_dir: self.output.dir.clone(),
        };

        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));

        if self.pixel_width == 0 || self.pixel_height == 0 {
            return invalid("pixel dimensions must be non-zero");
        }
        if self.frame_rate == 0 {
            return invalid("frame_rate must be non-zero");
        }
        if self.sample_count == 0 {
            return invalid("sample_count must be non-zero");
        }
        if self.regeneration_interval == 0 {
            return invalid("regeneration_interval must be non-zero");
        }
        if !(self.rho_target > -1.0 && self.rho_target < 1.0) {
            return invalid("rho_target must lie strictly between -1 and 1");
        }
        Ok(())
    }

    pub fn frame_time(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }
}

// command line switches layered on top of the config file
#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[clap(name = "normal-distribution-animator", about = "Animates the normal distribution from 1D to 3D")]
pub struct Overrides {
    /// Play the 1D, 2D and 3D segments in sequence
    #[clap(long)]
    pub full: bool,

    /// Play only the 2D correlation segment
    #[clap(long, conflicts_with = "full")]
    pub correlation: bool,

    /// Render at 640x360, 15 fps
    #[clap(long)]
    pub preview: bool,

    /// Render at 1280x720, 30 fps
    #[clap(long, conflicts_with = "preview")]
    pub production: bool,

    /// Write every frame to the output directory
    #[clap(long)]
    pub record: bool,

    /// Config file to read instead of config.toml
    #[clap(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for every random sample in the run
    #[clap(long, value_name = "N")]
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn scene(&self) -> Option<SceneKind> {
        if self.correlation {
            Some(SceneKind::Correlation)
        } else if self.full {
            Some(SceneKind::Full)
        } else {
            None
        }
    }

    pub fn quality(&self) -> Option<Quality> {
        if self.preview {
            Some(Quality::Preview)
        } else if self.production {
            Some(Quality::Production)
        } else {
            None
        }
    }

    pub fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
    }
}
