pub mod cloud;
pub mod correlation;
pub mod density;
pub mod intro;

use macroquad::prelude::*;
use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};

use crate::app::hud::Typography;
use crate::app::palette;
use crate::config::{SceneKind, Settings};
use crate::error::Result;
use crate::geometry::Frame;
use crate::timeline::{Beat, Moment, Timeline};

use cloud::Cloud;
use correlation::Plane;
use density::Density;
use intro::Intro;

pub struct Scene {
    typo: Typography,
    rng: StdRng,
    intro: Option<Intro>,
    density: Option<Density>,
    plane: Plane,
    cloud: Option<Cloud>,
    last_beat: Option<Beat>,
}

impl Scene {
    pub fn new(settings: &Settings, timeline: &Timeline, typo: Typography, mut rng: StdRng) -> Result<Self> {
        let plane = Plane::new(settings, &typo, &mut rng)?;

        let (intro, density, cloud) = match settings.scene {
            SceneKind::Full => {
                let aspect = settings.pixel_width as f32 / settings.pixel_height as f32;
                let field_rng = StdRng::seed_from_u64(rng.random());
                let orbit_start = timeline.animation_end(Beat::CloudIn).unwrap_or(0.0);

                (
                    Some(Intro::new(aspect, settings.credit.clone(), field_rng)),
                    Some(Density::new(&typo)),
                    Some(Cloud::new(settings.sample_count, orbit_start, &mut rng)?),
                )
            }
            SceneKind::Correlation => (None, None, None),
        };

        Ok(Self { typo, rng, intro, density, plane, cloud, last_beat: None })
    }

    // hands the typography back so a restart can reuse the loaded font
    pub fn into_typography(self) -> Typography {
        self.typo
    }

    pub fn typography(&self) -> &Typography {
        &self.typo
    }

    pub fn log_stats(&self) {
        let (redraws, regenerations) = self.plane.cache_stats();
        log::debug!("correlated cloud: {} redraws, {} resamples", redraws, regenerations);
    }

    pub fn update(&mut self, moment: &Moment, dt: f32) -> Result<()> {
        if self.last_beat != Some(moment.beat) {
            log::debug!("{:?} at {:.2}s", moment.beat, moment.elapsed);
            self.last_beat = Some(moment.beat);
        }

        // a paused preview steps by zero; nothing moves and the cloud is not resampled
        if dt <= 0.0 {
            return Ok(());
        }

        if let Some(intro) = &mut self.intro {
            intro.update(moment, dt);
        }
        self.plane.update(moment, &mut self.rng)
    }

    pub fn draw(&self, moment: &Moment, frame: &Frame) {
        clear_background(palette::BACKGROUND);

        if let Some(intro) = &self.intro {
            intro.draw_background(moment, frame);
        }
        if let Some(density) = &self.density {
            density.draw(moment, frame, &self.typo);
        }
        self.plane.draw(moment, frame, &self.typo);
        if let Some(cloud) = &self.cloud {
            cloud.draw(moment, frame, &self.typo);
        }
        // the credit stays on top of every segment
        if let Some(intro) = &self.intro {
            intro.draw_overlay(moment, frame, &self.typo);
        }
    }
}
