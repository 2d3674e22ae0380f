use ::rand::SeedableRng;
use ::rand::rngs::StdRng;
use anyhow::Context;
use clap::Parser;
use env_logger::{Builder, Env};
use macroquad::prelude::*;
use once_cell::sync::OnceCell;

mod app;
mod capture;
mod config;
mod error;
mod flow;
mod geometry;
mod resample;
mod scene;
mod stats;
mod timeline;

use app::hud::Typography;
use app::user_settings::{Command, Controls};
use capture::FrameRecorder;
use config::{Config, Overrides, SceneKind, Settings};
use geometry::Frame;
use scene::Scene;
use timeline::Timeline;

// constants
const WINDOW_TITLE: &str = "Normal Distribution Animator";
const MSAA_SAMPLES: i32 = 4;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
}

fn load_settings() -> anyhow::Result<Settings> {
    // clap prints usage and exits on a bad command line
    let overrides = Overrides::parse();
    let mut config = Config::load(overrides.config_path())
        .with_context(|| format!("loading {:?}", overrides.config_path()))?;
    config.apply(&overrides);
    Ok(config.resolve()?)
}

// window_conf runs before main, so whichever asks first loads the settings
fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        init_logger();
        match load_settings() {
            Ok(settings) => {
                log::debug!("settings: {:?}", settings);
                settings
            }
            Err(e) => {
                log::error!("{:#}", e);
                std::process::exit(2);
            }
        }
    })
}

fn window_conf() -> Conf {
    let settings = settings();
    Conf {
        window_title: WINDOW_TITLE.to_owned(),
        window_width: settings.pixel_width as i32,
        window_height: settings.pixel_height as i32,
        high_dpi: false,
        // recorded frames must keep the configured resolution
        window_resizable: !settings.record,
        sample_count: MSAA_SAMPLES,
        ..Default::default()
    }
}

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    let timeline = match settings.scene {
        SceneKind::Full => Timeline::full(),
        SceneKind::Correlation => Timeline::correlation(),
    };

    let typo = Typography::load(settings.font_path.as_deref()).await;
    let mut scene = Scene::new(settings, &timeline, typo, new_rng(settings.seed))?;

    let mut recorder = if settings.record {
        Some(FrameRecorder::new(&settings.output_dir, settings.frame_rate)?)
    } else {
        None
    };
    let mut controls = Controls::default();

    log::info!(
        "Playing {:?} scene: {} beats over {:.1}s at {}x{}",
        settings.scene,
        timeline.steps().len(),
        timeline.duration(),
        settings.pixel_width,
        settings.pixel_height,
    );

    let mut elapsed: f32 = 0.0;
    loop {
        // recording advances by whole frames so the output keeps its frame rate
        let delta_time = if recorder.is_some() {
            settings.frame_time()
        } else {
            match controls.poll() {
                Command::Quit => break,
                Command::Restart => {
                    log::info!("Restarting");
                    scene.log_stats();
                    elapsed = 0.0;
                    scene = Scene::new(settings, &timeline, scene.into_typography(), new_rng(settings.seed))?;
                    // the key stays pressed until the next frame
                    next_frame().await;
                    continue;
                }
                Command::Continue => controls.step(get_frame_time()),
            }
        };

        let Some(moment) = timeline.at(elapsed) else {
            break;
        };

        scene.update(&moment, delta_time)?;

        let frame = Frame::new(screen_width(), screen_height());
        scene.draw(&moment, &frame);

        match &mut recorder {
            Some(recorder) => recorder.capture()?,
            None if controls.paused => scene.typography().draw_status("paused", &frame),
            None => {}
        }

        elapsed += delta_time;
        next_frame().await
    }

    scene.log_stats();
    if let Some(recorder) = recorder {
        recorder.finish();
    }
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    let settings = settings();

    if let Err(e) = run(settings).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
