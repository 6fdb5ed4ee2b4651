//! Headless reveal
//!
//! Loads the card assets from a directory, runs the reveal, clicks the open
//! button and plays the open chain to the end without a window.
//!
//! Run: cargo run --example headless_reveal -- path/to/assets [config.json]

use std::time::Duration;

use card_scene::app::{HeadlessUi, NullRenderer};
use card_scene::timeline::{ButtonStage, OpenStage};
use card_scene::utils::Timer;
use card_scene::{AppContext, SceneConfig, UiElement, UiState};

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: u64 = 60 * 30;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "assets".to_string());
    let mut config = match args.next() {
        Some(path) => SceneConfig::from_file(path)?,
        None => SceneConfig::default(),
    };
    config.assets.root = root;

    let mut ctx = AppContext::new(config, HeadlessUi::new(), NullRenderer::new(), 1280, 720);
    ctx.resize(1280, 720, 1.0);
    ctx.start_loading()?;

    let mut timer = Timer::new();
    let mut clicked = false;

    while timer.frame_count < MAX_FRAMES {
        std::thread::sleep(FRAME);
        timer.tick();
        ctx.frame(timer.dt_seconds());

        if let Some(error) = ctx.timeline.load_error() {
            anyhow::bail!("{error}");
        }

        if ctx.state() == UiState::CardClosed && !clicked {
            println!(
                "Revealed after {:.2}s, camera at {:?}",
                timer.elapsed.as_secs_f32(),
                ctx.camera_position()
            );
            ctx.click(UiElement::OpenButton)?;
            clicked = true;
        }

        if ctx.timeline.open_stage() == OpenStage::Settled
            && ctx.timeline.button_stage() == ButtonStage::Swapped
        {
            println!(
                "Card open after {:.2}s ({} frames rendered)",
                timer.elapsed.as_secs_f32(),
                ctx.renderer.frames
            );
            ctx.click(UiElement::MapButton)?;
            for url in ctx.ui.opened_urls() {
                println!("Map link: {url}");
            }
            return Ok(());
        }
    }

    anyhow::bail!(
        "Timed out in state {:?} ({}% loaded)",
        ctx.state(),
        ctx.loading.combined_progress().percent()
    )
}
