//! `vista-headless <viewer.toml> <scene.json> [frames]`
//!
//! Loads a scene and runs the frame loop against the recording backend,
//! logging what each frame drew.

use anyhow::{bail, Context as _};
use vista_app::{logging, Viewer, ViewerConfig};
use vista_renderer::RecordingContext;

const DEFAULT_FRAMES: u32 = 60;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(scene_path)) = (args.next(), args.next()) else {
        bail!("usage: vista-headless <viewer.toml> <scene.json> [frames]");
    };
    let frames = match args.next() {
        Some(n) => n.parse::<u32>().with_context(|| format!("invalid frame count `{n}`"))?,
        None => DEFAULT_FRAMES,
    };

    let config = ViewerConfig::load(&config_path)?;
    logging::init(config.level_filter()).context("installing logger")?;

    let scene = std::fs::read_to_string(&scene_path)
        .with_context(|| format!("reading scene {scene_path}"))?;
    let mut viewer = Viewer::new(config);
    let count = viewer.load_scene(&scene)?;
    log::info!("{count} hotspots from {scene_path}");

    let mut gl = RecordingContext::new();
    let dt = 1.0 / 60.0;
    for frame in 1..=frames {
        gl.clear_frame();
        let report = viewer.frame(dt, &mut gl);
        let ready = viewer.hotspots().iter().filter(|h| h.is_ready()).count();
        log::info!(
            "frame {frame}: color {}/{} drawn, picking {}/{} drawn, {ready}/{count} ready",
            report.color.drawn,
            report.color.total(),
            report.picking.drawn,
            report.picking.total(),
        );
    }

    viewer.clear();
    Ok(())
}
