//! # Parametric Demo
//!
//! Demonstrates:
//! - Parametric surface node set up from command line flags or a TOML file
//! - Boundary volumes captured into front/back depth textures
//! - One frame culled from a viewer camera and executed on the dummy backend
//! - RON export of the composite scene with `-o`

use std::process::ExitCode;

use parasurf_demos::{DemoArgs, DemoError, SceneExport, run_frame, viewer_camera};
use parasurf_graphics::{DummyBackend, GraphicsDevice};

fn run(args: &DemoArgs) -> Result<ExitCode, DemoError> {
    let device = GraphicsDevice::new();
    let node = args.build_node(device)?;

    if let Some(path) = &args.output {
        SceneExport::from_node(&node).write(path)?;
        log::info!("Wrote scene description to {}", path.display());
        // `-o` skips the frame and exits with status 1.
        return Ok(ExitCode::from(1));
    }

    let (width, height) = node.dimensions();
    let camera = viewer_camera(node.composer().bounds(), width, height);
    let backend = DummyBackend::new();
    let summary = run_frame(node.root(), &camera, &backend)?;

    log::info!(
        "Frame done: passes {:?}, {} draws, near/far {:?}",
        summary.passes,
        summary.draw_count,
        summary.near_far
    );
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    parasurf_core::init();
    parasurf_graphics::init();
    parasurf_parametric::init();

    let args = DemoArgs::parse_args();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            log::error!("parametric_demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}
