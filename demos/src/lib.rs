//! # Parasurf Demos
//!
//! Command line front end for the parametric surface node.
//!
//! ## Available Demos
//!
//! - `parametric_demo` - builds a parametric surface with boundary volumes,
//!   culls one frame and runs the render graph on the dummy backend

pub mod args;
pub mod error;
pub mod export;
pub mod frame;

pub use args::DemoArgs;
pub use error::DemoError;
pub use export::SceneExport;
pub use frame::{FrameSummary, run_frame, viewer_camera};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
