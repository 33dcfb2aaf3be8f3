//! # parasurf core
//!
//! Math, bounding volumes, sampler descriptions and CPU-side mesh
//! generation shared by the parasurf crates.

pub mod bounds;
pub mod math;
pub mod mesh;
pub mod sampler;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the core subsystem.
pub fn init() {
    log::info!("parasurf core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
