//! CPU-side sampler types.
//!
//! Provides [`CpuSampler`] for describing texture sampling parameters,
//! along with [`FilterMode`], [`AddressMode`], [`BorderColor`] and
//! [`CompareFunction`] enums shared by textures and render state.

mod types;

pub use types::{AddressMode, BorderColor, CompareFunction, CpuSampler, FilterMode};
