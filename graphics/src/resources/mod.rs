//! GPU resource types.
//!
//! Resources are created by [`GraphicsDevice`](crate::GraphicsDevice) and
//! reference-counted with `Arc`.

mod texture;

pub use texture::{Texture, TextureId};
