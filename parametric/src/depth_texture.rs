//! Depth texture allocation for the pre-passes.

use std::sync::Arc;

use parasurf_graphics::types::{AddressMode, BorderColor};
use parasurf_graphics::{
    GraphicsDevice, GraphicsError, SamplerDescriptor, Texture, TextureDescriptor, TextureFormat,
    TextureUsage,
};

/// Allocates depth-only textures that can be rendered into and sampled.
///
/// Sampling outside the texture returns the border value, which is opaque
/// white, i.e. the farthest representable depth.
#[derive(Debug, Clone)]
pub struct DepthTextureFactory {
    device: Arc<GraphicsDevice>,
}

impl DepthTextureFactory {
    /// Create a factory allocating from `device`.
    pub fn new(device: Arc<GraphicsDevice>) -> Self {
        Self { device }
    }

    /// The device textures are allocated from.
    pub fn device(&self) -> &Arc<GraphicsDevice> {
        &self.device
    }

    /// Descriptor used for a `width` x `height` depth texture.
    pub fn descriptor(width: u32, height: u32) -> TextureDescriptor {
        TextureDescriptor::new_2d(
            width,
            height,
            TextureFormat::Depth32Float,
            TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
        )
        .with_label("parametric_depth")
        .with_sampler(
            SamplerDescriptor::linear()
                .with_label("parametric_depth_sampler")
                .with_address_mode(AddressMode::ClampToBorder)
                .with_border_color(BorderColor::OpaqueWhite),
        )
    }

    /// Allocate a depth texture of exactly `width` x `height`.
    ///
    /// # Errors
    ///
    /// [`GraphicsError::InvalidParameter`] for a zero dimension. Allocation
    /// failures are passed through from the device unchanged.
    pub fn create(&self, width: u32, height: u32) -> Result<Arc<Texture>, GraphicsError> {
        if width == 0 || height == 0 {
            return Err(GraphicsError::InvalidParameter(format!(
                "depth texture size must be positive, got {width}x{height}"
            )));
        }
        self.device.create_texture(&Self::descriptor(width, height))
    }
}
