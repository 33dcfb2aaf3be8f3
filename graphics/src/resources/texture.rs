//! GPU texture resource.

use std::sync::Arc;

use crate::device::GraphicsDevice;
use crate::types::{Extent3d, SamplerDescriptor, TextureDescriptor, TextureFormat, TextureUsage};

/// Unique identifier of a texture within its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// A GPU texture resource.
///
/// Textures are created by [`GraphicsDevice::create_texture`] and are reference-counted.
/// They hold a strong reference to their parent device, keeping it alive.
/// Dropping the last reference returns the texture's bytes to the device
/// memory budget.
///
/// # Example
///
/// ```ignore
/// let texture = device.create_texture(&TextureDescriptor::new_2d(
///     800, 600,
///     TextureFormat::Depth32Float,
///     TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
/// ))?;
/// println!("Texture size: {}x{}", texture.width(), texture.height());
/// ```
pub struct Texture {
    device: Arc<GraphicsDevice>,
    id: TextureId,
    descriptor: TextureDescriptor,
}

impl Texture {
    /// Create a new texture (called by GraphicsDevice).
    pub(crate) fn new(
        device: Arc<GraphicsDevice>,
        id: TextureId,
        descriptor: TextureDescriptor,
    ) -> Self {
        Self {
            device,
            id,
            descriptor,
        }
    }

    /// Get the parent device.
    pub fn device(&self) -> &Arc<GraphicsDevice> {
        &self.device
    }

    /// Get the texture id.
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Get the texture descriptor.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// Get the texture size.
    pub fn size(&self) -> Extent3d {
        self.descriptor.size
    }

    /// Get the texture width.
    pub fn width(&self) -> u32 {
        self.descriptor.size.width
    }

    /// Get the texture height.
    pub fn height(&self) -> u32 {
        self.descriptor.size.height
    }

    /// Get the texture format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }

    /// Get the usage flags.
    pub fn usage(&self) -> TextureUsage {
        self.descriptor.usage
    }

    /// Get the sampling parameters.
    pub fn sampler(&self) -> &SamplerDescriptor {
        &self.descriptor.sampler
    }

    /// Get the texture label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.device.release_texture_memory(self.descriptor.byte_size());
        log::trace!("Texture: released {:?} ({:?})", self.id, self.descriptor.label);
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("size", &self.descriptor.size)
            .field("format", &self.descriptor.format)
            .field("usage", &self.descriptor.usage)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

// Ensure Texture is Send + Sync
static_assertions::assert_impl_all!(Texture: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_debug() {
        let device = GraphicsDevice::new();
        let texture = device
            .create_texture(
                &TextureDescriptor::new_2d(
                    1920,
                    1080,
                    TextureFormat::Rgba8Unorm,
                    TextureUsage::RENDER_ATTACHMENT,
                )
                .with_label("color"),
            )
            .unwrap();
        let debug = format!("{:?}", texture);
        assert!(debug.contains("Texture"));
        assert!(debug.contains("1920"));
        assert!(debug.contains("color"));
    }

    #[test]
    fn test_texture_dimensions() {
        let device = GraphicsDevice::new();
        let texture = device
            .create_texture(&TextureDescriptor::new_2d(
                800,
                600,
                TextureFormat::Depth32Float,
                TextureUsage::TEXTURE_BINDING,
            ))
            .unwrap();
        assert_eq!(texture.width(), 800);
        assert_eq!(texture.height(), 600);
        assert_eq!(texture.size().depth, 1);
        assert_eq!(texture.format(), TextureFormat::Depth32Float);
    }

    #[test]
    fn test_texture_ids_are_unique() {
        let device = GraphicsDevice::new();
        let desc = TextureDescriptor::new_2d(4, 4, TextureFormat::R8Unorm, TextureUsage::empty());
        let a = device.create_texture(&desc).unwrap();
        let b = device.create_texture(&desc).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
