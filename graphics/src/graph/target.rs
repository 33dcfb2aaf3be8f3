//! Render target types for render passes.
//!
//! This module defines the types used to configure render targets (color and depth/stencil
//! attachments) for graphics passes.

use std::sync::Arc;

use crate::resources::Texture;
use crate::types::{ClearValue, TextureFormat};

/// Operation to perform when loading an attachment at the start of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LoadOp {
    /// Clear the attachment with a specified value.
    Clear(ClearValue),
    /// Load the existing contents of the attachment.
    #[default]
    Load,
    /// Don't care about the existing contents (may be undefined).
    DontCare,
}

impl LoadOp {
    /// Create a clear operation with a color value.
    pub fn clear_color(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::Clear(ClearValue::color(r, g, b, a))
    }

    /// Create a clear operation with a depth value.
    pub fn clear_depth(depth: f32) -> Self {
        Self::Clear(ClearValue::depth(depth))
    }
}

/// Operation to perform when storing an attachment at the end of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreOp {
    /// Store the attachment contents for later use.
    #[default]
    Store,
    /// Don't care about the contents after the pass (may be discarded).
    DontCare,
}

/// A render target that can be rendered to.
///
/// This is either a device texture (render-to-texture) or the window
/// surface the view camera draws into.
#[derive(Debug, Clone)]
pub enum RenderTarget {
    /// Render to a texture.
    Texture {
        /// The texture to render to.
        texture: Arc<Texture>,
    },
    /// Render to the presentation surface.
    Surface {
        /// The format of the surface.
        format: TextureFormat,
        /// Width of the surface.
        width: u32,
        /// Height of the surface.
        height: u32,
    },
}

impl RenderTarget {
    /// Create a render target from a texture.
    pub fn from_texture(texture: Arc<Texture>) -> Self {
        Self::Texture { texture }
    }

    /// Create a render target describing the presentation surface.
    pub fn surface(format: TextureFormat, width: u32, height: u32) -> Self {
        Self::Surface {
            format,
            width,
            height,
        }
    }

    /// Texture behind this target, if any.
    pub fn texture(&self) -> Option<&Arc<Texture>> {
        match self {
            Self::Texture { texture } => Some(texture),
            Self::Surface { .. } => None,
        }
    }

    /// Get the format of the render target.
    pub fn format(&self) -> TextureFormat {
        match self {
            Self::Texture { texture } => texture.format(),
            Self::Surface { format, .. } => *format,
        }
    }

    /// Get the width of the render target.
    pub fn width(&self) -> u32 {
        match self {
            Self::Texture { texture } => texture.width(),
            Self::Surface { width, .. } => *width,
        }
    }

    /// Get the height of the render target.
    pub fn height(&self) -> u32 {
        match self {
            Self::Texture { texture } => texture.height(),
            Self::Surface { height, .. } => *height,
        }
    }
}

/// A color attachment for a render pass.
#[derive(Debug, Clone)]
pub struct ColorAttachment {
    /// The render target.
    pub target: RenderTarget,
    /// Operation when loading the attachment.
    pub load_op: LoadOp,
    /// Operation when storing the attachment.
    pub store_op: StoreOp,
}

impl ColorAttachment {
    /// Create a new color attachment.
    pub fn new(target: RenderTarget) -> Self {
        Self {
            target,
            load_op: LoadOp::default(),
            store_op: StoreOp::default(),
        }
    }

    /// Create a color attachment from a texture.
    pub fn from_texture(texture: Arc<Texture>) -> Self {
        Self::new(RenderTarget::from_texture(texture))
    }

    /// Set the load operation.
    pub fn with_load_op(mut self, load_op: LoadOp) -> Self {
        self.load_op = load_op;
        self
    }

    /// Set the store operation.
    pub fn with_store_op(mut self, store_op: StoreOp) -> Self {
        self.store_op = store_op;
        self
    }

    /// Set a clear color.
    pub fn with_clear_color(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.load_op = LoadOp::clear_color(r, g, b, a);
        self
    }

    /// Get the load operation.
    pub fn load_op(&self) -> LoadOp {
        self.load_op
    }

    /// Get the store operation.
    pub fn store_op(&self) -> StoreOp {
        self.store_op
    }
}

/// A depth attachment for a render pass.
#[derive(Debug, Clone)]
pub struct DepthStencilAttachment {
    /// The render target (must be a depth format).
    pub target: RenderTarget,
    /// Operation when loading the depth component.
    pub depth_load_op: LoadOp,
    /// Operation when storing the depth component.
    pub depth_store_op: StoreOp,
}

impl DepthStencilAttachment {
    /// Create a new depth attachment.
    pub fn new(target: RenderTarget) -> Self {
        Self {
            target,
            depth_load_op: LoadOp::default(),
            depth_store_op: StoreOp::default(),
        }
    }

    /// Create a depth attachment from a texture.
    pub fn from_texture(texture: Arc<Texture>) -> Self {
        Self::new(RenderTarget::from_texture(texture))
    }

    /// Set the depth load operation.
    pub fn with_depth_load_op(mut self, load_op: LoadOp) -> Self {
        self.depth_load_op = load_op;
        self
    }

    /// Set the depth store operation.
    pub fn with_depth_store_op(mut self, store_op: StoreOp) -> Self {
        self.depth_store_op = store_op;
        self
    }

    /// Clear depth to a specific value.
    pub fn with_clear_depth(mut self, depth: f32) -> Self {
        self.depth_load_op = LoadOp::clear_depth(depth);
        self
    }

    /// Get the depth load operation.
    pub fn depth_load_op(&self) -> LoadOp {
        self.depth_load_op
    }

    /// Get the depth store operation.
    pub fn depth_store_op(&self) -> StoreOp {
        self.depth_store_op
    }
}

/// Configuration for render pass targets.
///
/// This describes what the render pass will render to.
#[derive(Debug, Clone, Default)]
pub struct RenderTargetConfig {
    /// Color attachments for the render pass.
    pub color_attachments: Vec<ColorAttachment>,
    /// Optional depth attachment.
    pub depth_stencil_attachment: Option<DepthStencilAttachment>,
}

impl RenderTargetConfig {
    /// Create a new empty render target configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a color attachment.
    pub fn with_color(mut self, attachment: ColorAttachment) -> Self {
        self.color_attachments.push(attachment);
        self
    }

    /// Set the depth attachment.
    pub fn with_depth_stencil(mut self, attachment: DepthStencilAttachment) -> Self {
        self.depth_stencil_attachment = Some(attachment);
        self
    }

    /// Get the render area dimensions.
    ///
    /// Returns the dimensions of the first color attachment, or the depth attachment
    /// if no color attachments are present.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        if let Some(color) = self.color_attachments.first() {
            return Some((color.target.width(), color.target.height()));
        }
        if let Some(depth) = &self.depth_stencil_attachment {
            return Some((depth.target.width(), depth.target.height()));
        }
        None
    }

    /// Check if this config has any attachments.
    pub fn has_attachments(&self) -> bool {
        !self.color_attachments.is_empty() || self.depth_stencil_attachment.is_some()
    }

    /// Textures written by this configuration.
    pub fn written_textures(&self) -> impl Iterator<Item = &Arc<Texture>> {
        self.color_attachments
            .iter()
            .map(|c| &c.target)
            .chain(self.depth_stencil_attachment.iter().map(|d| &d.target))
            .filter_map(RenderTarget::texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::GraphicsDevice;
    use crate::types::{TextureDescriptor, TextureUsage};

    fn create_depth_texture() -> Arc<Texture> {
        GraphicsDevice::new()
            .create_texture(&TextureDescriptor::new_2d(
                1280,
                1024,
                TextureFormat::Depth32Float,
                TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
            ))
            .unwrap()
    }

    #[test]
    fn test_load_op_default() {
        assert_eq!(LoadOp::default(), LoadOp::Load);
    }

    #[test]
    fn test_store_op_default() {
        assert_eq!(StoreOp::default(), StoreOp::Store);
    }

    #[test]
    fn test_depth_attachment() {
        let texture = create_depth_texture();
        let attachment = DepthStencilAttachment::from_texture(texture)
            .with_clear_depth(0.0)
            .with_depth_store_op(StoreOp::DontCare);

        assert_eq!(attachment.depth_load_op(), LoadOp::Clear(ClearValue::Depth(0.0)));
        assert_eq!(attachment.depth_store_op(), StoreOp::DontCare);
    }

    #[test]
    fn test_depth_only_config() {
        let depth = create_depth_texture();
        let config = RenderTargetConfig::new()
            .with_depth_stencil(DepthStencilAttachment::from_texture(Arc::clone(&depth)));

        assert!(config.color_attachments.is_empty());
        assert_eq!(config.dimensions(), Some((1280, 1024)));
        assert!(config.has_attachments());

        let written: Vec<_> = config.written_textures().collect();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].id(), depth.id());
    }

    #[test]
    fn test_surface_target() {
        let config = RenderTargetConfig::new().with_color(
            ColorAttachment::new(RenderTarget::surface(TextureFormat::Bgra8UnormSrgb, 800, 600))
                .with_clear_color(0.2, 0.2, 0.4, 1.0),
        );

        assert_eq!(config.dimensions(), Some((800, 600)));
        assert_eq!(config.written_textures().count(), 0);
        assert!(matches!(config.color_attachments[0].load_op(), LoadOp::Clear(_)));
    }

    #[test]
    fn test_empty_config() {
        let config = RenderTargetConfig::new();
        assert!(!config.has_attachments());
        assert_eq!(config.dimensions(), None);
    }
}
