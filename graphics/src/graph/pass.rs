//! Graphics pass description.

use std::sync::Arc;

use crate::resources::Texture;
use crate::types::Viewport;

use super::target::RenderTargetConfig;

/// A graphics pass: one render target configuration plus its draws.
///
/// Passes are configured fully before being handed to the
/// [`RenderGraph`](super::RenderGraph). The pass records which textures
/// its draws sample so that the graph can order it after the passes that
/// render into them.
#[derive(Debug, Clone)]
pub struct GraphicsPass {
    name: String,
    render_targets: Option<RenderTargetConfig>,
    viewport: Option<Viewport>,
    draw_count: u32,
    sampled_textures: Vec<Arc<Texture>>,
}

impl GraphicsPass {
    /// Create a new graphics pass.
    pub fn new(name: String) -> Self {
        Self {
            name,
            render_targets: None,
            viewport: None,
            draw_count: 0,
            sampled_textures: Vec::new(),
        }
    }

    /// Get the pass name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the render target configuration.
    pub fn render_targets(&self) -> Option<&RenderTargetConfig> {
        self.render_targets.as_ref()
    }

    /// Set the render target configuration.
    pub fn set_render_targets(&mut self, config: RenderTargetConfig) {
        self.render_targets = Some(config);
    }

    /// Check if this pass has render targets configured.
    pub fn has_render_targets(&self) -> bool {
        self.render_targets
            .as_ref()
            .map(|c| c.has_attachments())
            .unwrap_or(false)
    }

    /// Get the viewport.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Set the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Number of draws recorded for this pass.
    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    /// Set the number of draws.
    pub fn set_draw_count(&mut self, count: u32) {
        self.draw_count = count;
    }

    /// Check if the pass has any draws.
    pub fn has_draws(&self) -> bool {
        self.draw_count > 0
    }

    /// Declare a texture read by this pass.
    pub fn add_sampled_texture(&mut self, texture: Arc<Texture>) {
        if !self.sampled_textures.iter().any(|t| t.id() == texture.id()) {
            self.sampled_textures.push(texture);
        }
    }

    /// Textures read by this pass.
    pub fn sampled_textures(&self) -> &[Arc<Texture>] {
        &self.sampled_textures
    }

    /// Returns true if the pass renders into `texture`.
    pub fn writes(&self, texture: &Texture) -> bool {
        self.render_targets
            .as_ref()
            .map(|c| c.written_textures().any(|t| t.id() == texture.id()))
            .unwrap_or(false)
    }
}
