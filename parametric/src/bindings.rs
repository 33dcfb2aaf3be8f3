//! Shader bindings for the captured depth textures.

use std::sync::Arc;

use parasurf_core::math::Vec4;
use parasurf_graphics::{StateSet, Texture, UniformValue};

/// Define holding the number of bound front/back pairs.
pub const NUM_DEPTH_TEXTURES: &str = "NUM_DEPTH_TEXTURES";

/// Uniform holding `(0, 0, width, height)`.
pub const VIEWPORT_DIMENSIONS: &str = "viewportDimensions";

/// Uniform name of the front texture of pair `index`.
pub fn front_uniform_name(index: usize) -> String {
    format!("frontDepthTexture{index}")
}

/// Uniform name of the back texture of pair `index`.
pub fn back_uniform_name(index: usize) -> String {
    format!("backDepthTexture{index}")
}

/// Accumulates depth textures and turns them into one state set.
///
/// Pair `i` is bound to texture units `2i` (front) and `2i + 1` (back), with
/// int uniforms naming the units. Unmatched textures are dropped: only
/// `min(fronts, backs)` pairs are bound.
#[derive(Debug, Clone)]
pub struct DepthBindingsBuilder {
    front: Vec<Arc<Texture>>,
    back: Vec<Arc<Texture>>,
    width: u32,
    height: u32,
}

impl DepthBindingsBuilder {
    /// Start a builder for a `width` x `height` viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            front: Vec::new(),
            back: Vec::new(),
            width,
            height,
        }
    }

    /// Append a front face texture.
    pub fn add_front(&mut self, texture: Arc<Texture>) {
        self.front.push(texture);
    }

    /// Append a back face texture.
    pub fn add_back(&mut self, texture: Arc<Texture>) {
        self.back.push(texture);
    }

    /// Append a front/back pair.
    pub fn add_pair(&mut self, front: Arc<Texture>, back: Arc<Texture>) {
        self.add_front(front);
        self.add_back(back);
    }

    /// Number of pairs that will be bound.
    pub fn pair_count(&self) -> usize {
        self.front.len().min(self.back.len())
    }

    /// Produce the state set.
    pub fn build(self) -> StateSet {
        let count = self.pair_count();
        if self.front.len() != self.back.len() {
            log::debug!(
                "DepthBindingsBuilder: {} front and {} back textures, binding {} pairs",
                self.front.len(),
                self.back.len(),
                count
            );
        }

        let mut state = StateSet::new();
        for (i, (front, back)) in self.front.into_iter().zip(self.back).enumerate() {
            let front_unit = (2 * i) as u32;
            let back_unit = front_unit + 1;

            state.set_texture(front_unit, front);
            state.add_uniform(front_uniform_name(i), UniformValue::Int(front_unit as i32));

            state.set_texture(back_unit, back);
            state.add_uniform(back_uniform_name(i), UniformValue::Int(back_unit as i32));
        }

        state.set_define(NUM_DEPTH_TEXTURES, count.to_string());
        state.add_uniform(
            VIEWPORT_DIMENSIONS,
            UniformValue::Vec4(Vec4::new(0.0, 0.0, self.width as f32, self.height as f32)),
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepthTextureFactory;
    use parasurf_graphics::GraphicsDevice;

    fn textures(n: usize) -> Vec<Arc<Texture>> {
        let factory = DepthTextureFactory::new(GraphicsDevice::new());
        (0..n).map(|_| factory.create(8, 8).unwrap()).collect()
    }

    #[test]
    fn test_units_and_names() {
        let t = textures(4);
        let mut builder = DepthBindingsBuilder::new(800, 600);
        builder.add_pair(Arc::clone(&t[0]), Arc::clone(&t[1]));
        builder.add_pair(Arc::clone(&t[2]), Arc::clone(&t[3]));
        let state = builder.build();

        for (unit, texture) in t.iter().enumerate() {
            assert_eq!(state.texture(unit as u32).unwrap().id(), texture.id());
        }
        assert_eq!(state.uniform("frontDepthTexture0"), Some(&UniformValue::Int(0)));
        assert_eq!(state.uniform("backDepthTexture0"), Some(&UniformValue::Int(1)));
        assert_eq!(state.uniform("frontDepthTexture1"), Some(&UniformValue::Int(2)));
        assert_eq!(state.uniform("backDepthTexture1"), Some(&UniformValue::Int(3)));
        assert_eq!(state.define(NUM_DEPTH_TEXTURES), Some("2"));
        assert_eq!(
            state.uniform(VIEWPORT_DIMENSIONS),
            Some(&UniformValue::Vec4(Vec4::new(0.0, 0.0, 800.0, 600.0)))
        );
    }

    #[test]
    fn test_unmatched_textures_truncated() {
        let t = textures(3);
        let mut builder = DepthBindingsBuilder::new(64, 64);
        builder.add_front(Arc::clone(&t[0]));
        builder.add_front(Arc::clone(&t[1]));
        builder.add_back(Arc::clone(&t[2]));
        assert_eq!(builder.pair_count(), 1);

        let state = builder.build();
        assert_eq!(state.define(NUM_DEPTH_TEXTURES), Some("1"));
        assert_eq!(state.textures().len(), 2);
        assert!(state.uniform("frontDepthTexture1").is_none());
    }

    #[test]
    fn test_empty() {
        let state = DepthBindingsBuilder::new(1280, 1024).build();
        assert_eq!(state.define(NUM_DEPTH_TEXTURES), Some("0"));
        assert!(state.textures().is_empty());
        assert!(state.uniform(VIEWPORT_DIMENSIONS).is_some());
    }
}
