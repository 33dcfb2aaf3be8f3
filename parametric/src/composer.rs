//! Assembly of the depth and render sub-scenes.

use std::sync::Arc;

use parasurf_core::bounds::BoundingBox;
use parasurf_graphics::{GraphicsDevice, NodeRef};

use crate::bindings::DepthBindingsBuilder;
use crate::callbacks::NearFarCallback;
use crate::depth_pass::{DepthFace, DepthPassBuilder};
use crate::depth_texture::DepthTextureFactory;
use crate::registry::{DepthTexturePair, SubgraphRegistry};

/// Default texture width.
pub const DEFAULT_WIDTH: u32 = 1280;
/// Default texture height.
pub const DEFAULT_HEIGHT: u32 = 1024;

/// Builds the composite scene from registered subgraphs.
///
/// The root owns two groups: the depth sub-scene holding one front and one
/// back pre-render camera per depth-flagged subgraph, and the render
/// sub-scene holding the visible subgraphs. The render sub-scene's state
/// binds every captured texture pair.
///
/// # Example
///
/// ```ignore
/// let mut composer = SceneComposer::new(GraphicsDevice::new());
/// composer.set_dimensions(800, 600);
/// composer.add_subgraph(Some(surface), true, false);
/// composer.add_subgraph(Some(sphere), false, true);
/// composer.rebuild();
/// ```
#[derive(Debug)]
pub struct SceneComposer {
    factory: DepthTextureFactory,
    root: NodeRef,
    depth_scene: NodeRef,
    render_scene: NodeRef,
    registry: SubgraphRegistry,
    width: u32,
    height: u32,
    bounds: BoundingBox,
}

impl SceneComposer {
    /// Create an empty composer allocating textures from `device`.
    pub fn new(device: Arc<GraphicsDevice>) -> Self {
        let root = NodeRef::group("CompositeScene");
        let depth_scene = NodeRef::group("DepthSubScene");
        let render_scene = NodeRef::group("RenderSubScene");
        root.add_child(depth_scene.clone());
        root.add_child(render_scene.clone());

        Self {
            factory: DepthTextureFactory::new(device),
            root,
            depth_scene,
            render_scene,
            registry: SubgraphRegistry::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            bounds: BoundingBox::new(),
        }
    }

    /// Register content. `None` is accepted and skipped on rebuild.
    pub fn add_subgraph(&mut self, content: Option<NodeRef>, visible: bool, depth: bool) {
        self.registry.add(content, visible, depth);
    }

    /// Remove all registered subgraphs. Takes effect on the next rebuild.
    pub fn clear_subgraphs(&mut self) {
        self.registry.clear();
    }

    /// Set the output viewport size used for the depth textures.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Output viewport size.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Root of the composite scene.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Group holding the depth pre-pass cameras.
    pub fn depth_scene(&self) -> &NodeRef {
        &self.depth_scene
    }

    /// Group holding the visible subgraphs.
    pub fn render_scene(&self) -> &NodeRef {
        &self.render_scene
    }

    /// Registered subgraphs.
    pub fn registry(&self) -> &SubgraphRegistry {
        &self.registry
    }

    /// Bounds union computed by the last rebuild.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Rebuild both sub-scenes and the shared bindings from the registry.
    ///
    /// Safe to call repeatedly. Textures from the previous rebuild are
    /// released. If either texture of a subgraph cannot be allocated, that
    /// subgraph gets no depth passes and no bindings.
    pub fn rebuild(&mut self) {
        self.depth_scene.remove_children();
        self.render_scene.remove_children();
        // release the previous bindings before allocating replacements
        self.render_scene.set_state_set(None);
        self.registry.clear_textures();

        self.bounds = self.registry.bounds();
        self.root
            .set_cull_callback(Some(Arc::new(NearFarCallback::new(self.bounds))));

        let mut bindings = DepthBindingsBuilder::new(self.width, self.height);
        let (width, height) = (self.width, self.height);

        for (index, entry) in self.registry.entries_mut().iter_mut().enumerate() {
            if !entry.depth {
                continue;
            }
            let Some(content) = entry.content.clone() else {
                continue;
            };

            let pair = match (
                self.factory.create(width, height),
                self.factory.create(width, height),
            ) {
                (Ok(front), Ok(back)) => DepthTexturePair { front, back },
                (Err(e), _) | (_, Err(e)) => {
                    log::warn!(
                        "SceneComposer: no depth textures for subgraph {} ({:?}): {}",
                        index,
                        content.name(),
                        e
                    );
                    continue;
                }
            };

            let pair_index = bindings.pair_count();
            for (face, texture) in [(DepthFace::Front, &pair.front), (DepthFace::Back, &pair.back)] {
                let camera = DepthPassBuilder::new(face)
                    .with_name(format!("{face}_depth{pair_index}"))
                    .build(Arc::clone(texture));
                camera.add_child(content.clone());
                self.depth_scene.add_child(camera);
            }

            bindings.add_pair(Arc::clone(&pair.front), Arc::clone(&pair.back));
            entry.textures = Some(pair);
        }

        for entry in self.registry.entries() {
            if entry.visible
                && let Some(content) = &entry.content
            {
                self.render_scene.add_child(content.clone());
            }
        }

        let pairs = bindings.pair_count();
        self.render_scene.set_state_set(Some(bindings.build()));

        log::debug!(
            "SceneComposer: rebuilt {} subgraphs at {}x{}: {} depth cameras, {} visible, {} texture pairs",
            self.registry.len(),
            self.width,
            self.height,
            self.depth_scene.num_children(),
            self.render_scene.num_children(),
            pairs
        );
    }
}

static_assertions::assert_impl_all!(SceneComposer: Send, Sync);
