//! Registered subgraphs and the depth textures allocated for them.

use std::sync::Arc;

use parasurf_core::bounds::BoundingBox;
use parasurf_graphics::{NodeRef, Texture};

/// Front and back face depth textures of one subgraph.
///
/// Textures are always allocated and recorded together, so an entry either
/// has both or neither.
#[derive(Debug, Clone)]
pub struct DepthTexturePair {
    /// Nearest depth of the volume.
    pub front: Arc<Texture>,
    /// Farthest depth of the volume.
    pub back: Arc<Texture>,
}

/// One contributed piece of scene content.
#[derive(Debug, Clone)]
pub struct SubgraphEntry {
    /// Shared content; `None` entries are skipped when composing.
    pub content: Option<NodeRef>,
    /// Drawn in the visible composite.
    pub visible: bool,
    /// Captured by a front/back depth pre-pass pair.
    pub depth: bool,
    /// Textures from the last rebuild.
    pub textures: Option<DepthTexturePair>,
}

impl SubgraphEntry {
    /// Create an entry without textures.
    pub fn new(content: Option<NodeRef>, visible: bool, depth: bool) -> Self {
        Self {
            content,
            visible,
            depth,
            textures: None,
        }
    }

    /// Number of bound depth textures, always 0 or 2.
    pub fn texture_count(&self) -> usize {
        if self.textures.is_some() { 2 } else { 0 }
    }
}

/// Ordered collection of subgraphs.
#[derive(Debug, Clone, Default)]
pub struct SubgraphRegistry {
    entries: Vec<SubgraphEntry>,
}

impl SubgraphRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content with its two flags. Returns the entry index.
    pub fn add(&mut self, content: Option<NodeRef>, visible: bool, depth: bool) -> usize {
        self.entries.push(SubgraphEntry::new(content, visible, depth));
        self.entries.len() - 1
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Forget textures recorded by a previous rebuild.
    pub fn clear_textures(&mut self) {
        for entry in &mut self.entries {
            entry.textures = None;
        }
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[SubgraphEntry] {
        &self.entries
    }

    /// Mutable entries in registration order.
    pub fn entries_mut(&mut self) -> &mut [SubgraphEntry] {
        &mut self.entries
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&SubgraphEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of the bounds of all entries with content.
    pub fn bounds(&self) -> BoundingBox {
        self.entries
            .iter()
            .filter_map(|entry| entry.content.as_ref())
            .fold(BoundingBox::new(), |bounds, content| bounds.union(&content.bound()))
    }

    /// Recorded texture pairs in registration order.
    pub fn texture_pairs(&self) -> impl Iterator<Item = &DepthTexturePair> {
        self.entries.iter().filter_map(|entry| entry.textures.as_ref())
    }
}
