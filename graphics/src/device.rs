//! Graphics device.
//!
//! The [`GraphicsDevice`] is the interface for creating GPU resources. It
//! validates descriptors, tracks live textures and optionally enforces a
//! texture memory budget so allocation failure can be exercised without a
//! real GPU.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::error::GraphicsError;
use crate::resources::{Texture, TextureId};
use crate::types::TextureDescriptor;

/// Capabilities of a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceCapabilities {
    /// Maximum texture dimension.
    pub max_texture_dimension: u32,
    /// Texture memory budget in bytes (`None` = unlimited).
    pub texture_memory_budget: Option<u64>,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            max_texture_dimension: 16384,
            texture_memory_budget: None,
        }
    }
}

/// A graphics device for creating GPU resources.
///
/// # Thread Safety
///
/// `GraphicsDevice` is `Send + Sync` and can be safely shared across threads.
/// All resource creation methods use interior mutability where needed.
///
/// # Example
///
/// ```ignore
/// let device = GraphicsDevice::new();
/// let texture = device.create_texture(&TextureDescriptor::new_2d(
///     1280, 1024,
///     TextureFormat::Depth32Float,
///     TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
/// ))?;
/// ```
pub struct GraphicsDevice {
    name: String,
    capabilities: RwLock<DeviceCapabilities>,
    next_texture_id: AtomicU64,
    allocated_bytes: Mutex<u64>,
    // Track allocated resources (weak references for cleanup/debugging)
    textures: RwLock<Vec<Weak<Texture>>>,
}

impl GraphicsDevice {
    /// Create a device with default capabilities.
    pub fn new() -> Arc<Self> {
        Self::with_capabilities(DeviceCapabilities::default())
    }

    /// Create a device with explicit capabilities.
    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Arc<Self> {
        log::debug!("GraphicsDevice: created with {:?}", capabilities);
        Arc::new(Self {
            name: "Dummy Adapter".to_string(),
            capabilities: RwLock::new(capabilities),
            next_texture_id: AtomicU64::new(1),
            allocated_bytes: Mutex::new(0),
            textures: RwLock::new(Vec::new()),
        })
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the device capabilities.
    pub fn capabilities(&self) -> DeviceCapabilities {
        *self.capabilities.read()
    }

    /// Change the texture memory budget. Existing textures are unaffected.
    pub fn set_texture_memory_budget(&self, budget: Option<u64>) {
        self.capabilities.write().texture_memory_budget = budget;
    }

    /// Bytes currently held by live textures.
    pub fn allocated_texture_memory(&self) -> u64 {
        *self.allocated_bytes.lock()
    }

    /// Create a GPU texture.
    ///
    /// # Errors
    ///
    /// Returns [`GraphicsError::InvalidParameter`] if a dimension is zero or
    /// exceeds device limits, and [`GraphicsError::OutOfMemory`] if the
    /// allocation does not fit the texture memory budget.
    pub fn create_texture(
        self: &Arc<Self>,
        descriptor: &TextureDescriptor,
    ) -> Result<Arc<Texture>, GraphicsError> {
        let capabilities = self.capabilities();

        // Validate
        let max_dim = capabilities.max_texture_dimension;
        if descriptor.size.width > max_dim
            || descriptor.size.height > max_dim
            || descriptor.size.depth > max_dim
        {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture dimension exceeds maximum {max_dim}"
            )));
        }

        if descriptor.size.width == 0 || descriptor.size.height == 0 || descriptor.size.depth == 0
        {
            return Err(GraphicsError::InvalidParameter(
                "texture dimensions cannot be zero".to_string(),
            ));
        }

        // Reserve memory
        let bytes = descriptor.byte_size();
        {
            let mut allocated = self.allocated_bytes.lock();
            if let Some(budget) = capabilities.texture_memory_budget
                && *allocated + bytes > budget
            {
                log::trace!(
                    "GraphicsDevice: texture {:?} needs {} bytes, {} of {} in use",
                    descriptor.label,
                    bytes,
                    *allocated,
                    budget
                );
                return Err(GraphicsError::OutOfMemory);
            }
            *allocated += bytes;
        }

        // Create the texture
        let id = TextureId(self.next_texture_id.fetch_add(1, Ordering::Relaxed));
        let texture = Arc::new(Texture::new(Arc::clone(self), id, descriptor.clone()));

        // Track it, dropping entries of released textures
        {
            let mut textures = self.textures.write();
            textures.retain(|w| w.strong_count() > 0);
            textures.push(Arc::downgrade(&texture));
        }

        log::trace!(
            "GraphicsDevice: created texture {:?} {:?}, size={}x{}",
            id,
            descriptor.label,
            descriptor.size.width,
            descriptor.size.height
        );

        Ok(texture)
    }

    /// Return bytes of a dropped texture to the budget.
    pub(crate) fn release_texture_memory(&self, bytes: u64) {
        let mut allocated = self.allocated_bytes.lock();
        *allocated = allocated.saturating_sub(bytes);
    }

    /// Get the number of live textures created by this device.
    pub fn texture_count(&self) -> usize {
        self.textures
            .read()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Clean up dead weak references to released resources.
    pub fn cleanup_dead_resources(&self) {
        self.textures.write().retain(|w| w.strong_count() > 0);
    }
}

impl std::fmt::Debug for GraphicsDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsDevice")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities())
            .field("allocated_texture_memory", &self.allocated_texture_memory())
            .finish()
    }
}

// Ensure GraphicsDevice is Send + Sync
static_assertions::assert_impl_all!(GraphicsDevice: Send, Sync);
