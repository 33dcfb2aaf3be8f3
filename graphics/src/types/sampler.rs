//! Sampler types and descriptors.

// Re-export CPU-side types from core.
pub use parasurf_core::sampler::{
    AddressMode, BorderColor, CompareFunction, CpuSampler, FilterMode,
};

/// Sampling parameters attached to a texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SamplerDescriptor {
    /// Debug label for the sampler.
    pub label: Option<String>,
    /// Address mode for U coordinate.
    pub address_mode_u: AddressMode,
    /// Address mode for V coordinate.
    pub address_mode_v: AddressMode,
    /// Address mode for W coordinate.
    pub address_mode_w: AddressMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Border color for clamp-to-border addressing.
    pub border_color: BorderColor,
    /// Comparison function for depth sampling.
    pub compare: Option<CompareFunction>,
}

impl SamplerDescriptor {
    /// Create a new sampler descriptor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a linear filtering sampler.
    pub fn linear() -> Self {
        Self {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        }
    }

    /// Create a nearest neighbor filtering sampler.
    pub fn nearest() -> Self {
        Self::default()
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set address mode for all coordinates.
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self.address_mode_w = mode;
        self
    }

    /// Set the border color.
    pub fn with_border_color(mut self, color: BorderColor) -> Self {
        self.border_color = color;
        self
    }

    /// Set comparison function for depth sampling.
    pub fn with_compare(mut self, compare: CompareFunction) -> Self {
        self.compare = Some(compare);
        self
    }

    /// Returns true if every axis clamps to the border color.
    pub fn clamps_to_border(&self) -> bool {
        [self.address_mode_u, self.address_mode_v, self.address_mode_w]
            .iter()
            .all(|mode| *mode == AddressMode::ClampToBorder)
    }
}

impl Default for SamplerDescriptor {
    fn default() -> Self {
        Self {
            label: None,
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            border_color: BorderColor::TransparentBlack,
            compare: None,
        }
    }
}

impl From<&CpuSampler> for SamplerDescriptor {
    fn from(cpu: &CpuSampler) -> Self {
        Self {
            label: cpu.name.clone(),
            address_mode_u: cpu.address_mode_u,
            address_mode_v: cpu.address_mode_v,
            address_mode_w: cpu.address_mode_w,
            mag_filter: cpu.mag_filter,
            min_filter: cpu.min_filter,
            border_color: cpu.border_color,
            compare: cpu.compare,
        }
    }
}
