//! Render state attached to scene nodes.
//!
//! A [`StateSet`] holds optional overrides. During traversal the overrides
//! of every ancestor are folded into a [`ResolvedState`], child values
//! replacing parent values key by key.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use parasurf_core::math::{Vec3, Vec4};
use parasurf_core::sampler::CompareFunction;

use crate::resources::Texture;

/// Which triangle faces are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullFace {
    /// Discard front faces.
    Front,
    /// Discard back faces.
    Back,
    /// Discard both.
    FrontAndBack,
}

/// Depth test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthState {
    /// Comparison used by the depth test.
    pub function: CompareFunction,
    /// Whether passing fragments write depth.
    pub write_enabled: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            function: CompareFunction::Less,
            write_enabled: true,
        }
    }
}

impl DepthState {
    /// Depth state with the given function and writes enabled.
    pub fn new(function: CompareFunction) -> Self {
        Self {
            function,
            write_enabled: true,
        }
    }
}

/// A named shader uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Signed integer (also used for sampler units).
    Int(i32),
    /// Float.
    Float(f32),
    /// 3-component vector.
    Vec3(Vec3),
    /// 4-component vector.
    Vec4(Vec4),
}

impl UniformValue {
    /// Integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Vec4 value, if this is a `Vec4`.
    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            Self::Vec4(v) => Some(*v),
            _ => None,
        }
    }
}

/// Programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Tessellation control shader.
    TessControl,
    /// Tessellation evaluation shader.
    TessEvaluation,
    /// Geometry shader.
    Geometry,
    /// Fragment shader.
    Fragment,
    /// Compute shader.
    Compute,
}

impl ShaderStage {
    /// Infer the stage from a file extension (`.vert`, `.frag`, `.geom`, ...).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "vert" | "vs" => Some(Self::Vertex),
            "tesc" | "tctrl" => Some(Self::TessControl),
            "tese" | "teval" => Some(Self::TessEvaluation),
            "geom" | "gs" => Some(Self::Geometry),
            "frag" | "fs" => Some(Self::Fragment),
            "comp" | "cs" => Some(Self::Compute),
            _ => None,
        }
    }
}

/// Shader source for one stage. Sources are carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    /// Pipeline stage.
    pub stage: ShaderStage,
    /// Debug name (usually the file name).
    pub name: String,
    /// Source text.
    pub source: String,
}

impl Shader {
    /// Create a shader.
    pub fn new(stage: ShaderStage, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            stage,
            name: name.into(),
            source: source.into(),
        }
    }
}

/// A shader program holding at most one shader per stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    shaders: BTreeMap<ShaderStage, Shader>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shader, replacing any previous shader of the same stage.
    pub fn add_shader(&mut self, shader: Shader) -> Option<Shader> {
        self.shaders.insert(shader.stage, shader)
    }

    /// Shader for `stage`, if any.
    pub fn shader(&self, stage: ShaderStage) -> Option<&Shader> {
        self.shaders.get(&stage)
    }

    /// Shaders in stage order.
    pub fn shaders(&self) -> impl Iterator<Item = &Shader> {
        self.shaders.values()
    }

    /// Number of shaders.
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    /// Returns true if the program has no shaders.
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

/// Optional render state overrides attached to a node.
#[derive(Debug, Clone, Default)]
pub struct StateSet {
    cull_face: Option<CullFace>,
    depth: Option<DepthState>,
    textures: BTreeMap<u32, Arc<Texture>>,
    uniforms: BTreeMap<String, UniformValue>,
    defines: BTreeMap<String, String>,
    program: Option<Arc<Program>>,
}

impl StateSet {
    /// Create an empty state set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the face culling mode.
    pub fn set_cull_face(&mut self, mode: CullFace) {
        self.cull_face = Some(mode);
    }

    /// Face culling mode, if overridden.
    pub fn cull_face(&self) -> Option<CullFace> {
        self.cull_face
    }

    /// Set the depth test state.
    pub fn set_depth(&mut self, depth: DepthState) {
        self.depth = Some(depth);
    }

    /// Depth test state, if overridden.
    pub fn depth(&self) -> Option<DepthState> {
        self.depth
    }

    /// Bind a texture to a unit, replacing any previous binding.
    pub fn set_texture(&mut self, unit: u32, texture: Arc<Texture>) {
        self.textures.insert(unit, texture);
    }

    /// Texture bound to `unit`.
    pub fn texture(&self, unit: u32) -> Option<&Arc<Texture>> {
        self.textures.get(&unit)
    }

    /// All texture bindings in unit order.
    pub fn textures(&self) -> &BTreeMap<u32, Arc<Texture>> {
        &self.textures
    }

    /// Add or replace a uniform.
    pub fn add_uniform(&mut self, name: impl Into<String>, value: UniformValue) {
        self.uniforms.insert(name.into(), value);
    }

    /// Uniform called `name`.
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// All uniforms in name order.
    pub fn uniforms(&self) -> &BTreeMap<String, UniformValue> {
        &self.uniforms
    }

    /// Add or replace a shader define.
    pub fn set_define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.defines.insert(name.into(), value.into());
    }

    /// Define called `name`.
    pub fn define(&self, name: &str) -> Option<&str> {
        self.defines.get(name).map(String::as_str)
    }

    /// All defines in name order.
    pub fn defines(&self) -> &BTreeMap<String, String> {
        &self.defines
    }

    /// Attach a shader program.
    pub fn set_program(&mut self, program: Arc<Program>) {
        self.program = Some(program);
    }

    /// Attached shader program.
    pub fn program(&self) -> Option<&Arc<Program>> {
        self.program.as_ref()
    }

    /// Returns true if the state set overrides nothing.
    pub fn is_empty(&self) -> bool {
        self.cull_face.is_none()
            && self.depth.is_none()
            && self.textures.is_empty()
            && self.uniforms.is_empty()
            && self.defines.is_empty()
            && self.program.is_none()
    }
}

/// Render state after folding every ancestor's [`StateSet`].
#[derive(Debug, Clone, Default)]
pub struct ResolvedState {
    /// Face culling mode (`None` = no culling).
    pub cull_face: Option<CullFace>,
    /// Depth test state.
    pub depth: DepthState,
    /// Texture bindings by unit.
    pub textures: BTreeMap<u32, Arc<Texture>>,
    /// Uniforms by name.
    pub uniforms: BTreeMap<String, UniformValue>,
    /// Shader defines by name.
    pub defines: BTreeMap<String, String>,
    /// Active shader program.
    pub program: Option<Arc<Program>>,
}

impl ResolvedState {
    /// Apply `overrides` on top of this state.
    pub fn merge(&mut self, overrides: &StateSet) {
        if let Some(mode) = overrides.cull_face {
            self.cull_face = Some(mode);
        }
        if let Some(depth) = overrides.depth {
            self.depth = depth;
        }
        for (unit, texture) in &overrides.textures {
            self.textures.insert(*unit, Arc::clone(texture));
        }
        for (name, value) in &overrides.uniforms {
            self.uniforms.insert(name.clone(), *value);
        }
        for (name, value) in &overrides.defines {
            self.defines.insert(name.clone(), value.clone());
        }
        if let Some(program) = &overrides.program {
            self.program = Some(Arc::clone(program));
        }
    }

    /// Return a copy with `overrides` applied.
    pub fn merged(&self, overrides: &StateSet) -> Self {
        let mut state = self.clone();
        state.merge(overrides);
        state
    }
}
