//! The parametric surface node.

use std::sync::Arc;

use parasurf_core::math::Vec3;
use parasurf_core::mesh::generators::{generate_grid, generate_side_walls, vertical_axis};
use parasurf_graphics::{GraphicsDevice, NodeRef, Program, StateSet, UniformValue};

use crate::composer::SceneComposer;
use crate::settings::ParametricSettings;
use crate::shapes::BoundaryShape;

/// Name of the group holding the surface geometry.
pub const SURFACE_GROUP_NAME: &str = "ParametricGroup";

/// Per-geometry uniform with the unit displacement direction.
pub const VERTICAL_AXIS_UNIFORM: &str = "verticalAxis";

/// A parametric height-field surface composited with boundary volumes.
///
/// The surface spans the unit square in the XY plane, with the base at
/// z = 0 and the top at z = 1; the shader displaces vertices along
/// `verticalAxis` using the `Z_FUNCTION`, `Z_BASE` and `Z_TOP` defines.
/// Boundaries are drawn and/or captured into depth textures according to
/// [`ParametricSettings::visible_boundaries`] and
/// [`ParametricSettings::depth_boundaries`].
///
/// Nothing is built until [`setup`](Self::setup) is called.
#[derive(Debug)]
pub struct ParametricNode {
    root: NodeRef,
    surface: NodeRef,
    composer: SceneComposer,
    settings: ParametricSettings,
    subgraphs: Vec<NodeRef>,
}

impl ParametricNode {
    /// Create a node with default settings.
    pub fn new(device: Arc<GraphicsDevice>) -> Self {
        Self::with_settings(device, ParametricSettings::default())
    }

    /// Create a node from `settings`.
    pub fn with_settings(device: Arc<GraphicsDevice>, settings: ParametricSettings) -> Self {
        let composer = SceneComposer::new(device);
        let root = NodeRef::group("ParametricNode");
        root.add_child(composer.root().clone());

        Self {
            root,
            surface: NodeRef::group(SURFACE_GROUP_NAME),
            composer,
            settings,
            subgraphs: Vec::new(),
        }
    }

    /// Root node to place in the scene.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Group holding the surface geometry.
    pub fn surface(&self) -> &NodeRef {
        &self.surface
    }

    /// The composer building the depth and render sub-scenes.
    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    /// Settings read by the next [`setup`](Self::setup).
    pub fn settings(&self) -> &ParametricSettings {
        &self.settings
    }

    /// Mutable settings; changes take effect on the next `setup`.
    pub fn settings_mut(&mut self) -> &mut ParametricSettings {
        &mut self.settings
    }

    /// Set the output viewport size.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.settings.width = width;
        self.settings.height = height;
        self.composer.set_dimensions(width, height);
    }

    /// Output viewport size.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.settings.width, self.settings.height)
    }

    /// Set the grid resolution.
    pub fn set_num_cells(&mut self, u_cells: u32, v_cells: u32) {
        self.settings.u_cells = u_cells;
        self.settings.v_cells = v_cells;
    }

    /// Grid resolution.
    pub fn num_cells(&self) -> (u32, u32) {
        (self.settings.u_cells, self.settings.v_cells)
    }

    /// Add a boundary subgraph.
    pub fn add_subgraph(&mut self, subgraph: NodeRef) {
        self.subgraphs.push(subgraph);
    }

    /// Add several boundary subgraphs.
    pub fn add_subgraphs(&mut self, subgraphs: impl IntoIterator<Item = NodeRef>) {
        self.subgraphs.extend(subgraphs);
    }

    /// Boundary subgraphs added so far.
    pub fn subgraphs(&self) -> &[NodeRef] {
        &self.subgraphs
    }

    /// Set the shader program used by the whole node.
    pub fn set_program(&mut self, program: Arc<Program>) {
        self.root.update_state_set(|state| state.set_program(program));
    }

    /// Add a uniform visible to the whole node.
    pub fn add_uniform(&mut self, name: impl Into<String>, value: UniformValue) {
        self.root.update_state_set(|state| state.add_uniform(name, value));
    }

    /// Build the surface geometry and rebuild the composite scene.
    pub fn setup(&mut self) {
        self.build_surface();

        self.composer.clear_subgraphs();
        self.composer.add_subgraph(Some(self.surface.clone()), true, false);

        let visible = self.settings.visible_boundaries;
        let depth = self.settings.depth_boundaries;
        for subgraph in &self.subgraphs {
            self.composer.add_subgraph(Some(subgraph.clone()), visible, depth);
        }
        for (i, shape) in self.settings.boundaries.iter().enumerate() {
            self.composer
                .add_subgraph(Some(shape_node(shape, i)), visible, depth);
        }

        self.composer
            .set_dimensions(self.settings.width, self.settings.height);
        self.composer.rebuild();
    }

    fn build_surface(&self) {
        let settings = &self.settings;
        let origin = Vec3::zeros();
        let u_axis = Vec3::x();
        let v_axis = Vec3::y();
        let base_origin = origin;
        let top_origin = base_origin + Vec3::z();
        let axis = vertical_axis(&u_axis, &v_axis);

        self.surface.remove_children();

        let mut meshes = Vec::new();
        if settings.render_base {
            meshes.push((
                "ParametricBase",
                generate_grid(base_origin, u_axis, v_axis, settings.u_cells, settings.v_cells, false),
            ));
        }
        if settings.render_top {
            meshes.push((
                "ParametricTop",
                generate_grid(top_origin, u_axis, v_axis, settings.u_cells, settings.v_cells, true),
            ));
        }
        if settings.render_sidewalls {
            meshes.push((
                "ParametricWalls",
                generate_side_walls(
                    base_origin,
                    top_origin,
                    u_axis,
                    v_axis,
                    settings.u_cells,
                    settings.v_cells,
                ),
            ));
        }

        for (name, mesh) in meshes {
            let geometry = NodeRef::geometry(name, Arc::new(mesh));
            geometry.update_state_set(|state| {
                state.add_uniform(VERTICAL_AXIS_UNIFORM, UniformValue::Vec3(axis));
            });
            self.surface.add_child(geometry);
        }

        let mut state = StateSet::new();
        for (define, body) in [
            ("Z_FUNCTION", &settings.z_function),
            ("Z_BASE", &settings.z_base),
            ("Z_TOP", &settings.z_top),
        ] {
            if !body.is_empty() {
                state.set_define(define, body.as_str());
            }
        }
        self.surface
            .set_state_set((!state.is_empty()).then_some(state));

        log::debug!(
            "ParametricNode: surface {}x{} cells with {} geometries",
            settings.u_cells,
            settings.v_cells,
            self.surface.num_children()
        );
    }
}

fn shape_node(shape: &BoundaryShape, index: usize) -> NodeRef {
    shape.to_node(format!("{shape}{index}"))
}

static_assertions::assert_impl_all!(ParametricNode: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> ParametricNode {
        ParametricNode::new(GraphicsDevice::new())
    }

    #[test]
    fn test_defaults() {
        let node = node();
        assert_eq!(node.dimensions(), (800, 600));
        assert_eq!(node.num_cells(), (10, 10));
        assert!(node.settings().render_top);
        assert!(node.root().contains_child(node.composer().root()));
    }

    #[test]
    fn test_setup_builds_top_only_by_default() {
        let mut node = node();
        node.setup();

        let children = node.surface().children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name(), "ParametricTop");
        let mesh = children[0].mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 11 * 11);
        assert_eq!(mesh.index_count(), 6 * 100);
        assert_eq!(
            children[0].state_set().unwrap().uniform(VERTICAL_AXIS_UNIFORM),
            Some(&UniformValue::Vec3(Vec3::z()))
        );
        assert!(node.surface().state_set().is_none());
    }

    #[test]
    fn test_setup_all_parts_and_defines() {
        let mut node = node();
        node.settings_mut().render_all();
        node.settings_mut().z_function = "sin(x)".into();
        node.settings_mut().z_top = "1.0".into();
        node.setup();

        let names: Vec<String> = node.surface().children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["ParametricBase", "ParametricTop", "ParametricWalls"]);

        let state = node.surface().state_set().unwrap();
        assert_eq!(state.define("Z_FUNCTION"), Some("sin(x)"));
        assert_eq!(state.define("Z_TOP"), Some("1.0"));
        assert!(state.define("Z_BASE").is_none());
    }

    #[test]
    fn test_setup_registers_surface_and_boundaries() {
        let mut node = node();
        node.settings_mut().visible_boundaries = true;
        node.settings_mut().depth_boundaries = true;
        node.add_subgraph(BoundaryShape::sphere(Vec3::new(0.5, 0.5, 0.5), 0.25).to_node("sphere"));
        node.setup();

        let entries = node.composer().registry().entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].visible && !entries[0].depth);
        assert!(entries[1].visible && entries[1].depth);

        assert_eq!(node.composer().depth_scene().num_children(), 2);
        assert_eq!(node.composer().render_scene().num_children(), 2);
    }

    #[test]
    fn test_setup_twice_is_stable() {
        let mut node = node();
        node.settings_mut().depth_boundaries = true;
        node.settings_mut()
            .boundaries
            .push(BoundaryShape::cone(Vec3::new(0.5, 0.5, 0.0), 0.2, 0.6));
        node.setup();
        node.setup();

        assert_eq!(node.composer().registry().len(), 2);
        assert_eq!(node.composer().depth_scene().num_children(), 2);
        assert_eq!(node.surface().num_children(), 1);
        assert_eq!(node.composer().depth_scene().child(0).unwrap().child(0).unwrap().name(), "cone0");
    }

    #[test]
    fn test_dimensions_reach_composer() {
        let mut node = node();
        node.set_dimensions(1024, 768);
        node.setup();
        assert_eq!(node.composer().dimensions(), (1024, 768));
    }

    #[test]
    fn test_uniforms_and_program_on_root() {
        let mut node = node();
        node.add_uniform("cutOff", UniformValue::Float(0.001));
        node.set_program(Arc::new(Program::new()));
        let state = node.root().state_set().unwrap();
        assert_eq!(state.uniform("cutOff"), Some(&UniformValue::Float(0.001)));
        assert!(state.program().is_some());
    }
}
