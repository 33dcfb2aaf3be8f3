//! RON description of a set-up parametric node.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use parasurf_graphics::{NodeRef, UniformValue};
use parasurf_parametric::{ParametricNode, ParametricSettings};

use crate::error::DemoError;

/// Serializable mirror of [`UniformValue`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum UniformExport {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl From<&UniformValue> for UniformExport {
    fn from(value: &UniformValue) -> Self {
        match value {
            UniformValue::Int(v) => Self::Int(*v),
            UniformValue::Float(v) => Self::Float(*v),
            UniformValue::Vec3(v) => Self::Vec3([v.x, v.y, v.z]),
            UniformValue::Vec4(v) => Self::Vec4([v.x, v.y, v.z, v.w]),
        }
    }
}

/// One registered subgraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgraphExport {
    pub name: Option<String>,
    pub visible: bool,
    pub depth: bool,
    pub depth_textures: usize,
}

/// One depth pre-pass camera.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthPassExport {
    pub name: String,
    pub clear_depth: f32,
    pub width: f32,
    pub height: f32,
    pub content: Vec<String>,
}

/// Scene description written by `-o`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneExport {
    pub settings: ParametricSettings,
    pub subgraphs: Vec<SubgraphExport>,
    pub depth_passes: Vec<DepthPassExport>,
    pub render_children: Vec<String>,
    pub defines: BTreeMap<String, String>,
    pub uniforms: BTreeMap<String, UniformExport>,
    pub shaders: Vec<String>,
}

fn child_names(node: &NodeRef) -> Vec<String> {
    node.children().iter().map(NodeRef::name).collect()
}

impl SceneExport {
    /// Describe `node` as of its last `setup()`.
    pub fn from_node(node: &ParametricNode) -> Self {
        let composer = node.composer();

        let subgraphs = composer
            .registry()
            .entries()
            .iter()
            .map(|entry| SubgraphExport {
                name: entry.content.as_ref().map(NodeRef::name),
                visible: entry.visible,
                depth: entry.depth,
                depth_textures: entry.texture_count(),
            })
            .collect();

        let depth_passes = composer
            .depth_scene()
            .children()
            .iter()
            .filter_map(|camera_node| {
                let camera = camera_node.camera_settings()?;
                let viewport = camera.viewport().unwrap_or_default();
                Some(DepthPassExport {
                    name: camera_node.name(),
                    clear_depth: camera.clear_depth(),
                    width: viewport.width,
                    height: viewport.height,
                    content: child_names(camera_node),
                })
            })
            .collect();

        let render_state = composer.render_scene().state_set().unwrap_or_default();
        let root_state = node.root().state_set().unwrap_or_default();
        let shaders = root_state
            .program()
            .map(|program| program.shaders().map(|s| s.name.clone()).collect())
            .unwrap_or_default();

        let uniforms = root_state
            .uniforms()
            .iter()
            .chain(render_state.uniforms())
            .map(|(name, value)| (name.clone(), UniformExport::from(value)))
            .collect();

        Self {
            settings: node.settings().clone(),
            subgraphs,
            depth_passes,
            render_children: child_names(composer.render_scene()),
            defines: render_state.defines().clone(),
            uniforms,
            shaders,
        }
    }

    /// Pretty-printed RON.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Export`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String, DemoError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Write the RON description to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Export`] or [`DemoError::Io`].
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), DemoError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parasurf_core::math::Vec3;
    use parasurf_graphics::GraphicsDevice;
    use parasurf_parametric::BoundaryShape;

    fn node_with_boundary() -> ParametricNode {
        let mut node = ParametricNode::new(GraphicsDevice::new());
        node.set_dimensions(320, 240);
        node.settings_mut().visible_boundaries = true;
        node.settings_mut().depth_boundaries = true;
        node.settings_mut()
            .boundaries
            .push(BoundaryShape::cylinder(Vec3::new(0.5, 0.5, 0.0), 0.2, 1.0));
        node.add_uniform("cutOff", UniformValue::Float(0.001));
        node.setup();
        node
    }

    #[test]
    fn test_export_describes_composite() {
        let export = SceneExport::from_node(&node_with_boundary());

        assert_eq!(export.subgraphs.len(), 2);
        assert_eq!(export.subgraphs[0].name.as_deref(), Some("ParametricGroup"));
        assert_eq!(export.subgraphs[1].depth_textures, 2);

        let names: Vec<&str> = export.depth_passes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["front_depth0", "back_depth0"]);
        assert_eq!(export.depth_passes[1].clear_depth, 0.0);
        assert_eq!(export.depth_passes[0].width, 320.0);
        assert_eq!(export.depth_passes[0].content, vec!["cylinder0"]);

        assert_eq!(export.render_children, vec!["ParametricGroup", "cylinder0"]);
        assert_eq!(export.defines["NUM_DEPTH_TEXTURES"], "1");
        assert_eq!(export.uniforms["cutOff"], UniformExport::Float(0.001));
        assert_eq!(export.uniforms["frontDepthTexture0"], UniformExport::Int(0));
    }

    #[test]
    fn test_export_writes_readable_ron() {
        let export = SceneExport::from_node(&node_with_boundary());
        let path = std::env::temp_dir().join(format!("parasurf_export_{}.ron", std::process::id()));

        export.write(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(text, export.to_ron_string().unwrap());
        assert!(text.contains("\"back_depth0\""));
        assert!(text.contains("\"NUM_DEPTH_TEXTURES\": \"1\""));
    }
}
