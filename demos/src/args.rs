//! Command line arguments for the parametric demo.
//!
//! Flags map onto [`ParametricSettings`]; when `--config` names a TOML
//! file it is loaded first and the flags given on the command line
//! override it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{ArgAction, Parser};

use parasurf_core::math::Vec3;
use parasurf_graphics::{GraphicsDevice, Program, Shader, ShaderStage, UniformValue};
use parasurf_parametric::{BoundaryShape, ParametricNode, ParametricSettings};

use crate::error::DemoError;

/// Parametric surface demo arguments.
#[derive(Parser, Debug, Default)]
#[command(
    name = "parametric_demo",
    about = "Parametric surface composited with depth-captured boundary volumes",
    long_about = "Builds a parametric surface node from the command line, culls one frame \
        from a viewer camera framing the scene and runs the resulting render graph.\n\n\
        EXAMPLES:\n\
          # Surface with a sphere captured into depth textures\n\
          ./parametric_demo --sphere 0.5 0.5 0.5 0.3 -d\n\
        \n\
          # All surface parts on a finer grid, exported to RON\n\
          ./parametric_demo --all --columns 64 --rows 64 -o scene.ron",
    version
)]
pub struct DemoArgs {
    /// Add a sphere boundary.
    #[arg(long, num_args = 4, value_names = ["X", "Y", "Z", "RADIUS"], action = ArgAction::Append, allow_negative_numbers = true)]
    pub sphere: Vec<f32>,

    /// Add a box boundary.
    #[arg(long = "box", num_args = 6, value_names = ["X", "Y", "Z", "DX", "DY", "DZ"], action = ArgAction::Append, allow_negative_numbers = true)]
    pub box_: Vec<f32>,

    /// Add a cone boundary.
    #[arg(long, num_args = 5, value_names = ["X", "Y", "Z", "RADIUS", "HEIGHT"], action = ArgAction::Append, allow_negative_numbers = true)]
    pub cone: Vec<f32>,

    /// Add a capsule boundary.
    #[arg(long, num_args = 5, value_names = ["X", "Y", "Z", "RADIUS", "HEIGHT"], action = ArgAction::Append, allow_negative_numbers = true)]
    pub capsule: Vec<f32>,

    /// Add a cylinder boundary.
    #[arg(long, num_args = 5, value_names = ["X", "Y", "Z", "RADIUS", "HEIGHT"], action = ArgAction::Append, allow_negative_numbers = true)]
    pub cylinder: Vec<f32>,

    /// Grid cells along u.
    #[arg(long, value_name = "N")]
    pub columns: Option<u32>,

    /// Grid cells along v.
    #[arg(long, value_name = "N")]
    pub rows: Option<u32>,

    /// Render the base plane.
    #[arg(long)]
    pub base: bool,

    /// Render the top surface.
    #[arg(long)]
    pub top: bool,

    /// Render the side walls.
    #[arg(long)]
    pub walls: bool,

    /// Render base, top and side walls.
    #[arg(long)]
    pub all: bool,

    /// Shader body for the `Z_FUNCTION` define.
    #[arg(long = "Z_FUNCTION", value_name = "EXPR")]
    pub z_function: Option<String>,

    /// Shader body for the `Z_BASE` define.
    #[arg(long = "Z_BASE", value_name = "EXPR")]
    pub z_base: Option<String>,

    /// Shader body for the `Z_TOP` define.
    #[arg(long = "Z_TOP", value_name = "EXPR")]
    pub z_top: Option<String>,

    /// Add a float uniform on the parametric node.
    #[arg(long, num_args = 2, value_names = ["NAME", "VALUE"], action = ArgAction::Append, allow_negative_numbers = true)]
    pub uniform: Vec<String>,

    /// Draw boundaries in the visible scene.
    #[arg(short = 'b')]
    pub visible_boundaries: bool,

    /// Capture boundaries into depth textures.
    #[arg(short = 'd')]
    pub depth_boundaries: bool,

    /// Shader source file; the stage is taken from the extension.
    #[arg(long, value_name = "FILE")]
    pub shader: Vec<PathBuf>,

    /// Output viewport width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Output viewport height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// TOML settings file applied before the flags.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write a RON description of the scene and exit.
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl DemoArgs {
    /// Parse the process arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Settings from `--config` (or defaults) with the flags applied.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Settings`] if the config file cannot be read or
    /// parsed.
    pub fn settings(&self) -> Result<ParametricSettings, DemoError> {
        let mut settings = match &self.config {
            Some(path) => ParametricSettings::load(path)?,
            None => ParametricSettings::default(),
        };
        self.apply_to(&mut settings);
        Ok(settings)
    }

    /// Apply the command line overrides to `settings`.
    ///
    /// Switches only ever turn options on. Boundaries are appended after
    /// any the settings already carry.
    pub fn apply_to(&self, settings: &mut ParametricSettings) {
        if let Some(columns) = self.columns {
            settings.u_cells = columns;
        }
        if let Some(rows) = self.rows {
            settings.v_cells = rows;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }

        if self.all {
            settings.render_all();
        }
        settings.render_base |= self.base;
        settings.render_top |= self.top;
        settings.render_sidewalls |= self.walls;

        if let Some(z_function) = &self.z_function {
            settings.z_function.clone_from(z_function);
        }
        if let Some(z_base) = &self.z_base {
            settings.z_base.clone_from(z_base);
        }
        if let Some(z_top) = &self.z_top {
            settings.z_top.clone_from(z_top);
        }

        settings.visible_boundaries |= self.visible_boundaries;
        settings.depth_boundaries |= self.depth_boundaries;
        settings.boundaries.extend(self.boundary_shapes());
    }

    /// Boundary primitives from the shape flags.
    pub fn boundary_shapes(&self) -> Vec<BoundaryShape> {
        let center = |v: &[f32]| Vec3::new(v[0], v[1], v[2]);
        let mut shapes = Vec::new();
        shapes.extend(
            self.sphere
                .chunks_exact(4)
                .map(|v| BoundaryShape::sphere(center(v), v[3])),
        );
        shapes.extend(
            self.box_
                .chunks_exact(6)
                .map(|v| BoundaryShape::cuboid(center(v), Vec3::new(v[3], v[4], v[5]))),
        );
        shapes.extend(
            self.cone
                .chunks_exact(5)
                .map(|v| BoundaryShape::cone(center(v), v[3], v[4])),
        );
        shapes.extend(
            self.capsule
                .chunks_exact(5)
                .map(|v| BoundaryShape::capsule(center(v), v[3], v[4])),
        );
        shapes.extend(
            self.cylinder
                .chunks_exact(5)
                .map(|v| BoundaryShape::cylinder(center(v), v[3], v[4])),
        );
        shapes
    }

    /// Float uniforms from `--uniform NAME VALUE`. Unparsable values are
    /// logged and skipped.
    pub fn uniforms(&self) -> Vec<(String, f32)> {
        self.uniform
            .chunks_exact(2)
            .filter_map(|pair| match pair[1].parse::<f32>() {
                Ok(value) => Some((pair[0].clone(), value)),
                Err(e) => {
                    log::warn!("Ignoring uniform {:?}: {:?} is not a float ({e})", pair[0], pair[1]);
                    None
                }
            })
            .collect()
    }

    /// Program from the `--shader` files. A later file replaces an earlier
    /// one of the same stage; unreadable files and unknown extensions are
    /// logged and skipped.
    pub fn load_program(&self) -> Program {
        let mut program = Program::new();
        for path in &self.shader {
            if let Some(shader) = read_shader(path)
                && let Some(previous) = program.add_shader(shader)
            {
                log::debug!("Replacing {:?} shader {}", previous.stage, previous.name);
            }
        }
        program
    }

    /// Build and set up the parametric node these arguments describe.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Settings`] if the config file is invalid.
    pub fn build_node(&self, device: Arc<GraphicsDevice>) -> Result<ParametricNode, DemoError> {
        let mut node = ParametricNode::with_settings(device, self.settings()?);

        let program = self.load_program();
        if !program.is_empty() {
            node.set_program(Arc::new(program));
        }
        for (name, value) in self.uniforms() {
            node.add_uniform(name, UniformValue::Float(value));
        }

        node.setup();
        Ok(node)
    }
}

fn read_shader(path: &Path) -> Option<Shader> {
    let Some(stage) = ShaderStage::from_path(path) else {
        log::warn!("Skipping shader {}: unknown stage extension", path.display());
        return None;
    };
    match std::fs::read_to_string(path) {
        Ok(source) => Some(Shader::new(stage, path.display().to_string(), source)),
        Err(e) => {
            log::warn!("Skipping shader {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> DemoArgs {
        let argv = std::iter::once("parametric_demo").chain(args.iter().copied());
        DemoArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_keep_settings() {
        let settings = parse(&[]).settings().unwrap();
        assert_eq!(settings, ParametricSettings::default());
    }

    #[test]
    fn test_repeatable_shapes_in_flag_order() {
        let args = parse(&[
            "--sphere", "0", "0", "0", "1",
            "--cone", "1", "2", "3", "0.5", "2",
            "--sphere", "-1", "0", "0", "2",
            "--box", "0", "0", "0", "1", "2", "3",
        ]);
        let shapes = args.boundary_shapes();
        assert_eq!(
            shapes,
            vec![
                BoundaryShape::sphere(Vec3::zeros(), 1.0),
                BoundaryShape::sphere(Vec3::new(-1.0, 0.0, 0.0), 2.0),
                BoundaryShape::cuboid(Vec3::zeros(), Vec3::new(1.0, 2.0, 3.0)),
                BoundaryShape::cone(Vec3::new(1.0, 2.0, 3.0), 0.5, 2.0),
            ]
        );
    }

    #[rstest]
    #[case::base(&["--base"], (true, true, false))]
    #[case::walls(&["--walls"], (false, true, true))]
    #[case::all(&["--all"], (true, true, true))]
    fn test_surface_parts(#[case] flags: &[&str], #[case] expected: (bool, bool, bool)) {
        let settings = parse(flags).settings().unwrap();
        assert_eq!(
            (settings.render_base, settings.render_top, settings.render_sidewalls),
            expected
        );
    }

    #[test]
    fn test_flags_override() {
        let settings = parse(&[
            "--columns", "32", "--rows", "16", "--width", "1024", "--height", "768",
            "--Z_FUNCTION", "sin(x)", "--Z_TOP", "1.0", "-b", "-d",
        ])
        .settings()
        .unwrap();

        assert_eq!((settings.u_cells, settings.v_cells), (32, 16));
        assert_eq!((settings.width, settings.height), (1024, 768));
        assert_eq!(settings.z_function, "sin(x)");
        assert_eq!(settings.z_top, "1.0");
        assert!(settings.z_base.is_empty());
        assert!(settings.visible_boundaries && settings.depth_boundaries);
    }

    #[test]
    fn test_uniforms_skip_unparsable() {
        let args = parse(&["--uniform", "cutOff", "0.25", "--uniform", "bad", "x", "--uniform", "offset", "-2"]);
        assert_eq!(
            args.uniforms(),
            vec![("cutOff".to_string(), 0.25), ("offset".to_string(), -2.0)]
        );
    }

    #[test]
    fn test_missing_shader_files_skipped() {
        let args = parse(&["--shader", "/nonexistent/surface.vert", "--shader", "notes.txt"]);
        assert!(args.load_program().is_empty());
    }

    #[test]
    fn test_later_shader_replaces_earlier() {
        let dir = std::env::temp_dir().join(format!("parasurf_demo_shaders_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("first.vert");
        let second = dir.join("second.vert");
        let fragment = dir.join("surface.frag");
        std::fs::write(&first, "first").unwrap();
        std::fs::write(&second, "second").unwrap();
        std::fs::write(&fragment, "fragment").unwrap();

        let args = DemoArgs {
            shader: vec![first, fragment, second],
            ..DemoArgs::default()
        };
        let program = args.load_program();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(program.len(), 2);
        assert_eq!(program.shader(ShaderStage::Vertex).unwrap().source, "second");
        assert_eq!(program.shader(ShaderStage::Fragment).unwrap().source, "fragment");
    }

    #[test]
    fn test_build_node_registers_boundaries() {
        let args = parse(&["--sphere", "0.5", "0.5", "0.5", "0.2", "--capsule", "0", "0", "0", "0.1", "0.5", "-d"]);
        let node = args.build_node(GraphicsDevice::new()).unwrap();

        let registry = node.composer().registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.entries()[1..].iter().all(|e| e.depth && !e.visible));
        assert_eq!(node.composer().depth_scene().num_children(), 4);
    }

    #[test]
    fn test_missing_config_is_error() {
        let args = parse(&["--config", "/nonexistent/parametric.toml"]);
        assert!(matches!(args.settings(), Err(DemoError::Settings(_))));
    }
}
