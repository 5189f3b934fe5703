use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use gl_wrapper::TWO_TRIANGLES;

const DEFAULT_VERTEX_SHADER: &str = include_str!("gl_shaders/triangle_vert.glsl");
const DEFAULT_FRAGMENT_SHADER: &str = include_str!("gl_shaders/solid_frag.glsl");

/// Everything the program needs to know before the window opens.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub clear_color: [f32; 4],
    /// Three floats per vertex, drawn as a triangle list.
    pub vertices: Vec<f32>,
    pub shaders: ShaderSources,
    pub wireframe: bool,
    /// Abort instead of drawing with an unlinked program when shaders fail.
    pub strict_shaders: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            vertices: TWO_TRIANGLES.to_vec(),
            shaders: ShaderSources::default(),
            wireframe: false,
            strict_shaders: false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} has a zero dimension",
                self.window.width, self.window.height
            )));
        }

        if self.vertices.is_empty() || self.vertices.len() % 3 != 0 {
            return Err(ConfigError::Invalid(format!(
                "{} vertex floats do not form whole 3 component vertices",
                self.vertices.len()
            )));
        }

        if self.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "clear color {:?} is outside of [0, 1]",
                self.clear_color
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: String::from("OpenGL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: DEFAULT_VERTEX_SHADER.to_string(),
            fragment: DEFAULT_FRAGMENT_SHADER.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    window: WindowFile,
    clear_color: Option<[f32; 4]>,
    vertices: Option<Vec<f32>>,
    shaders: ShaderPaths,
    wireframe: Option<bool>,
    strict_shaders: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WindowFile {
    width: Option<u32>,
    height: Option<u32>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ShaderPaths {
    vertex: Option<PathBuf>,
    fragment: Option<PathBuf>,
}

pub struct ConfigLoader {}

impl ConfigLoader {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path).map_err(|e| ConfigError::Input {
            path: path.to_owned(),
            source: e,
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        Self::load_from_str(&config_str, base_dir)
    }

    /// Parses a JSON5 config. Keys left out keep their default, shader paths
    /// are relative to `base_dir`.
    pub fn load_from_str(config_str: &str, base_dir: &Path) -> Result<AppConfig, ConfigError> {
        let file: ConfigFile = json5::from_str(config_str)?;
        let mut config = AppConfig::default();

        if let Some(width) = file.window.width {
            config.window.width = width;
        }
        if let Some(height) = file.window.height {
            config.window.height = height;
        }
        if let Some(title) = file.window.title {
            config.window.title = title;
        }
        if let Some(color) = file.clear_color {
            config.clear_color = color;
        }
        if let Some(vertices) = file.vertices {
            config.vertices = vertices;
        }
        if let Some(vertex) = file.shaders.vertex {
            config.shaders.vertex = read_shader(base_dir, &vertex)?;
        }
        if let Some(fragment) = file.shaders.fragment {
            config.shaders.fragment = read_shader(base_dir, &fragment)?;
        }
        if let Some(wireframe) = file.wireframe {
            config.wireframe = wireframe;
        }
        if let Some(strict) = file.strict_shaders {
            config.strict_shaders = strict;
        }

        config.validate()?;

        Ok(config)
    }
}

fn read_shader(base_dir: &Path, path: &Path) -> Result<String, ConfigError> {
    let path = base_dir.join(path);

    std::fs::read_to_string(&path).map_err(|e| ConfigError::Input { path, source: e })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config format: {0}")]
    Format(#[from] json5::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
