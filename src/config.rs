//! Viewer configuration
//!
//! Settings are layered: built-in defaults, then an optional RON file,
//! then command-line overrides. Every section is `#[serde(default)]`, so a
//! config file only has to mention the values it changes:
//!
//! ```ron
//! (
//!     camera: (move_speed: 30.0),
//!     resources: (model: "castle.obj", texture: "castle_diffuse.png"),
//! )
//! ```

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "modelview", version, about = "Free-camera 3D model viewer")]
pub struct Cli {
    /// Model to open (obj, gltf, glb, vox). Defaults to the one in the resource directory
    pub model: Option<PathBuf>,

    /// Texture applied as the model's diffuse map
    #[arg(short, long)]
    pub texture: Option<PathBuf>,

    /// RON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name of the resource directory to search for
    #[arg(long)]
    pub resources: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: i32,
    pub height: i32,
    pub title: String,
    /// Frame cap; `None` leaves pacing to vsync
    pub target_fps: Option<u32>,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            title: "modelview - models loading".to_string(),
            target_fps: Some(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fovy_deg: f32,
    /// World units per second
    pub move_speed: f32,
    /// Radians per pixel of mouse motion per second of frame time
    pub look_sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fovy_deg: 45.0,
            move_speed: 15.0,
            look_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Degrees per second while a rotation key is held
    pub rotation_speed_deg: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self { rotation_speed_deg: 90.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub grid_slices: u32,
    pub grid_spacing: f32,
    pub axes_scale: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            grid_slices: 50,
            grid_spacing: 1.0,
            axes_scale: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    /// Directory name searched near the working directory and executable
    pub dir: String,
    /// Model path, relative to the resource directory unless absolute
    pub model: PathBuf,
    /// Texture path, relative to the resource directory unless absolute
    pub texture: Option<PathBuf>,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            dir: "resources".to_string(),
            model: PathBuf::from("monedita.glb"),
            texture: Some(PathBuf::from("wabbit-alpha.png")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Start with the cursor hidden and locked for mouse look
    pub grab_cursor: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self { grab_cursor: true }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub model: ModelSettings,
    pub scene: SceneSettings,
    pub resources: ResourceSettings,
    pub input: InputSettings,
}

impl ViewerConfig {
    /// Load a RON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Apply command-line overrides.
    ///
    /// Paths given on the command line are relative to the working
    /// directory, so they are made absolute here; joining an absolute path
    /// onto the resource directory later leaves it untouched.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(model) = &cli.model {
            self.resources.model = absolute(model);
        }
        if let Some(texture) = &cli.texture {
            self.resources.texture = Some(absolute(texture));
        }
        if let Some(dir) = &cli.resources {
            self.resources.dir = dir.clone();
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Locate the resource directory named `name`.
///
/// Looks in the working directory first, then next to the executable and
/// up to three of its ancestors (covers `target/debug/` layouts).
pub fn search_resource_dir(name: &str) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    search_resource_dir_from(name, &cwd, exe_dir.as_deref())
}

pub fn search_resource_dir_from(name: &str, cwd: &Path, exe_dir: Option<&Path>) -> Option<PathBuf> {
    let candidate = cwd.join(name);
    if candidate.is_dir() {
        return Some(candidate);
    }

    let exe_dir = exe_dir?;
    exe_dir
        .ancestors()
        .take(4)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_dir())
}
