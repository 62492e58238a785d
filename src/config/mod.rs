use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::geometry::Aspect;

/// Figure defaults: 12 x 10 inches at 300 dpi.
pub mod defaults {
    pub const WIDTH: u32 = 3600;
    pub const HEIGHT: u32 = 3000;
    pub const LABELS: usize = 20;
    pub const SIMPLIFY: u8 = 0;
    pub const MIN_SIZE: u32 = 200;
    pub const MAX_SIZE: u32 = 20000;
}

fn default_width() -> u32 {
    defaults::WIDTH
}
fn default_height() -> u32 {
    defaults::HEIGHT
}
fn default_labels() -> usize {
    defaults::LABELS
}
fn default_simplify() -> u8 {
    defaults::SIMPLIFY
}
fn default_north_arrow() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub aspect: Aspect,
    #[serde(default = "default_labels")]
    pub labels: usize,
    #[serde(default = "default_simplify")]
    pub simplify: u8,
    #[serde(default)]
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub json: Option<PathBuf>,
    #[serde(default = "default_north_arrow")]
    pub north_arrow: bool,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            title: None,
            width: default_width(),
            height: default_height(),
            aspect: Aspect::default(),
            labels: default_labels(),
            simplify: default_simplify(),
            font: None,
            json: None,
            north_arrow: default_north_arrow(),
            verbose: false,
        }
    }
}

impl FileConfig {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// First readable, parseable config on the search path.
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match Self::from_toml(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("firmap.toml"), PathBuf::from(".firmap.toml")];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("firmap").join("config.toml"));
        paths.push(config_dir.join("firmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".firmap.toml"));
    }

    paths
}

/// Both sides within `defaults::MIN_SIZE..=defaults::MAX_SIZE`.
pub fn image_size_in_range(width: u32, height: u32) -> bool {
    let range = defaults::MIN_SIZE..=defaults::MAX_SIZE;
    range.contains(&width) && range.contains(&height)
}

/// `CBAS.map` -> `cbas_polygon_visualization.png`, next to the working directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "map".to_string());
    PathBuf::from(format!("{}_polygon_visualization.png", stem.replace(' ', "_")))
}

/// Polygon name shown in the title: the upper-cased file stem.
pub fn polygon_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "MAP".to_string())
}
