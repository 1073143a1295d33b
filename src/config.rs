//! Runtime configuration: external tool paths, export DPI and layer groups.
//!
//! Built once at startup (defaults, optionally overridden by a TOML file) and
//! handed by reference to the renderer and the orchestrator.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::utils::FileKind;

pub const DEFAULT_DPI: u32 = 400;

/// One exported image: a set of Eagle layers drawn together, usually one mask.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayerGroup {
    pub name: String,
    pub layers: Vec<String>,
}

impl LayerGroup {
    pub fn new(name: &str, layers: &[&str]) -> Self {
        LayerGroup {
            name: name.to_string(),
            layers: layers.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Eagle executable used for exports.
    pub eagle: Option<PathBuf>,
    /// OS file opener used to preview the generated document.
    pub open: Option<PathBuf>,
    pub dpi: u32,
    /// Compare libraries semantically unless asked otherwise.
    pub semantic_diff: bool,
    /// Board layer groups; schematics always export everything at once.
    pub layers: Vec<LayerGroup>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            eagle: discover_eagle(),
            open: default_opener(),
            dpi: DEFAULT_DPI,
            semantic_diff: false,
            layers: default_board_layers(),
        }
    }
}

impl Config {
    /// Load overrides from a TOML file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn layer_groups_for(&self, kind: FileKind) -> Vec<LayerGroup> {
        match kind {
            FileKind::Board => self.layers.clone(),
            FileKind::Schematic => vec![LayerGroup::new("all", &["ALL"])],
            FileKind::Library | FileKind::Unsupported => Vec::new(),
        }
    }
}

pub fn default_board_layers() -> Vec<LayerGroup> {
    vec![
        LayerGroup::new("topassembly", &["tPlace", "tNames", "tDocu"]),
        LayerGroup::new("topsilk", &["tPlace", "tNames"]),
        LayerGroup::new("toppaste", &["tCream"]),
        LayerGroup::new("topmask", &["tStop"]),
        LayerGroup::new("topcopper", &["Top", "Pads", "Vias"]),
        LayerGroup::new("bottomcopper", &["Bottom", "Pads", "Vias"]),
        LayerGroup::new("bottommask", &["bStop"]),
        LayerGroup::new("bottompaste", &["bCream"]),
        LayerGroup::new("bottomsilk", &["bPlace", "bNames"]),
        LayerGroup::new("bottomassembly", &["bPlace", "bNames", "bDocu"]),
        LayerGroup::new("outline", &["Milling"]),
        LayerGroup::new("measures", &["DrillLegend", "Measures"]),
        LayerGroup::new("drills", &["Drills", "Holes"]),
    ]
}

/// Last match of the pattern, so the newest installed version wins.
fn glob_last(pattern: &str) -> Option<PathBuf> {
    glob::glob(pattern).ok()?.filter_map(|p| p.ok()).last()
}

fn discover_eagle() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        glob_last("/Applications/EAGLE*/EAGLE.app/Contents/MacOS/EAGLE")
    } else if cfg!(target_os = "linux") {
        glob_last("/usr/local/eagle*/bin/eagle")
    } else if cfg!(windows) {
        glob_last("C:\\EAGLE*\\eagle.exe")
    } else {
        None
    }
}

fn default_opener() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        Some(PathBuf::from("/usr/bin/open"))
    } else if cfg!(target_os = "linux") {
        Some(PathBuf::from("/usr/bin/xdg-open"))
    } else {
        None
    }
}
