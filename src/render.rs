//! Page renderer adapter.
//!
//! Rasterizing a design page is delegated to an external program; the rest
//! of the engine only sees the [`PageRenderer`] trait.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::GrayImage;
use log::debug;

use crate::composite::blend;
use crate::config::{Config, LayerGroup};
use crate::error::{DiffError, Result};
use crate::utils::FileKind;

pub trait PageRenderer {
    /// Render `page` of `file` once per layer group, writing the images under
    /// `out_dir`, and return them as grayscale in group order.
    fn render(
        &self,
        file: &Path,
        page: u32,
        groups: &[LayerGroup],
        out_dir: &Path,
    ) -> Result<Vec<GrayImage>>;
}

/// Renders through the Eagle executable's `-C` command line scripting.
#[derive(Debug, Clone)]
pub struct EagleRenderer {
    eagle: Option<PathBuf>,
    dpi: u32,
}

impl EagleRenderer {
    pub fn new(config: &Config) -> Self {
        EagleRenderer {
            eagle: config.eagle.clone(),
            dpi: config.dpi,
        }
    }

    fn script(&self, kind: FileKind, page: u32, group: &LayerGroup, out: &Path) -> String {
        let mut script = String::from("SET CONFIRM YES; ");
        if kind == FileKind::Schematic {
            script.push_str(&format!("EDIT .s{page}; "));
        }
        script.push_str(&format!(
            "DISPLAY NONE {}; EXPORT IMAGE '{}' MONOCHROME {}; QUIT;",
            group.layers.join(" "),
            out.display(),
            self.dpi
        ));
        script
    }
}

impl PageRenderer for EagleRenderer {
    fn render(
        &self,
        file: &Path,
        page: u32,
        groups: &[LayerGroup],
        out_dir: &Path,
    ) -> Result<Vec<GrayImage>> {
        let kind = FileKind::from_path(file);
        if !kind.is_visual() {
            return Err(DiffError::format(file, "not a board or schematic"));
        }
        let render_err = |reason: String| DiffError::Render {
            path: file.to_path_buf(),
            page,
            reason,
        };
        let eagle = self
            .eagle
            .as_ref()
            .ok_or_else(|| render_err("no Eagle executable configured".into()))?;

        let mut images = Vec::with_capacity(groups.len());
        for group in groups {
            let out = out_dir.join(format!("{}.png", group.name));
            let script = self.script(kind, page, group, &out);
            debug!("{} -C {:?} {}", eagle.display(), script, file.display());

            let status = Command::new(eagle)
                .arg("-C")
                .arg(&script)
                .arg(file)
                .status()
                .map_err(|e| render_err(format!("cannot run {}: {e}", eagle.display())))?;
            if !status.success() {
                return Err(render_err(format!("Eagle exited with {status}")));
            }
            if !out.exists() {
                return Err(render_err(format!("no image written for layer group {}", group.name)));
            }

            images.push(image::open(&out)?.to_luma8());
            std::fs::remove_file(&out)?;
        }
        Ok(images)
    }
}

/// Merge per-layer renders into one page by running mean.
///
/// Images of different sizes are merged over their common area; the first
/// image's size wins.
pub fn flatten_layers(images: Vec<GrayImage>) -> Option<GrayImage> {
    let mut iter = images.into_iter();
    let mut acc = iter.next()?;
    for (i, img) in iter.enumerate() {
        let img = if img.dimensions() == acc.dimensions() {
            img
        } else {
            let mut resized = GrayImage::new(acc.width(), acc.height());
            image::imageops::replace(&mut resized, &img, 0, 0);
            resized
        };
        acc = blend(&acc, &img, 1.0 / (2.0 + i as f32));
    }
    Some(acc)
}

/// Render one page of `file` and flatten its layer groups to a single image.
pub fn render_page(
    renderer: &dyn PageRenderer,
    config: &Config,
    file: &Path,
    page: u32,
    out_dir: &Path,
) -> Result<GrayImage> {
    let kind = FileKind::from_path(file);
    if !kind.is_visual() {
        return Err(DiffError::format(file, "not a board or schematic"));
    }
    let groups = config.layer_groups_for(kind);
    let images = renderer.render(file, page, &groups, out_dir)?;
    flatten_layers(images).ok_or_else(|| DiffError::Render {
        path: file.to_path_buf(),
        page,
        reason: "renderer returned no image".into(),
    })
}
