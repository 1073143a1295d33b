//! Diff orchestration: picks the visual, semantic or textual strategy from
//! the file kinds and drives it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info};
use tempfile::TempDir;

use crate::config::Config;
use crate::design::resolve_page_range;
use crate::document::write_pdf;
use crate::library::parse_library;
use crate::render::PageRenderer;
use crate::semantic::{diff_libraries, DiffReport};
use crate::text::unified_diff;
use crate::utils::{document_file_name, file_bytes_equal, FileKind};
use crate::visual::compare_pages;

#[derive(Debug, Clone, Default)]
pub struct DiffRequest {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Compare only this page instead of probing the sheet count.
    pub page: Option<u32>,
    /// Document path; a temporary file is used and previewed when absent.
    pub output: Option<PathBuf>,
    pub semantic: bool,
    /// Also keep every page composite as a PNG in this directory.
    pub pages_dir: Option<PathBuf>,
}

/// A generated diff document.
///
/// The work directory lives as long as this value, so a document written
/// into it stays available until the report is dropped.
#[derive(Debug)]
pub struct VisualReport {
    pub output: PathBuf,
    pub pages: usize,
    /// True when the document is temporary and should be shown to the user.
    pub preview: bool,
    workdir: TempDir,
}

impl VisualReport {
    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }
}

#[derive(Debug)]
pub enum DiffOutcome {
    Visual(VisualReport),
    /// No page produced a composite.
    NoOutput,
    Semantic(DiffReport),
    Text(String),
    /// Inputs that cannot be compared; already logged.
    Skipped(String),
}

pub fn run_diff(
    request: &DiffRequest,
    config: &Config,
    renderer: &dyn PageRenderer,
) -> Result<DiffOutcome> {
    let kind = FileKind::from_path(&request.from);

    if FileKind::from_path(&request.to) != kind {
        let reason = format!(
            "{}: both files should have the same extension",
            request.to.display()
        );
        error!("{reason}");
        return Ok(DiffOutcome::Skipped(reason));
    }

    if file_bytes_equal(&request.from, &request.to) {
        info!("{} and {} are byte-identical", request.from.display(), request.to.display());
    }

    match kind {
        FileKind::Board | FileKind::Schematic => diff_visual(request, config, renderer),
        FileKind::Library => {
            if request.semantic || config.semantic_diff {
                diff_semantic(&request.from, &request.to).map(DiffOutcome::Semantic)
            } else {
                unified_diff(&request.from, &request.to).map(DiffOutcome::Text)
            }
        }
        FileKind::Unsupported => {
            let reason = format!(
                "{}: skipping, not a board, schematic or library",
                request.from.display()
            );
            error!("{reason}");
            Ok(DiffOutcome::Skipped(reason))
        }
    }
}

pub fn diff_semantic(from: &Path, to: &Path) -> Result<DiffReport> {
    let old = parse_library(from).with_context(|| format!("reading {}", from.display()))?;
    let new = parse_library(to).with_context(|| format!("reading {}", to.display()))?;
    Ok(diff_libraries(&old, &new))
}

fn diff_visual(
    request: &DiffRequest,
    config: &Config,
    renderer: &dyn PageRenderer,
) -> Result<DiffOutcome> {
    let workdir = tempfile::Builder::new()
        .prefix("eaglediff-")
        .tempdir()
        .context("creating work directory")?;

    let range = resolve_page_range(&request.from, &request.to, request.page)?;
    if let Some(dir) = &request.pages_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let comparison = compare_pages(
        renderer,
        config,
        &request.from,
        &request.to,
        range,
        workdir.path(),
        request.pages_dir.as_deref(),
    )?;

    if comparison.is_empty() {
        info!("No diff output.");
        return Ok(DiffOutcome::NoOutput);
    }

    let (output, preview) = match &request.output {
        Some(path) => (path.clone(), false),
        None => (
            workdir
                .path()
                .join(document_file_name(&request.from, &request.to)),
            true,
        ),
    };
    write_pdf(&comparison.pages, config.dpi, &output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("Diff output in file: {}", output.display());

    Ok(DiffOutcome::Visual(VisualReport {
        output,
        pages: comparison.pages.len(),
        preview,
        workdir,
    }))
}
