//! Page report builder: one colour composite per compared page.

use std::path::Path;

use image::RgbImage;
use log::info;

use crate::canvas::normalize;
use crate::composite::composite;
use crate::config::Config;
use crate::error::Result;
use crate::render::{render_page, PageRenderer};
use crate::utils::page_file_name;

/// Inclusive, 1-based range of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
}

impl PageRange {
    pub fn new(first: u32, last: u32) -> Self {
        PageRange { first, last }
    }

    pub fn single(page: u32) -> Self {
        PageRange {
            first: page,
            last: page,
        }
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }

    pub fn len(&self) -> usize {
        self.pages().count()
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }
}

#[derive(Debug)]
pub struct PageComparison {
    pub range: PageRange,
    pub pages: Vec<RgbImage>,
}

impl PageComparison {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Render, align and composite every page of `range`.
///
/// `workdir` receives the renderer's intermediate images. When `pages_dir` is
/// given each composite is also saved there as a PNG. The first render
/// failure aborts the remaining pages.
pub fn compare_pages(
    renderer: &dyn PageRenderer,
    config: &Config,
    from: &Path,
    to: &Path,
    range: PageRange,
    workdir: &Path,
    pages_dir: Option<&Path>,
) -> Result<PageComparison> {
    let mut pages = Vec::with_capacity(range.len());

    for page in range.pages() {
        info!("Checking page {} of {}", page, range.last);
        let old = render_page(renderer, config, from, page, workdir)?;
        let new = render_page(renderer, config, to, page, workdir)?;

        let (old, new) = normalize(&old, &new);
        let image = composite(&old, &new);

        if let Some(dir) = pages_dir {
            image.save(dir.join(page_file_name(from, to, page)))?;
        }
        pages.push(image);
    }

    Ok(PageComparison { range, pages })
}
