//! Page-count and format probe for schematic and board files.

use std::fs;
use std::path::Path;

use log::warn;
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{DiffError, Result};
use crate::visual::PageRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignKind {
    Schematic,
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignProbe {
    Xml { kind: DesignKind, sheets: u32 },
    /// Not UTF-8 text, most likely a pre-XML binary design.
    Unreadable,
}

pub(crate) fn parse_xml<'a>(path: &Path, text: &'a str) -> Result<Document<'a>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options).map_err(|e| DiffError::parse(path, e))
}

pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

pub fn probe_design(path: &Path) -> Result<DesignProbe> {
    let bytes = fs::read(path)?;
    let Ok(text) = String::from_utf8(bytes) else {
        return Ok(DesignProbe::Unreadable);
    };
    probe_text(path, &text)
}

fn probe_text(path: &Path, text: &str) -> Result<DesignProbe> {
    let not_design = || DiffError::format(path, "not an Eagle XML design file");
    let doc = parse_xml(path, text).map_err(|_| not_design())?;
    let root = doc.root_element();
    if !root.has_tag_name("eagle") {
        return Err(not_design());
    }
    let drawing = child(root, "drawing").ok_or_else(not_design)?;

    if let Some(schematic) = child(drawing, "schematic") {
        let sheets = child(schematic, "sheets")
            .map(|s| s.children().filter(|n| n.has_tag_name("sheet")).count())
            .unwrap_or(0);
        return Ok(DesignProbe::Xml {
            kind: DesignKind::Schematic,
            sheets: sheets as u32,
        });
    }
    if child(drawing, "board").is_some() {
        return Ok(DesignProbe::Xml {
            kind: DesignKind::Board,
            sheets: 1,
        });
    }
    Err(not_design())
}

/// Decide which pages to compare.
///
/// A pinned page always wins. Without one, both files are probed: if either
/// cannot be read as text the comparison falls back to page 1, otherwise
/// both must report the same sheet count.
pub fn resolve_page_range(from: &Path, to: &Path, pinned: Option<u32>) -> Result<PageRange> {
    if let Some(page) = pinned {
        return Ok(PageRange::single(page));
    }

    let from_probe = probe_design(from)?;
    let to_probe = probe_design(to)?;
    match (from_probe, to_probe) {
        (DesignProbe::Xml { sheets: a, .. }, DesignProbe::Xml { sheets: b, .. }) => {
            if a != b {
                return Err(DiffError::Mismatch {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                    from_sheets: a,
                    to_sheets: b,
                });
            }
            Ok(PageRange::new(1, a))
        }
        _ => {
            warn!("Considering file as an Eagle v5 binary format, comparing page 1 only.");
            Ok(PageRange::single(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMATIC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE eagle SYSTEM "eagle.dtd">
<eagle version="7.7.0">
<drawing>
<schematic>
<sheets>
<sheet><plain/></sheet>
<sheet><plain/></sheet>
</sheets>
</schematic>
</drawing>
</eagle>"#;

    #[test]
    fn counts_schematic_sheets() {
        let probe = probe_text(Path::new("a.sch"), SCHEMATIC).unwrap();
        assert_eq!(
            probe,
            DesignProbe::Xml {
                kind: DesignKind::Schematic,
                sheets: 2
            }
        );
    }

    #[test]
    fn board_is_one_page() {
        let text = r#"<eagle><drawing><board><plain/></board></drawing></eagle>"#;
        let probe = probe_text(Path::new("a.brd"), text).unwrap();
        assert_eq!(
            probe,
            DesignProbe::Xml {
                kind: DesignKind::Board,
                sheets: 1
            }
        );
    }

    #[test]
    fn library_is_not_a_design() {
        let text = r#"<eagle><drawing><library/></drawing></eagle>"#;
        let err = probe_text(Path::new("a.sch"), text).unwrap_err();
        assert!(matches!(err, DiffError::Format { .. }));

        let err = probe_text(Path::new("a.sch"), "hello world").unwrap_err();
        assert!(matches!(err, DiffError::Format { .. }));
    }

    #[test]
    fn binary_files_are_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.sch");
        fs::write(&path, [0x10u8, 0x80, 0xff, 0x00]).unwrap();
        assert_eq!(probe_design(&path).unwrap(), DesignProbe::Unreadable);
    }
}
