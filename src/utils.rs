use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::Result;
use encoding_rs::WINDOWS_1252;
use sha2::{Digest, Sha256};

/// Kind of Eagle file, decided from the extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Board,
    Schematic,
    Library,
    Unsupported,
}

impl FileKind {
    pub fn from_path(path: &Path) -> FileKind {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "brd" => FileKind::Board,
            "sch" => FileKind::Schematic,
            "lbr" => FileKind::Library,
            _ => FileKind::Unsupported,
        }
    }

    /// Boards and schematics are compared page by page as images.
    pub fn is_visual(self) -> bool {
        matches!(self, FileKind::Board | FileKind::Schematic)
    }
}

pub fn read_text_best_effort(path: &Path, normalize_eol: bool) -> Result<String> {
    let bytes = fs::read(path)?;
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            let (res, _, _) = WINDOWS_1252.decode(err.as_bytes());
            res.into_owned()
        }
    };

    if normalize_eol {
        Ok(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Ok(content)
    }
}

pub fn file_digest(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).ok()?;
    Some(hex::encode(hasher.finalize()))
}

pub fn file_bytes_equal(p1: &Path, p2: &Path) -> bool {
    match (file_digest(p1), file_digest(p2)) {
        (Some(h1), Some(h2)) => h1 == h2,
        _ => false,
    }
}

/// File name up to its first dot: `rev-a.v2.sch` gives `rev-a`.
pub fn base_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

pub fn document_file_name(from: &Path, to: &Path) -> String {
    format!("{}-{}.pdf", base_stem(from), base_stem(to))
}

pub fn page_file_name(from: &Path, to: &Path, page: u32) -> String {
    format!("{}-{}-page_{page}.png", base_stem(from), base_stem(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn kind_is_case_insensitive() {
        assert_eq!(FileKind::from_path(Path::new("a/B.BRD")), FileKind::Board);
        assert_eq!(FileKind::from_path(Path::new("x.Sch")), FileKind::Schematic);
        assert_eq!(FileKind::from_path(Path::new("lib.lbr")), FileKind::Library);
        assert_eq!(FileKind::from_path(Path::new("notes.txt")), FileKind::Unsupported);
        assert_eq!(FileKind::from_path(Path::new("Makefile")), FileKind::Unsupported);
    }

    #[test]
    fn names_use_stem_before_first_dot() {
        let from = PathBuf::from("/tmp/rev-a.v2.sch");
        let to = PathBuf::from("rev-b.sch");
        assert_eq!(base_stem(&from), "rev-a");
        assert_eq!(document_file_name(&from, &to), "rev-a-rev-b.pdf");
        assert_eq!(page_file_name(&from, &to, 3), "rev-a-rev-b-page_3.png");
    }

    #[test]
    fn latin1_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.lbr");
        fs::write(&path, [b'R', 0xB5, b'\r', b'\n']).unwrap();
        let text = read_text_best_effort(&path, true).unwrap();
        assert_eq!(text, "R\u{b5}\n");
    }

    #[test]
    fn digest_equality() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        fs::write(&a, "same").unwrap();
        fs::write(&b, "same").unwrap();
        fs::write(&c, "other").unwrap();
        assert!(file_bytes_equal(&a, &b));
        assert!(!file_bytes_equal(&a, &c));
        assert!(!file_bytes_equal(&a, &dir.path().join("missing")));
    }
}
