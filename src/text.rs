use std::path::Path;

use anyhow::Result;
use similar::TextDiff;

use crate::utils::read_text_best_effort;

/// Line based unified diff of two files. Empty when the texts are equal.
pub fn unified_diff(from: &Path, to: &Path) -> Result<String> {
    let a_text = read_text_best_effort(from, true)?;
    let b_text = read_text_best_effort(to, true)?;
    Ok(unified_diff_str(
        &a_text,
        &b_text,
        &from.display().to_string(),
        &to.display().to_string(),
    ))
}

pub fn unified_diff_str(a_text: &str, b_text: &str, from: &str, to: &str) -> String {
    if a_text == b_text {
        return String::new();
    }
    TextDiff::from_lines(a_text, b_text)
        .unified_diff()
        .context_radius(3)
        .header(from, to)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_texts_give_nothing() {
        assert_eq!(unified_diff_str("a\nb\n", "a\nb\n", "x", "y"), "");
    }

    #[test]
    fn hunk_has_headers_and_markers() {
        let out = unified_diff_str("a\nb\nc\n", "a\nB\nc\n", "old.lbr", "new.lbr");
        assert!(out.starts_with("--- old.lbr\n+++ new.lbr\n"));
        assert!(out.contains("@@ -1,3 +1,3 @@"));
        assert!(out.contains("\n-b\n"));
        assert!(out.contains("\n+B\n"));
    }
}
