//! Removal of terminal control sequences and reserved characters.
//!
//! Fetched pages occasionally embed raw escape sequences (code samples,
//! copied terminal output). They are removed before conversion so they cannot
//! restyle the terminal, and the sentinel markers are removed so that only
//! the assembler can produce them.

use std::sync::LazyLock;

use regex::Regex;

use crate::markers::is_marker;

/// CSI sequences, OSC sequences (BEL or ST terminated) and two-byte escapes.
static ANSI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
        .expect("ANSI pattern is valid")
});

/// Strips ANSI escape sequences from text.
pub fn strip_ansi(text: &str) -> String {
    ANSI_PATTERN.replace_all(text, "").into_owned()
}

/// Strips ANSI sequences, stray escape bytes and sentinel markers.
pub fn sanitize(text: &str) -> String {
    strip_ansi(text).chars().filter(|c| *c != '\x1b' && !is_marker(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{WHILE_COLLAPSED_MARKER, WHILE_EXPANDED_MARKER};

    #[test]
    fn test_strip_ansi_csi() {
        assert_eq!(strip_ansi("\x1b[1;31mred\x1b[0m text"), "red text");
    }

    #[test]
    fn test_strip_ansi_osc_hyperlink() {
        let text = "\x1b]8;;https://example.com\x1b\\link\x1b]8;;\x1b\\";
        assert_eq!(strip_ansi(text), "link");
    }

    #[test]
    fn test_strip_ansi_leaves_plain_text() {
        let text = "<p>Plain [text] with brackets</p>";
        assert_eq!(strip_ansi(text), text);
    }

    #[test]
    fn test_sanitize_removes_markers() {
        let text = format!("a{}b{}c\x1b", WHILE_COLLAPSED_MARKER, WHILE_EXPANDED_MARKER);
        assert_eq!(sanitize(&text), "abc");
    }
}
