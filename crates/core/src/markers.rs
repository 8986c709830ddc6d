//! Sentinel markers that encode line visibility inside a plain text stream.
//!
//! A line that should only be shown while the document is collapsed ends
//! with [`WHILE_COLLAPSED_MARKER`]; a line that should only be shown once the
//! user expands the document ends with [`WHILE_EXPANDED_MARKER`]. Lines
//! without a marker are always shown. Both markers come from the Unicode
//! Private Use Area and are stripped from fetched content, so they cannot
//! appear in text by accident.
//!
//! ```rust
//! use precis_core::markers::{WHILE_EXPANDED_MARKER, view};
//!
//! let encoded = format!("summary\nfull text{}\n", WHILE_EXPANDED_MARKER);
//! assert_eq!(view(&encoded, false), "summary\n");
//! assert_eq!(view(&encoded, true), "summary\nfull text\n");
//! ```

use crate::document::Visibility;

/// Marks a line shown only while collapsed (the "show more" label).
pub const WHILE_COLLAPSED_MARKER: char = '\u{F8F0}';

/// Marks a line hidden until expanded (the full article and its label).
pub const WHILE_EXPANDED_MARKER: char = '\u{F8F1}';

/// Returns the marker a line of the given visibility carries, if any.
pub fn marker_for(visibility: Visibility) -> Option<char> {
    match visibility {
        Visibility::Always => None,
        Visibility::WhileCollapsed => Some(WHILE_COLLAPSED_MARKER),
        Visibility::WhileExpanded => Some(WHILE_EXPANDED_MARKER),
    }
}

/// Splits a trailing marker off a single line.
pub fn split_marker(line: &str) -> (&str, Visibility) {
    if let Some(text) = line.strip_suffix(WHILE_COLLAPSED_MARKER) {
        (text, Visibility::WhileCollapsed)
    } else if let Some(text) = line.strip_suffix(WHILE_EXPANDED_MARKER) {
        (text, Visibility::WhileExpanded)
    } else {
        (line, Visibility::Always)
    }
}

/// Returns true if the character is one of the two sentinel markers.
pub fn is_marker(c: char) -> bool {
    c == WHILE_COLLAPSED_MARKER || c == WHILE_EXPANDED_MARKER
}

/// Removes every sentinel marker from the text.
pub fn strip_markers(text: &str) -> String {
    text.chars().filter(|c| !is_marker(*c)).collect()
}

/// Materializes one of the two views of an encoded document.
///
/// Lines hidden in the requested view are dropped and the remaining lines
/// lose their markers. Line breaks of kept lines are preserved as-is.
pub fn view(encoded: &str, expanded: bool) -> String {
    let mut output = String::with_capacity(encoded.len());

    for segment in encoded.split_inclusive('\n') {
        let (line, newline) = match segment.strip_suffix('\n') {
            Some(line) => (line, true),
            None => (segment, false),
        };
        let (text, visibility) = split_marker(line);

        let shown = match visibility {
            Visibility::Always => true,
            Visibility::WhileCollapsed => !expanded,
            Visibility::WhileExpanded => expanded,
        };
        if shown {
            output.push_str(text);
            if newline {
                output.push('\n');
            }
        }
    }

    output
}
