//! Structured form of an assembled document.
//!
//! The assembler works with tagged lines and regions; sentinel characters
//! only appear when a [`Document`] is encoded for the downstream renderer.

use crate::markers::marker_for;

/// When a line is shown by a toggle-aware renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Shown in both views.
    Always,
    /// Shown until the user expands the document.
    WhileCollapsed,
    /// Hidden until the user expands the document (collapsed by default).
    WhileExpanded,
}

/// The logical section a region represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Header,
    Summary,
    ErrorNotice,
    Toggle,
    Article,
}

/// A single rendered line and its visibility class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub visibility: Visibility,
}

impl Line {
    pub fn new(text: impl Into<String>, visibility: Visibility) -> Self {
        Self { text: text.into(), visibility }
    }
}

/// A contiguous run of lines produced for one logical section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub lines: Vec<Line>,
}

impl Region {
    /// Builds a region whose lines all share one visibility class.
    pub fn uniform(kind: RegionKind, lines: Vec<String>, visibility: Visibility) -> Self {
        let lines = lines.into_iter().map(|text| Line::new(text, visibility)).collect();
        Self { kind, lines }
    }

    /// Builds a region from individually tagged lines.
    pub fn tagged(kind: RegionKind, lines: Vec<Line>) -> Self {
        Self { kind, lines }
    }
}

/// An ordered list of regions making up one article view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    regions: Vec<Region>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, region: Region) {
        self.regions.push(region);
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Returns the first region of the given kind.
    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == kind)
    }

    /// Iterates over every line of every region in document order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.regions.iter().flat_map(|r| r.lines.iter())
    }

    /// Serializes the document into a single string with sentinel markers.
    ///
    /// Lines are joined with `\n` and each line carries the marker of its
    /// visibility class. The final line never carries a marker.
    pub fn encode(&self) -> String {
        let total = self.lines().count();
        let mut output = String::new();

        for (i, line) in self.lines().enumerate() {
            output.push_str(&line.text);

            if i + 1 == total {
                break;
            }
            if let Some(marker) = marker_for(line.visibility) {
                output.push(marker);
            }
            output.push('\n');
        }

        output
    }
}
