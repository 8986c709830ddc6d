//! Document assembly.
//!
//! Decides the shape of the document for a request (plain article, summary
//! with a collapsed article, or an error notice above the article) and tags
//! every rendered line with its visibility. The assembler is pure: it never
//! fails and the same input always produces the same [`Document`].
//!
//! # Example
//!
//! ```rust
//! use precis_core::{ArticleRequest, Assembler, SummaryOutcome};
//!
//! let request = ArticleRequest::new("https://example.com/a", "A").summarize(true);
//! let outcome = SummaryOutcome::Success("Short summary.".to_string());
//! let document = Assembler::new().assemble(&request, "Article body.", &outcome);
//!
//! let encoded = document.encode();
//! assert!(encoded.contains("AI Summary"));
//! assert!(encoded.contains("Show Full Article"));
//! ```

use std::fmt::Display;

use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use crate::document::{Document, Line, Region, RegionKind, Visibility};
use crate::render::{RenderConfig, header_lines, render_markdown};
use crate::sanitize::sanitize;

/// Label shown next to the toggle glyphs.
pub const TOGGLE_LABEL: &str = "Show Full Article";

/// Glyph of the label shown while the article is collapsed.
pub const COLLAPSED_GLYPH: char = '▶';

/// Glyph of the label shown while the article is expanded.
pub const EXPANDED_GLYPH: char = '▼';

pub const SUMMARY_HEADING: &str = "AI Summary";
pub const ARTICLE_HEADING: &str = "Full Article";

/// Reason used when the summarizer returns only whitespace.
pub const EMPTY_SUMMARY_REASON: &str = "no summary generated";

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_INDENT: &str = "  ";

/// Input to a single document assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRequest {
    pub url: String,
    pub title: String,
    /// Target width in terminal columns, never zero.
    pub width: usize,
    /// Indentation prefix applied to every body line.
    pub indent: String,
    /// Whether a summary should be requested.
    pub summarize: bool,
}

impl ArticleRequest {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            width: DEFAULT_WIDTH,
            indent: DEFAULT_INDENT.to_string(),
            summarize: false,
        }
    }

    /// Sets the width; zero is raised to one column.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }
}

/// Result of the optional summarization step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    NotRequested,
    Success(String),
    Failure(String),
}

impl SummaryOutcome {
    /// Converts a summarizer result, keeping only the error's message.
    pub fn from_result<E: Display>(result: Result<String, E>) -> Self {
        match result {
            Ok(summary) => SummaryOutcome::Success(summary),
            Err(e) => SummaryOutcome::Failure(e.to_string()),
        }
    }
}

/// The pair of mutually exclusive toggle labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleAffordance {
    /// `▶ label`, shown while collapsed.
    pub collapsed: String,
    /// `▼ label`, shown while expanded.
    pub expanded: String,
}

impl ToggleAffordance {
    /// Builds both labels, each centered within `width` columns.
    pub fn new(label: &str, width: usize) -> Self {
        Self {
            collapsed: center(&format!("{} {}", COLLAPSED_GLYPH, label), width),
            expanded: center(&format!("{} {}", EXPANDED_GLYPH, label), width),
        }
    }

    fn into_region(self, styled: bool) -> Region {
        let style = |text: String| if styled { text.bold().to_string() } else { text };

        Region::tagged(
            RegionKind::Toggle,
            vec![
                Line::new(style(self.collapsed), Visibility::WhileCollapsed),
                Line::new(style(self.expanded), Visibility::WhileExpanded),
                Line::new("", Visibility::WhileExpanded),
            ],
        )
    }
}

/// Number of leading spaces used to center text of `text_width` columns.
///
/// The text is right-justified into a field of `(width + text_width) / 2`
/// columns, which rounds an odd remainder towards the left edge.
pub fn center_padding(text_width: usize, width: usize) -> usize {
    let field = (width + text_width) / 2;
    field.saturating_sub(text_width)
}

fn center(text: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(center_padding(text.width(), width)), text)
}

/// Markdown of the notice shown when summarization failed.
pub fn error_notice_markdown(reason: &str) -> String {
    format!("**Error generating summary:** {}\n\n---\n\n", reason)
}

/// Markdown of the summary section.
pub fn summary_markdown(summary: &str) -> String {
    format!("# {}\n\n{}\n\n", SUMMARY_HEADING, summary)
}

/// Markdown of the article section when it follows a summary.
pub fn article_markdown(markdown: &str) -> String {
    format!("# {}\n\n{}", ARTICLE_HEADING, markdown)
}

/// Builds documents from fetched Markdown and a summary outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler {
    styled: bool,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables ANSI styling of headings, labels and inline emphasis.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Assembles the document for one request.
    ///
    /// A failed summary never hides anything: the failure reason is shown
    /// above the fully visible article. A successful summary is shown with a
    /// toggle, and the article below it is collapsed.
    pub fn assemble(&self, request: &ArticleRequest, markdown: &str, outcome: &SummaryOutcome) -> Document {
        let config = RenderConfig::new(request.width, request.indent.clone()).styled(self.styled);
        let mut document = Document::new();
        let markdown = sanitize(markdown);
        let markdown = markdown.as_str();

        let header = header_lines(&sanitize(&request.title), &sanitize(&request.url), &config);
        document.push(self.region(RegionKind::Header, header));

        // Markers and escapes only ever come from the assembler itself
        let outcome = match outcome {
            SummaryOutcome::NotRequested => SummaryOutcome::NotRequested,
            SummaryOutcome::Failure(reason) => SummaryOutcome::Failure(sanitize(reason)),
            SummaryOutcome::Success(summary) => match sanitize(summary) {
                summary if summary.trim().is_empty() => SummaryOutcome::Failure(EMPTY_SUMMARY_REASON.to_string()),
                summary => SummaryOutcome::Success(summary),
            },
        };

        match outcome {
            SummaryOutcome::NotRequested => {
                document.push(self.region(RegionKind::Article, render_markdown(markdown, &config)));
            }
            SummaryOutcome::Failure(reason) => {
                let notice = render_markdown(&error_notice_markdown(&reason), &config);
                document.push(self.region(RegionKind::ErrorNotice, notice));
                document.push(self.region(RegionKind::Article, render_markdown(markdown, &config)));
            }
            SummaryOutcome::Success(summary) => {
                let summary = render_markdown(&summary_markdown(summary.trim()), &config);
                document.push(self.region(RegionKind::Summary, summary));
                document.push(ToggleAffordance::new(TOGGLE_LABEL, request.width).into_region(self.styled));

                let article = with_trailing_blank(render_markdown(&article_markdown(markdown), &config));
                document.push(Region::uniform(RegionKind::Article, article, Visibility::WhileExpanded));
            }
        }

        document
    }

    fn region(&self, kind: RegionKind, lines: Vec<String>) -> Region {
        Region::uniform(kind, with_trailing_blank(lines), Visibility::Always)
    }
}

fn with_trailing_blank(mut lines: Vec<String>) -> Vec<String> {
    lines.push(String::new());
    lines
}
