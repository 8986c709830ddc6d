//! Turn web articles into terminal documents with an optional AI summary.
//!
//! The entry point is [`Reader`]. It fetches a page, extracts the article,
//! converts it to Markdown, renders it for the terminal and, when asked,
//! places a summary above a collapsed copy of the article. Collapsible lines
//! are tagged with the sentinel characters in [`markers`].

pub mod assemble;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod markdown;
pub mod markers;
pub mod postprocess;
pub mod reader;
pub mod render;
pub mod sanitize;
pub mod summarize;

pub use assemble::{ArticleRequest, Assembler, SummaryOutcome, ToggleAffordance};
pub use config::Config;
pub use document::{Document, Line, Region, RegionKind, Visibility};
pub use error::{PrecisError, Result};
pub use extract::{ExtractedArticle, extract_article};
pub use fetch::{FetchConfig, fetch_file, fetch_stdin, fetch_url};
pub use markdown::{MarkdownConfig, to_markdown};
pub use markers::{WHILE_COLLAPSED_MARKER, WHILE_EXPANDED_MARKER};
pub use postprocess::{PostprocessConfig, postprocess};
pub use reader::{Reader, ReaderConfig};
pub use render::RenderConfig;
pub use summarize::{LlmSummarizer, Provider, StaticSummarizer, SummarizeError, Summarizer, SummaryConfig};
