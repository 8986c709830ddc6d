pub mod blocks;
pub mod terminal;

pub use blocks::{Block, Span, SpanStyle, parse_blocks};
pub use terminal::{RenderConfig, header_lines, render_blocks, render_markdown};
