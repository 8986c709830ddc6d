//! Block to terminal text conversion.
//!
//! Every line produced here fits the configured width (measured in terminal
//! columns, including the indentation prefix) unless a single word or a code
//! line is wider than the width itself.

use owo_colors::OwoColorize;
use textwrap::Options;
use unicode_width::UnicodeWidthStr;

use super::blocks::{Block, Span, parse_blocks, plain_text};

/// Layout and styling options shared by every rendered region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Target line width in terminal columns (at least 1).
    pub width: usize,
    /// Prefix applied to every rendered line.
    pub indent: String,
    /// Emit ANSI styling (bold headings, underlined links).
    pub styled: bool,
}

impl RenderConfig {
    pub fn new(width: usize, indent: impl Into<String>) -> Self {
        Self { width: width.max(1), indent: indent.into(), styled: false }
    }

    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    fn indent_width(&self) -> usize {
        self.indent.width()
    }
}

/// Parse Markdown and render it in one step
pub fn render_markdown(markdown: &str, config: &RenderConfig) -> Vec<String> {
    render_blocks(&parse_blocks(markdown), config)
}

/// Render blocks to terminal lines, separating blocks with one blank line
///
/// Consecutive list items are kept together without a separator.
pub fn render_blocks(blocks: &[Block], config: &RenderConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let mut previous: Option<&Block> = None;

    for block in blocks {
        if let Some(prev) = previous
            && !(is_list_item(prev) && is_list_item(block))
        {
            lines.push(String::new());
        }
        lines.extend(render_block(block, config));
        previous = Some(block);
    }

    lines
}

/// Title, source URL and a horizontal rule
pub fn header_lines(title: &str, url: &str, config: &RenderConfig) -> Vec<String> {
    let mut lines: Vec<String> = wrap(title, config, &config.indent, &config.indent)
        .into_iter()
        .map(|line| if config.styled { line.bold().to_string() } else { line })
        .collect();

    let url_line = format!("{}{}", config.indent, url);
    lines.push(if config.styled { url_line.dimmed().to_string() } else { url_line });
    lines.push(rule(config));

    lines
}

fn is_list_item(block: &Block) -> bool {
    matches!(block, Block::ListItem { .. })
}

fn render_block(block: &Block, config: &RenderConfig) -> Vec<String> {
    let indent = config.indent.as_str();

    match block {
        Block::Heading { spans, .. } => wrap(&plain_text(spans), config, indent, indent)
            .into_iter()
            .map(|line| if config.styled { line.bold().to_string() } else { line })
            .collect(),
        Block::Paragraph(spans) => wrap(&spans_to_string(spans, config.styled), config, indent, indent),
        Block::ListItem { depth, bullet, spans } => {
            let nest = "  ".repeat(*depth);
            let hang = " ".repeat(bullet.width().max(1) + 1);
            let rest = format!("{}{}{}", indent, nest, hang);
            let first = if bullet.is_empty() { rest.clone() } else { format!("{}{}{} ", indent, nest, bullet) };
            wrap(&spans_to_string(spans, config.styled), config, &first, &rest)
        }
        Block::Quote(spans) => {
            let bar = if config.styled { "│".dimmed().to_string() } else { "│".to_string() };
            let prefix = format!("{}{} ", indent, bar);
            wrap(&spans_to_string(spans, config.styled), config, &prefix, &prefix)
        }
        Block::Code { text, .. } => text
            .lines()
            .map(|line| {
                let line = format!("{}    {}", indent, line).trim_end().to_string();
                if config.styled { line.dimmed().to_string() } else { line }
            })
            .collect(),
        Block::Rule => vec![rule(config)],
        Block::Table(rows) => render_table(rows, config),
    }
}

fn rule(config: &RenderConfig) -> String {
    let line = format!("{}{}", config.indent, "─".repeat(config.width.saturating_sub(config.indent_width()).max(1)));
    if config.styled { line.dimmed().to_string() } else { line }
}

fn render_table(rows: &[Vec<String>], config: &RenderConfig) -> Vec<String> {
    const SEPARATOR: &str = " │ ";

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let total = config.indent_width() + widths.iter().sum::<usize>() + SEPARATOR.width() * columns.saturating_sub(1);
    if total > config.width {
        return rows
            .iter()
            .flat_map(|row| wrap(&row.join(SEPARATOR), config, &config.indent, &config.indent))
            .collect();
    }

    rows.iter()
        .map(|row| {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map_or("", String::as_str);
                    format!("{}{}", cell, " ".repeat(width - cell.width()))
                })
                .collect();
            format!("{}{}", config.indent, cells.join(SEPARATOR)).trim_end().to_string()
        })
        .collect()
}

/// Join spans into one string, applying inline styles when enabled
fn spans_to_string(spans: &[Span], styled: bool) -> String {
    spans.iter().map(|span| style_span(span, styled)).collect()
}

fn style_span(span: &Span, styled: bool) -> String {
    let style = span.style;

    if !styled {
        return if style.code { format!("`{}`", span.text) } else { span.text.clone() };
    }

    let mut text = span.text.clone();
    if style.code {
        text = text.dimmed().to_string();
    }
    if style.strong {
        text = text.bold().to_string();
    }
    if style.emphasis {
        text = text.italic().to_string();
    }
    if style.strikethrough {
        text = text.strikethrough().to_string();
    }
    if style.link {
        text = text.underline().to_string();
    }
    text
}

/// Word-wrap text to the configured width with separate first/next prefixes
fn wrap(text: &str, config: &RenderConfig, initial: &str, subsequent: &str) -> Vec<String> {
    let options = Options::new(config.width).initial_indent(initial).subsequent_indent(subsequent);

    textwrap::wrap(text, options).into_iter().map(|line| line.trim_end().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(width: usize) -> RenderConfig {
        RenderConfig::new(width, "  ")
    }

    #[test]
    fn test_paragraph_wraps_within_width() {
        let text = "This is a long line that should be wrapped at a smaller width than the default.";
        let lines = render_markdown(text, &plain(24));

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width() <= 24, "line too wide: {:?}", line);
            assert!(line.starts_with("  "));
        }
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let lines = render_markdown("# Title\n\nBody text.", &plain(80));
        assert_eq!(lines, vec!["  Title", "", "  Body text."]);
    }

    #[test]
    fn test_list_items_are_tight() {
        let lines = render_markdown("- one\n- two\n  - nested", &plain(80));
        assert_eq!(lines, vec!["  • one", "  • two", "    • nested"]);
    }

    #[test]
    fn test_list_item_hanging_indent() {
        let lines = render_markdown("1. alpha beta gamma delta", &plain(14));
        assert_eq!(lines, vec!["  1. alpha", "     beta", "     gamma", "     delta"]);
    }

    #[test]
    fn test_quote_and_code() {
        let lines = render_markdown("> wise words\n\n```\nlet x = 1;\n```", &plain(80));
        assert_eq!(lines, vec!["  │ wise words", "", "      let x = 1;"]);
    }

    #[test]
    fn test_rule_spans_width() {
        let lines = render_markdown("---", &plain(10));
        assert_eq!(lines, vec![format!("  {}", "─".repeat(8))]);
    }

    #[test]
    fn test_table_alignment() {
        let lines = render_markdown("| name | n |\n|---|---|\n| a | 10 |\n", &plain(80));
        assert_eq!(lines, vec!["  name │ n", "  a    │ 10"]);
    }

    #[test]
    fn test_unstyled_output_has_no_escapes() {
        let lines = render_markdown("**bold** and *em* and [link](https://x.y) and `code`", &plain(80));
        assert_eq!(lines, vec!["  bold and em and link and `code`"]);
    }

    #[test]
    fn test_styled_output_uses_ansi() {
        let config = plain(80).styled(true);
        let lines = render_markdown("# Heading\n\n**bold**", &config);
        assert!(lines.iter().all(|l| l.contains('\x1b') || l.is_empty()));
    }

    #[test]
    fn test_styled_wrapping_ignores_escape_width() {
        let config = plain(20).styled(true);
        let lines = render_markdown("**one two three four five six**", &config);
        for line in &lines {
            let visible = crate::sanitize::strip_ansi(line);
            assert!(visible.width() <= 20, "line too wide: {:?}", visible);
        }
    }

    #[test]
    fn test_header_lines() {
        let lines = header_lines("A", "https://example.com/a", &plain(20));
        assert_eq!(lines, vec!["  A".to_string(), "  https://example.com/a".to_string(), format!("  {}", "─".repeat(18))]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let md = "# T\n\nSome *text* here.\n\n- a\n- b";
        assert_eq!(render_markdown(md, &plain(30)), render_markdown(md, &plain(30)));
    }
}
