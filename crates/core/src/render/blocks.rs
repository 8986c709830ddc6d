//! Markdown to block conversion.
//!
//! Flattens the pulldown-cmark event stream into a list of terminal blocks.
//! Inline formatting survives as styled spans; nesting is reduced to what a
//! line-oriented renderer needs (list depth, quote membership).

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Inline formatting active for a span of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: bool,
}

/// A run of text with a single inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: SpanStyle::default() }
    }
}

/// A block-level element of a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    /// A list item; `bullet` is empty for continuation paragraphs of the same item.
    ListItem { depth: usize, bullet: String, spans: Vec<Span> },
    Quote(Vec<Span>),
    Code { language: Option<String>, text: String },
    Rule,
    Table(Vec<Vec<String>>),
}

/// Concatenate span text without any styling
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

struct ListState {
    next_number: Option<u64>,
}

struct ItemState {
    depth: usize,
    bullet: String,
    emitted: bool,
}

#[derive(Default)]
struct BlockParser {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
    link: usize,
    heading: Option<u8>,
    quote_depth: usize,
    lists: Vec<ListState>,
    items: Vec<ItemState>,
    code: Option<(Option<String>, String)>,
    table: Option<Vec<Vec<String>>>,
    row: Vec<String>,
}

impl BlockParser {
    fn style(&self) -> SpanStyle {
        SpanStyle {
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code: false,
            link: self.link > 0,
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, code)) = self.code.as_mut() {
            code.push_str(text);
            return;
        }

        let style = self.style();
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.spans.push(Span { text: text.to_string(), style }),
        }
    }

    fn push_code(&mut self, code: &str) {
        let style = SpanStyle { code: true, ..self.style() };
        self.spans.push(Span { text: code.to_string(), style });
    }

    /// Turn buffered inline content into a block appropriate for the context
    fn flush(&mut self) {
        if self.spans.iter().all(|s| s.text.trim().is_empty()) {
            self.spans.clear();
            return;
        }

        let mut spans = std::mem::take(&mut self.spans);
        trim_spans(&mut spans);

        let block = if let Some(level) = self.heading {
            Block::Heading { level, spans }
        } else if let Some(item) = self.items.last_mut() {
            let bullet = if item.emitted { String::new() } else { item.bullet.clone() };
            item.emitted = true;
            Block::ListItem { depth: item.depth, bullet, spans }
        } else if self.quote_depth > 0 {
            Block::Quote(spans)
        } else {
            Block::Paragraph(spans)
        };

        self.blocks.push(block);
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(level as u8);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(ListState { next_number: start });
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let bullet = match self.lists.last_mut() {
                    Some(ListState { next_number: Some(n) }) => {
                        let bullet = format!("{}.", n);
                        *n += 1;
                        bullet
                    }
                    _ => "•".to_string(),
                };
                self.items.push(ItemState { depth, bullet, emitted: false });
            }
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { .. } => self.link += 1,
            Tag::Image { .. } => self.push_text("[Image: "),
            Tag::Table(_) => {
                self.flush();
                self.table = Some(Vec::new());
            }
            Tag::TableHead | Tag::TableRow => self.row.clear(),
            Tag::TableCell => self.spans.clear(),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush(),
            TagEnd::Heading(_) => {
                self.flush();
                self.heading = None;
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                if let Some((language, text)) = self.code.take() {
                    let text = text.trim_end_matches('\n').to_string();
                    self.blocks.push(Block::Code { language, text });
                }
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Item => {
                self.flush();
                self.items.pop();
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => self.link = self.link.saturating_sub(1),
            TagEnd::Image => self.push_text("]"),
            TagEnd::TableCell => {
                let cell = plain_text(&self.spans).trim().to_string();
                self.spans.clear();
                self.row.push(cell);
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                let row = std::mem::take(&mut self.row);
                if let Some(table) = self.table.as_mut() {
                    table.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(rows) = self.table.take()
                    && !rows.is_empty()
                {
                    self.blocks.push(Block::Table(rows));
                }
            }
            _ => {}
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.push_code(&code),
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.push_text("\n"),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            Event::TaskListMarker(checked) => self.push_text(if checked { "[x] " } else { "[ ] " }),
            Event::FootnoteReference(name) => self.push_text(&format!("[^{}]", name)),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.push_text(&math),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// Remove leading whitespace of the first span and trailing whitespace of the last
fn trim_spans(spans: &mut Vec<Span>) {
    if let Some(first) = spans.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = spans.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
    spans.retain(|s| !s.text.is_empty());
}

/// Parse Markdown text into terminal blocks
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut parser = BlockParser::default();

    for event in Parser::new_ext(markdown, options) {
        parser.event(event);
    }

    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = parse_blocks("# AI Summary\n\nShort summary.\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 1, spans: vec![Span::plain("AI Summary")] },
                Block::Paragraph(vec![Span::plain("Short summary.")]),
            ]
        );
    }

    #[test]
    fn test_inline_styles() {
        let blocks = parse_blocks("**Error generating summary:** quota exceeded");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph, got {:?}", blocks[0]);
        };
        assert!(spans[0].style.strong);
        assert_eq!(spans[0].text, "Error generating summary:");
        assert_eq!(plain_text(spans), "Error generating summary: quota exceeded");
    }

    #[test]
    fn test_link_and_code_spans() {
        let blocks = parse_blocks("Read [the docs](https://example.com) and run `cargo doc`.");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(spans.iter().any(|s| s.style.link && s.text == "the docs"));
        assert!(spans.iter().any(|s| s.style.code && s.text == "cargo doc"));
    }

    #[test]
    fn test_nested_lists() {
        let blocks = parse_blocks("- one\n  - nested\n- two\n\n1. first\n2. second\n");
        assert_eq!(
            blocks,
            vec![
                Block::ListItem { depth: 0, bullet: "•".into(), spans: vec![Span::plain("one")] },
                Block::ListItem { depth: 1, bullet: "•".into(), spans: vec![Span::plain("nested")] },
                Block::ListItem { depth: 0, bullet: "•".into(), spans: vec![Span::plain("two")] },
                Block::ListItem { depth: 0, bullet: "1.".into(), spans: vec![Span::plain("first")] },
                Block::ListItem { depth: 0, bullet: "2.".into(), spans: vec![Span::plain("second")] },
            ]
        );
    }

    #[test]
    fn test_quote_code_and_rule() {
        let blocks = parse_blocks("> quoted text\n\n```rust\nfn main() {}\n```\n\n---\n");
        assert_eq!(
            blocks,
            vec![
                Block::Quote(vec![Span::plain("quoted text")]),
                Block::Code { language: Some("rust".into()), text: "fn main() {}".into() },
                Block::Rule,
            ]
        );
    }

    #[test]
    fn test_table_rows() {
        let blocks = parse_blocks("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert_eq!(blocks, vec![Block::Table(vec![vec!["a".into(), "b".into()], vec!["1".into(), "2".into()]])]);
    }

    #[test]
    fn test_image_alt_text() {
        let blocks = parse_blocks("![A photo](photo.jpg)");
        assert_eq!(blocks, vec![Block::Paragraph(vec![Span::plain("[Image: A photo]")])]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_blocks("").is_empty());
        assert!(parse_blocks("\n\n   \n").is_empty());
    }
}
