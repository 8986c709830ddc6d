use crate::{PrecisError, Result};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownConfig {
    /// Strip images from output
    pub strip_images: bool,
    /// Append a numbered list of every link in the article
    pub include_references: bool,
}

/// A collected link reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    /// The link text
    pub text: String,
    /// The link URL
    pub url: String,
}

/// Convert sanitized article HTML to Markdown
pub fn to_markdown(html: &str, config: &MarkdownConfig) -> Result<String> {
    let processed_html = if config.strip_images { strip_images(html)? } else { html.to_string() };

    let mut output = htmd::convert(&processed_html).map_err(|e| PrecisError::ConversionError(e.to_string()))?;

    if config.include_references {
        let links = extract_links(&processed_html);
        if !links.is_empty() {
            output.push_str("\n\n## References\n\n");
            output.push_str(&generate_reference_list(&links));
        }
    }

    Ok(output)
}

/// Strip all img tags from HTML
fn strip_images(html: &str) -> Result<String> {
    let mut output = Vec::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("img", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("picture", |el| {
                    el.remove();
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter.write(html.as_bytes()).map_err(|e| PrecisError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| PrecisError::HtmlParseError(e.to_string()))?;

    String::from_utf8(output).map_err(|e| PrecisError::HtmlParseError(e.to_string()))
}

/// Extract all links with text from HTML content, first occurrence wins
pub fn extract_links(html: &str) -> Vec<LinkReference> {
    let document = Html::parse_fragment(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let mut links = Vec::new();
    let mut seen_urls = HashSet::new();

    for element in document.select(&selector) {
        let text = element.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let url = match element.value().attr("href") {
            Some(u) => u.trim().to_string(),
            None => continue,
        };

        if text.is_empty() || url.is_empty() || url.starts_with('#') {
            continue;
        }

        if seen_urls.insert(url.clone()) {
            links.push(LinkReference { text, url });
        }
    }

    links
}

/// Generate a numbered Markdown list from collected links
fn generate_reference_list(links: &[LinkReference]) -> String {
    links
        .iter()
        .enumerate()
        .map(|(i, link)| format!("{}. {}: {}\n", i + 1, escape_brackets(&link.text), link.url))
        .collect()
}

/// Escape characters that would turn reference text into Markdown links
fn escape_brackets(s: &str) -> String {
    s.replace('[', "\\[").replace(']', "\\]")
}
