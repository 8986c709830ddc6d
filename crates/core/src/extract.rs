//! Readable content extraction.
//!
//! Strips page chrome (scripts, navigation, forms, hidden elements) with a
//! streaming rewrite, resolves relative links, then picks the first container
//! that looks like the article body. The returned HTML is free of ANSI escape
//! sequences and sentinel markers.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::sanitize::sanitize;
use crate::{PrecisError, Result};

/// Elements that never carry article text.
const CHROME_SELECTORS: [&str; 14] = [
    "script",
    "style",
    "noscript",
    "iframe",
    "svg",
    "canvas",
    "template",
    "nav",
    "footer",
    "aside",
    "form",
    "button",
    "body > header",
    "[hidden]",
];

/// Containers tried in order when looking for the article body.
const CONTENT_SELECTORS: [&str; 8] = [
    "article",
    "main",
    "[role='main']",
    "#content",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-body",
];

/// Minimum amount of text a container needs to count as the article body.
const MIN_CONTENT_CHARS: usize = 140;

static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("hidden style pattern is valid")
});

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

/// Article content reduced to its readable part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    /// Title from `<title>`, `og:title` or the first `<h1>`.
    pub title: Option<String>,
    /// Sanitized HTML of the article body.
    pub content: String,
}

/// Extracts the readable part of an HTML page.
///
/// `base_url` is used to turn relative links and image sources into
/// absolute ones.
pub fn extract_article(html: &str, base_url: Option<&Url>) -> Result<ExtractedArticle> {
    let cleaned = remove_chrome(html)?;
    let cleaned = match base_url {
        Some(base) => convert_relative_urls(&cleaned, base)?,
        None => cleaned,
    };

    let document = Html::parse_document(&cleaned);
    let title = extract_title(&document);
    let content = select_content(&document).ok_or(PrecisError::NoContent)?;
    let content = sanitize(&content);

    debug!(title = ?title, bytes = content.len(), "extracted article body");

    Ok(ExtractedArticle { title, content })
}

/// Run an lol_html rewrite and collect the output as a string
fn rewrite(html: &str, handlers: Vec<(std::borrow::Cow<'_, lol_html::Selector>, lol_html::ElementContentHandlers<'_>)>) -> Result<String> {
    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings { element_content_handlers: handlers, ..Default::default() },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter.write(html.as_bytes()).map_err(|e| PrecisError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| PrecisError::HtmlParseError(e.to_string()))?;

    String::from_utf8(output).map_err(|e| PrecisError::HtmlParseError(e.to_string()))
}

/// Remove chrome elements, inline-hidden elements and comments
fn remove_chrome(html: &str) -> Result<String> {
    let without_comments = COMMENT.replace_all(html, "");

    let mut handlers: Vec<_> = CHROME_SELECTORS
        .iter()
        .map(|selector| {
            lol_html::element!(*selector, |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();

    handlers.push(lol_html::element!("[aria-hidden='true']", |el| {
        el.remove();
        Ok(())
    }));

    handlers.push(lol_html::element!("[style]", |el| {
        if let Some(style) = el.get_attribute("style")
            && HIDDEN_STYLE.is_match(&style)
        {
            el.remove();
        }
        Ok(())
    }));

    rewrite(&without_comments, handlers)
}

/// Resolve relative `href` and `src` attributes against the page URL
fn convert_relative_urls(html: &str, base_url: &Url) -> Result<String> {
    rewrite(
        html,
        vec![
            lol_html::element!("a[href]", |el| {
                if let Some(href) = el.get_attribute("href")
                    && let Ok(absolute) = base_url.join(&href)
                {
                    el.set_attribute("href", absolute.as_str()).ok();
                }
                Ok(())
            }),
            lol_html::element!("img[src]", |el| {
                if let Some(src) = el.get_attribute("src")
                    && let Ok(absolute) = base_url.join(&src)
                {
                    el.set_attribute("src", absolute.as_str()).ok();
                }
                Ok(())
            }),
        ],
    )
}

/// Extract the page title from `<title>`, `og:title` or the first `<h1>`
fn extract_title(document: &Html) -> Option<String> {
    first_text(document, "title")
        .or_else(|| {
            let selector = Selector::parse("meta[property='og:title']").ok()?;
            let content = document.select(&selector).next()?.value().attr("content")?;
            non_empty(content)
        })
        .or_else(|| first_text(document, "h1"))
        .and_then(|title| non_empty(&sanitize(&title)))
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    non_empty(&element_text(&element))
}

fn non_empty(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() { None } else { Some(collapsed) }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Pick the article container, falling back to the whole body
fn select_content(document: &Html) -> Option<String> {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };

        let best = document
            .select(&selector)
            .map(|el| (text_len(&el), el))
            .filter(|(len, _)| *len >= MIN_CONTENT_CHARS)
            .max_by_key(|(len, _)| *len);

        if let Some((len, element)) = best {
            debug!(selector = selector_str, chars = len, "matched content container");
            return Some(element.inner_html());
        }
    }

    let body = Selector::parse("body").ok()?;
    let element = document.select(&body).next()?;
    if text_len(&element) == 0 { None } else { Some(element.inner_html()) }
}

fn text_len(element: &ElementRef<'_>) -> usize {
    element.text().map(|t| t.trim().chars().count()).sum()
}
