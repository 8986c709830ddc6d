use owo_colors::OwoColorize;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::document::Visibility;
use crate::markers::{marker_for, split_marker};
use crate::sanitize::strip_ansi;

static CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(?:\d+|citation needed)\]").unwrap());
/// Lettered footnotes only count after punctuation, so `arr[i]` survives
static NOTE_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"([.,;:!?)\]"'])\[[a-z]\]"#).unwrap());
static EDIT_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\[edit\]").unwrap());
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s\x1b<>\)\]]+").unwrap());

/// Lines that carry nothing but site chrome left over after extraction
const CHROME_LINES: &[&str] = &[
    "advertisement",
    "skip to content",
    "skip to main content",
    "share this article",
    "share on facebook",
    "share on twitter",
    "share on x",
    "subscribe to our newsletter",
    "sign up for our newsletter",
    "sponsored content",
];

/// Configuration for document post-processing
#[derive(Debug, Clone, Default)]
pub struct PostprocessConfig {
    /// Underline bare URLs and dim the ones pointing to other hosts
    pub styled: bool,
}

/// Clean up an encoded document line by line
///
/// Each line's visibility marker is split off before any rewrite and put back
/// afterwards, so the visibility of every kept line is unchanged. The final
/// line is never dropped and never gains a marker.
pub fn postprocess(document: &str, source_url: &str, config: &PostprocessConfig) -> String {
    let source_host = Url::parse(source_url).ok().and_then(|url| url.host_str().map(str::to_string));
    let wikipedia = source_host.as_deref().is_some_and(is_wikipedia_host);
    let lines: Vec<&str> = document.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut previous_blank: Option<Visibility> = None;

    for (i, line) in lines.iter().enumerate() {
        let (text, visibility) = split_marker(line);
        let mut text = text.to_string();

        if wikipedia {
            text = strip_wikipedia_noise(&text);
        }
        text.truncate(text.trim_end().len());

        if i != last {
            if is_chrome_line(&text) {
                continue;
            }

            let blank = strip_ansi(&text).trim().is_empty();
            if blank && previous_blank == Some(visibility) {
                continue;
            }
            previous_blank = if blank { Some(visibility) } else { None };
        }

        if config.styled {
            text = style_urls(&text, source_host.as_deref());
        }

        if i != last
            && let Some(marker) = marker_for(visibility)
        {
            text.push(marker);
        }
        output.push(text);
    }

    output.join("\n")
}

fn is_wikipedia_host(host: &str) -> bool {
    host == "wikipedia.org" || host.ends_with(".wikipedia.org")
}

/// Remove citation markers and section edit links
fn strip_wikipedia_noise(text: &str) -> String {
    let text = EDIT_LINK.replace_all(text, "");
    let text = NOTE_LETTER.replace_all(&text, "$1");
    CITATION.replace_all(&text, "").into_owned()
}

fn is_chrome_line(text: &str) -> bool {
    let plain = strip_ansi(text);
    let plain = plain.trim().trim_end_matches(['.', ':']).to_ascii_lowercase();
    CHROME_LINES.contains(&plain.as_str())
}

/// Underline bare URLs; links to another host are also dimmed
fn style_urls(text: &str, source_host: Option<&str>) -> String {
    BARE_URL
        .replace_all(text, |caps: &regex::Captures| {
            let url = &caps[0];
            let host = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string));
            if host.is_some() && host.as_deref() != source_host {
                url.underline().dimmed().to_string()
            } else {
                url.underline().to_string()
            }
        })
        .into_owned()
}
