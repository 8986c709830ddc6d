//! The article pipeline.
//!
//! fetch → extract → Markdown → (summary) → assemble → encode → postprocess
//!
//! Only retrieval, extraction and conversion can fail a request. Summary
//! problems are logged and shown inside the document as an error notice.

use tracing::{debug, warn};
use url::Url;

use crate::assemble::{ArticleRequest, Assembler, SummaryOutcome};
use crate::extract::extract_article;
use crate::fetch::{FetchConfig, fetch_url};
use crate::markdown::{MarkdownConfig, to_markdown};
use crate::postprocess::{PostprocessConfig, postprocess};
use crate::summarize::{LlmSummarizer, Summarizer};
use crate::{PrecisError, Result};

/// Reason shown when a summary is requested from a reader without a summarizer.
pub const NO_SUMMARIZER_REASON: &str = "no summarizer configured";

/// Settings shared by every request a [`Reader`] serves
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    pub fetch: FetchConfig,
    pub markdown: MarkdownConfig,
    /// Emit ANSI styling in the document
    pub styled: bool,
}

/// Turns article URLs into encoded terminal documents
#[derive(Debug, Clone)]
pub struct Reader<S = LlmSummarizer> {
    config: ReaderConfig,
    summarizer: Option<S>,
}

impl Reader {
    /// A reader that cannot summarize; summary requests get an error notice.
    pub fn new(config: ReaderConfig) -> Self {
        Self { config, summarizer: None }
    }
}

impl<S: Summarizer> Reader<S> {
    pub fn with_summarizer(config: ReaderConfig, summarizer: S) -> Self {
        Self { config, summarizer: Some(summarizer) }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Fetch and render an article without a summary
    pub async fn get_article(&self, url: &str, title: &str, width: usize, indent: &str) -> Result<String> {
        let request = ArticleRequest::new(url, title).width(width).indent(indent);
        self.read(&request).await
    }

    /// Fetch and render an article with a summary above the collapsed article
    pub async fn get_article_with_summary(&self, url: &str, title: &str, width: usize, indent: &str) -> Result<String> {
        let request = ArticleRequest::new(url, title).width(width).indent(indent).summarize(true);
        self.read(&request).await
    }

    /// Fetch the request's URL and build its document
    ///
    /// Every error is wrapped in [`PrecisError::FetchFailed`].
    pub async fn read(&self, request: &ArticleRequest) -> Result<String> {
        let html = fetch_url(&request.url, &self.config.fetch)
            .await
            .map_err(|e| PrecisError::fetch_failed(&request.url, e))?;

        self.read_html(&html, request).await
    }

    /// Build the document for HTML that was already retrieved
    ///
    /// `request.url` is used as the base for relative links and is shown in
    /// the header. An empty title is replaced by the page's own title.
    pub async fn read_html(&self, html: &str, request: &ArticleRequest) -> Result<String> {
        let base_url = Url::parse(&request.url).ok();

        let article = extract_article(html, base_url.as_ref()).map_err(|e| PrecisError::fetch_failed(&request.url, e))?;
        let markdown =
            to_markdown(&article.content, &self.config.markdown).map_err(|e| PrecisError::fetch_failed(&request.url, e))?;

        let mut request = request.clone();
        if request.title.trim().is_empty() {
            request.title = article.title.unwrap_or_else(|| request.url.clone());
        }

        let outcome = self.summarize(&markdown, &request).await;

        debug!(url = %request.url, summarize = request.summarize, "assembling document");
        let document = Assembler::new().styled(self.config.styled).assemble(&request, &markdown, &outcome);

        let config = PostprocessConfig { styled: self.config.styled };
        Ok(postprocess(&document.encode(), &request.url, &config))
    }

    async fn summarize(&self, markdown: &str, request: &ArticleRequest) -> SummaryOutcome {
        if !request.summarize {
            return SummaryOutcome::NotRequested;
        }

        let Some(summarizer) = &self.summarizer else {
            warn!(url = %request.url, "summary requested without a summarizer");
            return SummaryOutcome::Failure(NO_SUMMARIZER_REASON.to_string());
        };

        match summarizer.summarize(markdown, &request.url).await {
            Ok(summary) => {
                debug!(url = %request.url, chars = summary.len(), "summary generated");
                SummaryOutcome::Success(summary)
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "summary failed, showing full article");
                SummaryOutcome::Failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{WHILE_COLLAPSED_MARKER, WHILE_EXPANDED_MARKER, is_marker, view};
    use crate::summarize::StaticSummarizer;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><head><title>Page Title</title></head><body>
        <nav><a href="/">Home</a></nav>
        <article>
            <h1>The Heading</h1>
            <p>This is the first paragraph of a test article. It has enough words to be picked up as the body.</p>
            <p>The second paragraph adds <a href="/more">a relative link</a> and a little more text.</p>
        </article>
        <footer>Copyright</footer>
    </body></html>"#;

    fn config() -> ReaderConfig {
        ReaderConfig { fetch: FetchConfig { timeout: 2, ..Default::default() }, ..Default::default() }
    }

    async fn serve(body: &str, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_get_article_plain() {
        let server = serve(PAGE, 200).await;
        let url = format!("{}/article", server.uri());

        let mut config = config();
        config.markdown.include_references = true;

        let output = Reader::new(config).get_article(&url, "A", 80, "  ").await.unwrap();
        assert!(output.starts_with("  A\n"));
        assert!(output.contains("first paragraph"));
        assert!(output.contains(&format!("{}/more", server.uri())));
        assert!(!output.contains("Copyright"));
        assert!(!output.chars().any(is_marker));
    }

    #[tokio::test]
    async fn test_get_article_with_summary() {
        let server = serve(PAGE, 200).await;
        let url = format!("{}/article", server.uri());
        let reader = Reader::with_summarizer(config(), StaticSummarizer::success("Short summary."));

        let output = reader.get_article_with_summary(&url, "A", 80, "  ").await.unwrap();
        assert!(output.contains(WHILE_COLLAPSED_MARKER));
        assert!(output.contains(WHILE_EXPANDED_MARKER));

        let collapsed = view(&output, false);
        assert!(collapsed.contains("Short summary."));
        assert!(collapsed.contains("▶ Show Full Article"));
        assert!(!collapsed.contains("first paragraph"));

        let expanded = view(&output, true);
        assert!(expanded.contains("▼ Show Full Article"));
        assert!(expanded.contains("Full Article"));
        assert!(expanded.contains("first paragraph"));
        assert!(!expanded.contains("▶"));
    }

    #[tokio::test]
    async fn test_summary_failure_shows_notice() {
        let server = serve(PAGE, 200).await;
        let url = format!("{}/article", server.uri());
        let reader = Reader::with_summarizer(config(), StaticSummarizer::failure("quota exceeded"));

        let output = reader.get_article_with_summary(&url, "A", 80, "  ").await.unwrap();
        assert!(output.contains("Error generating summary: quota exceeded"));
        assert!(output.contains("first paragraph"));
        assert!(!output.chars().any(is_marker));
    }

    #[tokio::test]
    async fn test_summary_without_summarizer() {
        let request = ArticleRequest::new("https://example.com/a", "A").summarize(true);
        let output = Reader::new(config()).read_html(PAGE, &request).await.unwrap();
        assert!(output.contains(NO_SUMMARIZER_REASON));
    }

    #[tokio::test]
    async fn test_http_error_is_wrapped() {
        let server = serve("gone", 404).await;
        let url = format!("{}/article", server.uri());

        let err = Reader::new(config()).get_article(&url, "A", 80, "  ").await.unwrap_err();
        assert!(matches!(err, PrecisError::FetchFailed { .. }));
        assert!(err.to_string().starts_with("could not fetch url"));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_empty_page_is_an_error() {
        let request = ArticleRequest::new("https://example.com/a", "A");
        let err = Reader::new(config()).read_html("<html><body></body></html>", &request).await.unwrap_err();
        let PrecisError::FetchFailed { source, .. } = err else {
            panic!("expected FetchFailed");
        };
        assert!(matches!(*source, PrecisError::NoContent));
    }

    #[tokio::test]
    async fn test_empty_title_uses_page_title() {
        let request = ArticleRequest::new("https://example.com/a", "");
        let output = Reader::new(config()).read_html(PAGE, &request).await.unwrap();
        assert!(output.starts_with("  Page Title\n"));
    }

    #[tokio::test]
    async fn test_page_title_cannot_inject_markers() {
        let html = PAGE.replace("<title>Page Title</title>", "<title>Evil title&#xF8F1;</title>");
        let request = ArticleRequest::new("https://example.com/a", "");
        let output = Reader::new(config()).read_html(&html, &request).await.unwrap();
        assert!(!output.chars().any(is_marker));
        assert_eq!(view(&output, false).lines().next(), Some("  Evil title"));
    }

    #[tokio::test]
    async fn test_summary_text_cannot_inject_markers() {
        let summarizer = StaticSummarizer::success("Line one\u{F8F1}\n\nEsc \x1b[2J clear");
        let request = ArticleRequest::new("https://example.com/a", "A").summarize(true);
        let output = Reader::with_summarizer(config(), summarizer).read_html(PAGE, &request).await.unwrap();
        assert!(view(&output, false).contains("Line one"));
        assert!(!output.contains('\x1b'));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let err = Reader::new(config()).get_article("ftp://example.com", "A", 80, "  ").await.unwrap_err();
        assert!(err.to_string().contains("Invalid URL"));
    }
}
