//! Markdown to HTML with highlighted code blocks.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use rw_highlight::{EngineFactory, HighlightError, Highlighter, render_html};

use crate::fence::split_fence_info;

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Number of code blocks passed through the highlighter.
    pub code_blocks: usize,
}

/// Markdown rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A code block could not be highlighted.
    #[error("Code block highlighting failed: {0}")]
    Highlight(#[from] HighlightError),
}

/// Code block captured between its start and end events.
struct PendingBlock {
    language: Option<String>,
    directive: String,
    text: String,
}

impl PendingBlock {
    fn new(kind: &CodeBlockKind<'_>) -> Self {
        let (language, directive) = match kind {
            CodeBlockKind::Fenced(info) => split_fence_info(info),
            CodeBlockKind::Indented => (None, ""),
        };
        Self {
            language: language.map(str::to_owned),
            directive: directive.to_owned(),
            text: String::new(),
        }
    }

    /// Block text without the newline that closes the last line.
    fn source(&self) -> &str {
        self.text.strip_suffix('\n').unwrap_or(&self.text)
    }
}

/// Markdown renderer that replaces code blocks with highlighted markup.
///
/// Everything except code blocks is rendered by pulldown-cmark's HTML writer.
pub struct MarkdownRenderer<'h, F: EngineFactory> {
    highlighter: &'h Highlighter<F>,
    gfm: bool,
}

impl<'h, F: EngineFactory> MarkdownRenderer<'h, F> {
    /// Create a renderer with GFM enabled.
    pub fn new(highlighter: &'h Highlighter<F>) -> Self {
        Self {
            highlighter,
            gfm: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// When enabled the parser supports tables, strikethrough and task lists.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Parser options for the GFM setting.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render `markdown` to HTML.
    ///
    /// # Errors
    ///
    /// Fails when the highlighting engine cannot be built or used.
    pub async fn render(&self, markdown: &str) -> Result<RenderResult, RenderError> {
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, self.parser_options()).collect();
        let mut output = Vec::with_capacity(events.len());
        let mut pending: Option<PendingBlock> = None;
        let mut code_blocks = 0;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => pending = Some(PendingBlock::new(&kind)),
                Event::End(TagEnd::CodeBlock) => {
                    let Some(block) = pending.take() else {
                        continue;
                    };
                    let roots = self
                        .highlighter
                        .highlight_str(block.source(), block.language.as_deref(), &block.directive)
                        .await?;
                    tracing::debug!(
                        language = block.language.as_deref().unwrap_or_default(),
                        roots = roots.len(),
                        "Highlighted code block"
                    );
                    output.push(Event::Html(CowStr::from(render_html(&roots))));
                    code_blocks += 1;
                }
                Event::Text(text) => match pending.as_mut() {
                    Some(block) => block.text.push_str(&text),
                    None => output.push(Event::Text(text)),
                },
                other => output.push(other),
            }
        }

        let mut html = String::with_capacity(markdown.len() * 2);
        pulldown_cmark::html::push_html(&mut html, output.into_iter());

        Ok(RenderResult { html, code_blocks })
    }
}

/// Render `markdown` with GFM enabled.
///
/// # Errors
///
/// Fails when the highlighting engine cannot be built or used.
pub async fn render_markdown<F: EngineFactory>(
    highlighter: &Highlighter<F>,
    markdown: &str,
) -> Result<RenderResult, RenderError> {
    MarkdownRenderer::new(highlighter).render(markdown).await
}
