//! Markdown to HTML rendering.

use std::fmt;

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

/// Parser options shared by the renderer and the front matter extractor.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_FOOTNOTES | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// HTML produced by the Markdown renderer.
///
/// Templates insert this value verbatim. Every other template variable is
/// escaped, so this type marks the one place where markup is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Wrap markup that is known to come from the renderer.
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CommonMark renderer with footnotes, figures and hard line breaks.
///
/// The front matter block of a document is skipped on output, so the whole
/// post source can be passed to [`MarkdownRenderer::render`].
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a renderer with the blog's parser configuration.
    pub fn new() -> Self {
        Self {
            options: parser_options(),
        }
    }

    /// Render a Markdown document to HTML.
    pub fn render(&self, source: &str) -> TrustedHtml {
        let events: Vec<Event<'_>> = Parser::new_ext(source, self.options)
            .map(|event| match event {
                Event::SoftBreak => Event::HardBreak,
                other => other,
            })
            .collect();

        let mut html_output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut html_output, wrap_figures(events).into_iter());

        TrustedHtml(html_output)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn paragraphs that hold a single image into `<figure>` blocks.
///
/// The image's alt text is repeated as the `<figcaption>`.
fn wrap_figures(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;

    while i < events.len() {
        if matches!(events[i], Event::Start(Tag::Paragraph)) {
            if let Some(close) = lone_image(&events, i) {
                let image = &events[i + 1..close];
                let caption = caption_text(image);

                out.push(Event::Html("<figure>".into()));
                out.extend(image.iter().cloned());
                if !caption.is_empty() {
                    out.push(Event::Html("<figcaption>".into()));
                    out.push(Event::Text(caption.into()));
                    out.push(Event::Html("</figcaption>".into()));
                }
                out.push(Event::Html("</figure>\n".into()));

                i = close + 1;
                continue;
            }
        }

        out.push(events[i].clone());
        i += 1;
    }

    out
}

/// Index of the closing paragraph event if the paragraph opened at `start`
/// contains exactly one image and nothing else.
fn lone_image(events: &[Event<'_>], start: usize) -> Option<usize> {
    if !matches!(events.get(start + 1), Some(Event::Start(Tag::Image { .. }))) {
        return None;
    }

    let mut depth = 0usize;
    for (offset, event) in events[start + 1..].iter().enumerate() {
        match event {
            Event::Start(Tag::Image { .. }) => depth += 1,
            Event::End(TagEnd::Image) => {
                depth -= 1;
                if depth == 0 {
                    let close = start + offset + 2;
                    return matches!(events.get(close), Some(Event::End(TagEnd::Paragraph)))
                        .then_some(close);
                }
            }
            _ => {}
        }
    }

    None
}

fn caption_text(image: &[Event<'_>]) -> String {
    image
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) | Event::Code(text) => Some(&**text),
            _ => None,
        })
        .collect()
}
