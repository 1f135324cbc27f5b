//! Markdown to Help Center HTML.

use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Rendered article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArticle {
    /// Text of the first H1, removed from the body.
    pub title: Option<String>,
    /// HTML body.
    pub html: String,
    /// Local image references in document order, without duplicates.
    pub images: Vec<String>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Render `markdown`, extracting the title and collecting local images.
#[must_use]
pub fn render(markdown: &str) -> RenderedArticle {
    render_with(markdown, &HashMap::new())
}

/// Render `markdown` with image sources replaced from `urls`.
///
/// Keys are image references as they appear in the Markdown; references
/// without an entry are left untouched.
#[must_use]
pub fn render_with(markdown: &str, urls: &HashMap<String, String>) -> RenderedArticle {
    let mut title: Option<String> = None;
    let mut in_title = false;
    let mut images: Vec<String> = Vec::new();
    let mut events = Vec::new();

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if title.is_none() => {
                in_title = true;
                title = Some(String::new());
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_title => {
                in_title = false;
            }
            Event::Text(text) | Event::Code(text) if in_title => {
                if let Some(title) = title.as_mut() {
                    title.push_str(&text);
                }
            }
            _ if in_title => {}
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title: image_title,
                id,
            }) => {
                let dest_url = if is_local(&dest_url) {
                    if !images.iter().any(|i| *i == *dest_url) {
                        images.push(dest_url.to_string());
                    }
                    urls.get(&*dest_url)
                        .map_or(dest_url, |url| CowStr::from(url.clone()))
                } else {
                    dest_url
                };
                events.push(Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title: image_title,
                    id,
                }));
            }
            other => events.push(other),
        }
    }

    let mut body = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut body, events.into_iter());

    RenderedArticle {
        title: title.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()),
        html: body,
        images,
    }
}

/// Whether an image reference points at a file next to the Markdown source.
fn is_local(dest: &str) -> bool {
    let lower = dest.to_ascii_lowercase();
    !(dest.is_empty()
        || dest.starts_with('/')
        || dest.starts_with('#')
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("data:"))
}
