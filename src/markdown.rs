//! Markdown rendering for chat messages
//!
//! Model replies are Markdown. They are rendered to HTML server-side so the
//! page can insert them directly. Raw HTML in the source is never passed
//! through: it is emitted as escaped text. Link and image destinations are
//! kept only for web and mail schemes or relative URLs.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Render Markdown to an HTML fragment with embedded HTML escaped
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_destination(dest_url, "#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_destination(dest_url, ""),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Keep `url` when it is relative or uses an allowed scheme
fn safe_destination<'a>(url: CowStr<'a>, replacement: &'static str) -> CowStr<'a> {
    if is_safe_url(&url) {
        url
    } else {
        tracing::debug!(url = &*url, "Dropped link with disallowed scheme");
        CowStr::Borrowed(replacement)
    }
}

fn is_safe_url(url: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();
    match cleaned.split_once(':') {
        Some((scheme, _)) if !scheme.contains(['/', '?', '#']) => ALLOWED_SCHEMES
            .iter()
            .any(|allowed| scheme.eq_ignore_ascii_case(allowed)),
        _ => true,
    }
}
