use scraper::{Html, Selector};
use url::Url;

use crate::models::{ContentType, NewItem};

/// Anchors whose trimmed text is this many characters or fewer are
/// treated as navigation noise (icons, "Read more", menu labels) and
/// dropped. Crude, but it is the filter the pipeline is built around:
/// it does not distinguish an event link from any other long label.
const MIN_TITLE_CHARS: usize = 15;

/// Harvest candidate items from a page: every hyperlink with a
/// sufficiently long visible label becomes one `NewItem`, with its href
/// resolved against `base_url`. Malformed markup never fails; the parser
/// simply yields whatever it could make sense of.
pub fn extract_items(base_url: &str, html: &str) -> Vec<NewItem> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for element in document.select(&anchor_sel) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_href(href, base.as_ref()) else {
            continue;
        };

        let title = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if title.chars().count() <= MIN_TITLE_CHARS {
            continue;
        }

        let content_type = classify(&title);
        let tags = derive_tags(&title);

        items.push(NewItem {
            title,
            url: url.into(),
            summary: String::new(),
            source_website: base_url.to_string(),
            content_type,
            venue: None,
            event_date: None,
            tags,
        });
    }
    items
}

/// Resolve an href against the page base, skipping references that can
/// never be harvestable items.
fn resolve_href(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#')
        || lower.starts_with('?')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
    {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}

fn classify(title: &str) -> ContentType {
    let title = title.to_lowercase();
    let event_keywords = ["event", "gig", "concert", "show", "exhibition"];
    if event_keywords.iter().any(|k| title.contains(k)) {
        ContentType::Event
    } else {
        ContentType::Article
    }
}

fn derive_tags(title: &str) -> Vec<String> {
    let title = title.to_lowercase();
    let mut tags = Vec::new();
    if title.contains("music") || title.contains("gig") {
        tags.push("music".to_string());
    }
    if title.contains("art") || title.contains("gallery") {
        tags.push("art".to_string());
    }
    if title.contains("food") || title.contains("restaurant") {
        tags.push("food".to_string());
    }
    if title.contains("theatre") || title.contains("play") {
        tags.push("theatre".to_string());
    }
    tags
}
