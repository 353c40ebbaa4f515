use crate::feed::RawEntry;

pub const NO_CONTENT: &str = "<p>No content available.</p>";

const HTML_MIME: &str = "text/html";

/// Best body for an entry: the first `text/html` content, then the summary,
/// then a fixed placeholder.
pub fn extract_body(entry: &RawEntry) -> String {
    entry
        .content
        .iter()
        .find(|variant| variant.mime_type == HTML_MIME)
        .map(|variant| variant.value.clone())
        .or_else(|| entry.summary.clone())
        .unwrap_or_else(|| NO_CONTENT.to_string())
}
