//! Reduce feed-supplied HTML to a small attribute-free subset.

use ego_tree::NodeRef;
use html_escape::encode_text;
use scraper::{Html, Node};

/// Dropped together with everything inside them
const REMOVE_TAGS: &[&str] = &[
    "script", "style", "img", "video", "iframe", "svg", "noscript", "link", "meta",
    "figure", "figcaption", "form", "input", "button",
];

/// Replaced by their children. Links keep their text, not their target.
/// A template's children sit in its content fragment.
const UNWRAP_TAGS: &[&str] = &["div", "span", "a", "template"];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Sanitize a raw HTML fragment for display.
///
/// Never fails: malformed markup is recovered by the HTML5 parser. The output
/// escapes every `"`, so feeding it back in is not a no-op when quotes are
/// present; sanitize raw input exactly once.
pub fn sanitize(raw_html: &str) -> String {
    let fragment = Html::parse_fragment(raw_html);

    let mut out = String::with_capacity(raw_html.len());
    write_children(*fragment.root_element(), &mut out);

    normalize_text(&out)
}

fn write_children(parent: NodeRef<'_, Node>, out: &mut String) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&encode_text(&**text)),
            Node::Fragment => write_children(child, out),
            Node::Element(element) => {
                let name = element.name();
                if REMOVE_TAGS.contains(&name) {
                    continue;
                }

                if UNWRAP_TAGS.contains(&name) {
                    write_children(child, out);
                    continue;
                }

                // Attributes are never written
                out.push('<');
                out.push_str(name);
                out.push('>');

                if VOID_TAGS.contains(&name) {
                    continue;
                }

                write_children(child, out);
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            // comments, doctypes, processing instructions
            _ => {}
        }
    }
}

/// Non-breaking spaces become spaces, smart quotes become ASCII, then every
/// `"` is escaped.
fn normalize_text(html: &str) -> String {
    html.replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .replace(|c: char| matches!(c, '\u{201c}' | '\u{201d}'), "\"")
        .replace(|c: char| matches!(c, '\u{2018}' | '\u{2019}'), "'")
        .replace('"', "&quot;")
}
