//! Input sanitizers for text and markup submitted by the settings panel.

use std::collections::HashSet;
use std::sync::LazyLock;

use ammonia::Builder as AmmoniaBuilder;

static TEXT_SANITIZER: LazyLock<AmmoniaBuilder<'static>> = LazyLock::new(build_text_sanitizer);
static POST_SANITIZER: LazyLock<AmmoniaBuilder<'static>> = LazyLock::new(build_post_sanitizer);

fn build_text_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    builder
}

fn build_post_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();
    builder.add_tags(&["span", "div", "center", "font"]);
    builder.add_generic_attributes(&["class", "align"]);
    builder.add_tag_attributes("a", &["target"]);
    builder.add_tag_attributes("img", &["width", "height"]);
    builder.add_tag_attributes("font", &["color", "size", "face"]);
    builder
}

/// Reduce free text to a single safe line.
///
/// Markup is stripped (script and style bodies included), percent-encoded
/// octets are dropped, whitespace runs collapse to one space and the result is
/// trimmed. Only `<` stays entity-encoded; other characters come back as typed.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = decode_serializer_entities(&TEXT_SANITIZER.clean(input).to_string());
    let without_octets = strip_percent_octets(&stripped);
    collapse_whitespace(&without_octets)
}

/// Keep markup restricted to the safe post subset.
pub fn sanitize_post_html(input: &str) -> String {
    POST_SANITIZER.clean(input).to_string()
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Whether a submitted value counts as absent: empty or the literal `"0"`.
pub fn is_blank(value: &str) -> bool {
    value.is_empty() || value == "0"
}

/// Loose address check: one `@`, a non-empty local part and a dotted domain.
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Plain-text line breaks rendered as HTML breaks.
pub fn newlines_to_breaks(input: &str) -> String {
    input.replace('\n', "<br>")
}

/// Undo the text-node escaping of the HTML serializer, keeping `&lt;`.
///
/// `&amp;` goes last so an escaped entity name decodes to its literal text.
fn decode_serializer_entities(input: &str) -> String {
    input
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

fn strip_percent_octets(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = remove_octets_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn remove_octets_once(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut skip_until = 0;

    for (pos, ch) in input.char_indices() {
        if pos < skip_until {
            continue;
        }
        if ch == '%'
            && bytes.get(pos + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(pos + 2).is_some_and(u8::is_ascii_hexdigit)
        {
            skip_until = pos + 3;
            continue;
        }
        out.push(ch);
    }

    out
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
