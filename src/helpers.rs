use crate::ast::{Attribute, AttributeValueChild, Element, Node};
use aho_corasick::AhoCorasick;
use std::{borrow::Cow, sync::LazyLock};

static INLINE_TAGS: [&str; 32] = [
    "a", "abbr", "acronym", "b", "bdo", "big", "br", "button", "cite", "code", "dfn", "em", "i",
    "img", "input", "kbd", "label", "map", "object", "output", "q", "samp", "select", "small",
    "span", "strong", "sub", "sup", "textarea", "time", "tt", "var",
];

static CASE_INSENSITIVE_ATTRIBUTES: [&str; 2] = ["id", "class"];

pub(crate) fn is_inline_tag(name: &str) -> bool {
    INLINE_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

pub(crate) fn is_case_insensitive_attribute(name: &str) -> bool {
    CASE_INSENSITIVE_ATTRIBUTES
        .iter()
        .any(|attr| attr.eq_ignore_ascii_case(name))
}

pub(crate) fn lowercased(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::from(name.to_ascii_lowercase())
    } else {
        Cow::from(name)
    }
}

pub(crate) fn is_inline(node: &Node) -> bool {
    match node {
        Node::Text(_) => true,
        Node::Element(element) => is_inline_tag(element.open_tag.tag_name),
        _ => false,
    }
}

pub(crate) fn is_br_tag(node: &Node) -> bool {
    matches!(node, Node::Element(element) if element.open_tag.tag_name.eq_ignore_ascii_case("br"))
}

pub(crate) fn is_pre_element(element: &Element) -> bool {
    element.open_tag.tag_name.eq_ignore_ascii_case("pre")
}

pub(crate) fn is_blank(node: &Node) -> bool {
    matches!(
        node,
        Node::Text(text) if !text.raw.is_empty()
            && text.raw.bytes().all(|b| b.is_ascii_whitespace())
    )
}

pub(crate) fn starts_with_whitespace(node: &Node) -> bool {
    matches!(node, Node::Text(text) if text.raw.starts_with(|c: char| c.is_ascii_whitespace()))
}

pub(crate) fn ends_with_whitespace(node: &Node) -> bool {
    matches!(node, Node::Text(text) if text.raw.ends_with(|c: char| c.is_ascii_whitespace()))
}

/// The text opens with a blank line: a line break followed by only
/// whitespace up to another line break.
pub(crate) fn starts_with_blank_line(node: &Node) -> bool {
    let Node::Text(text) = node else {
        return false;
    };
    let Some(rest) = text.raw.strip_prefix('\n') else {
        return false;
    };
    rest.chars()
        .take_while(|c| c.is_ascii_whitespace())
        .any(|c| c == '\n')
}

pub(crate) fn ends_with_blank_line(node: &Node) -> bool {
    let Node::Text(text) = node else {
        return false;
    };
    let Some(rest) = text.raw.strip_suffix('\n') else {
        return false;
    };
    rest.chars()
        .rev()
        .take_while(|c| c.is_ascii_whitespace())
        .any(|c| c == '\n')
}

pub(crate) fn has_line_break(s: &str) -> bool {
    memchr::memchr(b'\n', s.as_bytes()).is_some()
}

/// How an attribute value resolves when read statically.
pub(crate) enum AttributeLookup<'s> {
    Literal(&'s str),
    Dynamic,
    Absent,
}

pub(crate) fn tag_attribute<'s>(element: &Element<'s>, name: &str) -> AttributeLookup<'s> {
    let attribute = element.open_tag.attrs.iter().find_map(|attr| match attr {
        Attribute::Native(native) if native.name.eq_ignore_ascii_case(name) => Some(native),
        _ => None,
    });
    let Some(attribute) = attribute else {
        return AttributeLookup::Absent;
    };
    match &attribute.value {
        Some(value) => match value.children.as_slice() {
            [AttributeValueChild::Literal(content)] => AttributeLookup::Literal(*content),
            _ => AttributeLookup::Dynamic,
        },
        None => AttributeLookup::Dynamic,
    }
}

/// Literal and entity-encoded spellings of the two quoting characters.
/// Patterns 0..3 are double-quote forms, 3..6 apostrophe forms.
static QUOTE_FORMS: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["\"", "&quot;", "&#34;", "'", "&apos;", "&#39;"])
        .unwrap()
});

pub(crate) fn count_quote_forms(value: &str) -> (usize, usize) {
    QUOTE_FORMS
        .find_iter(value)
        .fold((0, 0), |(quotes, apostrophes), m| {
            if m.pattern().as_usize() < 3 {
                (quotes + 1, apostrophes)
            } else {
                (quotes, apostrophes + 1)
            }
        })
}

/// Rewrites a value for wrapping in apostrophes: every double-quote form
/// becomes the literal character, every apostrophe form its entity.
pub(crate) fn rewrite_for_apostrophes(value: &str) -> String {
    QUOTE_FORMS.replace_all(value, &["\"", "\"", "\"", "&apos;", "&apos;", "&apos;"])
}

/// Rewrites a value for wrapping in double quotes.
pub(crate) fn rewrite_for_double_quotes(value: &str) -> String {
    QUOTE_FORMS.replace_all(value, &["&quot;", "&quot;", "&quot;", "'", "'", "'"])
}
