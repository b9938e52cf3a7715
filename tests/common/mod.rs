#![allow(dead_code)]

use erb_fmt::ast::{
    Attribute, AttributeValue, AttributeValueChild, CloseTag, Element, ErbEnd, ErbTag,
    NativeAttribute, Node, OpenTag, Root, TextNode,
};
use erb_fmt::config::FormatOptions;
use erb_fmt::{AdapterError, CodeFormatter, DiagnosticSink, EmbeddedFormatter, Severity};
use std::cell::RefCell;

pub const TEST_WIDTH: usize = 40;

pub fn options() -> FormatOptions {
    FormatOptions {
        print_width: TEST_WIDTH,
        ..FormatOptions::default()
    }
}

pub fn format(root: &Root) -> String {
    erb_fmt::format_tree(root, &options())
}

pub fn root(children: Vec<Node>) -> Root {
    Root { children }
}

pub fn text(raw: &str) -> Node<'_> {
    Node::Text(TextNode { raw })
}

pub fn element<'s>(
    tag_name: &'s str,
    attrs: Vec<Attribute<'s>>,
    children: Vec<Node<'s>>,
) -> Node<'s> {
    Node::Element(Element {
        open_tag: OpenTag { tag_name, attrs },
        close_tag: Some(CloseTag { tag_name }),
        children,
        void: false,
    })
}

pub fn void_element<'s>(tag_name: &'s str, attrs: Vec<Attribute<'s>>) -> Node<'s> {
    Node::Element(Element {
        open_tag: OpenTag { tag_name, attrs },
        close_tag: None,
        children: vec![],
        void: true,
    })
}

pub fn attr<'s>(name: &'s str, value: &'s str) -> Attribute<'s> {
    quoted_attr(name, "\"", value)
}

pub fn quoted_attr<'s>(name: &'s str, quote: &'s str, value: &'s str) -> Attribute<'s> {
    Attribute::Native(NativeAttribute {
        name,
        value: Some(AttributeValue {
            quoted: true,
            open_quote: quote,
            close_quote: quote,
            children: vec![AttributeValueChild::Literal(value)],
        }),
    })
}

pub fn unquoted_attr<'s>(name: &'s str, value: &'s str) -> Attribute<'s> {
    Attribute::Native(NativeAttribute {
        name,
        value: Some(AttributeValue {
            quoted: false,
            open_quote: "",
            close_quote: "",
            children: vec![AttributeValueChild::Literal(value)],
        }),
    })
}

pub fn erb_tag<'s>(opening: &'s str, content: &'s str, closing: &'s str) -> ErbTag<'s> {
    ErbTag {
        opening,
        content,
        closing,
    }
}

pub fn erb_expr(content: &str) -> Node<'_> {
    Node::ErbContent(erb_tag("<%=", content, "%>"))
}

pub fn erb_stmt(content: &str) -> Node<'_> {
    Node::ErbContent(erb_tag("<%", content, "%>"))
}

pub fn erb_end() -> ErbEnd<'static> {
    ErbEnd {
        tag: erb_tag("<%", " end ", "%>"),
    }
}

/// Maps trimmed input code to canned output, passing everything else
/// through trimmed.
pub struct MappedCodeFormatter {
    mappings: Vec<(&'static str, &'static str)>,
}

impl MappedCodeFormatter {
    pub fn new(mappings: Vec<(&'static str, &'static str)>) -> Self {
        Self { mappings }
    }
}

impl CodeFormatter for MappedCodeFormatter {
    fn format(&self, code: &str, _print_width: usize) -> Result<String, AdapterError> {
        let trimmed = code.trim();
        Ok(self
            .mappings
            .iter()
            .find(|(input, _)| *input == trimmed)
            .map(|(_, output)| (*output).to_owned())
            .unwrap_or_else(|| trimmed.to_owned()))
    }
}

pub struct FailingCodeFormatter;

impl CodeFormatter for FailingCodeFormatter {
    fn format(&self, _code: &str, _print_width: usize) -> Result<String, AdapterError> {
        Err(AdapterError::CommandFailed {
            command: "stub".into(),
            status: Some(1),
            stderr: "boom".into(),
        })
    }
}

/// Supports a fixed set of languages and maps trimmed input to canned
/// output, passing everything else through trimmed.
pub struct MappedEmbeddedFormatter {
    languages: Vec<&'static str>,
    mappings: Vec<(&'static str, &'static str)>,
}

impl MappedEmbeddedFormatter {
    pub fn new(
        languages: Vec<&'static str>,
        mappings: Vec<(&'static str, &'static str)>,
    ) -> Self {
        Self {
            languages,
            mappings,
        }
    }
}

impl EmbeddedFormatter for MappedEmbeddedFormatter {
    fn supported(&self, language: &str) -> bool {
        self.languages.contains(&language)
    }

    fn format(
        &self,
        language: &str,
        code: &str,
        _print_width: usize,
    ) -> Result<String, AdapterError> {
        if !self.supported(language) {
            return Err(AdapterError::Unsupported(language.to_owned()));
        }
        let trimmed = code.trim();
        Ok(self
            .mappings
            .iter()
            .find(|(input, _)| *input == trimmed)
            .map(|(_, output)| (*output).to_owned())
            .unwrap_or_else(|| trimmed.to_owned()))
    }
}

pub struct FailingEmbeddedFormatter;

impl EmbeddedFormatter for FailingEmbeddedFormatter {
    fn supported(&self, _language: &str) -> bool {
        true
    }

    fn format(
        &self,
        _language: &str,
        _code: &str,
        _print_width: usize,
    ) -> Result<String, AdapterError> {
        Err(AdapterError::CommandFailed {
            command: "stub".into(),
            status: Some(1),
            stderr: "boom".into(),
        })
    }
}

/// Collects diagnostics so tests can assert on them.
#[derive(Default)]
pub struct MemorySink {
    messages: RefCell<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.borrow().clone()
    }

    pub fn has(&self, severity: Severity, needle: &str) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|(s, message)| *s == severity && message.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, severity: Severity, message: std::fmt::Arguments<'_>) {
        self.messages
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}
