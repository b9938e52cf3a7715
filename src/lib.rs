#![doc = include_str!("../README.md")]

pub mod ast;
pub mod config;
mod ctx;
mod diag;
mod doc;
mod error;
mod external;
mod helpers;
mod printer;

pub use crate::{
    diag::{DiagnosticSink, NullSink, Severity, StderrSink},
    error::AdapterError,
    external::{
        CodeFormatter, CommandFormatter, CommandRoute, CommandRouter, EmbeddedFormatter,
        PassthroughFormatter, PRINT_WIDTH_PLACEHOLDER,
    },
};

use crate::{
    config::FormatOptions,
    ctx::Ctx,
    doc::{IndentKind, PrintOptions},
    printer::DocGen,
};

/// Formats a parsed template tree with the default no-op sub-formatters:
/// embedded `<script>`/`<style>` bodies stay verbatim and Ruby code is only
/// trimmed.
///
/// ```
/// use erb_fmt::{ast, config::FormatOptions, format_tree};
///
/// let tree = ast::Root {
///     children: vec![ast::Node::Element(ast::Element {
///         open_tag: ast::OpenTag { tag_name: "hr", attrs: vec![] },
///         close_tag: None,
///         children: vec![],
///         void: true,
///     })],
/// };
///
/// assert_eq!(format_tree(&tree, &FormatOptions::default()), "<hr />");
/// ```
pub fn format_tree(root: &ast::Root, options: &FormatOptions) -> String {
    Formatter::new(options).format(root)
}

/// Formats parsed template trees.
///
/// Sub-formatters and a diagnostics sink are injected at construction and
/// live for this instance only. A failing sub-formatter never fails the
/// format call; its content is passed through trimmed and the failure goes
/// to the sink.
///
/// One call owns all of its state, so a `Formatter` can serve independent
/// trees from several threads at once.
pub struct Formatter<'a> {
    options: &'a FormatOptions,
    embedded_formatter: &'a dyn EmbeddedFormatter,
    code_formatter: Option<&'a dyn CodeFormatter>,
    diagnostics: &'a dyn DiagnosticSink,
}

impl<'a> Formatter<'a> {
    pub fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            embedded_formatter: &PassthroughFormatter,
            code_formatter: None,
            diagnostics: &NullSink,
        }
    }

    /// Routes `<script>`/`<style>` bodies to an embedded-language formatter.
    pub fn with_embedded_formatter(mut self, formatter: &'a dyn EmbeddedFormatter) -> Self {
        self.embedded_formatter = formatter;
        self
    }

    /// Formats the Ruby code carried by template tags. Without one, code
    /// passes through with surrounding whitespace trimmed.
    pub fn with_code_formatter(mut self, formatter: &'a dyn CodeFormatter) -> Self {
        self.code_formatter = Some(formatter);
        self
    }

    /// Receives debug/warn/error diagnostics from this instance.
    pub fn with_diagnostics(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Formats one tree. The result carries no trailing newline; append one
    /// when persisting to a file.
    pub fn format(&self, root: &ast::Root) -> String {
        let mut ctx = Ctx::new(
            self.options.print_width,
            self.options.indent_width,
            self.embedded_formatter,
            self.code_formatter,
            self.diagnostics,
        );
        let doc = root.doc(&mut ctx);

        doc::print(
            &doc,
            &PrintOptions {
                indent_kind: if self.options.use_tabs {
                    IndentKind::Tab
                } else {
                    IndentKind::Space
                },
                line_break: self.options.line_break.clone().into(),
                width: self.options.print_width,
                tab_size: self.options.indent_width,
            },
        )
    }
}
