use crate::{
    diag::{DiagnosticSink, Severity},
    doc::Doc,
    external::{CodeFormatter, EmbeddedFormatter},
};
use std::fmt;

pub(crate) struct Ctx<'b> {
    pub(crate) print_width: usize,
    pub(crate) indent_width: usize,
    indent_level: usize,
    preserve_depth: usize,
    pub(crate) embedded_formatter: &'b dyn EmbeddedFormatter,
    code_formatter: Option<&'b dyn CodeFormatter>,
    sink: &'b dyn DiagnosticSink,
}

impl<'b> Ctx<'b> {
    pub(crate) fn new(
        print_width: usize,
        indent_width: usize,
        embedded_formatter: &'b dyn EmbeddedFormatter,
        code_formatter: Option<&'b dyn CodeFormatter>,
        sink: &'b dyn DiagnosticSink,
    ) -> Self {
        Self {
            print_width,
            indent_width,
            indent_level: 0,
            preserve_depth: 0,
            embedded_formatter,
            code_formatter,
            sink,
        }
    }

    /// Builds a subtree one indentation level deeper and nests it. The level
    /// is tracked during the build so widths handed to sub-formatters account
    /// for the columns already consumed by indentation.
    pub(crate) fn indent<'s>(&mut self, build: impl FnOnce(&mut Self) -> Doc<'s>) -> Doc<'s> {
        self.indent_level += self.indent_width;
        let doc = build(self);
        self.indent_level -= self.indent_width;
        doc.nest(self.indent_width)
    }

    /// Builds a subtree with whitespace reflow disabled.
    pub(crate) fn preserving_whitespace<'s>(
        &mut self,
        build: impl FnOnce(&mut Self) -> Doc<'s>,
    ) -> Doc<'s> {
        self.preserve_depth += 1;
        let doc = build(self);
        self.preserve_depth -= 1;
        doc
    }

    pub(crate) fn preserve_whitespace(&self) -> bool {
        self.preserve_depth > 0
    }

    fn code_width(&self) -> usize {
        self.print_width.saturating_sub(self.indent_level).max(1)
    }

    /// Formats a complete piece of Ruby code at the width left on this line.
    pub(crate) fn format_code(&self, code: &str) -> String {
        self.run_code_formatter(code, self.code_width())
    }

    /// Formats the code fragment carried by a control-flow tag. Fragments are
    /// not parseable on their own (`if condition` has no terminator), so a
    /// minimal valid wrapper is synthesized per keyword family, formatted,
    /// and stripped back off. Fragments matching no known shape pass through
    /// with a warning.
    pub(crate) fn format_fragment(&self, code: &str) -> String {
        let width = self.code_width();
        let code = code.trim();
        let keyword_end = code
            .find(|c: char| !c.is_ascii_lowercase())
            .unwrap_or(code.len());
        match &code[..keyword_end] {
            "if" | "unless" | "while" | "until" | "for" | "begin" => {
                let formatted = self.run_code_formatter(&format!("{code}\nend"), width);
                strip_trailing(&formatted, "end")
            }
            "elsif" => {
                let formatted = self.run_code_formatter(&format!("if a\n{code}\nend"), width);
                strip_wrapped(&formatted, "if a", "end")
            }
            "case" => {
                let formatted =
                    self.run_code_formatter(&format!("{code}\nwhen true\nend"), width);
                strip_trailing(&strip_trailing(&formatted, "end"), "when true")
            }
            "when" | "in" => {
                let formatted = self.run_code_formatter(&format!("case a\n{code}\nend"), width);
                strip_wrapped(&formatted, "case a", "end")
            }
            "rescue" | "ensure" => {
                let formatted = self.run_code_formatter(&format!("begin\n{code}\nend"), width);
                strip_wrapped(&formatted, "begin", "end")
            }
            _ => match trailing_block_opener(code) {
                Some(BlockOpener::Brace) => {
                    let formatted = self.run_code_formatter(&format!("{code}\n}}"), width);
                    strip_trailing(&formatted, "}")
                }
                Some(BlockOpener::Do) => {
                    // A formatter may rewrite an empty `do` block into braces,
                    // so fill the body with a statement that cannot fold away.
                    let filler = "a".repeat(width);
                    let formatted =
                        self.run_code_formatter(&format!("{code}\n{filler}\nend"), width);
                    strip_trailing(&strip_trailing(&formatted, "end"), &filler)
                }
                None => {
                    self.warn(format_args!("cannot complete code fragment: {code}"));
                    code.to_owned()
                }
            },
        }
    }

    /// Formats the body of an embedded-language tag, falling back to the
    /// content with trailing whitespace trimmed when the adapter fails.
    pub(crate) fn format_embedded(&self, language: &str, code: &str) -> String {
        match self
            .embedded_formatter
            .format(language, code, self.code_width())
        {
            Ok(formatted) => formatted,
            Err(error) => {
                self.error(format_args!("failed to format embedded {language}: {error}"));
                code.trim_end().to_owned()
            }
        }
    }

    fn run_code_formatter(&self, code: &str, print_width: usize) -> String {
        let Some(formatter) = self.code_formatter else {
            return code.trim().to_owned();
        };
        match formatter.format(code, print_width) {
            Ok(formatted) => formatted,
            Err(error) => {
                self.error(format_args!("failed to format code: {error}"));
                code.trim().to_owned()
            }
        }
    }

    pub(crate) fn debug(&self, message: fmt::Arguments<'_>) {
        self.sink.emit(Severity::Debug, message);
    }

    pub(crate) fn warn(&self, message: fmt::Arguments<'_>) {
        self.sink.emit(Severity::Warn, message);
    }

    pub(crate) fn error(&self, message: fmt::Arguments<'_>) {
        self.sink.emit(Severity::Error, message);
    }
}

fn strip_trailing(formatted: &str, suffix: &str) -> String {
    let formatted = formatted.trim_end();
    formatted
        .strip_suffix(suffix)
        .unwrap_or(formatted)
        .trim_end()
        .to_owned()
}

fn strip_wrapped(formatted: &str, prefix: &str, suffix: &str) -> String {
    let formatted = formatted.strip_prefix(prefix).unwrap_or(formatted);
    let formatted = formatted.trim_end();
    formatted
        .strip_suffix(suffix)
        .unwrap_or(formatted)
        .trim()
        .to_owned()
}

enum BlockOpener {
    Do,
    Brace,
}

/// Recognizes a fragment ending in a block opener: `do` or `{`, optionally
/// followed by a `|params|` list.
fn trailing_block_opener(code: &str) -> Option<BlockOpener> {
    let trimmed = code.trim_end();
    let before_params = match trimmed.strip_suffix('|') {
        Some(inner) => {
            let open = inner.rfind('|')?;
            let params_ok = inner[open + 1..].chars().all(|c| {
                c.is_ascii_whitespace() || c.is_alphanumeric() || matches!(c, ',' | '(' | ')' | '_' | '-')
            });
            if !params_ok {
                return None;
            }
            inner[..open].trim_end()
        }
        None => trimmed,
    };
    if before_params.ends_with('{') {
        Some(BlockOpener::Brace)
    } else if let Some(rest) = before_params.strip_suffix("do") {
        let boundary = rest
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric() && c != '_');
        boundary.then_some(BlockOpener::Do)
    } else {
        None
    }
}
