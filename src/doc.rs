//! A small intermediate representation for layout decisions and a
//! column-bounded renderer for it, in the style of Wadler's algebra and
//! Lindig's "Strictly Pretty".
//!
//! Documents are built out of verbatim text, breakable separators, groups and
//! nesting. A [`Doc::Group`] is the atomic unit for the flat-versus-broken
//! decision: it renders on a single line when its flattened content, plus
//! whatever follows it up to the next place a line break can occur, fits in
//! the remaining width. Strict breaks inside a broken group all become
//! newlines; flex breaks decide one by one, which is what word wrapping uses.

use std::borrow::Cow;
use unicode_width::UnicodeWidthStr;

#[derive(Clone)]
pub(crate) enum Doc<'s> {
    /// Verbatim text. Must not contain a line break.
    Text(Cow<'s, str>),
    Break(Break),
    /// A plain sequence. Never introduces breaks by itself.
    Vec(Vec<Doc<'s>>),
    /// An atomic fit-check scope.
    Group(Vec<Doc<'s>>),
    /// Increases the indentation of broken lines in its subtree.
    Nest(usize, Vec<Doc<'s>>),
}

#[derive(Clone, Copy)]
pub(crate) struct Break {
    /// What the break renders as while the line is not broken.
    pub(crate) unbroken: &'static str,
    /// Flex breaks re-check the remaining line instead of following the
    /// enclosing group's mode.
    pub(crate) flex: bool,
    /// Forced breaks ignore the fit check entirely.
    pub(crate) forced: bool,
    /// When false, the new line starts at column zero. Used for text that
    /// must be reproduced verbatim.
    pub(crate) reindent: bool,
}

impl<'s> Doc<'s> {
    pub(crate) fn text(text: impl Into<Cow<'s, str>>) -> Self {
        Doc::Text(text.into())
    }

    pub(crate) fn nil() -> Self {
        Doc::Text(Cow::Borrowed(""))
    }

    /// A space, or a newline when the enclosing group is broken.
    pub(crate) fn line_or_space() -> Self {
        Doc::Break(Break {
            unbroken: " ",
            flex: false,
            forced: false,
            reindent: true,
        })
    }

    /// Nothing, or a newline when the enclosing group is broken.
    pub(crate) fn line_or_nil() -> Self {
        Doc::Break(Break {
            unbroken: "",
            flex: false,
            forced: false,
            reindent: true,
        })
    }

    /// A space that turns into a newline only when the content up to the next
    /// break opportunity no longer fits.
    pub(crate) fn soft_line() -> Self {
        Doc::Break(Break {
            unbroken: " ",
            flex: true,
            forced: false,
            reindent: true,
        })
    }

    /// Zero-width flavor of [`Doc::soft_line`]: invisible while flat, but
    /// still a place where the line may wrap.
    pub(crate) fn soft_nil() -> Self {
        Doc::Break(Break {
            unbroken: "",
            flex: true,
            forced: false,
            reindent: true,
        })
    }

    /// Always breaks, indenting the next line.
    pub(crate) fn hard_line() -> Self {
        Doc::Break(Break {
            unbroken: "",
            flex: false,
            forced: true,
            reindent: true,
        })
    }

    /// Always breaks, without indenting the next line.
    pub(crate) fn empty_line() -> Self {
        Doc::Break(Break {
            unbroken: "",
            flex: false,
            forced: true,
            reindent: false,
        })
    }

    pub(crate) fn list(docs: Vec<Doc<'s>>) -> Self {
        Doc::Vec(docs)
    }

    pub(crate) fn group(self) -> Self {
        match self {
            Doc::Vec(children) => Doc::Group(children),
            doc => Doc::Group(vec![doc]),
        }
    }

    pub(crate) fn nest(self, step: usize) -> Self {
        match self {
            Doc::Vec(children) => Doc::Nest(step, children),
            doc => Doc::Nest(step, vec![doc]),
        }
    }

    pub(crate) fn append(self, other: Doc<'s>) -> Self {
        match self {
            Doc::Vec(mut children) => {
                children.push(other);
                Doc::Vec(children)
            }
            doc => Doc::Vec(vec![doc, other]),
        }
    }

    pub(crate) fn concat(self, docs: impl IntoIterator<Item = Doc<'s>>) -> Self {
        match self {
            Doc::Vec(mut children) => {
                children.extend(docs);
                Doc::Vec(children)
            }
            doc => {
                let mut children = vec![doc];
                children.extend(docs);
                Doc::Vec(children)
            }
        }
    }
}

#[derive(Clone)]
pub(crate) enum IndentKind {
    Space,
    Tab,
}

#[derive(Clone)]
pub(crate) enum LineBreak {
    Lf,
    Crlf,
}

impl LineBreak {
    fn as_str(&self) -> &'static str {
        match self {
            LineBreak::Lf => "\n",
            LineBreak::Crlf => "\r\n",
        }
    }
}

pub(crate) struct PrintOptions {
    pub(crate) indent_kind: IndentKind,
    pub(crate) line_break: LineBreak,
    pub(crate) width: usize,
    pub(crate) tab_size: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Broken,
    Unbroken,
}

type Cmd<'d, 's> = (usize, Mode, &'d Doc<'s>);

/// Renders a document within the given width. Single forward pass; the
/// document itself is never mutated.
pub(crate) fn print(doc: &Doc, options: &PrintOptions) -> String {
    let mut printer = Printer {
        out: String::new(),
        col: 0,
        pending: None,
    };
    let mut cmds: Vec<Cmd> = vec![(0, Mode::Broken, doc)];
    while let Some((indent, mode, doc)) = cmds.pop() {
        match doc {
            Doc::Text(text) => printer.write_text(text, options),
            Doc::Break(br) => {
                if br.forced {
                    printer.write_newline(if br.reindent { indent } else { 0 }, options);
                } else if br.flex {
                    let after_separator = printer.col + br.unbroken.width();
                    if mode == Mode::Unbroken || fits(&[], &cmds, after_separator, options) {
                        printer.write_text(br.unbroken, options);
                    } else {
                        printer.write_newline(indent, options);
                    }
                } else if mode == Mode::Broken {
                    printer.write_newline(indent, options);
                } else {
                    printer.write_text(br.unbroken, options);
                }
            }
            Doc::Vec(children) => {
                for child in children.iter().rev() {
                    cmds.push((indent, mode, child));
                }
            }
            Doc::Nest(step, children) => {
                for child in children.iter().rev() {
                    cmds.push((indent + step, mode, child));
                }
            }
            Doc::Group(children) => {
                let mode = if fits(children, &cmds, printer.col, options) {
                    Mode::Unbroken
                } else {
                    Mode::Broken
                };
                for child in children.iter().rev() {
                    cmds.push((indent, mode, child));
                }
            }
        }
    }
    printer.out
}

/// Checks whether `group`, rendered flat, fits in the width left on the
/// current line. Content already queued after the group keeps counting
/// against the limit until the first place a newline is certain, so a group
/// never claims a line it cannot actually share.
fn fits(group: &[Doc], cmds: &[Cmd], col: usize, options: &PrintOptions) -> bool {
    let limit = options.width as isize;
    let mut width = col as isize;
    let mut stack: Vec<(Mode, bool, &Doc)> = group
        .iter()
        .rev()
        .map(|doc| (Mode::Unbroken, false, doc))
        .collect();
    let mut tail = cmds.iter().rev();
    loop {
        if width > limit {
            return false;
        }
        let (mode, in_tail, doc) = match stack.pop() {
            Some(entry) => entry,
            None => match tail.next() {
                Some(&(_, mode, doc)) => (mode, true, doc),
                None => return true,
            },
        };
        match doc {
            Doc::Text(text) => width += text.as_ref().width() as isize,
            Doc::Break(br) => {
                if in_tail {
                    if br.forced || mode == Mode::Broken {
                        return true;
                    }
                    width += br.unbroken.width() as isize;
                } else if br.forced {
                    return false;
                } else {
                    width += br.unbroken.width() as isize;
                }
            }
            Doc::Vec(children) | Doc::Group(children) | Doc::Nest(_, children) => {
                for child in children.iter().rev() {
                    stack.push((mode, in_tail, child));
                }
            }
        }
    }
}

struct Printer {
    out: String,
    col: usize,
    /// Indentation of a newline that has been decided but not yet written.
    /// Writing it lazily keeps blank lines free of trailing whitespace.
    pending: Option<usize>,
}

impl Printer {
    fn write_text(&mut self, text: &str, options: &PrintOptions) {
        if text.is_empty() {
            return;
        }
        if let Some(indent) = self.pending.take() {
            self.out.push_str(options.line_break.as_str());
            self.push_indent(indent, options);
        }
        self.out.push_str(text);
        self.col += text.width();
    }

    fn write_newline(&mut self, indent: usize, options: &PrintOptions) {
        if self.pending.is_some() {
            self.out.push_str(options.line_break.as_str());
        }
        self.pending = Some(indent);
        self.col = indent;
    }

    fn push_indent(&mut self, indent: usize, options: &PrintOptions) {
        match options.indent_kind {
            IndentKind::Space => {
                for _ in 0..indent {
                    self.out.push(' ');
                }
            }
            IndentKind::Tab => {
                for _ in 0..indent / options.tab_size {
                    self.out.push('\t');
                }
                for _ in 0..indent % options.tab_size {
                    self.out.push(' ');
                }
            }
        }
    }
}
