//! Types about configuration.

#[cfg(feature = "config_serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "config_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config_serde", serde(rename_all = "camelCase", default))]
/// The whole configuration of erb_fmt.
pub struct FormatOptions {
    /// The line width the formatter tries to stay within. Default: `80`.
    pub print_width: usize,
    /// Use tabs for indentation instead of spaces. Default: `false`.
    pub use_tabs: bool,
    /// Columns per indentation level. Default: `2`.
    pub indent_width: usize,
    /// Line break flavor of the output. Default: LF.
    pub line_break: LineBreak,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 80,
            use_tabs: false,
            indent_width: 2,
            line_break: LineBreak::Lf,
        }
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "config_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config_serde", serde(rename_all = "camelCase"))]
pub enum LineBreak {
    #[default]
    Lf,
    Crlf,
}

impl From<LineBreak> for crate::doc::LineBreak {
    fn from(value: LineBreak) -> Self {
        match value {
            LineBreak::Lf => crate::doc::LineBreak::Lf,
            LineBreak::Crlf => crate::doc::LineBreak::Crlf,
        }
    }
}
