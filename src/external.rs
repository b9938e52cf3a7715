//! Pluggable sub-formatters.
//!
//! The formatter itself never understands embedded languages or Ruby code;
//! it hands their raw text to one of these adapters together with the width
//! still available on the line. Adapters are fallible: any error makes the
//! formatter fall back to the unformatted content.

use crate::error::AdapterError;
#[cfg(feature = "config_serde")]
use serde::{Deserialize, Serialize};
use std::{
    io::{self, Write},
    process::{Command, Stdio},
};

/// Formats the body of an embedded-language tag such as `<script>` or
/// `<style>`, selected by a normalized MIME-like type token.
pub trait EmbeddedFormatter {
    fn supported(&self, language: &str) -> bool;
    fn format(&self, language: &str, code: &str, print_width: usize)
        -> Result<String, AdapterError>;
}

/// Formats the Ruby code carried by template tags.
pub trait CodeFormatter {
    fn format(&self, code: &str, print_width: usize) -> Result<String, AdapterError>;
}

/// The no-op adapter: reports every embedded language as unsupported and
/// returns code with only surrounding whitespace removed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughFormatter;

impl EmbeddedFormatter for PassthroughFormatter {
    fn supported(&self, _language: &str) -> bool {
        false
    }

    fn format(
        &self,
        _language: &str,
        code: &str,
        _print_width: usize,
    ) -> Result<String, AdapterError> {
        Ok(code.trim_end().to_owned())
    }
}

impl CodeFormatter for PassthroughFormatter {
    fn format(&self, code: &str, _print_width: usize) -> Result<String, AdapterError> {
        Ok(code.trim().to_owned())
    }
}

/// Substituted with the available width when an external command runs.
pub const PRINT_WIDTH_PLACEHOLDER: &str = "{print_width}";

/// One entry of the embedded-language routing table.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "config_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config_serde", serde(rename_all = "camelCase"))]
pub struct CommandRoute {
    /// Type tokens this route accepts, e.g. `text/css`.
    pub types: Vec<String>,
    /// Command line to pipe the code through. May contain
    /// [`PRINT_WIDTH_PLACEHOLDER`].
    pub command: String,
}

/// Routes embedded languages to external commands by type token. An empty
/// table reports every language as unsupported.
#[derive(Clone, Debug, Default)]
pub struct CommandRouter {
    routes: Vec<CommandRoute>,
}

impl CommandRouter {
    pub fn new(routes: Vec<CommandRoute>) -> Self {
        Self { routes }
    }

    fn find(&self, language: &str) -> Option<&CommandRoute> {
        self.routes
            .iter()
            .find(|route| route.types.iter().any(|t| t == language))
    }
}

impl EmbeddedFormatter for CommandRouter {
    fn supported(&self, language: &str) -> bool {
        self.find(language).is_some()
    }

    fn format(
        &self,
        language: &str,
        code: &str,
        print_width: usize,
    ) -> Result<String, AdapterError> {
        let route = self
            .find(language)
            .ok_or_else(|| AdapterError::Unsupported(language.to_owned()))?;
        run_command(&route.command, code, print_width)
    }
}

/// Formats code by piping it through one external command.
#[derive(Clone, Debug)]
pub struct CommandFormatter {
    command: String,
}

impl CommandFormatter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl CodeFormatter for CommandFormatter {
    fn format(&self, code: &str, print_width: usize) -> Result<String, AdapterError> {
        run_command(&self.command, code, print_width)
    }
}

fn run_command(template: &str, input: &str, print_width: usize) -> Result<String, AdapterError> {
    let command = template.replace(PRINT_WIDTH_PLACEHOLDER, &print_width.to_string());
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(AdapterError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty formatter command",
        )));
    };
    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(AdapterError::Io)?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes()).map_err(AdapterError::Io)?;
    }
    let output = child.wait_with_output().map_err(AdapterError::Io)?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_owned())
    } else {
        Err(AdapterError::CommandFailed {
            command,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
