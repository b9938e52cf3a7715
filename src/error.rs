use std::{error::Error, fmt, io};

#[derive(Debug)]
/// Failure raised by a sub-formatter adapter. These never abort a formatting
/// run; the formatter falls back to the unformatted content and reports the
/// error through its diagnostics sink.
pub enum AdapterError {
    /// No formatter is configured for the requested language.
    Unsupported(String),
    /// The external command could not be started or written to.
    Io(io::Error),
    /// The external command ran but exited unsuccessfully.
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
    /// Any other failure raised by a custom adapter.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::Unsupported(language) => {
                write!(f, "no formatter configured for '{language}'")
            }
            AdapterError::Io(error) => write!(f, "failed to run external formatter: {error}"),
            AdapterError::CommandFailed {
                command,
                status,
                stderr,
            } => {
                match status {
                    Some(status) => write!(f, "[{command}] exit status: {status}")?,
                    None => write!(f, "[{command}] terminated by signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, "\n{stderr}")?;
                }
                Ok(())
            }
            AdapterError::Other(error) => error.fmt(f),
        }
    }
}

impl Error for AdapterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AdapterError::Io(error) => Some(error),
            AdapterError::Other(error) => Some(&**error),
            _ => None,
        }
    }
}
