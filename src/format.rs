//! External formatter integration.
//!
//! The formatting engine itself is a black box behind the [`Formatter`]
//! trait; the default implementation pipes source text through an external
//! executable such as `astyle`.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Failure reported by the external formatter. Surfaced unchanged; the
/// driver treats it as fatal for the invocation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FormatError {
    pub message: String,
}

/// The external formatting capability: reformat `source` according to an
/// option string, returning the formatted text.
pub trait Formatter {
    fn format(&self, source: &str, options: &str) -> Result<String, FormatError>;
}

/// Formatter backed by an external executable. The option string is split
/// on whitespace into arguments, source is written to the child's stdin,
/// and formatted output is read from its stdout.
pub struct FormatterCommand {
    program: PathBuf,
}

impl FormatterCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        FormatterCommand {
            program: program.into(),
        }
    }
}

impl Formatter for FormatterCommand {
    fn format(&self, source: &str, options: &str) -> Result<String, FormatError> {
        let mut child = Command::new(&self.program)
            .args(options.split_whitespace())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| FormatError {
                message: format!("failed to run {}: {}", self.program.display(), err),
            })?;

        // Dropping stdin after the write closes the pipe so the child sees
        // end of input.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(|err| FormatError {
                message: format!(
                    "failed to send source to {}: {}",
                    self.program.display(),
                    err
                ),
            })?;
        }

        let output = child.wait_with_output().map_err(|err| FormatError {
            message: format!("failed to wait for {}: {}", self.program.display(), err),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormatError {
                message: format!("{} failed: {}", self.program.display(), stderr.trim()),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| FormatError {
            message: format!("{} produced non-UTF-8 output", self.program.display()),
        })
    }
}
