//! Error types for mermaid-press operations.
//!
//! [`PressError`] covers the fatal conditions that stop a run. Failures of
//! individual diagram renders are reported through [`RenderError`]; only its
//! staging variant escalates into a [`PressError`].

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// The main error type for mermaid-press operations.
#[derive(Debug, Error)]
pub enum PressError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Invalid block pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure of a single diagram render.
///
/// The document keeps the original fenced block when the renderer fails to
/// start, exits unsuccessfully or times out, so those errors are recorded
/// per block. [`RenderError::Io`] is different: a diagram source that
/// cannot be staged points at a broken environment and ends the run as a
/// [`PressError::Io`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch renderer `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("renderer did not finish within {seconds}s")]
    TimedOut { seconds: u64 },

    #[error("failed to stage diagram source: {0}")]
    Io(#[from] io::Error),
}

impl RenderError {
    /// Captured diagnostic output of the renderer, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            RenderError::Failed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
