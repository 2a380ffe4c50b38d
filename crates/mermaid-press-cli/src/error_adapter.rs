//! Error adapter for converting PressError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error
//! type and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use mermaid_press::PressError;

/// Adapter giving a [`PressError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a PressError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PressError::Io(_) => "mermaid_press::io",
            PressError::MissingInput(_) => "mermaid_press::missing_input",
            PressError::Pattern(_) => "mermaid_press::pattern",
            PressError::Config(_) => "mermaid_press::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            PressError::MissingInput(_) => "check the input path; nothing was written",
            PressError::Pattern(_) => "check the `extract.language` setting",
            PressError::Config(_) => "fix or remove the configuration file, or pass --config",
            PressError::Io(_) => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_missing_input_diagnostic() {
        let err = PressError::MissingInput(PathBuf::from("nowhere.md"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "Input file not found: nowhere.md");
        assert_eq!(
            adapter.code().map(|c| c.to_string()).as_deref(),
            Some("mermaid_press::missing_input")
        );
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = PressError::Io(std::io::Error::other("disk full"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "I/O error: disk full");
        assert_eq!(
            adapter.code().map(|c| c.to_string()).as_deref(),
            Some("mermaid_press::io")
        );
        assert!(adapter.help().is_none());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_report_renders() {
        let err = PressError::Config("Missing configuration file: x.toml".to_string());
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &ErrorAdapter(&err))
            .expect("Writing to String buffer is infallible");

        assert!(out.contains("Missing configuration file"));
    }
}
