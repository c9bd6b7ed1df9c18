//! Errors of fetching, validating and rendering a timetable.
use std::fmt;

use thiserror::Error;

/// A single place where a JSON value does not match its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value, empty for the document root.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every violation found in one validated document. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|violation| violation.path.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.0.len())?;
        for violation in &self.0 {
            write!(f, "; {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Why a timetable could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connecting, sending or reading the body failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body is not JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body is JSON but not a timetable.
    #[error("response does not match the timetable schema: {0}")]
    Validation(#[from] ValidationErrors),

    /// The schema derived from the models could not be compiled.
    #[error("timetable schema could not be compiled: {0}")]
    Schema(String),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("no {0} given, neither on the command line nor in the config")]
    MissingParameter(&'static str),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to render timetable: {0}")]
    Render(#[source] serde_json::Error),
}
