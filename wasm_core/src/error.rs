//! Error types shared by every tool in the crate.

use serde::Serialize;
use thiserror::Error;

/// The two ways a tool can refuse an input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The input does not conform to the grammar of its declared format.
    #[error("{0}")]
    Validation(String),

    /// An option is out of range or missing, detected before any work starts.
    #[error("{0}")]
    Configuration(String),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Configuration,
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Configuration(msg) => msg,
        }
    }
}

/// Convenience alias used throughout devkit-core.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Result shape handed to the UI: either the converted text or a typed error, never both.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConversionOutcome {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Failure {
        error_kind: ErrorKind,
        message: String,
    },
}

impl From<Result<String>> for ConversionOutcome {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => Self::Text { text },
            Err(err) => Self::Failure {
                error_kind: err.kind(),
                message: err.message().to_string(),
            },
        }
    }
}

impl ConversionOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}
