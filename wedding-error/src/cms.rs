use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single problem found while checking a content document against its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentIssue {
    /// Dotted path into the document, e.g. `items[2].question`
    pub path: String,
    pub message: String,
}

impl ContentIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Error, Debug, Clone)]
pub enum CmsError {
    #[error("unknown content type `{0}`")]
    UnknownType(String),
    #[error("document failed validation with {} issue(s)", .0.len())]
    Invalid(Vec<ContentIssue>),
    #[error("singleton `{0}` cannot be deleted")]
    SingletonDelete(String),
    #[error("document content must be a JSON object")]
    NotAnObject,
    #[error("document `{0}` not found")]
    DocumentNotFound(String),
}
