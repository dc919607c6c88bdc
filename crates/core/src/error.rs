//! Error types shared by collaborator traits

use thiserror::Error;

/// Errors raised by external collaborators
///
/// None of these are fatal to an interview: the controller recovers from
/// every variant locally (empty question list, `partial` verdict, skipped line).
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Question source error: {0}")]
    QuestionSource(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Speech output error: {0}")]
    Speech(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
