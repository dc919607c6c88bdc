//! Core traits and types for the interview agent
//!
//! This crate provides foundational types used across all other crates:
//! - Interview stages, events and actions
//! - Utterance classification results
//! - Question sets supplied by the template store
//! - Collaborator traits (question source, classifier, speech output)
//! - Error types

pub mod error;
pub mod interview;
pub mod question;
pub mod traits;

pub use error::{Error, Result};
pub use interview::{
    Classification, ClosingSignal, InterviewAction, InterviewEvent, InterviewStage, Readiness,
    Verdict,
};
pub use question::QuestionSet;
pub use traits::{QuestionSource, SpeechOutput, UtteranceClassifier};
