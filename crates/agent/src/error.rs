//! Interview controller errors

use interview_core::InterviewStage;
use thiserror::Error;

/// Errors returned by the state machine and session driver
///
/// Both transition errors leave the interview state untouched; callers log
/// them and wait for the next utterance.
#[derive(Error, Debug, Clone)]
pub enum InterviewError {
    #[error("Event '{event}' is not valid in stage {stage}")]
    InvalidTransition {
        stage: InterviewStage,
        event: &'static str,
    },

    #[error("Interview already completed")]
    Completed,

    #[error(transparent)]
    Core(#[from] interview_core::Error),
}

pub type Result<T> = std::result::Result<T, InterviewError>;
