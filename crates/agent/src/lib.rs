//! Interview dialogue controller
//!
//! Features:
//! - Stage-based interview state machine with follow-up budgets
//! - Multi-part question walking with dependent-task skipping
//! - Phase handlers binding classifier capabilities to stages
//! - Async session driver with introduction auto-start
//! - Question bank access (HTTP template store, TTL cache, static lists)
//! - End-of-interview summary

pub mod error;
pub mod machine;
pub mod phase;
pub mod question_bank;
pub mod session;
pub mod state;
pub mod summary;

pub use error::{InterviewError, Result};
pub use machine::{InterviewStateMachine, StageTransition, TransitionReason};
pub use phase::{Phase, PhaseOutcome};
pub use question_bank::{
    load_questions, CachedQuestionSource, HttpQuestionSource, InterviewTemplate,
    StaticQuestionSource, TemplateCache,
};
pub use session::{initial_state, InterviewSession};
pub use state::InterviewState;
pub use summary::InterviewSummary;
