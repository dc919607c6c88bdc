//! Text Processing for the Interview Agent
//!
//! This crate provides the text analysis used by the interview controller:
//! - **Speech formatting**: numbers, currency and percentages spoken as words
//! - **Question segmentation**: split a question into a scenario and sub-tasks
//! - **Task dependency**: decide whether later sub-tasks build on earlier ones
//! - **Utterance keywords**: an offline utterance classifier
//!
//! # Example
//!
//! ```ignore
//! use interview_text_processing::{QuestionSegmenter, SpeechFormatter};
//!
//! let segmented = QuestionSegmenter::new().segment("1. What is X? 2. What is Y?");
//! assert_eq!(segmented.tasks.len(), 2);
//!
//! let spoken = SpeechFormatter::new().format("Growth is 15%.");
//! assert_eq!(spoken, "Growth is fifteen percent.");
//! ```

pub mod dependency;
pub mod intent;
pub mod segmentation;
pub mod simplifier;

pub use dependency::{DependencyClassifier, DependencyReason};
pub use intent::{KeywordClassifier, KeywordClassifierConfig};
pub use segmentation::{MarkerStyle, QuestionSegmenter, SegmentedQuestion};
pub use simplifier::{NumberToWords, SpeechFormatter};
