//! Collaborator traits
//!
//! The controller never talks to speech, language-model or template
//! backends directly. Each of them sits behind one of these traits so the
//! state machine can be driven by mocks in tests.

mod classifier;
mod question_source;
mod speech;

pub use classifier::UtteranceClassifier;
pub use question_source::QuestionSource;
pub use speech::SpeechOutput;
