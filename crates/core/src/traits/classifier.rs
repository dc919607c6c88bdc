//! Utterance classification trait

use async_trait::async_trait;

use crate::{Classification, ClosingSignal, Readiness, Result};

/// Reduces a free-form candidate utterance into a controller signal
///
/// Implementations may be backed by a language model and are not assumed
/// to be deterministic.
///
/// # Example
///
/// ```ignore
/// let classifier: Arc<dyn UtteranceClassifier> = Arc::new(KeywordClassifier::default());
/// let c = classifier.classify_answer("What is a mutex?", "I'm not sure").await?;
/// assert_eq!(c.verdict, Verdict::Unknown);
/// ```
#[async_trait]
pub trait UtteranceClassifier: Send + Sync + 'static {
    /// Classify an answer to the given question, task or follow-up
    ///
    /// For a `partial` verdict the implementation may also supply a
    /// generated follow-up question.
    async fn classify_answer(&self, prompt: &str, utterance: &str) -> Result<Classification>;

    /// Decide whether the candidate is ready to begin
    async fn detect_readiness(&self, utterance: &str) -> Result<Readiness>;

    /// Decide whether the candidate has further questions for the interviewer
    async fn detect_closing(&self, utterance: &str) -> Result<ClosingSignal>;

    /// Classifier name for logging
    fn name(&self) -> &str;
}
