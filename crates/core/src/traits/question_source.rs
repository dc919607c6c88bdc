//! Question source trait

use async_trait::async_trait;

use crate::{QuestionSet, Result};

/// Supplies the ordered question list for an interview template
#[async_trait]
pub trait QuestionSource: Send + Sync + 'static {
    /// Fetch the questions for a template
    ///
    /// Callers tolerate failure by proceeding with an empty set.
    async fn fetch_questions(&self, template_id: &str) -> Result<QuestionSet>;
}
