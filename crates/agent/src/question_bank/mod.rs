//! Question bank access
//!
//! - [`InterviewTemplate`]: template payload parsing
//! - [`HttpQuestionSource`]: the remote template store
//! - [`TemplateCache`] / [`CachedQuestionSource`]: injected TTL cache
//! - [`StaticQuestionSource`]: fixed lists (practice mode, local files)
//!
//! [`load_questions`] turns any fetch failure into an empty question set.

mod cache;
mod http;
mod template;

pub use cache::{CachedQuestionSource, TemplateCache};
pub use http::HttpQuestionSource;
pub use template::{unwrap_content, InterviewTemplate, TemplateQuestion, TemplateSkill, DEFAULT_JOB_TITLE};

use async_trait::async_trait;
use interview_config::PracticeConfig;
use interview_core::{QuestionSet, QuestionSource, Result};

/// Serves the same question set for every template id
#[derive(Debug, Clone)]
pub struct StaticQuestionSource {
    questions: QuestionSet,
}

impl StaticQuestionSource {
    pub fn new(questions: QuestionSet) -> Self {
        Self { questions }
    }

    /// Fixed practice-round questions
    pub fn practice(config: &PracticeConfig) -> Self {
        Self::new(QuestionSet::new(
            Some("Practice".to_string()),
            config.questions.clone(),
        ))
    }

    /// Parse a template document, or one question per non-empty line
    pub fn from_text(text: &str) -> Result<Self> {
        if text.trim_start().starts_with('{') {
            let questions = InterviewTemplate::from_json(text)?.into_question_set();
            return Ok(Self::new(questions));
        }

        let questions = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Ok(Self::new(QuestionSet::new(None, questions)))
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch_questions(&self, _template_id: &str) -> Result<QuestionSet> {
        Ok(self.questions.clone())
    }
}

/// Fetch questions, falling back to an empty set on failure
pub async fn load_questions(source: &dyn QuestionSource, template_id: &str) -> QuestionSet {
    match source.fetch_questions(template_id).await {
        Ok(questions) => {
            if questions.is_empty() {
                tracing::warn!(template_id, "Template has no questions");
            }
            questions
        },
        Err(e) => {
            tracing::warn!(template_id, error = %e, "Failed to load questions, continuing without any");
            QuestionSet::empty()
        },
    }
}
