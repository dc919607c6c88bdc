//! Interview template payloads
//!
//! The template store returns skills and questions as separate lists; questions
//! are flattened in skill order. Question content is sometimes a JSON object
//! of the form `{"question": "..."}` and is unwrapped.

use interview_core::{Error, QuestionSet, Result};
use serde::Deserialize;

/// Role title used when a template has none
pub const DEFAULT_JOB_TITLE: &str = "Technical Role";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewTemplate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    /// Planned length in minutes
    #[serde(default)]
    pub interview_length: Option<u32>,
    #[serde(default)]
    pub skills: Vec<TemplateSkill>,
    #[serde(default)]
    pub questions: Vec<TemplateQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSkill {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuestion {
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
struct WrappedQuestion {
    question: String,
}

impl InterviewTemplate {
    /// Parse a template from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidTemplate(e.to_string()))
    }

    /// Flatten into presentation order
    ///
    /// Questions whose skill is not listed are dropped.
    pub fn into_question_set(self) -> QuestionSet {
        let mut questions = Vec::with_capacity(self.questions.len());

        for skill in &self.skills {
            let before = questions.len();
            questions.extend(
                self.questions
                    .iter()
                    .filter(|q| q.skill_id.as_deref() == Some(skill.id.as_str()))
                    .map(|q| unwrap_content(&q.content))
                    .filter(|q| !q.is_empty()),
            );
            tracing::debug!(
                skill = skill.name.as_deref().unwrap_or(&skill.id),
                questions = questions.len() - before,
                "Loaded skill questions"
            );
        }

        let orphaned = self
            .questions
            .iter()
            .filter(|q| {
                !self
                    .skills
                    .iter()
                    .any(|s| q.skill_id.as_deref() == Some(s.id.as_str()))
            })
            .count();
        if orphaned > 0 {
            tracing::warn!(orphaned, "Template questions without a listed skill were dropped");
        }

        let role_title = self
            .job_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string());

        QuestionSet::new(Some(role_title), questions)
    }
}

/// Question text, unwrapping `{"question": "..."}` payloads
pub fn unwrap_content(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.starts_with('{') && trimmed.contains("\"question\"") {
        if let Ok(wrapped) = serde_json::from_str::<WrappedQuestion>(trimmed) {
            return wrapped.question.trim().to_string();
        }
    }
    trimmed.to_string()
}
