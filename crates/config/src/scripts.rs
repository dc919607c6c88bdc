//! Spoken script templates
//!
//! Templates use `{candidate_name}`, `{first_name}` and `{role}` placeholders.

use serde::{Deserialize, Serialize};

/// Fixed lines spoken by the interviewer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub introduction: String,
    pub practice_introduction: String,
    pub not_ready: String,
    pub first_transition: String,
    pub next_question_transition: String,
    pub next_part_transition: String,
    /// Used when a partial answer needs a follow-up but none was generated
    pub fallback_follow_up: String,
    pub final_questions: String,
    pub guardrail_reply: String,
    pub closing: String,
    pub practice_closing: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            introduction: "Hey {candidate_name}, welcome! I'm here to interview you for the {role} position. How are you doing today? And are you ready to begin the interview?".into(),
            practice_introduction: "Hey {candidate_name}, welcome! This is a quick practice round to help you get comfortable. How are you doing today? And are you ready to try a couple of easy questions?".into(),
            not_ready: "No rush at all, take the time you need. I'll be right here.".into(),
            first_transition: "Great, let's dive in.".into(),
            next_question_transition: "Alright, let's move to the next question.".into(),
            next_part_transition: "Okay, next part.".into(),
            fallback_follow_up: "Could you walk me through that in a bit more detail?".into(),
            final_questions: "Before we wrap up, {first_name}, do you have any questions for me?".into(),
            guardrail_reply: "I don't have that specific information, but the hiring team can provide all the details you need. Do you have any other questions?".into(),
            closing: "It's been a pleasure talking with you today. Thanks so much for your time. You can end the call whenever you're ready. Take care!".into(),
            practice_closing: "We can wrap up practice here. Thanks for trying it out, you can start the real interview whenever you're ready.".into(),
        }
    }
}

impl ScriptConfig {
    /// Fill placeholders in a template
    pub fn render(template: &str, candidate_name: &str, role: &str) -> String {
        template
            .replace("{candidate_name}", candidate_name)
            .replace("{first_name}", first_name(candidate_name))
            .replace("{role}", role)
    }
}

/// First whitespace-separated word of a name, or the whole name
pub fn first_name(candidate_name: &str) -> &str {
    candidate_name
        .split_whitespace()
        .next()
        .unwrap_or(candidate_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholders() {
        let scripts = ScriptConfig::default();
        let intro = ScriptConfig::render(&scripts.introduction, "Asha Rao", "Data Analyst");
        assert!(intro.starts_with("Hey Asha Rao, welcome!"));
        assert!(intro.contains("the Data Analyst position"));

        let wrap = ScriptConfig::render(&scripts.final_questions, "Asha Rao", "Data Analyst");
        assert_eq!(
            wrap,
            "Before we wrap up, Asha, do you have any questions for me?"
        );
    }

    #[test]
    fn test_first_name_of_blank_name() {
        assert_eq!(first_name(""), "");
        assert_eq!(first_name("  Ravi  Kumar "), "Ravi");
    }
}
