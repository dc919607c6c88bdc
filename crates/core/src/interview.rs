//! Interview stages, events and actions
//!
//! The controller is event-driven: an external classifier reduces each
//! candidate utterance into an [`InterviewEvent`], the state machine runs
//! one transition, and the resulting [`InterviewAction`]s are executed by
//! the session driver.

use serde::{Deserialize, Serialize};

/// Interview stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStage {
    /// Greeting, waiting for the candidate to be ready
    #[default]
    Introduction,
    /// Presenting a question or one task of a multi-part question
    Question,
    /// A follow-up has been asked and its answer is pending
    FollowUp,
    /// Transient stage while advancing to the next task or question
    MovingOn,
    /// Candidate may ask their own questions
    FinalQuestions,
    /// Terminal
    Completed,
}

impl InterviewStage {
    /// Get stage display name
    pub fn display_name(&self) -> &'static str {
        match self {
            InterviewStage::Introduction => "Introduction",
            InterviewStage::Question => "Question",
            InterviewStage::FollowUp => "Follow-up",
            InterviewStage::MovingOn => "Moving On",
            InterviewStage::FinalQuestions => "Final Questions",
            InterviewStage::Completed => "Completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InterviewStage::Completed)
    }

    /// Stages reachable from this one
    ///
    /// `Completed` is reachable from every non-terminal stage through
    /// session teardown.
    pub fn valid_transitions(&self) -> &'static [InterviewStage] {
        use InterviewStage::*;
        match self {
            Introduction => &[Question, FinalQuestions, Completed],
            Question => &[FollowUp, MovingOn, Completed],
            FollowUp => &[MovingOn, Completed],
            MovingOn => &[Question, FinalQuestions, Completed],
            FinalQuestions => &[Completed],
            Completed => &[],
        }
    }

    pub fn can_transition_to(&self, to: InterviewStage) -> bool {
        self.valid_transitions().contains(&to)
    }
}

impl std::fmt::Display for InterviewStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Reduced judgement of a candidate's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The answer addresses the question
    Complete,
    /// The answer is incomplete or ambiguous
    #[default]
    Partial,
    /// The candidate does not know
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Complete => "complete",
            Verdict::Partial => "partial",
            Verdict::Unknown => "unknown",
        }
    }
}

/// Classifier output for one answer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: Verdict,
    /// Generated follow-up question, if the classifier wants one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

impl Classification {
    pub fn complete() -> Self {
        Self {
            verdict: Verdict::Complete,
            follow_up: None,
        }
    }

    pub fn partial() -> Self {
        Self {
            verdict: Verdict::Partial,
            follow_up: None,
        }
    }

    pub fn unknown() -> Self {
        Self {
            verdict: Verdict::Unknown,
            follow_up: None,
        }
    }

    /// Attach a generated follow-up question
    pub fn with_follow_up(mut self, question: impl Into<String>) -> Self {
        let question = question.into();
        self.follow_up = if question.trim().is_empty() {
            None
        } else {
            Some(question)
        };
        self
    }
}

/// Whether the candidate is ready to begin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    NotReady,
}

/// Candidate response to "do you have any questions for me?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingSignal {
    NoMoreQuestions,
    HasQuestion,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterviewEvent {
    /// Candidate signalled readiness
    Ready,
    /// Candidate asked for more time
    NotReady,
    /// Introduction timer fired before the candidate spoke
    AutoStart,
    /// Candidate answered the current question, task or follow-up
    Answer { classification: Classification },
    /// Candidate asked the interviewer a question during final questions
    CandidateQuestion,
    /// Candidate has no more questions
    NoMoreQuestions,
    /// Session torn down externally
    SessionEnded,
}

impl InterviewEvent {
    /// Create an answer event
    pub fn answer(classification: Classification) -> Self {
        Self::Answer { classification }
    }

    /// Short name for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            InterviewEvent::Ready => "ready",
            InterviewEvent::NotReady => "not_ready",
            InterviewEvent::AutoStart => "auto_start",
            InterviewEvent::Answer { .. } => "answer",
            InterviewEvent::CandidateQuestion => "candidate_question",
            InterviewEvent::NoMoreQuestions => "no_more_questions",
            InterviewEvent::SessionEnded => "session_ended",
        }
    }
}

/// Actions to execute after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterviewAction {
    /// Speak a line of already formatted text
    Speak {
        text: String,
        allow_interruptions: bool,
    },
    /// The interview reached its terminal stage
    EndInterview,
}

impl InterviewAction {
    /// Create an interruptible speak action
    pub fn speak(text: impl Into<String>) -> Self {
        Self::Speak {
            text: text.into(),
            allow_interruptions: true,
        }
    }

    /// Text of a speak action
    pub fn spoken_text(&self) -> Option<&str> {
        match self {
            InterviewAction::Speak { text, .. } => Some(text.as_str()),
            InterviewAction::EndInterview => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_follow_up_is_dropped() {
        let c = Classification::partial().with_follow_up("   ");
        assert!(c.follow_up.is_none());

        let c = Classification::complete().with_follow_up("Why that index?");
        assert_eq!(c.follow_up.as_deref(), Some("Why that index?"));
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(InterviewStage::Completed.is_terminal());
        assert!(InterviewStage::Completed.valid_transitions().is_empty());
        assert!(InterviewStage::Introduction.can_transition_to(InterviewStage::FinalQuestions));
        assert!(!InterviewStage::FinalQuestions.can_transition_to(InterviewStage::Question));
    }

    #[test]
    fn test_event_serialization() {
        let event = InterviewEvent::answer(Classification::unknown());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"answer","classification":{"verdict":"unknown"}}"#);
        assert_eq!(event.name(), "answer");
    }

    #[test]
    fn test_speak_action() {
        let action = InterviewAction::speak("Hello!");
        assert_eq!(action.spoken_text(), Some("Hello!"));
        assert_eq!(InterviewAction::EndInterview.spoken_text(), None);
    }
}
