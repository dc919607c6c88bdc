//! Phase handlers
//!
//! Each phase decides which classifier capability interprets a candidate
//! utterance, feeds the resulting event through the state machine and
//! returns the phase for the resulting stage (`None` once the interview is
//! completed).

use interview_core::{
    Classification, ClosingSignal, InterviewAction, InterviewEvent, InterviewStage, Readiness,
    UtteranceClassifier,
};
use serde::{Deserialize, Serialize};

use crate::{InterviewError, InterviewStateMachine, Result};

/// Conversation phase awaiting a candidate utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Introduction,
    Question,
    FollowUp,
    FinalQuestions,
}

/// Result of handling one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseOutcome {
    pub actions: Vec<InterviewAction>,
    /// Phase to activate next; `None` when the interview is over
    pub next: Option<Phase>,
}

impl Phase {
    /// Phase bound to a stage
    ///
    /// `MovingOn` never rests; if observed it is treated as `Question`.
    pub fn for_stage(stage: InterviewStage) -> Option<Self> {
        match stage {
            InterviewStage::Introduction => Some(Phase::Introduction),
            InterviewStage::Question | InterviewStage::MovingOn => Some(Phase::Question),
            InterviewStage::FollowUp => Some(Phase::FollowUp),
            InterviewStage::FinalQuestions => Some(Phase::FinalQuestions),
            InterviewStage::Completed => None,
        }
    }

    pub fn stage(&self) -> InterviewStage {
        match self {
            Phase::Introduction => InterviewStage::Introduction,
            Phase::Question => InterviewStage::Question,
            Phase::FollowUp => InterviewStage::FollowUp,
            Phase::FinalQuestions => InterviewStage::FinalQuestions,
        }
    }

    /// Reduce an utterance into an event for this phase
    ///
    /// Classifier failures never stall the interview: an unreadable answer
    /// counts as `partial`, unreadable readiness as ready, and an unreadable
    /// closing reply as "no more questions".
    pub async fn interpret(
        &self,
        classifier: &dyn UtteranceClassifier,
        prompt: &str,
        utterance: &str,
    ) -> InterviewEvent {
        match self {
            Phase::Introduction => match classifier.detect_readiness(utterance).await {
                Ok(Readiness::Ready) => InterviewEvent::Ready,
                Ok(Readiness::NotReady) => InterviewEvent::NotReady,
                Err(e) => {
                    tracing::warn!(classifier = classifier.name(), error = %e, "Readiness detection failed, assuming ready");
                    InterviewEvent::Ready
                },
            },
            Phase::Question | Phase::FollowUp => {
                let classification = classifier
                    .classify_answer(prompt, utterance)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!(classifier = classifier.name(), error = %e, "Answer classification failed, treating as partial");
                        Classification::partial()
                    });
                InterviewEvent::answer(classification)
            },
            Phase::FinalQuestions => match classifier.detect_closing(utterance).await {
                Ok(ClosingSignal::HasQuestion) => InterviewEvent::CandidateQuestion,
                Ok(ClosingSignal::NoMoreQuestions) => InterviewEvent::NoMoreQuestions,
                Err(e) => {
                    tracing::warn!(classifier = classifier.name(), error = %e, "Closing detection failed, wrapping up");
                    InterviewEvent::NoMoreQuestions
                },
            },
        }
    }

    /// Dispatch an event and yield the next phase
    pub fn reply(
        self,
        machine: &mut InterviewStateMachine,
        event: InterviewEvent,
    ) -> Result<PhaseOutcome> {
        let stage = machine.stage();
        if Phase::for_stage(stage) != Some(self) && event != InterviewEvent::SessionEnded {
            return Err(if stage.is_terminal() {
                InterviewError::Completed
            } else {
                InterviewError::InvalidTransition {
                    stage,
                    event: event.name(),
                }
            });
        }

        let actions = machine.handle(event)?;
        Ok(PhaseOutcome {
            actions,
            next: Phase::for_stage(machine.stage()),
        })
    }
}
