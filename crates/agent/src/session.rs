//! Interview session driver
//!
//! Connects the state machine to its collaborators. Utterances are handled
//! one at a time: classify, run one transition, speak, then accept the next
//! utterance.
//!
//! The introduction auto-start timer and the first candidate utterance
//! race for a single-use flag; only the winner may move the interview out
//! of the introduction.

use chrono::{DateTime, Utc};
use interview_config::{InterviewMode, Settings};
use interview_core::{
    InterviewAction, InterviewEvent, InterviewStage, QuestionSource, SpeechOutput,
    UtteranceClassifier,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::question_bank::{load_questions, StaticQuestionSource, DEFAULT_JOB_TITLE};
use crate::{
    InterviewError, InterviewState, InterviewStateMachine, InterviewSummary, Phase, Result,
    StageTransition,
};

/// Build the initial state for a session
///
/// Practice mode ignores `source` and uses the configured practice
/// questions. An explicit `role` wins over the template's title.
pub async fn initial_state(
    settings: &Settings,
    candidate_name: &str,
    role: Option<&str>,
    source: &dyn QuestionSource,
    template_id: &str,
) -> InterviewState {
    let questions = match settings.interview.mode {
        InterviewMode::Practice => {
            let practice = StaticQuestionSource::practice(&settings.practice);
            load_questions(&practice, template_id).await
        },
        InterviewMode::Standard => load_questions(source, template_id).await,
    };

    let role = role
        .map(str::to_string)
        .or(questions.role_title)
        .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string());

    tracing::info!(
        candidate = candidate_name,
        role = %role,
        questions = questions.questions.len(),
        mode = ?settings.interview.mode,
        "Prepared interview"
    );

    InterviewState::new(candidate_name, role, questions.questions)
}

struct Conversation {
    machine: InterviewStateMachine,
    /// `None` once the interview is completed
    phase: Option<Phase>,
}

struct SessionInner {
    interview_id: Uuid,
    started_at: DateTime<Utc>,
    conversation: Mutex<Conversation>,
    classifier: Arc<dyn UtteranceClassifier>,
    speech: Arc<dyn SpeechOutput>,
    /// Taken by whichever of the timer and the first utterance comes first
    introduction_claimed: AtomicBool,
    auto_start: parking_lot::Mutex<Option<JoinHandle<()>>>,
    summary_logged: AtomicBool,
}

impl SessionInner {
    /// Stop the auto-start timer from acting
    fn claim_introduction(&self) {
        if !self.introduction_claimed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Introduction claimed by candidate utterance");
        }
        if let Some(handle) = self.auto_start.lock().take() {
            handle.abort();
        }
    }

    async fn fire_auto_start(&self) {
        if self.introduction_claimed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Auto-start skipped, candidate spoke first");
            return;
        }

        let mut conversation = self.conversation.lock().await;
        if conversation.phase != Some(Phase::Introduction) {
            return;
        }

        tracing::info!("Candidate silent after introduction, starting automatically");
        match Phase::Introduction.reply(&mut conversation.machine, InterviewEvent::AutoStart) {
            Ok(outcome) => {
                conversation.phase = outcome.next;
                self.execute(&outcome.actions).await;
            },
            Err(e) => tracing::warn!(error = %e, "Auto-start rejected"),
        }
    }

    async fn execute(&self, actions: &[InterviewAction]) {
        for action in actions {
            match action {
                InterviewAction::Speak {
                    text,
                    allow_interruptions,
                } => {
                    if let Err(e) = self.speech.say(text, *allow_interruptions).await {
                        tracing::warn!(error = %e, "Speech output failed");
                    }
                },
                InterviewAction::EndInterview => {
                    tracing::info!(interview_id = %self.interview_id, "Interview ended");
                },
            }
        }
    }

    fn summary(&self, machine: &InterviewStateMachine) -> InterviewSummary {
        InterviewSummary::from_machine(self.interview_id, machine, self.started_at, Utc::now())
    }

    fn log_summary_once(&self, machine: &InterviewStateMachine) {
        if !self.summary_logged.swap(true, Ordering::SeqCst) {
            self.summary(machine).log();
        }
    }
}

/// One live interview
pub struct InterviewSession {
    inner: Arc<SessionInner>,
}

impl InterviewSession {
    pub fn new(
        machine: InterviewStateMachine,
        classifier: Arc<dyn UtteranceClassifier>,
        speech: Arc<dyn SpeechOutput>,
    ) -> Self {
        let phase = Phase::for_stage(machine.stage());
        Self {
            inner: Arc::new(SessionInner {
                interview_id: Uuid::new_v4(),
                started_at: Utc::now(),
                conversation: Mutex::new(Conversation { machine, phase }),
                classifier,
                speech,
                introduction_claimed: AtomicBool::new(false),
                auto_start: parking_lot::Mutex::new(None),
                summary_logged: AtomicBool::new(false),
            }),
        }
    }

    pub fn interview_id(&self) -> Uuid {
        self.inner.interview_id
    }

    /// Speak the introduction and arm the auto-start timer
    pub async fn start(&self) -> Result<()> {
        let delay = {
            let conversation = self.inner.conversation.lock().await;
            let actions = conversation.machine.introduce()?;
            tracing::info!(
                interview_id = %self.inner.interview_id,
                candidate = %conversation.machine.state().candidate_name,
                "Starting interview"
            );
            self.inner.execute(&actions).await;

            let config = conversation.machine.config();
            config
                .auto_start_enabled()
                .then(|| Duration::from_millis(config.auto_start_delay_ms))
        };

        if let Some(delay) = delay {
            self.arm_auto_start(delay);
        }
        Ok(())
    }

    fn arm_auto_start(&self, delay: Duration) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.fire_auto_start().await;
        });

        let mut slot = self.inner.auto_start.lock();
        if self.inner.introduction_claimed.load(Ordering::SeqCst) {
            handle.abort();
        } else {
            *slot = Some(handle);
        }
    }

    /// Handle one candidate utterance
    ///
    /// Returns the actions that were executed. Rejected events leave the
    /// interview untouched.
    pub async fn handle_utterance(&self, utterance: &str) -> Result<Vec<InterviewAction>> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Ok(Vec::new());
        }

        self.inner.claim_introduction();

        let mut conversation = self.inner.conversation.lock().await;
        let Some(phase) = conversation.phase else {
            return Err(InterviewError::Completed);
        };

        let prompt = conversation.machine.current_prompt().to_string();
        let event = phase
            .interpret(self.inner.classifier.as_ref(), &prompt, utterance)
            .await;

        let outcome = phase
            .reply(&mut conversation.machine, event)
            .map_err(|e| {
                tracing::warn!(error = %e, phase = ?phase, "Rejected interview event");
                e
            })?;

        conversation.phase = outcome.next;
        self.inner.execute(&outcome.actions).await;

        if conversation.phase.is_none() {
            self.inner.log_summary_once(&conversation.machine);
        }

        Ok(outcome.actions)
    }

    /// Tear the session down and return its summary
    ///
    /// Safe to call at any point, including after the interview completed.
    pub async fn end(&self) -> InterviewSummary {
        self.inner.claim_introduction();

        let mut conversation = self.inner.conversation.lock().await;
        if !conversation.machine.is_completed() {
            if let Err(e) = conversation.machine.handle(InterviewEvent::SessionEnded) {
                tracing::warn!(error = %e, "Session end rejected");
            }
            conversation.phase = None;
        }

        self.inner.log_summary_once(&conversation.machine);
        self.inner.summary(&conversation.machine)
    }

    pub async fn stage(&self) -> InterviewStage {
        self.inner.conversation.lock().await.machine.stage()
    }

    pub async fn phase(&self) -> Option<Phase> {
        self.inner.conversation.lock().await.phase
    }

    pub async fn is_completed(&self) -> bool {
        self.inner.conversation.lock().await.machine.is_completed()
    }

    /// Snapshot of the interview state
    pub async fn state(&self) -> InterviewState {
        self.inner.conversation.lock().await.machine.state().clone()
    }

    pub async fn history(&self) -> Vec<StageTransition> {
        self.inner
            .conversation
            .lock()
            .await
            .machine
            .history()
            .to_vec()
    }
}

impl Drop for InterviewSession {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.auto_start.lock().take() {
            handle.abort();
        }
    }
}
