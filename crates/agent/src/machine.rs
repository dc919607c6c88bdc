//! Interview State Machine
//!
//! A single transition function, [`InterviewStateMachine::handle`], consumes
//! one [`InterviewEvent`] and returns the actions to execute. All spoken
//! text leaves through [`SpeechFormatter`].
//!
//! Stage graph (every non-terminal stage may also end in `Completed`):
//!
//! ```text
//! Introduction --ready--> Question --answer--> FollowUp
//!      |                   |    ^                 |
//!      |                   v    | next task/question
//!      |                  MovingOn <--------------+
//!      | no questions      | questions exhausted
//!      v                   v
//!    FinalQuestions --no more questions--> Completed
//! ```

use chrono::{DateTime, Utc};
use interview_config::interview::{MAX_FOLLOW_UPS_PER_QUESTION, MAX_TOTAL_FOLLOW_UPS};
use interview_config::{InterviewConfig, InterviewMode, ScriptConfig, Settings};
use interview_core::{Classification, InterviewAction, InterviewEvent, InterviewStage, Verdict};
use interview_text_processing::{DependencyClassifier, QuestionSegmenter, SpeechFormatter};
use serde::{Deserialize, Serialize};

use crate::{InterviewError, InterviewState, Result};

/// Why a stage change happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    CandidateReady,
    AutoStart,
    FollowUpRequested,
    AnswerAccepted,
    UnknownAnswer,
    /// `unknown` on the first task of a dependent question
    DependentSkip,
    NextTask,
    NextQuestion,
    QuestionsExhausted,
    CandidateDone,
    SessionEnded,
}

/// One recorded stage change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: InterviewStage,
    pub to: InterviewStage,
    pub reason: TransitionReason,
    pub at: DateTime<Utc>,
}

/// The interview controller
pub struct InterviewStateMachine {
    state: InterviewState,
    config: InterviewConfig,
    scripts: ScriptConfig,
    segmenter: QuestionSegmenter,
    dependency: DependencyClassifier,
    formatter: SpeechFormatter,
    history: Vec<StageTransition>,
}

impl InterviewStateMachine {
    /// Create a machine from loaded settings
    pub fn new(state: InterviewState, settings: &Settings) -> Self {
        Self::with_parts(
            state,
            settings.interview.clone(),
            settings.scripts.clone(),
            DependencyClassifier::new(settings.lexicon.clone()),
        )
    }

    pub fn with_parts(
        state: InterviewState,
        config: InterviewConfig,
        scripts: ScriptConfig,
        dependency: DependencyClassifier,
    ) -> Self {
        Self {
            state,
            config,
            scripts,
            segmenter: QuestionSegmenter::new(),
            dependency,
            formatter: SpeechFormatter::new(),
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    pub fn stage(&self) -> InterviewStage {
        self.state.stage
    }

    pub fn config(&self) -> &InterviewConfig {
        &self.config
    }

    pub fn history(&self) -> &[StageTransition] {
        &self.history
    }

    /// Prompt the candidate is currently answering, unformatted
    pub fn current_prompt(&self) -> &str {
        &self.state.current_prompt
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Introduction entry action: greet the candidate
    pub fn introduce(&self) -> Result<Vec<InterviewAction>> {
        if self.state.stage != InterviewStage::Introduction {
            return Err(InterviewError::InvalidTransition {
                stage: self.state.stage,
                event: "introduce",
            });
        }

        let template = match self.config.mode {
            InterviewMode::Practice => &self.scripts.practice_introduction,
            InterviewMode::Standard => &self.scripts.introduction,
        };
        Ok(vec![self.say(&self.render(template))])
    }

    /// Run one transition
    ///
    /// Events that are not valid in the current stage are rejected before
    /// any state is touched.
    pub fn handle(&mut self, event: InterviewEvent) -> Result<Vec<InterviewAction>> {
        use InterviewStage as S;

        let stage = self.state.stage;
        if stage.is_terminal() {
            return Err(InterviewError::Completed);
        }

        tracing::debug!(stage = %stage, event = event.name(), "Handling interview event");

        let actions = match (stage, event) {
            (_, InterviewEvent::SessionEnded) => self.end_session(),
            (S::Introduction, InterviewEvent::Ready) => {
                self.start_questions(TransitionReason::CandidateReady)
            },
            (S::Introduction, InterviewEvent::AutoStart) => {
                self.start_questions(TransitionReason::AutoStart)
            },
            (S::Introduction, InterviewEvent::NotReady) => {
                vec![self.say(&self.render(&self.scripts.not_ready))]
            },
            (S::Question, InterviewEvent::Answer { classification }) => {
                self.on_answer(classification)
            },
            (S::FollowUp, InterviewEvent::Answer { classification }) => {
                self.on_follow_up_answer(classification)
            },
            (S::FinalQuestions, InterviewEvent::CandidateQuestion) => {
                vec![self.say(&self.render(&self.scripts.guardrail_reply))]
            },
            (S::FinalQuestions, InterviewEvent::NoMoreQuestions) => self.close(),
            (stage, event) => {
                return Err(InterviewError::InvalidTransition {
                    stage,
                    event: event.name(),
                })
            },
        };

        Ok(actions)
    }

    fn start_questions(&mut self, reason: TransitionReason) -> Vec<InterviewAction> {
        if !self.state.has_questions_remaining() {
            tracing::info!("No questions to ask, moving to final questions");
            return self.enter_final_questions(reason);
        }

        self.transition(InterviewStage::Question, reason);
        let lead = self.scripts.first_transition.clone();
        vec![self.present_question(&lead)]
    }

    /// Question entry action
    fn present_question(&mut self, lead: &str) -> InterviewAction {
        let body = match self.state.current_task().map(str::to_string) {
            Some(task) => task,
            None => self.load_question(),
        };

        tracing::info!(
            question_index = self.state.current_question_index,
            task_index = self.state.current_task_index,
            multi_part = self.state.is_multi_part_question,
            "Presenting question"
        );

        let line = join_lines(lead, &body);
        self.state.current_prompt = body;
        self.say(&line)
    }

    /// Segment the question at the cursor and return its opening line
    fn load_question(&mut self) -> String {
        let raw = self
            .state
            .current_question()
            .unwrap_or_default()
            .to_string();
        self.state.questions_presented += 1;

        let segmented = self.segmenter.segment(&raw);
        if !segmented.is_multi_part() {
            return raw;
        }

        let dependent = self.dependency.is_dependent(&segmented.tasks);
        let first_task = segmented.tasks.first().cloned().unwrap_or_default();
        let opening = join_lines(&segmented.scenario, &first_task);

        self.state.is_multi_part_question = true;
        self.state.current_main_scenario = segmented.scenario;
        self.state.current_tasks = Some(segmented.tasks);
        self.state.current_task_index = 0;
        self.state.tasks_are_dependent = dependent;
        self.state.skip_remaining_tasks = false;

        opening
    }

    fn on_answer(&mut self, classification: Classification) -> Vec<InterviewAction> {
        match classification.verdict {
            Verdict::Unknown => self.on_unknown(),
            Verdict::Complete | Verdict::Partial => match self.follow_up_for(classification) {
                Some(text) if self.can_ask_follow_up() => self.ask_follow_up(text),
                _ => self.advance(TransitionReason::AnswerAccepted),
            },
        }
    }

    fn on_follow_up_answer(&mut self, classification: Classification) -> Vec<InterviewAction> {
        match classification.verdict {
            Verdict::Unknown => self.on_unknown(),
            Verdict::Complete | Verdict::Partial => self.advance(TransitionReason::AnswerAccepted),
        }
    }

    fn on_unknown(&mut self) -> Vec<InterviewAction> {
        if self.state.dependent_skip_applies() {
            self.state.skip_remaining_tasks = true;
            tracing::info!(
                question_index = self.state.current_question_index,
                "First task of a dependent question unanswered, skipping remaining tasks"
            );
            return self.advance(TransitionReason::DependentSkip);
        }
        self.advance(TransitionReason::UnknownAnswer)
    }

    /// Follow-up text for an answer, if one is wanted
    ///
    /// `partial` always wants one (generated or fallback); `complete` only
    /// when the classifier generated one.
    fn follow_up_for(&self, classification: Classification) -> Option<String> {
        let text = match classification.verdict {
            Verdict::Partial => classification
                .follow_up
                .or_else(|| Some(self.scripts.fallback_follow_up.clone())),
            Verdict::Complete => classification.follow_up,
            Verdict::Unknown => None,
        };
        text.filter(|t| !t.trim().is_empty())
    }

    fn can_ask_follow_up(&self) -> bool {
        let per_question = self
            .config
            .max_follow_ups_per_question
            .min(MAX_FOLLOW_UPS_PER_QUESTION);
        let total = self.config.max_total_follow_ups.min(MAX_TOTAL_FOLLOW_UPS);

        !self.state.asked_follow_up
            && self.state.per_question_follow_up_count < per_question
            && self.state.total_follow_up_count < total
    }

    /// FollowUp entry action
    fn ask_follow_up(&mut self, text: String) -> Vec<InterviewAction> {
        self.transition(InterviewStage::FollowUp, TransitionReason::FollowUpRequested);
        self.state.per_question_follow_up_count += 1;
        self.state.total_follow_up_count += 1;
        self.state.asked_follow_up = true;

        tracing::info!(
            per_question = self.state.per_question_follow_up_count,
            total = self.state.total_follow_up_count,
            "Asking follow-up"
        );

        let action = self.say(&text);
        self.state.current_prompt = text;
        vec![action]
    }

    /// Move to the next task, the next question, or final questions
    fn advance(&mut self, reason: TransitionReason) -> Vec<InterviewAction> {
        self.state.asked_follow_up = false;
        self.transition(InterviewStage::MovingOn, reason);

        if self.state.has_next_task() {
            self.state.current_task_index += 1;
            self.transition(InterviewStage::Question, TransitionReason::NextTask);
            let lead = self.scripts.next_part_transition.clone();
            return vec![self.present_question(&lead)];
        }

        self.state.reset_multi_part();
        self.state.current_question_index += 1;
        self.state.per_question_follow_up_count = 0;

        if !self.state.has_questions_remaining() {
            return self.enter_final_questions(TransitionReason::QuestionsExhausted);
        }

        self.transition(InterviewStage::Question, TransitionReason::NextQuestion);
        let lead = self.scripts.next_question_transition.clone();
        vec![self.present_question(&lead)]
    }

    /// FinalQuestions entry action
    fn enter_final_questions(&mut self, reason: TransitionReason) -> Vec<InterviewAction> {
        self.transition(InterviewStage::FinalQuestions, reason);

        let prompt = self.render(&self.scripts.final_questions);
        let action = self.say(&prompt);
        self.state.current_prompt = prompt;
        vec![action]
    }

    fn close(&mut self) -> Vec<InterviewAction> {
        let template = match self.config.mode {
            InterviewMode::Practice => &self.scripts.practice_closing,
            InterviewMode::Standard => &self.scripts.closing,
        };
        let text = self.formatter.format(&self.render(template));

        self.transition(InterviewStage::Completed, TransitionReason::CandidateDone);

        vec![
            InterviewAction::Speak {
                text,
                allow_interruptions: false,
            },
            InterviewAction::EndInterview,
        ]
    }

    fn end_session(&mut self) -> Vec<InterviewAction> {
        self.transition(InterviewStage::Completed, TransitionReason::SessionEnded);
        vec![InterviewAction::EndInterview]
    }

    fn transition(&mut self, to: InterviewStage, reason: TransitionReason) {
        let from = self.state.stage;
        debug_assert!(
            from.can_transition_to(to),
            "invalid stage transition {:?} -> {:?}",
            from,
            to
        );

        self.state.stage = to;
        self.history.push(StageTransition {
            from,
            to,
            reason,
            at: Utc::now(),
        });

        tracing::info!(from = %from, to = %to, ?reason, "Stage transition");
    }

    fn render(&self, template: &str) -> String {
        ScriptConfig::render(template, &self.state.candidate_name, &self.state.role)
    }

    fn say(&self, text: &str) -> InterviewAction {
        InterviewAction::speak(self.formatter.format(text))
    }
}

/// Join two speech fragments with a single space, skipping empty ones
fn join_lines(first: &str, second: &str) -> String {
    match (first.trim(), second.trim()) {
        ("", b) => b.to_string(),
        (a, "") => a.to_string(),
        (a, b) => format!("{} {}", a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPENDENT: &str = "1. What is X? 2. What is Y, based on your answer to 1?";

    fn machine(questions: &[&str]) -> InterviewStateMachine {
        let state = InterviewState::new(
            "Asha Rao",
            "Data Analyst",
            questions.iter().map(|q| q.to_string()).collect(),
        );
        InterviewStateMachine::new(state, &Settings::default())
    }

    fn spoken(actions: &[InterviewAction]) -> &str {
        actions
            .iter()
            .find_map(InterviewAction::spoken_text)
            .unwrap_or_default()
    }

    fn answer(classification: Classification) -> InterviewEvent {
        InterviewEvent::answer(classification)
    }

    #[test]
    fn test_introduction_text() {
        let m = machine(&["Q1"]);
        let actions = m.introduce().unwrap();
        assert!(spoken(&actions).starts_with("Hey Asha Rao, welcome!"));
        assert!(spoken(&actions).contains("Data Analyst"));
    }

    #[test]
    fn test_practice_introduction() {
        let mut settings = Settings::default();
        settings.interview.mode = InterviewMode::Practice;
        let m = InterviewStateMachine::new(InterviewState::new("Asha", "Analyst", vec![]), &settings);
        assert!(spoken(&m.introduce().unwrap()).contains("practice round"));
    }

    #[test]
    fn test_empty_questions_go_to_final_questions() {
        let mut m = machine(&[]);
        let actions = m.handle(InterviewEvent::Ready).unwrap();

        assert_eq!(m.stage(), InterviewStage::FinalQuestions);
        assert_eq!(
            spoken(&actions),
            "Before we wrap up, Asha, do you have any questions for me?"
        );
        assert_eq!(m.state().questions_presented, 0);
        assert_eq!(m.history().len(), 1);
        assert_eq!(m.history()[0].from, InterviewStage::Introduction);
        assert_eq!(m.history()[0].reason, TransitionReason::CandidateReady);
    }

    #[test]
    fn test_first_question_has_transition_phrase() {
        let mut m = machine(&["Explain TCP."]);
        let actions = m.handle(InterviewEvent::Ready).unwrap();
        assert_eq!(m.stage(), InterviewStage::Question);
        assert_eq!(spoken(&actions), "Great, let's dive in. Explain TCP.");
        assert_eq!(m.current_prompt(), "Explain TCP.");
    }

    #[test]
    fn test_complete_without_follow_up_advances_once() {
        let mut m = machine(&["Explain TCP.", "Explain UDP."]);
        m.handle(InterviewEvent::Ready).unwrap();

        let actions = m.handle(answer(Classification::complete())).unwrap();
        assert_eq!(m.state().current_question_index, 1);
        assert_eq!(m.stage(), InterviewStage::Question);
        assert_eq!(
            spoken(&actions),
            "Alright, let's move to the next question. Explain UDP."
        );
        assert!(m.history().iter().all(|t| t.to != InterviewStage::FollowUp));
    }

    #[test]
    fn test_partial_uses_fallback_follow_up() {
        let mut m = machine(&["Explain TCP."]);
        m.handle(InterviewEvent::Ready).unwrap();

        let actions = m.handle(answer(Classification::partial())).unwrap();
        assert_eq!(m.stage(), InterviewStage::FollowUp);
        assert_eq!(spoken(&actions), Settings::default().scripts.fallback_follow_up);
        assert!(m.state().asked_follow_up);
        assert_eq!(m.state().per_question_follow_up_count, 1);
        assert_eq!(m.state().total_follow_up_count, 1);

        // Answering the follow-up advances, it never asks a second one
        m.handle(answer(Classification::partial())).unwrap();
        assert_eq!(m.stage(), InterviewStage::FinalQuestions);
        assert!(!m.state().asked_follow_up);
    }

    #[test]
    fn test_complete_with_generated_follow_up() {
        let mut m = machine(&["Explain TCP."]);
        m.handle(InterviewEvent::Ready).unwrap();

        let c = Classification::complete().with_follow_up("Why 3 handshakes?");
        let actions = m.handle(answer(c)).unwrap();
        assert_eq!(m.stage(), InterviewStage::FollowUp);
        assert_eq!(spoken(&actions), "Why three handshakes?");
        assert_eq!(m.current_prompt(), "Why 3 handshakes?");
    }

    #[test]
    fn test_dependent_unknown_skips_remaining_tasks() {
        let mut m = machine(&[DEPENDENT, "Tell me about yourself."]);
        let actions = m.handle(InterviewEvent::Ready).unwrap();
        assert_eq!(spoken(&actions), "Great, let's dive in. What is X?");
        assert!(m.state().is_multi_part_question);
        assert!(m.state().tasks_are_dependent);

        let actions = m.handle(answer(Classification::unknown())).unwrap();
        assert_eq!(m.state().current_question_index, 1);
        assert!(!m.state().is_multi_part_question);
        assert_eq!(
            spoken(&actions),
            "Alright, let's move to the next question. Tell me about yourself."
        );
        assert!(m
            .history()
            .iter()
            .any(|t| t.reason == TransitionReason::DependentSkip));
    }

    #[test]
    fn test_independent_unknown_moves_to_next_task() {
        let mut m = machine(&["a) Define churn. b) Define retention."]);
        m.handle(InterviewEvent::Ready).unwrap();
        assert!(!m.state().tasks_are_dependent);

        let actions = m.handle(answer(Classification::unknown())).unwrap();
        assert_eq!(m.state().current_question_index, 0);
        assert_eq!(m.state().current_task_index, 1);
        assert_eq!(spoken(&actions), "Okay, next part. Define retention.");
    }

    #[test]
    fn test_unknown_after_follow_up_on_dependent_first_task() {
        let mut m = machine(&[DEPENDENT]);
        m.handle(InterviewEvent::Ready).unwrap();
        m.handle(answer(Classification::partial())).unwrap();
        assert_eq!(m.stage(), InterviewStage::FollowUp);

        m.handle(answer(Classification::unknown())).unwrap();
        assert_eq!(m.stage(), InterviewStage::FinalQuestions);
        assert_eq!(m.state().current_question_index, 1);
    }

    #[test]
    fn test_follow_up_budget_per_question() {
        let mut m = machine(&["1. Part one here. 2. Part two here. 3. Part three here."]);
        m.handle(InterviewEvent::Ready).unwrap();

        // Task 0 and task 1 each get a follow-up
        for _ in 0..2 {
            m.handle(answer(Classification::partial())).unwrap();
            assert_eq!(m.stage(), InterviewStage::FollowUp);
            m.handle(answer(Classification::partial())).unwrap();
        }
        assert_eq!(m.state().per_question_follow_up_count, 2);

        // Task 2: per-question budget exhausted
        assert_eq!(m.state().current_task_index, 2);
        m.handle(answer(Classification::partial())).unwrap();
        assert_eq!(m.stage(), InterviewStage::FinalQuestions);
        assert_eq!(m.state().total_follow_up_count, 2);
    }

    #[test]
    fn test_spoken_question_is_formatted() {
        let mut m = machine(&["The budget is ₹20,000 and growth is 15%."]);
        let actions = m.handle(InterviewEvent::Ready).unwrap();
        assert_eq!(
            spoken(&actions),
            "Great, let's dive in. The budget is twenty thousand rupees and growth is fifteen percent."
        );
    }

    #[test]
    fn test_not_ready_stays_in_introduction() {
        let mut m = machine(&["Q1"]);
        let actions = m.handle(InterviewEvent::NotReady).unwrap();
        assert_eq!(m.stage(), InterviewStage::Introduction);
        assert!(spoken(&actions).starts_with("No rush at all"));
        assert!(m.history().is_empty());
    }

    #[test]
    fn test_invalid_event_does_not_mutate() {
        let mut m = machine(&["Q1"]);
        let before = m.state().clone();

        let err = m.handle(answer(Classification::complete())).unwrap_err();
        assert!(matches!(
            err,
            InterviewError::InvalidTransition {
                stage: InterviewStage::Introduction,
                event: "answer"
            }
        ));
        assert_eq!(m.state(), &before);

        m.handle(InterviewEvent::Ready).unwrap();
        assert!(m.handle(InterviewEvent::AutoStart).is_err());
        assert!(m.handle(InterviewEvent::NoMoreQuestions).is_err());
        assert_eq!(m.stage(), InterviewStage::Question);
    }

    #[test]
    fn test_final_questions_guardrail_and_close() {
        let mut m = machine(&[]);
        m.handle(InterviewEvent::Ready).unwrap();

        let actions = m.handle(InterviewEvent::CandidateQuestion).unwrap();
        assert_eq!(m.stage(), InterviewStage::FinalQuestions);
        assert!(spoken(&actions).starts_with("I don't have that specific information"));

        let actions = m.handle(InterviewEvent::NoMoreQuestions).unwrap();
        assert_eq!(m.stage(), InterviewStage::Completed);
        assert!(matches!(
            actions[0],
            InterviewAction::Speak {
                allow_interruptions: false,
                ..
            }
        ));
        assert_eq!(actions[1], InterviewAction::EndInterview);
    }

    #[test]
    fn test_completed_rejects_everything() {
        let mut m = machine(&["Q1"]);
        m.handle(InterviewEvent::Ready).unwrap();
        m.handle(InterviewEvent::SessionEnded).unwrap();
        assert!(m.is_completed());

        let before = m.state().clone();
        for event in [
            InterviewEvent::Ready,
            InterviewEvent::answer(Classification::complete()),
            InterviewEvent::SessionEnded,
        ] {
            assert!(matches!(m.handle(event), Err(InterviewError::Completed)));
        }
        assert_eq!(m.state(), &before);
        assert!(m.introduce().is_err());
    }

    #[test]
    fn test_moving_on_is_recorded() {
        let mut m = machine(&["Q1", "Q2"]);
        m.handle(InterviewEvent::Ready).unwrap();
        m.handle(answer(Classification::complete())).unwrap();

        let stages: Vec<_> = m.history().iter().map(|t| t.to).collect();
        assert_eq!(
            stages,
            vec![
                InterviewStage::Question,
                InterviewStage::MovingOn,
                InterviewStage::Question
            ]
        );
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines("", " b "), "b");
        assert_eq!(join_lines("a", ""), "a");
        assert_eq!(join_lines("a.", "b"), "a. b");
    }
}
