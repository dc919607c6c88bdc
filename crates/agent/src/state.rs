//! Interview progress record

use interview_core::InterviewStage;
use serde::{Deserialize, Serialize};

/// Mutable progress of one interview
///
/// Owned by [`crate::InterviewStateMachine`]; everything else only reads
/// snapshots of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewState {
    pub candidate_name: String,
    pub role: String,
    /// Fetched once before the interview starts; may be empty
    pub all_questions: Vec<String>,
    /// Next complete question to present; never decreases
    pub current_question_index: usize,

    pub is_multi_part_question: bool,
    pub current_main_scenario: String,
    pub current_tasks: Option<Vec<String>>,
    pub current_task_index: usize,
    pub tasks_are_dependent: bool,
    pub skip_remaining_tasks: bool,

    /// A follow-up is pending for the current task or question
    pub asked_follow_up: bool,
    pub per_question_follow_up_count: u32,
    pub total_follow_up_count: u32,

    pub stage: InterviewStage,

    /// Question, task or follow-up the candidate is currently answering
    pub current_prompt: String,
    /// Complete questions presented so far
    pub questions_presented: usize,
}

impl InterviewState {
    pub fn new(
        candidate_name: impl Into<String>,
        role: impl Into<String>,
        all_questions: Vec<String>,
    ) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            role: role.into(),
            all_questions,
            current_question_index: 0,
            is_multi_part_question: false,
            current_main_scenario: String::new(),
            current_tasks: None,
            current_task_index: 0,
            tasks_are_dependent: false,
            skip_remaining_tasks: false,
            asked_follow_up: false,
            per_question_follow_up_count: 0,
            total_follow_up_count: 0,
            stage: InterviewStage::Introduction,
            current_prompt: String::new(),
            questions_presented: 0,
        }
    }

    /// Clear every multi-part field before a new complete question
    pub fn reset_multi_part(&mut self) {
        self.is_multi_part_question = false;
        self.current_main_scenario.clear();
        self.current_tasks = None;
        self.current_task_index = 0;
        self.tasks_are_dependent = false;
        self.skip_remaining_tasks = false;
    }

    pub fn has_questions_remaining(&self) -> bool {
        self.current_question_index < self.all_questions.len()
    }

    pub fn current_question(&self) -> Option<&str> {
        self.all_questions
            .get(self.current_question_index)
            .map(String::as_str)
    }

    /// Task at the multi-part cursor
    pub fn current_task(&self) -> Option<&str> {
        if !self.is_multi_part_question {
            return None;
        }
        self.current_tasks
            .as_ref()
            .and_then(|tasks| tasks.get(self.current_task_index))
            .map(String::as_str)
    }

    /// Another task of the current question should be presented
    pub fn has_next_task(&self) -> bool {
        if !self.is_multi_part_question || self.skip_remaining_tasks {
            return false;
        }
        self.current_tasks
            .as_ref()
            .is_some_and(|tasks| self.current_task_index + 1 < tasks.len())
    }

    /// An `unknown` answer now skips the rest of the question
    pub fn dependent_skip_applies(&self) -> bool {
        self.is_multi_part_question && self.tasks_are_dependent && self.current_task_index == 0
    }

    pub fn is_completed(&self) -> bool {
        self.stage.is_terminal()
    }
}
