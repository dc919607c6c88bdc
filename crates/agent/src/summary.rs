//! End-of-interview summary record
//!
//! Emitted once as a structured log line; it is not persisted.

use chrono::{DateTime, Utc};
use interview_config::InterviewMode;
use interview_core::InterviewStage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::InterviewStateMachine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSummary {
    pub interview_id: Uuid,
    pub candidate_name: String,
    pub role: String,
    pub mode: InterviewMode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub questions_total: usize,
    pub questions_presented: usize,
    pub follow_ups_asked: u32,
    pub stage_transitions: usize,
    pub final_stage: InterviewStage,
}

impl InterviewSummary {
    pub fn from_machine(
        interview_id: Uuid,
        machine: &InterviewStateMachine,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let state = machine.state();
        let elapsed = end_time.signed_duration_since(start_time);

        Self {
            interview_id,
            candidate_name: state.candidate_name.clone(),
            role: state.role.clone(),
            mode: machine.config().mode,
            start_time,
            end_time,
            duration_minutes: (elapsed.num_milliseconds().max(0) as f64 / 60_000.0 * 100.0).round()
                / 100.0,
            questions_total: state.all_questions.len(),
            questions_presented: state.questions_presented,
            follow_ups_asked: state.total_follow_up_count,
            stage_transitions: machine.history().len(),
            final_stage: state.stage,
        }
    }

    /// Emit as a single structured log line
    pub fn log(&self) {
        match serde_json::to_string(self) {
            Ok(json) => tracing::info!(
                interview_id = %self.interview_id,
                summary = %json,
                "Interview summary"
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize interview summary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterviewState;
    use chrono::Duration;
    use interview_config::Settings;
    use interview_core::{Classification, InterviewEvent};

    #[test]
    fn test_summary_from_machine() {
        let state = InterviewState::new("Asha Rao", "Data Analyst", vec!["Q1".into(), "Q2".into()]);
        let mut machine = InterviewStateMachine::new(state, &Settings::default());
        machine.handle(InterviewEvent::Ready).unwrap();
        machine
            .handle(InterviewEvent::answer(Classification::partial()))
            .unwrap();

        let start = Utc::now();
        let end = start + Duration::seconds(90);
        let summary = InterviewSummary::from_machine(Uuid::new_v4(), &machine, start, end);

        assert_eq!(summary.duration_minutes, 1.5);
        assert_eq!(summary.questions_total, 2);
        assert_eq!(summary.questions_presented, 1);
        assert_eq!(summary.follow_ups_asked, 1);
        assert_eq!(summary.final_stage, InterviewStage::FollowUp);
        assert_eq!(summary.mode, InterviewMode::Standard);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["final_stage"], "follow_up");
        assert_eq!(json["candidate_name"], "Asha Rao");
    }
}
