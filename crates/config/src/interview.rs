//! Interview pacing configuration

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Hard ceiling on follow-ups for one question
pub const MAX_FOLLOW_UPS_PER_QUESTION: u32 = 2;
/// Hard ceiling on follow-ups for a whole interview
pub const MAX_TOTAL_FOLLOW_UPS: u32 = 6;

/// Which question list and scripts a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    /// Questions come from the template store
    #[default]
    Standard,
    /// Fixed warm-up questions and practice scripts
    Practice,
}

/// Interview controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Follow-ups allowed per question (1..=2)
    #[serde(default = "default_per_question")]
    pub max_follow_ups_per_question: u32,

    /// Follow-ups allowed across the interview (<= 6)
    #[serde(default = "default_total")]
    pub max_total_follow_ups: u32,

    /// Delay before the interviewer starts on its own after the
    /// introduction; 0 disables auto-start
    #[serde(default = "default_auto_start_delay_ms")]
    pub auto_start_delay_ms: u64,

    #[serde(default)]
    pub mode: InterviewMode,
}

fn default_per_question() -> u32 {
    MAX_FOLLOW_UPS_PER_QUESTION
}

fn default_total() -> u32 {
    MAX_TOTAL_FOLLOW_UPS
}

fn default_auto_start_delay_ms() -> u64 {
    2000
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_follow_ups_per_question: default_per_question(),
            max_total_follow_ups: default_total(),
            auto_start_delay_ms: default_auto_start_delay_ms(),
            mode: InterviewMode::default(),
        }
    }
}

impl InterviewConfig {
    pub fn auto_start_enabled(&self) -> bool {
        self.auto_start_delay_ms > 0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_follow_ups_per_question == 0
            || self.max_follow_ups_per_question > MAX_FOLLOW_UPS_PER_QUESTION
        {
            return Err(ConfigError::invalid(
                "interview.max_follow_ups_per_question",
                format!("must be between 1 and {}", MAX_FOLLOW_UPS_PER_QUESTION),
            ));
        }

        if self.max_total_follow_ups > MAX_TOTAL_FOLLOW_UPS {
            return Err(ConfigError::invalid(
                "interview.max_total_follow_ups",
                format!("must not exceed {}", MAX_TOTAL_FOLLOW_UPS),
            ));
        }

        if self.max_total_follow_ups < self.max_follow_ups_per_question {
            return Err(ConfigError::invalid(
                "interview.max_total_follow_ups",
                "must be at least max_follow_ups_per_question",
            ));
        }

        if self.auto_start_delay_ms > 60_000 {
            return Err(ConfigError::invalid(
                "interview.auto_start_delay_ms",
                "must not exceed 60000",
            ));
        }

        Ok(())
    }
}
