//! Sequential dependency between sub-tasks
//!
//! Keyword heuristic, matched as case-insensitive substrings:
//! 1. a later task containing a reference phrase ("based on", "given your")
//!    depends on an earlier one
//! 2. an analytical first task (calculate, market, design, analyze) followed
//!    by a task asking for a decision (should, recommend) is a chain
//!
//! Best-effort only; false positives and negatives are expected.

use interview_config::DependencyLexicon;
use serde::{Deserialize, Serialize};

/// Why a set of tasks was judged dependent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DependencyReason {
    /// Task at `task_index` (>= 1) contains a back-reference phrase
    ReferencePhrase { task_index: usize, phrase: String },
    /// First task is analytical and a later task asks for a decision
    AnalysisThenDecision { keyword: String, decision: String },
}

/// Decides whether later sub-tasks presuppose earlier answers
#[derive(Debug, Clone)]
pub struct DependencyClassifier {
    lexicon: DependencyLexicon,
}

impl DependencyClassifier {
    pub fn new(lexicon: DependencyLexicon) -> Self {
        Self {
            lexicon: lexicon.normalized(),
        }
    }

    pub fn is_dependent<S: AsRef<str>>(&self, tasks: &[S]) -> bool {
        let reason = self.explain(tasks);
        if let Some(reason) = &reason {
            tracing::debug!(?reason, task_count = tasks.len(), "Tasks are dependent");
        }
        reason.is_some()
    }

    /// Return the first rule that fires, if any
    pub fn explain<S: AsRef<str>>(&self, tasks: &[S]) -> Option<DependencyReason> {
        if tasks.len() < 2 {
            return None;
        }

        let lowered: Vec<String> = tasks.iter().map(|t| t.as_ref().to_lowercase()).collect();

        for (task_index, task) in lowered.iter().enumerate().skip(1) {
            if let Some(phrase) = first_contained(task, &self.lexicon.dependency_phrases) {
                return Some(DependencyReason::ReferencePhrase {
                    task_index,
                    phrase: phrase.to_string(),
                });
            }
        }

        let first = &lowered[0];
        let keyword = self
            .lexicon
            .analytical_keywords()
            .find(|k| first.contains(*k))?;

        lowered[1..].iter().find_map(|task| {
            first_contained(task, &self.lexicon.decision_keywords).map(|decision| {
                DependencyReason::AnalysisThenDecision {
                    keyword: keyword.to_string(),
                    decision: decision.to_string(),
                }
            })
        })
    }
}

impl Default for DependencyClassifier {
    fn default() -> Self {
        Self::new(DependencyLexicon::default())
    }
}

fn first_contained<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles
        .iter()
        .map(String::as_str)
        .find(|needle| haystack.contains(needle))
}
