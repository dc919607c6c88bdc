//! Question sets supplied by the template store

use serde::{Deserialize, Serialize};

/// Ordered questions for one interview plus the role they were written for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionSet {
    /// Human-readable role title, if the template carries one
    #[serde(default)]
    pub role_title: Option<String>,
    /// Questions in presentation order
    #[serde(default)]
    pub questions: Vec<String>,
}

impl QuestionSet {
    pub fn new(role_title: Option<String>, questions: Vec<String>) -> Self {
        Self {
            role_title,
            questions,
        }
    }

    /// The fallback used when fetching fails
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_question_set() {
        let set = QuestionSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.role_title.is_none());
    }
}
