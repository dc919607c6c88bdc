//! Keyword Utterance Classifier
//!
//! Offline `UtteranceClassifier` driven by phrase lists. It never generates
//! follow-up text, so the controller falls back to its configured
//! follow-up prompt for `partial` answers.
//!
//! # Example
//!
//! ```ignore
//! use interview_text_processing::KeywordClassifier;
//!
//! let classifier = KeywordClassifier::default();
//! let c = classifier.classify_answer("What is a mutex?", "Honestly, no idea").await?;
//! assert_eq!(c.verdict, Verdict::Unknown);
//! ```

use async_trait::async_trait;
use interview_core::{Classification, ClosingSignal, Readiness, Result, UtteranceClassifier};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Phrase lists and thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordClassifierConfig {
    /// "I don't know" style phrases
    pub unknown_phrases: Vec<String>,
    /// Longer answers are never `unknown`, even if they contain a phrase
    pub max_unknown_words: usize,
    /// Answers with at least this many words count as `complete`
    pub min_complete_words: usize,
    pub not_ready_phrases: Vec<String>,
    /// Phrases that end the final-questions phase even when phrased as a question
    pub closing_phrases: Vec<String>,
    /// Utterance openers that signal the candidate has a question
    pub question_openers: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for KeywordClassifierConfig {
    fn default() -> Self {
        Self {
            unknown_phrases: owned(&[
                "i don't know",
                "i dont know",
                "don't know",
                "no idea",
                "not sure",
                "no clue",
                "can't remember",
                "cannot remember",
                "don't remember",
                "not familiar",
                "never heard of",
                "i give up",
                "skip",
            ]),
            max_unknown_words: 12,
            min_complete_words: 8,
            not_ready_phrases: owned(&[
                "not ready",
                "not yet",
                "not now",
                "hold on",
                "give me a minute",
                "give me a moment",
                "give me a second",
                "need a minute",
                "need a moment",
                "one moment",
                "one minute",
                "wait a",
            ]),
            closing_phrases: owned(&[
                "no questions",
                "no more questions",
                "no further questions",
                "don't have any questions",
                "dont have any questions",
                "nothing else",
                "that's all",
                "that is all",
                "i'm good",
                "all good",
            ]),
            question_openers: owned(&[
                "what", "how", "why", "when", "where", "who", "which", "can", "could", "is",
                "are", "do", "does", "will", "would", "yes", "yeah", "yep", "sure", "actually",
                "i have a question", "i'd like to ask", "i want to ask", "i wanted to ask",
            ]),
        }
    }
}

/// Compile phrases into case-insensitive whole-word patterns
fn compile_phrases(phrases: &[String]) -> Vec<Regex> {
    phrases
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .filter_map(|p| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(p));
            match Regex::new(&pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(phrase = %p, error = %e, "Skipping classifier phrase");
                    None
                },
            }
        })
        .collect()
}

fn compile_openers(openers: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = openers
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return None;
    }

    let pattern = format!(r"(?i)^\W*(?:{})\b", alternatives.join("|"));
    Regex::new(&pattern)
        .map_err(|e| tracing::warn!(error = %e, "Question openers disabled"))
        .ok()
}

/// Normalise typographic apostrophes from speech-to-text output
fn normalize(utterance: &str) -> String {
    utterance.trim().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Phrase-list classifier
pub struct KeywordClassifier {
    config: KeywordClassifierConfig,
    unknown: Vec<Regex>,
    not_ready: Vec<Regex>,
    closing: Vec<Regex>,
    openers: Option<Regex>,
}

impl KeywordClassifier {
    pub fn new(config: KeywordClassifierConfig) -> Self {
        Self {
            unknown: compile_phrases(&config.unknown_phrases),
            not_ready: compile_phrases(&config.not_ready_phrases),
            closing: compile_phrases(&config.closing_phrases),
            openers: compile_openers(&config.question_openers),
            config,
        }
    }

    /// Synchronous answer classification
    pub fn classify(&self, utterance: &str) -> Classification {
        let text = normalize(utterance);
        let words = text.split_whitespace().count();

        if words == 0 {
            return Classification::partial();
        }

        if words <= self.config.max_unknown_words && self.unknown.iter().any(|re| re.is_match(&text))
        {
            return Classification::unknown();
        }

        if words >= self.config.min_complete_words {
            Classification::complete()
        } else {
            Classification::partial()
        }
    }

    pub fn readiness(&self, utterance: &str) -> Readiness {
        let text = normalize(utterance);
        if self.not_ready.iter().any(|re| re.is_match(&text)) {
            Readiness::NotReady
        } else {
            Readiness::Ready
        }
    }

    pub fn closing(&self, utterance: &str) -> ClosingSignal {
        let text = normalize(utterance);

        if self.closing.iter().any(|re| re.is_match(&text)) {
            return ClosingSignal::NoMoreQuestions;
        }

        let opens_with_question = self.openers.as_ref().is_some_and(|re| re.is_match(&text));
        if text.contains('?') || opens_with_question {
            ClosingSignal::HasQuestion
        } else {
            ClosingSignal::NoMoreQuestions
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(KeywordClassifierConfig::default())
    }
}

#[async_trait]
impl UtteranceClassifier for KeywordClassifier {
    async fn classify_answer(&self, prompt: &str, utterance: &str) -> Result<Classification> {
        let classification = self.classify(utterance);
        tracing::debug!(
            prompt_len = prompt.len(),
            verdict = classification.verdict.as_str(),
            "Keyword classification"
        );
        Ok(classification)
    }

    async fn detect_readiness(&self, utterance: &str) -> Result<Readiness> {
        Ok(self.readiness(utterance))
    }

    async fn detect_closing(&self, utterance: &str) -> Result<ClosingSignal> {
        Ok(self.closing(utterance))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
