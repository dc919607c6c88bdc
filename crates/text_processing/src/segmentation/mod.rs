//! Multi-part question segmentation
//!
//! Splits one question-bank entry into an optional leading scenario and an
//! ordered list of sub-tasks, using structural markers:
//!
//! 1. numbered markers, tried in fixed priority: `1.`, `1)`, `a.`, `a)`
//! 2. otherwise bullets (`-`, `*`, `•`) or labels (`Part 1:`, `Question B.`,
//!    `Task ii)`), whichever appears first in the text
//!
//! A numbered style only qualifies when its markers count up from `1`, `a`
//! or `A`; markers that break the run are treated as ordinary text. A
//! dot marker must also open a line or sentence, so "year 1." and
//! "Plan A." stay inside their task. Every style needs at least two
//! markers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker style that produced a segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    DigitDot,
    DigitParen,
    LetterDot,
    LetterParen,
    Bullet,
    Label,
}

fn marker_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("marker pattern is valid")
}

// Marker patterns never consume the whitespace in front of a marker; the
// preceding character is checked in `find_markers` instead.
static DIGIT_DOT: Lazy<Regex> = Lazy::new(|| marker_regex(r"(?P<marker>\d{1,2}\.)\s+"));
static DIGIT_PAREN: Lazy<Regex> =
    Lazy::new(|| marker_regex(r"(?P<marker>\(?\d{1,2}\))\s+"));
static LETTER_DOT: Lazy<Regex> = Lazy::new(|| marker_regex(r"(?P<marker>[a-hA-H]\.)\s+"));
static LETTER_PAREN: Lazy<Regex> =
    Lazy::new(|| marker_regex(r"(?P<marker>\(?[a-hA-H]\))\s+"));
static BULLET: Lazy<Regex> =
    Lazy::new(|| marker_regex(r"(?m)^[ \t]*(?P<marker>[-*•●▪])[ \t]+"));
static LABEL: Lazy<Regex> = Lazy::new(|| {
    marker_regex(
        r"(?i)(?P<marker>(?:part|question|task)\s+(?:\d{1,2}|[a-h]|[ivx]{1,4})\s*[:.)\-–])\s*",
    )
});

static BOILERPLATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    marker_regex(r"(?im)^[ \t]*(?:problem statement|background|context|scenario)[ \t]*:[ \t]*")
});
static CANDIDATE_TASK_CLAUSE: Lazy<Regex> =
    Lazy::new(|| marker_regex(r"(?is)\btask\s+for\s+candidates?\s*:.*$"));
/// Words that may directly precede a dot marker ("Question 2.")
const LABEL_WORDS: [&str; 4] = ["part", "question", "task", "step"];

static TRAILING_LABEL_WORD: Lazy<Regex> =
    Lazy::new(|| marker_regex(r"(?i)\s*\b(?:part|question|task|step)\s*$"));

/// Minimum number of markers for a style to qualify
const MIN_MARKERS: usize = 2;

/// Result of segmenting one question
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentedQuestion {
    /// Text before the first marker, or the whole question when no
    /// structure was found
    pub scenario: String,
    /// Sub-tasks in document order; empty or at least two entries
    pub tasks: Vec<String>,
    /// Marker style used, if any
    pub style: Option<MarkerStyle>,
}

impl SegmentedQuestion {
    pub fn is_multi_part(&self) -> bool {
        self.tasks.len() >= MIN_MARKERS
    }

    fn single(question: &str) -> Self {
        Self {
            scenario: question.to_string(),
            tasks: Vec::new(),
            style: None,
        }
    }
}

/// Marker span: `start` is where the marker text begins, `end` where the
/// task text begins
#[derive(Debug, Clone, Copy)]
struct Marker {
    start: usize,
    end: usize,
    /// Position in its list (`1.` and `a)` are both 1), if it has one
    ordinal: Option<u32>,
}

fn find_markers(re: &Regex, text: &str) -> Vec<Marker> {
    re.captures_iter(text)
        .filter_map(|caps| {
            let marker = caps.name("marker")?;
            let whole = caps.get(0)?;
            at_token_start(text, marker.start()).then(|| Marker {
                start: marker.start(),
                end: whole.end(),
                ordinal: ordinal(marker.as_str()),
            })
        })
        .collect()
}

/// Markers of one numbered style that form a usable list
fn numbered_markers(style: MarkerStyle, re: &Regex, text: &str) -> Vec<Marker> {
    let needs_boundary = matches!(style, MarkerStyle::DigitDot | MarkerStyle::LetterDot);

    let mut expected = 1;
    find_markers(re, text)
        .into_iter()
        .filter(|marker| !needs_boundary || at_item_boundary(text, marker.start))
        .filter(|marker| {
            let in_run = marker.ordinal == Some(expected);
            if in_run {
                expected += 1;
            }
            in_run
        })
        .collect()
}

/// Whether `at` is the start of the text or follows whitespace
fn at_token_start(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().map_or(true, char::is_whitespace)
}

/// Whether a marker at `at` opens a line, a sentence or a labelled item
fn at_item_boundary(text: &str, at: usize) -> bool {
    let before = &text[..at];
    let previous = before.trim_end();

    if previous.is_empty() || before[previous.len()..].contains('\n') {
        return true;
    }
    if previous.ends_with(['.', '?', '!', ':', ';', ')']) {
        return true;
    }

    let word = previous
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or(previous);
    LABEL_WORDS.iter().any(|label| word.eq_ignore_ascii_case(label))
}

/// `"2."` -> 2, `"(b)"` -> 2, `"C."` -> 3
fn ordinal(marker: &str) -> Option<u32> {
    let core = marker.trim_matches(|c| matches!(c, '(' | ')' | '.'));
    if let Ok(n) = core.parse::<u32>() {
        return Some(n);
    }

    let mut chars = core.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some(u32::from(c.to_ascii_lowercase() as u8 - b'a') + 1)
        },
        _ => None,
    }
}

/// Splits questions into scenario and sub-tasks
#[derive(Debug, Clone, Default)]
pub struct QuestionSegmenter;

impl QuestionSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Segment a raw question
    pub fn segment(&self, question: &str) -> SegmentedQuestion {
        let Some((style, markers)) = Self::select_markers(question) else {
            return SegmentedQuestion::single(question);
        };

        let tasks: Vec<String> = markers
            .iter()
            .enumerate()
            .map(|(i, marker)| {
                let end = markers.get(i + 1).map_or(question.len(), |next| next.start);
                clean_task(&question[marker.end..end])
            })
            .filter(|task| !task.is_empty())
            .collect();

        if tasks.len() < MIN_MARKERS {
            tracing::debug!(?style, "Markers found but fewer than two non-empty tasks");
            return SegmentedQuestion::single(question);
        }

        let scenario = clean_scenario(&question[..markers[0].start]);

        tracing::debug!(
            ?style,
            task_count = tasks.len(),
            has_scenario = !scenario.is_empty(),
            "Segmented multi-part question"
        );

        SegmentedQuestion {
            scenario,
            tasks,
            style: Some(style),
        }
    }

    fn select_markers(question: &str) -> Option<(MarkerStyle, Vec<Marker>)> {
        let numbered: [(MarkerStyle, &Regex); 4] = [
            (MarkerStyle::DigitDot, &DIGIT_DOT),
            (MarkerStyle::DigitParen, &DIGIT_PAREN),
            (MarkerStyle::LetterDot, &LETTER_DOT),
            (MarkerStyle::LetterParen, &LETTER_PAREN),
        ];

        for (style, re) in numbered {
            let markers = numbered_markers(style, re, question);
            if markers.len() >= MIN_MARKERS {
                return Some((style, markers));
            }
        }

        let bullets = find_markers(&BULLET, question);
        let labels = find_markers(&LABEL, question);

        let earliest = match (bullets.first(), labels.first()) {
            (Some(b), Some(l)) if l.start < b.start => (MarkerStyle::Label, labels),
            (Some(_), _) => (MarkerStyle::Bullet, bullets),
            (None, Some(_)) => (MarkerStyle::Label, labels),
            (None, None) => return None,
        };

        (earliest.1.len() >= MIN_MARKERS).then_some(earliest)
    }
}

fn clean_task(raw: &str) -> String {
    TRAILING_LABEL_WORD.replace(raw.trim(), "").trim().to_string()
}

fn clean_scenario(raw: &str) -> String {
    let without_clause = CANDIDATE_TASK_CLAUSE.replace(raw, "");
    let without_prefixes = BOILERPLATE_PREFIX.replace_all(&without_clause, "");
    TRAILING_LABEL_WORD
        .replace(without_prefixes.trim(), "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(q: &str) -> SegmentedQuestion {
        QuestionSegmenter::new().segment(q)
    }

    #[test]
    fn test_inline_digit_dot() {
        let s = segment("1. What is X? 2. What is Y, based on your answer to 1?");
        assert_eq!(s.style, Some(MarkerStyle::DigitDot));
        assert_eq!(s.scenario, "");
        assert_eq!(
            s.tasks,
            vec!["What is X?", "What is Y, based on your answer to 1?"]
        );
    }

    #[test]
    fn test_scenario_with_boilerplate() {
        let q = "Problem Statement: A retail chain wants to open 3 stores.\n\
                 Task for Candidates: answer the following.\n\
                 1) Estimate the market size.\n\
                 2) Identify the main risks.\n\
                 3) Should they expand?";
        let s = segment(q);
        assert_eq!(s.style, Some(MarkerStyle::DigitParen));
        assert_eq!(s.scenario, "A retail chain wants to open 3 stores.");
        assert_eq!(
            s.tasks,
            vec![
                "Estimate the market size.",
                "Identify the main risks.",
                "Should they expand?"
            ]
        );
    }

    #[test]
    fn test_letter_markers() {
        let s = segment("Context: You run a SaaS product.\na. Define churn.\nb. How would you reduce it?");
        assert_eq!(s.style, Some(MarkerStyle::LetterDot));
        assert_eq!(s.scenario, "You run a SaaS product.");
        assert_eq!(s.tasks, vec!["Define churn.", "How would you reduce it?"]);

        let s = segment("(a) Explain joins (b) Explain indexes");
        assert_eq!(s.style, Some(MarkerStyle::LetterParen));
        assert_eq!(s.tasks, vec!["Explain joins", "Explain indexes"]);
    }

    #[test]
    fn test_priority_is_fixed() {
        // Both digit-dot and letter-paren qualify; digit-dot wins
        let s = segment("1. a) one b) two. 2. c) three d) four");
        assert_eq!(s.style, Some(MarkerStyle::DigitDot));
        assert_eq!(s.tasks.len(), 2);
    }

    #[test]
    fn test_bullets() {
        let s = segment("Background: We have a slow API.\n- Find the bottleneck\n- Propose a fix");
        assert_eq!(s.style, Some(MarkerStyle::Bullet));
        assert_eq!(s.scenario, "We have a slow API.");
        assert_eq!(s.tasks, vec!["Find the bottleneck", "Propose a fix"]);
    }

    #[test]
    fn test_labels() {
        let s = segment("Scenario: Sales dropped. Part 1: Find the cause. Part 2: Recommend a fix.");
        assert_eq!(s.style, Some(MarkerStyle::Label));
        assert_eq!(s.scenario, "Sales dropped.");
        assert_eq!(s.tasks, vec!["Find the cause.", "Recommend a fix."]);
    }

    #[test]
    fn test_single_marker_is_not_multi_part() {
        let q = "1. Explain the CAP theorem.";
        let s = segment(q);
        assert!(!s.is_multi_part());
        assert_eq!(s.scenario, q);
        assert!(s.tasks.is_empty());
    }

    #[test]
    fn test_plain_question() {
        let q = "Tell me about a time you handled a 3.5 hour outage.";
        let s = segment(q);
        assert!(!s.is_multi_part());
        assert_eq!(s.scenario, q);
        assert_eq!(s.style, None);
    }

    #[test]
    fn test_task_count_matches_markers() {
        let q = (1..=6)
            .map(|i| format!("{}. Step number {} here.", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let s = segment(&q);
        assert_eq!(s.tasks.len(), 6);
        assert_eq!(s.tasks[0], "Step number 1 here.");
        assert_eq!(s.tasks[5], "Step number 6 here.");
    }

    #[test]
    fn test_trailing_label_word_removed() {
        let s = segment("Question 1. Define latency. Question 2. Define throughput.");
        assert_eq!(s.style, Some(MarkerStyle::DigitDot));
        assert_eq!(s.scenario, "");
        assert_eq!(s.tasks, vec!["Define latency.", "Define throughput."]);
    }

    #[test]
    fn test_inline_numbers_inside_tasks() {
        let s = segment(
            "1. Calculate the profit for year 1. 2. Calculate it for year 2. 3. Should they expand?",
        );
        assert_eq!(s.style, Some(MarkerStyle::DigitDot));
        assert_eq!(s.scenario, "");
        assert_eq!(
            s.tasks,
            vec![
                "Calculate the profit for year 1.",
                "Calculate it for year 2.",
                "Should they expand?"
            ]
        );
    }

    #[test]
    fn test_sentence_final_letters_are_not_markers() {
        let q = "Compare Plan A. and Plan B. Which one has the lower total cost?";
        let s = segment(q);
        assert!(!s.is_multi_part());
        assert_eq!(s.style, None);
        assert_eq!(s.scenario, q);
    }

    #[test]
    fn test_markers_must_count_up() {
        // "3." and "1." break the run started by "1." and "2."
        let s = segment("1. Size the market.\n3. Pick a channel.\n2. Price it.\n1. Done?");
        assert_eq!(s.tasks, vec!["Size the market.\n3. Pick a channel.", "Price it.\n1. Done?"]);

        // A list that does not start at 1 is not a list
        let s = segment("Consider options 2. and 3. before deciding.");
        assert!(!s.is_multi_part());
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal("2."), Some(2));
        assert_eq!(ordinal("(b)"), Some(2));
        assert_eq!(ordinal("C."), Some(3));
        assert_eq!(ordinal("12)"), Some(12));
    }
}
