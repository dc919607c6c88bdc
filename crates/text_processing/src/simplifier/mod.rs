//! Speech formatting for TTS
//!
//! Rewrites question text for natural spoken delivery:
//! - `₹20,000` -> "twenty thousand rupees"
//! - `15%` -> "fifteen percent"
//! - `-4` -> "negative four", `-$5` -> "negative five dollars",
//!   `5-10` -> "five to ten"
//! - `**bold**` markers and heading hashes removed, whitespace collapsed
//!
//! Formatting is total: any token that cannot be read unambiguously
//! (grouping like `1,2`, versions like `1.2.3`, `H2O`, values of a billion
//! or more) is left exactly as written.

mod numbers;

pub use numbers::NumberToWords;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(?P<lead>-)?(?P<currency>[₹$€£¥]|\bRs\.?|\bINR)\s?)?(?P<sign>-)?(?P<int>\d+(?:,\d+)*)(?:\.(?P<frac>\d+))?(?P<percent>\s?%)?",
    )
    .expect("number token pattern is valid")
});

static MARKDOWN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)\*\*|^[ \t]*#{1,6}[ \t]+").expect("markdown pattern is valid")
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Separators that glue digits into a single token such as `10:30` or `1.2.3`
const GLUE: [char; 4] = ['.', ',', ':', '/'];

/// Formats text for speech synthesis
///
/// Identifier-like text (`__init__`, `a_b`, backticked code) is left alone.
#[derive(Debug, Clone, Default)]
pub struct SpeechFormatter;

impl SpeechFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format text for speech
    pub fn format(&self, text: &str) -> String {
        let text = MARKDOWN.replace_all(text, "");
        let spoken = self.speak_numbers(&text);
        WHITESPACE.replace_all(spoken.trim(), " ").into_owned()
    }

    fn speak_numbers(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 32);
        let mut last = 0;

        for caps in NUMBER_TOKEN.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };

            out.push_str(&text[last..whole.start()]);

            let before = &text[..whole.start()];
            let rest = &text[whole.end()..];

            match speak_token(&caps, before, rest) {
                Some(spoken) => out.push_str(&spoken),
                None => out.push_str(whole.as_str()),
            }
            last = whole.end();
        }

        out.push_str(&text[last..]);
        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `before` ends with a number that stands on its own, as in the
/// `5` of `5-10` but not the `3` of `Q3-2024`
fn ends_with_number(before: &str) -> bool {
    let head = before.trim_end_matches(|c: char| c.is_ascii_digit());
    head.len() < before.len() && !head.chars().next_back().is_some_and(is_word_char)
}

fn speak_token(caps: &Captures<'_>, before: &str, rest: &str) -> Option<String> {
    let int = caps.name("int")?.as_str();
    let currency = caps.name("currency").map(|m| m.as_str());
    let signed = caps.name("sign").is_some() || caps.name("lead").is_some();

    // "5-10": the second token continues a range rather than being negative
    let range_end = signed && ends_with_number(before);

    let mut preceding = before.chars().rev();
    let prev = preceding.next();
    let prev2 = preceding.next();

    if let Some(c) = prev {
        if is_word_char(c) && !range_end {
            return None;
        }
        if GLUE.contains(&c) && prev2.is_some_and(|c| c.is_ascii_digit()) {
            return None;
        }
    }

    let mut after = rest.chars();
    match (after.next(), after.next()) {
        (Some(c), _) if is_word_char(c) => return None,
        (Some(c), Some(d)) if GLUE.contains(&c) && d.is_ascii_digit() => return None,
        _ => {},
    }

    let value = parse_grouped(int)?;
    let mut spoken = NumberToWords::convert(value)?;

    let frac = caps.name("frac");
    if let Some(frac) = frac {
        spoken = format!("{} point {}", spoken, NumberToWords::digits(frac.as_str()));
    }

    if signed && !range_end {
        spoken = format!("negative {}", spoken);
    }

    if let Some(symbol) = currency {
        spoken.push(' ');
        spoken.push_str(currency_name(symbol, value == 1 && frac.is_none()));
    }

    if caps.name("percent").is_some() {
        spoken.push_str(" percent");
    }

    if range_end {
        spoken = format!(" to {}", spoken);
    }

    Some(spoken)
}

/// Parse digits with optional western (`1,234,567`) or Indian (`12,34,567`)
/// thousands grouping
fn parse_grouped(int: &str) -> Option<u64> {
    let groups: Vec<&str> = int.split(',').collect();

    if groups.len() > 1 {
        let (first, tail) = groups.split_first()?;
        let (last, middle) = tail.split_last()?;

        if last.len() != 3 || first.is_empty() {
            return None;
        }

        let western = first.len() <= 3 && middle.iter().all(|g| g.len() == 3);
        let indian = first.len() <= 2 && middle.iter().all(|g| g.len() == 2);
        if !(western || indian) {
            return None;
        }
    }

    groups.concat().parse().ok()
}

fn currency_name(symbol: &str, singular: bool) -> &'static str {
    match (symbol, singular) {
        ("$", true) => "dollar",
        ("$", false) => "dollars",
        ("€", true) => "euro",
        ("€", false) => "euros",
        ("£", true) => "pound",
        ("£", false) => "pounds",
        ("¥", _) => "yen",
        // ₹, Rs, Rs., INR
        (_, true) => "rupee",
        (_, false) => "rupees",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(text: &str) -> String {
        SpeechFormatter::new().format(text)
    }

    #[test]
    fn test_budget_sentence() {
        assert_eq!(
            fmt("The budget is ₹20,000 and growth is 15%."),
            "The budget is twenty thousand rupees and growth is fifteen percent."
        );
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(fmt("It costs $1."), "It costs one dollar.");
        assert_eq!(fmt("It costs $250 today"), "It costs two hundred fifty dollars today");
        assert_eq!(fmt("£3 or €40"), "three pounds or forty euros");
        assert_eq!(fmt("Rs. 500 only"), "five hundred rupees only");
        assert_eq!(fmt("INR 1,00,000"), "one hundred thousand rupees");
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(fmt("We have 3 teams"), "We have three teams");
        assert_eq!(fmt("In 2024, sales rose"), "In two thousand twenty-four, sales rose");
        assert_eq!(fmt("about 1,250,000 users"), "about one million two hundred fifty thousand users");
    }

    #[test]
    fn test_negative_and_ranges() {
        assert_eq!(fmt("a margin of -4%"), "a margin of negative four percent");
        assert_eq!(fmt("5-10 years"), "five to ten years");
        assert_eq!(fmt("a loss of -$5"), "a loss of negative five dollars");
        assert_eq!(fmt("$5-$10 each"), "five dollars to ten dollars each");
    }

    #[test]
    fn test_dash_after_alphanumeric_word() {
        assert_eq!(fmt("Q3-2024 revenue"), "Q3-2024 revenue");
        assert_eq!(fmt("the FY24-25 plan"), "the FY24-25 plan");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(fmt("a rate of 7.5%"), "a rate of seven point five percent");
    }

    #[test]
    fn test_ambiguous_tokens_unchanged() {
        assert_eq!(fmt("H2O and 3D"), "H2O and 3D");
        assert_eq!(fmt("version 1.2.3"), "version 1.2.3");
        assert_eq!(fmt("pick 1,2"), "pick 1,2");
        assert_eq!(fmt("at 10:30"), "at 10:30");
        assert_eq!(fmt("call 9876543210"), "call 9876543210");
    }

    #[test]
    fn test_markdown_and_whitespace() {
        assert_eq!(
            fmt("## Task\n**Estimate** the  total\tcost"),
            "Task Estimate the total cost"
        );
    }

    #[test]
    fn test_identifiers_unchanged() {
        assert_eq!(
            fmt("Explain what __init__ does in Python."),
            "Explain what __init__ does in Python."
        );
        assert_eq!(fmt("Rename a_b to `snake_case`"), "Rename a_b to `snake_case`");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "The budget is ₹20,000 and growth is 15%.",
            "Between 5-10 engineers, margin of -4%, 2.75 ratio",
            "Revenue of $1,000,000 over 12 months",
            "call 9876543210 at 10:30",
        ];
        for sample in samples {
            let once = fmt(sample);
            assert_eq!(fmt(&once), once, "not stable: {}", sample);
        }
    }

    #[test]
    fn test_parse_grouped() {
        assert_eq!(parse_grouped("20,000"), Some(20_000));
        assert_eq!(parse_grouped("12,34,567"), Some(1_234_567));
        assert_eq!(parse_grouped("1,234,567"), Some(1_234_567));
        assert_eq!(parse_grouped("10,20"), None);
        assert_eq!(parse_grouped("1234,567"), None);
    }
}
