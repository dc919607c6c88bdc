//! English number words (short scale)

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Converts integers to English words
///
/// Magnitudes of one billion and above are not converted; callers keep the
/// literal digits for those.
pub struct NumberToWords;

impl NumberToWords {
    /// Smallest magnitude that is left as digits
    pub const LIMIT: u64 = 1_000_000_000;

    /// Convert a non-negative integer, `None` if `n >= LIMIT`
    pub fn convert(n: u64) -> Option<String> {
        if n >= Self::LIMIT {
            return None;
        }
        Some(Self::words(n))
    }

    /// Spell out each digit ("05" -> "zero five"), used after a decimal point
    pub fn digits(digits: &str) -> String {
        digits
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| ONES[d as usize])
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn words(n: u64) -> String {
        match n {
            0..=19 => ONES[n as usize].to_string(),
            20..=99 => {
                let tens = TENS[(n / 10) as usize];
                match n % 10 {
                    0 => tens.to_string(),
                    ones => format!("{}-{}", tens, ONES[ones as usize]),
                }
            },
            100..=999 => Self::scaled(n, 100, "hundred"),
            1_000..=999_999 => Self::scaled(n, 1_000, "thousand"),
            _ => Self::scaled(n, 1_000_000, "million"),
        }
    }

    fn scaled(n: u64, unit: u64, name: &str) -> String {
        let head = Self::words(n / unit);
        match n % unit {
            0 => format!("{} {}", head, name),
            rest => format!("{} {} {}", head, name, Self::words(rest)),
        }
    }
}
