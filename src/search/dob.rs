//! Date-of-birth input masking.
//!
//! Users type `DD/MM/YYYY`; the directory stores `YYYY-MM-DD`.

use serde::Serialize;

/// Number of digits in a complete date of birth.
pub const DOB_DIGITS: usize = 8;

const SEPARATOR: char = '/';

/// Masked display value and, once complete, the canonical query value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DobField {
    pub display: String,
    pub canonical: Option<String>,
}

impl DobField {
    /// Mask a whole value at once, e.g. on submit.
    pub fn parse(input: &str) -> Self {
        let digits = extract_digits(input);
        Self {
            display: mask(&digits),
            canonical: canonical(&digits),
        }
    }

    /// Mask one keystroke's worth of change.
    ///
    /// When the edit lengthened the value and completed the day or month group,
    /// a trailing separator is appended. Deletions never get one back.
    pub fn from_keystrokes(previous: &str, input: &str) -> Self {
        let mut field = Self::parse(input);
        let typing = input.chars().count() > previous.chars().count();
        let digit_count = field.display.chars().filter(char::is_ascii_digit).count();
        if typing && (digit_count == 2 || digit_count == 4) {
            field.display.push(SEPARATOR);
        }
        field
    }

    pub fn is_complete(&self) -> bool {
        self.canonical.is_some()
    }
}

/// Keep at most eight digits, folding Bengali digits to ASCII.
fn extract_digits(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '০'..='৯' => char::from_digit(c as u32 - '০' as u32, 10),
            _ => None,
        })
        .take(DOB_DIGITS)
        .collect()
}

fn mask(digits: &str) -> String {
    let mut out = String::with_capacity(10);
    for (i, c) in digits.chars().enumerate() {
        if i == 2 || i == 4 {
            out.push(SEPARATOR);
        }
        out.push(c);
    }
    out
}

fn canonical(digits: &str) -> Option<String> {
    if digits.len() != DOB_DIGITS {
        return None;
    }
    let (day, rest) = digits.split_at(2);
    let (month, year) = rest.split_at(2);
    Some(format!("{year}-{month}-{day}"))
}
