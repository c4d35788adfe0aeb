//! Ward choice list and normalization.

use serde::Serialize;

use crate::models::WardQuery;

/// One entry of the ward choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WardOption {
    pub value: String,
    pub label: String,
}

/// Zero-padded ward codes `01..=count`.
pub fn ward_options(count: u8) -> Vec<WardOption> {
    (1..=count)
        .map(|n| {
            let value = format!("{n:02}");
            let label = format!("Ward-{value}");
            WardOption { value, label }
        })
        .collect()
}

/// Accept a ward when it is all digits and within `1..=count`.
///
/// The directory does not store wards consistently padded, so both the value
/// as selected and its integer form are carried.
pub fn parse_ward(raw: &str, count: u8) -> Option<WardQuery> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: u32 = raw.parse().ok()?;
    if number == 0 || number > u32::from(count) {
        return None;
    }
    Some(WardQuery {
        raw: raw.to_string(),
        normalized: number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_are_zero_padded() {
        let options = ward_options(13);
        assert_eq!(options.len(), 13);
        assert_eq!(options[0].value, "01");
        assert_eq!(options[0].label, "Ward-01");
        assert_eq!(options[12].value, "13");
    }

    #[test]
    fn test_padded_ward_carries_both_forms() {
        let ward = parse_ward("01", 20).unwrap();
        assert_eq!(ward.candidates(), vec!["01", "1"]);
        assert!(ward.matches("1"));
        assert!(ward.matches("01"));
        assert!(!ward.matches("10"));
    }

    #[test]
    fn test_unpadded_ward_has_single_candidate() {
        let ward = parse_ward("12", 20).unwrap();
        assert_eq!(ward.candidates(), vec!["12"]);
    }

    #[test]
    fn test_rejects_empty_and_out_of_range() {
        assert!(parse_ward("", 20).is_none());
        assert!(parse_ward("  ", 20).is_none());
        assert!(parse_ward("00", 20).is_none());
        assert!(parse_ward("21", 20).is_none());
        assert!(parse_ward("5a", 20).is_none());
        assert!(parse_ward("14", 13).is_none());
    }
}
