//! Voter record model matching the directory's `voters` rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder rendered for absent optional fields.
pub const PLACEHOLDER: &str = "—";

/// One citizen's registration entry, read-only reference data owned by the directory.
///
/// Decoded from the directory's snake_case columns, served to clients in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct VoterRecord {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub ward: String,
    #[serde(default)]
    pub center_name: String,
    #[serde(default)]
    pub voter_number: String,
    /// Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl VoterRecord {
    pub fn father_name_or_dash(&self) -> &str {
        or_dash(self.father_name.as_deref())
    }

    pub fn mother_name_or_dash(&self) -> &str {
        or_dash(self.mother_name.as_deref())
    }

    /// Short serial shown in result lists: the last four characters of the voter number.
    pub fn serial(&self) -> String {
        let chars: Vec<char> = self.voter_number.chars().collect();
        let start = chars.len().saturating_sub(4);
        chars[start..].iter().collect()
    }
}

/// Return the value, or the dash placeholder when it is absent or blank.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => PLACEHOLDER,
    }
}

/// Row projection used by result lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRow {
    pub id: String,
    pub serial: String,
    pub center_name: String,
    pub full_name: String,
    pub mother_name: String,
    pub father_name: String,
    pub date_of_birth: NaiveDate,
}

impl From<&VoterRecord> for VoterRow {
    fn from(voter: &VoterRecord) -> Self {
        Self {
            id: voter.id.clone(),
            serial: voter.serial(),
            center_name: voter.center_name.clone(),
            full_name: voter.full_name.clone(),
            mother_name: voter.mother_name_or_dash().to_string(),
            father_name: voter.father_name_or_dash().to_string(),
            date_of_birth: voter.date_of_birth,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_voter(id: &str, voter_number: &str) -> VoterRecord {
    VoterRecord {
        id: id.to_string(),
        full_name: "রহিম উদ্দিন".to_string(),
        father_name: None,
        mother_name: Some("আমেনা বেগম".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        ward: "05".to_string(),
        center_name: "মোহাম্মদপুর সরকারি প্রাথমিক বিদ্যালয়".to_string(),
        voter_number: voter_number.to_string(),
        created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parent_names_render_dash() {
        let mut voter = sample_voter("v1", "2611");
        voter.mother_name = Some("   ".to_string());
        assert_eq!(voter.father_name_or_dash(), PLACEHOLDER);
        assert_eq!(voter.mother_name_or_dash(), PLACEHOLDER);
    }

    #[test]
    fn test_serial_is_last_four_characters() {
        assert_eq!(sample_voter("v1", "261412345678").serial(), "5678");
        assert_eq!(sample_voter("v1", "12").serial(), "12");
        assert_eq!(sample_voter("v1", "").serial(), "");
    }

    #[test]
    fn test_deserialize_with_absent_optionals() {
        let json = r#"{"id":"a","date_of_birth":"1990-01-01","ward":"1"}"#;
        let voter: VoterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(voter.full_name, "");
        assert!(voter.father_name.is_none());
        assert_eq!(voter.voter_number, "");
    }

    #[test]
    fn test_serializes_camel_case_for_clients() {
        let json = serde_json::to_value(sample_voter("v1", "2611")).unwrap();
        assert_eq!(json["fullName"], "রহিম উদ্দিন");
        assert_eq!(json["dateOfBirth"], "1990-01-01");
        assert_eq!(json["voterNumber"], "2611");
        assert!(json.get("full_name").is_none());
        assert!(json.get("fatherName").is_none());
    }
}
