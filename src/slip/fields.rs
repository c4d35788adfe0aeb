//! Labelled slip fields shared by the HTML, raster, and JSON views.

use serde::Serialize;

use crate::models::VoterRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlipField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Ordered fields of one slip, absent parents replaced by a dash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlipFields {
    pub slip_id: String,
    pub fields: Vec<SlipField>,
}

impl SlipFields {
    pub fn from_voter(voter: &VoterRecord) -> Self {
        let field = |key, label, value: &str| SlipField {
            key,
            label,
            value: value.to_string(),
        };
        Self {
            slip_id: voter.id.to_uppercase(),
            fields: vec![
                field("full_name", "পুরো নাম", &voter.full_name),
                field("father_name", "পিতার নাম", voter.father_name_or_dash()),
                field("mother_name", "মাতার নাম", voter.mother_name_or_dash()),
                field(
                    "date_of_birth",
                    "জন্ম তারিখ",
                    &voter.date_of_birth.format("%Y-%m-%d").to_string(),
                ),
                field("ward", "ওয়ার্ড", &voter.ward),
                field("center_name", "ভোট কেন্দ্র", &voter.center_name),
                field("voter_number", "ভোটার নম্বর", &voter.voter_number),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&SlipField> {
        self.fields.iter().find(|f| f.key == key)
    }

    #[cfg(test)]
    pub fn value(&self, key: &str) -> &str {
        self.get(key).map(|f| f.value.as_str()).unwrap_or_default()
    }
}
