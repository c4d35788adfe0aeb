//! Search request models.

use serde::{Deserialize, Serialize};

/// Raw form input as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    #[serde(default)]
    pub full_name: Option<String>,
    /// Date of birth as typed, `DD/MM/YYYY` or bare digits.
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub voter_number: Option<String>,
}

/// Ward value as selected plus its integer-normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WardQuery {
    pub raw: String,
    pub normalized: String,
}

impl WardQuery {
    /// Distinct ward values the directory must match against.
    pub fn candidates(&self) -> Vec<&str> {
        if self.raw == self.normalized {
            vec![self.raw.as_str()]
        } else {
            vec![self.raw.as_str(), self.normalized.as_str()]
        }
    }

    #[cfg(test)]
    pub fn matches(&self, ward: &str) -> bool {
        let ward = ward.trim();
        ward == self.raw || ward == self.normalized
    }
}

/// Normalized query dispatched to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub full_name: Option<String>,
    /// Canonical `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub ward: WardQuery,
    pub voter_number: Option<String>,
}

impl SearchParams {
    /// Case-insensitive substring match of the optional name fragment.
    pub fn name_matches(&self, full_name: &str) -> bool {
        match &self.full_name {
            Some(fragment) => full_name.to_lowercase().contains(&fragment.to_lowercase()),
            None => true,
        }
    }
}
