//! Form helper endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::search::{ward_options, DobField, WardOption, DOB_DIGITS};
use crate::AppState;

/// Choice list and fixed-locale labels for the search form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    pub wards: Vec<WardOption>,
    pub dob_digits: usize,
    pub dob_placeholder: &'static str,
    pub labels: FormLabels,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormLabels {
    pub full_name: &'static str,
    pub dob: &'static str,
    pub ward: &'static str,
    pub ward_prompt: &'static str,
    pub submit: &'static str,
}

/// GET /api/form - Ward options and labels.
pub async fn get_form(State(state): State<AppState>) -> ApiResult<FormDescriptor> {
    success(FormDescriptor {
        wards: ward_options(state.config.ward_count),
        dob_digits: DOB_DIGITS,
        dob_placeholder: "০১/০১/১৯৯০",
        labels: FormLabels {
            full_name: "নাম",
            dob: "জন্ম তারিখ",
            ward: "ওয়ার্ড",
            ward_prompt: "নির্বাচন করুন",
            submit: "অনুসন্ধান",
        },
    })
}

/// Keystroke masking query parameters.
#[derive(Debug, Deserialize)]
pub struct DobQuery {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub previous: String,
}

/// GET /api/form/dob - Mask a date-of-birth keystroke.
pub async fn format_dob(Query(query): Query<DobQuery>) -> ApiResult<DobField> {
    success(DobField::from_keystrokes(&query.previous, &query.input))
}
