//! Search parameter normalization and the lookup pipeline.
//!
//! Raw form input is validated here before any directory call is made.

mod disambiguate;
mod dob;
mod ward;

pub use disambiguate::disambiguate;
pub use dob::{DobField, DOB_DIGITS};
pub use ward::{parse_ward, ward_options, WardOption};

use serde::Serialize;

use crate::directory::{DirectoryError, VoterDirectory};
use crate::models::{SearchForm, SearchParams, VoterRecord};

/// Per-field validation flags. A set flag marks the field as invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub dob: bool,
    pub ward: bool,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        !self.dob && !self.ward
    }
}

/// Turn raw form input into a dispatchable query.
///
/// Name and voter number are optional; blank values are dropped.
pub fn normalize(form: &SearchForm, ward_count: u8) -> Result<SearchParams, FieldErrors> {
    let dob = DobField::parse(&form.dob);
    let ward = parse_ward(&form.ward, ward_count);

    let errors = FieldErrors {
        dob: !dob.is_complete(),
        ward: ward.is_none(),
    };

    match (dob.canonical, ward) {
        (Some(date_of_birth), Some(ward)) => Ok(SearchParams {
            full_name: non_blank(form.full_name.as_deref()),
            date_of_birth,
            ward,
            voter_number: non_blank(form.voter_number.as_deref()),
        }),
        _ => Err(errors),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Query the directory and apply voter-number narrowing.
pub async fn run_search(
    directory: &dyn VoterDirectory,
    params: &SearchParams,
) -> Result<Vec<VoterRecord>, DirectoryError> {
    tracing::info!(
        backend = directory.backend_tag(),
        dob = %params.date_of_birth,
        ward = %params.ward.raw,
        has_name = params.full_name.is_some(),
        "Dispatching voter search"
    );
    let voters = directory.search(params).await?;
    let voters = disambiguate(voters, params.voter_number.as_deref());
    tracing::info!(count = voters.len(), "Voter search finished");
    Ok(voters)
}
