//! Voter-number narrowing of multi-record results.

use crate::models::VoterRecord;

/// Keep only the records whose voter number equals `voter_number`.
///
/// The hint is advisory: when nothing matches, the results come back unchanged.
pub fn disambiguate(voters: Vec<VoterRecord>, voter_number: Option<&str>) -> Vec<VoterRecord> {
    let wanted = match voter_number.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return voters,
    };
    if voters.is_empty() {
        return voters;
    }

    let matched: Vec<VoterRecord> = voters
        .iter()
        .filter(|v| v.voter_number.trim() == wanted)
        .cloned()
        .collect();

    if matched.is_empty() {
        tracing::debug!(wanted, "Voter number hint matched nothing, keeping all results");
        voters
    } else {
        matched
    }
}
