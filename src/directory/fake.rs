//! In-memory directory for tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{DirectoryError, VoterDirectory};
use crate::models::{SearchParams, VoterRecord};

/// Applies the directory filter contract to a fixed record list.
#[derive(Default)]
pub struct FakeDirectory {
    pub voters: Mutex<Vec<VoterRecord>>,
    pub fail_with: Mutex<Option<fn() -> DirectoryError>>,
    pub delay: Duration,
    pub calls: AtomicU64,
}

impl FakeDirectory {
    pub fn with_voters(voters: Vec<VoterRecord>) -> Self {
        Self {
            voters: Mutex::new(voters),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl VoterDirectory for FakeDirectory {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<VoterRecord>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(fail) = *self.fail_with.lock().await {
            return Err(fail());
        }
        let dob = params.date_of_birth.as_str();
        Ok(self
            .voters
            .lock()
            .await
            .iter()
            .filter(|v| v.date_of_birth.format("%Y-%m-%d").to_string() == dob)
            .filter(|v| params.ward.matches(&v.ward))
            .filter(|v| params.name_matches(&v.full_name))
            .cloned()
            .collect())
    }
}
