//! Per-client sessions, each owning one [`ViewController`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{TransitionError, ViewController, ViewSnapshot};
use crate::directory::{DirectoryError, VoterDirectory};
use crate::models::SearchParams;
use crate::search::run_search;

pub struct Session {
    pub id: Uuid,
    controller: Mutex<ViewController>,
    export_in_flight: AtomicBool,
    last_seen: AtomicI64,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            controller: Mutex::new(ViewController::new()),
            export_in_flight: AtomicBool::new(false),
            last_seen: AtomicI64::new(Utc::now().timestamp()),
        }
    }

    fn touch(&self) {
        self.last_seen.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    fn idle_for(&self, now: i64) -> i64 {
        now - self.last_seen.load(Ordering::Relaxed)
    }

    pub fn controller(&self) -> &Mutex<ViewController> {
        &self.controller
    }

    /// Run one search through this session's controller.
    ///
    /// The directory call and its completion run on a spawned task, so a
    /// dropped request still settles the controller. The controller lock is
    /// released while the call is pending; the ticket decides whether the
    /// reply is still wanted.
    pub async fn search(
        self: &Arc<Self>,
        directory: Arc<dyn VoterDirectory>,
        params: SearchParams,
    ) -> Result<ViewSnapshot, TransitionError> {
        let ticket = self.controller.lock().await.begin_search()?;

        let session = Arc::clone(self);
        let task = tokio::spawn(async move {
            let outcome = run_search(directory.as_ref(), &params).await;
            let mut controller = session.controller.lock().await;
            if !controller.complete_search(ticket, outcome) {
                tracing::info!(
                    session = %session.id,
                    "Search response arrived after reset, dropped"
                );
            }
            controller.snapshot()
        });

        match task.await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::error!(session = %self.id, "Search task failed: {e}");
                let mut controller = self.controller.lock().await;
                let outcome = Err(DirectoryError::Service(e.to_string()));
                controller.complete_search(ticket, outcome);
                Ok(controller.snapshot())
            }
        }
    }

    /// Claim the session's single export slot.
    pub fn try_begin_export(self: &Arc<Self>) -> Option<ExportGuard> {
        self.export_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard {
                session: Arc::clone(self),
            })
    }
}

/// Releases the export slot on drop.
pub struct ExportGuard {
    session: Arc<Session>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.session.export_in_flight.store(false, Ordering::Release);
    }
}

/// In-memory session registry with idle expiry.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a fresh idle session, sweeping expired ones first.
    pub async fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new());
        let mut sessions = self.sessions.write().await;

        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let before = sessions.len();
        sessions.retain(|_, s| s.idle_for(now) <= ttl);
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::debug!(swept, "Expired idle sessions");
        }

        sessions.insert(session.id, Arc::clone(&session));
        tracing::debug!(session = %session.id, active = sessions.len(), "Session created");
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.read().await.get(id).cloned()?;
        session.touch();
        Some(session)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
