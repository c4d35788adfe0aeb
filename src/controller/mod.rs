//! View controller: the lookup flow as an explicit state machine.
//!
//! ```text
//! Idle -> Searching -> Results -> Detail
//!              \-> Error        (Detail -> Results via back)
//! any -> Idle via reset
//! ```
//!
//! Each dispatched search holds a [`Ticket`]. Completions carrying a ticket
//! other than the one currently awaited are dropped, so a reset (or anything
//! else that moved the controller on) cannot be overwritten by a late reply.

mod sessions;

pub use sessions::{ExportGuard, Session, SessionStore};

use serde::Serialize;

use crate::directory::DirectoryError;
use crate::models::{VoterRecord, VoterRow};
use crate::slip::SlipFields;

pub const NOT_FOUND_MESSAGE: &str = "দুঃখিত, কোনো তথ্য পাওয়া যায়নি।";
pub const SERVICE_MESSAGE: &str = "সার্ভারে সমস্যা হয়েছে। অনুগ্রহ করে আবার চেষ্টা করুন।";
pub const NETWORK_MESSAGE: &str = "নেটওয়ার্ক সমস্যা। অনুগ্রহ করে ইন্টারনেট সংযোগ চেক করুন।";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    NotFound,
    Service,
    Network,
}

/// Why a search ended in the error state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub kind: FailureKind,
    pub message: &'static str,
}

impl SearchFailure {
    pub fn not_found() -> Self {
        Self {
            kind: FailureKind::NotFound,
            message: NOT_FOUND_MESSAGE,
        }
    }
}

impl From<&DirectoryError> for SearchFailure {
    fn from(err: &DirectoryError) -> Self {
        match err {
            DirectoryError::Network(_) => Self {
                kind: FailureKind::Network,
                message: NETWORK_MESSAGE,
            },
            DirectoryError::Service(_) => Self {
                kind: FailureKind::Service,
                message: SERVICE_MESSAGE,
            },
        }
    }
}

/// Identifies one dispatched search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Searching { ticket: Ticket },
    Results { voters: Vec<VoterRecord> },
    Detail {
        voters: Vec<VoterRecord>,
        selected: VoterRecord,
    },
    Error { failure: SearchFailure },
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Searching { .. } => "searching",
            ViewState::Results { .. } => "results",
            ViewState::Detail { .. } => "detail",
            ViewState::Error { .. } => "error",
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("a search is already in progress")]
    SearchInProgress,
    #[error("cannot {action} while {state}")]
    Invalid {
        action: &'static str,
        state: &'static str,
    },
    #[error("voter {0} is not in the current results")]
    UnknownVoter(String),
}

#[derive(Debug)]
pub struct ViewController {
    state: ViewState,
    generation: u64,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Enter `Searching`. Allowed from every state except `Searching`.
    pub fn begin_search(&mut self) -> Result<Ticket, TransitionError> {
        if matches!(self.state, ViewState::Searching { .. }) {
            return Err(TransitionError::SearchInProgress);
        }
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.state = ViewState::Searching { ticket };
        Ok(ticket)
    }

    /// Apply a search outcome. Returns `false` when the ticket is stale.
    pub fn complete_search(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<VoterRecord>, DirectoryError>,
    ) -> bool {
        match self.state {
            ViewState::Searching { ticket: current } if current == ticket => {}
            _ => {
                tracing::debug!(
                    ticket = ticket.0,
                    state = self.state.name(),
                    "Discarding stale search response"
                );
                return false;
            }
        }

        self.state = match outcome {
            Ok(voters) if voters.is_empty() => ViewState::Error {
                failure: SearchFailure::not_found(),
            },
            Ok(voters) => ViewState::Results { voters },
            Err(err) => {
                tracing::warn!("Search failed: {err}");
                ViewState::Error {
                    failure: SearchFailure::from(&err),
                }
            }
        };
        true
    }

    pub fn select(&mut self, voter_id: &str) -> Result<(), TransitionError> {
        let voters = match &mut self.state {
            ViewState::Results { voters } => std::mem::take(voters),
            other => {
                return Err(TransitionError::Invalid {
                    action: "select a voter",
                    state: other.name(),
                })
            }
        };
        let Some(selected) = voters.iter().find(|v| v.id == voter_id).cloned() else {
            self.state = ViewState::Results { voters };
            return Err(TransitionError::UnknownVoter(voter_id.to_string()));
        };
        self.state = ViewState::Detail { voters, selected };
        Ok(())
    }

    /// Leave the detail view, discarding the selection.
    pub fn back(&mut self) -> Result<(), TransitionError> {
        match std::mem::replace(&mut self.state, ViewState::Idle) {
            ViewState::Detail { voters, .. } => {
                self.state = ViewState::Results { voters };
                Ok(())
            }
            other => {
                let state = other.name();
                self.state = other;
                Err(TransitionError::Invalid {
                    action: "go back",
                    state,
                })
            }
        }
    }

    /// Clear everything. Any search still in flight is orphaned.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = ViewState::Idle;
    }

    pub fn selected(&self) -> Option<&VoterRecord> {
        match &self.state {
            ViewState::Detail { selected, .. } => Some(selected),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::from(&self.state)
    }
}

/// Serializable view of the current state.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ViewSnapshot {
    Idle,
    Searching,
    Results {
        count: usize,
        voters: Vec<VoterRow>,
    },
    Detail {
        voter: VoterRecord,
        slip: SlipFields,
    },
    Error {
        code: FailureKind,
        message: &'static str,
    },
}

impl From<&ViewState> for ViewSnapshot {
    fn from(state: &ViewState) -> Self {
        match state {
            ViewState::Idle => ViewSnapshot::Idle,
            ViewState::Searching { .. } => ViewSnapshot::Searching,
            ViewState::Results { voters } => ViewSnapshot::Results {
                count: voters.len(),
                voters: voters.iter().map(VoterRow::from).collect(),
            },
            ViewState::Detail { selected, .. } => ViewSnapshot::Detail {
                voter: selected.clone(),
                slip: SlipFields::from_voter(selected),
            },
            ViewState::Error { failure } => ViewSnapshot::Error {
                code: failure.kind,
                message: failure.message,
            },
        }
    }
}
