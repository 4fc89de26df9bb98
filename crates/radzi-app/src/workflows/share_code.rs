//! Share-code deep links
//!
//! A shared link carries an opaque code. The screen looks the code up
//! through the club query policy and replaces itself with the club's detail
//! screen, or settles in a terminal not-found state.
//!
//! ```text
//! AwaitingInput ─► Loading ─► Resolved ─► Redirected
//!                     └─────► NotFound
//! ```

use parking_lot::Mutex;
use radzi_core::effects::NavigationEffects;
use radzi_core::types::{Club, ClubId, Route};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;

use super::lifetime::ScreenLifetime;
use crate::queries::{QueryEntry, QueryPolicies};

/// Message key shown when a code resolves to nothing.
pub const NOT_FOUND_MESSAGE_KEY: &str = "clubs.share.not_found";

/// Where a share-code visit stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStatus {
    /// No code yet
    AwaitingInput,
    /// Lookup in flight
    Loading,
    /// Club found, redirect pending
    Resolved,
    /// Redirect issued
    Redirected,
    /// No club for this code (terminal)
    NotFound,
}

/// Observable state of one screen visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCodeResolution {
    /// Code being resolved, trimmed
    pub code: Option<String>,
    /// Current state
    pub status: ResolutionStatus,
    /// Resolved club
    pub club: Option<Club>,
}

impl ShareCodeResolution {
    fn awaiting_input() -> Self {
        Self {
            code: None,
            status: ResolutionStatus::AwaitingInput,
            club: None,
        }
    }

    /// User-facing message key for the current state, if any.
    pub fn message_key(&self) -> Option<&'static str> {
        (self.status == ResolutionStatus::NotFound).then_some(NOT_FOUND_MESSAGE_KEY)
    }
}

/// One visit to the share-code screen.
///
/// Dropping the screen unmounts it.
pub struct ShareCodeScreen {
    policies: QueryPolicies,
    navigation: Arc<dyn NavigationEffects>,
    lifetime: ScreenLifetime,
    state: watch::Sender<ShareCodeResolution>,
    redirected: Mutex<HashSet<ClubId>>,
}

impl std::fmt::Debug for ShareCodeScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareCodeScreen")
            .field("state", &*self.state.borrow())
            .field("mounted", &self.lifetime.is_mounted())
            .finish_non_exhaustive()
    }
}

impl ShareCodeScreen {
    /// Mount a new visit.
    pub fn new(policies: QueryPolicies, navigation: Arc<dyn NavigationEffects>) -> Self {
        let (state, _) = watch::channel(ShareCodeResolution::awaiting_input());
        Self {
            policies,
            navigation,
            lifetime: ScreenLifetime::new(),
            state,
            redirected: Mutex::new(HashSet::new()),
        }
    }

    /// Liveness handle for tasks started on behalf of this screen.
    pub fn lifetime(&self) -> ScreenLifetime {
        self.lifetime.clone()
    }

    /// Leave the screen; completions arriving later are ignored.
    pub fn unmount(&self) {
        self.lifetime.unmount();
    }

    /// Current state.
    pub fn resolution(&self) -> ShareCodeResolution {
        self.state.borrow().clone()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ShareCodeResolution> {
        self.state.subscribe()
    }

    /// Look `code` up and redirect when it names a club.
    ///
    /// An unmounted screen keeps its state and issues no lookup.
    pub async fn resolve(&self, code: &str) -> ResolutionStatus {
        if !self.lifetime.is_mounted() {
            tracing::debug!(code, "share code screen unmounted, skipping lookup");
            return self.state.borrow().status;
        }
        let code = code.trim();
        if code.is_empty() {
            tracing::debug!("empty share code");
            self.state.send_replace(ShareCodeResolution {
                code: Some(String::new()),
                status: ResolutionStatus::NotFound,
                club: None,
            });
            return ResolutionStatus::NotFound;
        }

        self.state.send_replace(ShareCodeResolution {
            code: Some(code.to_string()),
            status: ResolutionStatus::Loading,
            club: None,
        });

        let entry = self.policies.club_by_share_code(code).await;
        self.on_lookup_result(code, &entry)
    }

    /// Apply a lookup outcome for `code`.
    ///
    /// Safe to call again with the same outcome: the redirect for a club
    /// fires at most once per visit.
    pub fn on_lookup_result(&self, code: &str, entry: &QueryEntry<Option<Club>>) -> ResolutionStatus {
        if !self.lifetime.is_mounted() {
            tracing::debug!(code, "share code resolved after unmount, ignoring");
            return self.state.borrow().status;
        }
        if self.state.borrow().code.as_deref() != Some(code) {
            tracing::debug!(code, "result for a superseded share code, ignoring");
            return self.state.borrow().status;
        }

        let club = match (&entry.error, &entry.data) {
            (None, Some(Some(club))) if entry.is_success() => club.clone(),
            (Some(err), _) => {
                tracing::warn!(code, error = %err, "share code lookup failed");
                return self.settle_not_found(code);
            }
            (None, Some(None)) => return self.settle_not_found(code),
            _ => return self.state.borrow().status,
        };

        self.state.send_replace(ShareCodeResolution {
            code: Some(code.to_string()),
            status: ResolutionStatus::Resolved,
            club: Some(club.clone()),
        });
        self.redirect_once(code, club)
    }

    fn settle_not_found(&self, code: &str) -> ResolutionStatus {
        self.state.send_replace(ShareCodeResolution {
            code: Some(code.to_string()),
            status: ResolutionStatus::NotFound,
            club: None,
        });
        ResolutionStatus::NotFound
    }

    fn redirect_once(&self, code: &str, club: Club) -> ResolutionStatus {
        let first = self.redirected.lock().insert(club.id);
        if first {
            let route = Route::Club(club.id);
            tracing::info!(code, route = %route, "redirecting to shared club");
            self.navigation.replace(&route);
        } else {
            tracing::debug!(code, club = %club.id, "redirect already issued");
        }
        self.state.send_replace(ShareCodeResolution {
            code: Some(code.to_string()),
            status: ResolutionStatus::Redirected,
            club: Some(club),
        });
        ResolutionStatus::Redirected
    }
}

impl Drop for ShareCodeScreen {
    fn drop(&mut self) {
        self.lifetime.unmount();
    }
}
