//! Refresh Coordinator
//!
//! Owns the "refresh in flight" flag and the list of requests waiting on it.
//! The first caller to `acquire` while idle becomes the leader and is the only
//! one allowed to call the refresh endpoint; everyone after it gets a waiter
//! that settles with the leader's outcome.

use std::sync::{Mutex, MutexGuard};

use futures::channel::oneshot;

use crate::error::AuthError;

/// New access token, or why the session ended
pub type RefreshOutcome = Result<String, AuthError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

#[derive(Default)]
struct CoordinatorState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Single-flight refresh coordinator
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<CoordinatorState>,
}

/// Result of asking to refresh
pub enum RefreshTicket<'a> {
    /// Caller must perform the refresh and settle the lease
    Leader(RefreshLease<'a>),
    /// A refresh is already running; await its outcome
    Follower(RefreshWaiter),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> RefreshState {
        if self.lock().refreshing {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    /// Number of requests parked behind the in-flight refresh
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Become the leader if idle, otherwise join the waiting list
    pub fn acquire(&self) -> RefreshTicket<'_> {
        let mut state = self.lock();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            tracing::debug!(waiting = state.waiters.len(), "request queued behind token refresh");
            RefreshTicket::Follower(RefreshWaiter { rx })
        } else {
            state.refreshing = true;
            RefreshTicket::Leader(RefreshLease {
                coordinator: self,
                settled: false,
            })
        }
    }

    /// Back to idle; hand `outcome` to every waiter exactly once
    fn settle(&self, outcome: RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        let count = waiters.len();
        for waiter in waiters {
            // A dropped receiver means that request was abandoned
            let _ = waiter.send(outcome.clone());
        }
        count
    }
}

/// Held by the leader for the duration of the refresh.
///
/// Dropping it without settling rejects the waiters with
/// `AuthError::RefreshAbandoned` and returns the coordinator to idle.
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Publish the refresh outcome; returns how many waiters were released
    pub fn settle(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("token refresh dropped before settling");
            self.coordinator.settle(Err(AuthError::RefreshAbandoned));
        }
    }
}

/// Held by a request parked behind the in-flight refresh
pub struct RefreshWaiter {
    rx: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshWaiter {
    pub async fn wait(self) -> RefreshOutcome {
        self.rx.await.unwrap_or(Err(AuthError::RefreshAbandoned))
    }
}
