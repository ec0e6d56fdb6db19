//! Settles the dock status before it becomes visible.
//!
//! Consecutive messages within one physical dock operation often disagree
//! for a moment. A newly computed status only becomes visible once it has
//! stood unchallenged for the configured delay.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::state::DockStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    status: DockStatus,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct DockDebounce {
    delay: Duration,
    committed: Option<DockStatus>,
    pending: Option<Pending>,
}

impl DockDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            committed: None,
            pending: None,
        }
    }

    pub fn committed(&self) -> Option<DockStatus> {
        self.committed
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Feeds a freshly computed status. The timer restarts only when it
    /// differs from where we are already heading: the pending status if
    /// there is one, the committed one otherwise. Returns true on restart.
    pub fn observe(&mut self, status: DockStatus, now: Instant) -> bool {
        let target = self.pending.map(|p| p.status).or(self.committed);
        if target == Some(status) {
            return false;
        }
        debug!(
            "Dock status {:?} -> {:?}, settling for {:?}",
            self.committed, status, self.delay
        );
        self.pending = Some(Pending {
            status,
            deadline: now + self.delay,
        });
        true
    }

    /// Commits the pending status once its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<DockStatus> {
        let pending = self.pending.filter(|p| now >= p.deadline)?;
        self.pending = None;
        self.committed = Some(pending.status);
        debug!("Dock status committed: {:?}", pending.status);
        Some(pending.status)
    }

    /// Commits without waiting, cancelling anything pending.
    pub fn commit_now(&mut self, status: Option<DockStatus>) {
        self.pending = None;
        self.committed = status;
    }
}
