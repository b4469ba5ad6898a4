//! Ticket detail view state with an explicit two-phase update.
//!
//! A staff mutation is applied to the local copy first, then written to the
//! store. A confirmed write leaves the copy `confirmed`; a failed write marks
//! it `stale` so the caller reconciles by reloading instead of trusting it.

use serde::Serialize;

use super::Ticket;

/// Whether the local copy is known to match the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// The last write was acknowledged.
    Confirmed,
    /// The last write failed; reload before trusting the copy.
    Stale,
}

/// Local copy of one Ticket Record plus its sync state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetail {
    ticket: Ticket,
    sync_state: SyncState,
}

impl TicketDetail {
    /// Wrap a freshly read record.
    pub fn loaded(ticket: Ticket) -> Self {
        Self {
            ticket,
            sync_state: SyncState::Confirmed,
        }
    }

    /// Apply a local mutation ahead of the write.
    ///
    /// The state stays as it was until [`Self::confirm`] or
    /// [`Self::mark_stale`] settles the write.
    pub fn apply<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut Ticket),
    {
        mutate(&mut self.ticket);
    }

    /// Record that the write succeeded.
    pub fn confirm(&mut self) {
        self.sync_state = SyncState::Confirmed;
    }

    /// Record that the write failed.
    pub fn mark_stale(&mut self) {
        self.sync_state = SyncState::Stale;
    }

    /// Local copy.
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Current sync state.
    pub fn sync_state(&self) -> SyncState {
        self.sync_state
    }

    /// Consume into the local copy and its sync state.
    pub fn into_parts(self) -> (Ticket, SyncState) {
        (self.ticket, self.sync_state)
    }
}
