//! Last-write-wins bookkeeping for the two asynchronous tools (QR rendering, RSA keys).
//!
//! Each submission takes a ticket. When a result arrives it is accepted only if its
//! ticket is still the newest one; older results are dropped without cancellation.
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }

    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Default)]
pub struct LatestRequest {
    latest: u64,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Returns `value` when `ticket` is current, `None` for a superseded request.
    pub fn settle<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!(stale = ticket.0, latest = self.latest, "dropping superseded result");
            None
        }
    }
}

/// A tracker plus the last result it accepted.
#[derive(Debug)]
pub struct RequestSlot<T> {
    tracker: LatestRequest,
    value: Option<T>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            tracker: LatestRequest::default(),
            value: None,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.tracker.begin()
    }

    /// Stores `value` if `ticket` is current. Returns whether it was stored.
    pub fn complete(&mut self, ticket: RequestTicket, value: T) -> bool {
        match self.tracker.settle(ticket, value) {
            Some(value) => {
                self.value = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
