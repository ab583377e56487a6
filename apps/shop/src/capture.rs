//! # Capture Tracking
//!
//! At most one capture (camera → recognition) is pending at a time.
//!
//! ```text
//! begin(Invoice) ─► ticket 7 (active)
//!      │
//!      │   operator closes the camera ─► cancel() ─► no active ticket
//!      │
//!      ▼
//! recognition answers for ticket 7 ─► complete(7) == false ─► StaleCapture
//! ```
//!
//! Starting a new capture supersedes the previous one the same way.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::debug;

/// What a capture is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    /// Supplier invoice to reconcile.
    Invoice,
    /// Product photograph to add to the cart.
    Product,
    /// Barcode for the registration form.
    Barcode,
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureKind::Invoice => write!(f, "invoice"),
            CaptureKind::Product => write!(f, "product"),
            CaptureKind::Barcode => write!(f, "barcode"),
        }
    }
}

/// Handle of one capture. Ids increase monotonically, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureTicket {
    pub id: u64,
    pub kind: CaptureKind,
}

#[derive(Debug, Default)]
pub struct CaptureTracker {
    issued: AtomicU64,
    /// Id of the active ticket, 0 when none.
    active: AtomicU64,
}

impl CaptureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket and makes it the active one.
    pub fn begin(&self, kind: CaptureKind) -> CaptureTicket {
        let id = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = self.active.swap(id, Ordering::SeqCst);
        if previous != 0 {
            debug!(superseded = previous, ticket = id, "Pending capture superseded");
        }
        debug!(ticket = id, kind = %kind, "Capture started");
        CaptureTicket { id, kind }
    }

    /// Drops the active ticket, if any.
    pub fn cancel(&self) {
        let previous = self.active.swap(0, Ordering::SeqCst);
        if previous != 0 {
            debug!(ticket = previous, "Capture cancelled");
        }
    }

    /// Claims `ticket` for applying its result. True at most once per ticket,
    /// and only while it is still the active one.
    pub fn complete(&self, ticket: &CaptureTicket) -> bool {
        self.active
            .compare_exchange(ticket.id, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_ids_increase() {
        let tracker = CaptureTracker::new();
        let a = tracker.begin(CaptureKind::Invoice);
        let b = tracker.begin(CaptureKind::Product);
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn test_new_capture_supersedes_old() {
        let tracker = CaptureTracker::new();
        let old = tracker.begin(CaptureKind::Invoice);
        let new = tracker.begin(CaptureKind::Invoice);

        assert!(!tracker.complete(&old));
        assert!(tracker.complete(&new));
    }

    #[test]
    fn test_cancel_and_complete_once() {
        let tracker = CaptureTracker::new();
        let ticket = tracker.begin(CaptureKind::Barcode);
        tracker.cancel();
        assert!(!tracker.complete(&ticket));

        let ticket = tracker.begin(CaptureKind::Barcode);
        assert!(tracker.complete(&ticket));
        assert!(!tracker.complete(&ticket));
    }
}
