use std::sync::atomic::{AtomicU64, Ordering};

// Shared by every issuer so ids never repeat within a process.
static NEXT_TICKET_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one issued search. Only the most recently issued ticket of a
/// [`TicketIssuer`] may change state when its response arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    id: u64,
    term: String,
}

impl SearchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

/// Tracks the latest ticket handed out by one controller or view. `0` means
/// nothing is outstanding.
#[derive(Debug, Default)]
pub struct TicketIssuer {
    latest: u64,
}

impl TicketIssuer {
    pub fn issue(&mut self, term: &str) -> SearchTicket {
        self.latest = NEXT_TICKET_ID.fetch_add(1, Ordering::Relaxed);
        SearchTicket {
            id: self.latest,
            term: term.to_string(),
        }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.latest != 0 && ticket.id == self.latest
    }

    /// Marks every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest = 0;
    }
}
