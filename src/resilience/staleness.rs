/// Identity of one in-flight request: what it was for and when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    pub key: K,
    generation: u64,
}

/// Tracks the latest request of one kind so late responses can be dropped.
///
/// Every response carries the ticket of the request that produced it; only
/// the most recently issued ticket is accepted. Asking for the same key twice
/// still invalidates the first request.
#[derive(Debug, Clone)]
pub struct RequestGuard<K> {
    generation: u64,
    current: Option<Ticket<K>>,
}

impl<K> Default for RequestGuard<K> {
    fn default() -> Self {
        Self {
            generation: 0,
            current: None,
        }
    }
}

impl<K: Clone + PartialEq> RequestGuard<K> {
    pub fn issue(&mut self, key: K) -> Ticket<K> {
        self.generation = self.generation.wrapping_add(1);
        let ticket = Ticket {
            key,
            generation: self.generation,
        };
        self.current = Some(ticket.clone());
        ticket
    }

    #[must_use]
    pub fn accepts(&self, ticket: &Ticket<K>) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    /// Accepts `ticket` and retires it so a duplicate delivery is ignored.
    pub fn complete(&mut self, ticket: &Ticket<K>) -> bool {
        if self.accepts(ticket) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn pending(&self) -> Option<&K> {
        self.current.as_ref().map(|ticket| &ticket.key)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}
