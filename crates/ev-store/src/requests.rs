//! Request tickets guarding against stale responses.
//!
//! Every fetch takes a ticket for its `(graph, slot)` pair. Starting a newer
//! fetch for the same pair, or invalidating the graph, makes older tickets
//! stale; results delivered with a stale ticket are dropped.

use std::collections::HashMap;

use ev_core::GraphId;

use crate::triggers::SelectionList;

/// What a request fills in once it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestSlot {
    Dataset,
    Selection(SelectionList),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub graph: GraphId,
    pub slot: RequestSlot,
    seq: u64,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    latest: HashMap<(GraphId, RequestSlot), u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, graph: &GraphId, slot: RequestSlot) -> RequestTicket {
        self.next_seq += 1;
        self.latest.insert((graph.clone(), slot), self.next_seq);
        RequestTicket {
            graph: graph.clone(),
            slot,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest
            .get(&(ticket.graph.clone(), ticket.slot))
            .is_some_and(|seq| *seq == ticket.seq)
    }

    /// Retire `ticket` if it is still the newest one. Returns whether it was.
    pub fn complete(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.latest.remove(&(ticket.graph.clone(), ticket.slot));
        true
    }

    /// Make every outstanding ticket of `graph` stale.
    pub fn invalidate(&mut self, graph: &GraphId) {
        self.latest.retain(|(id, _), _| id != graph);
    }

    /// Make the outstanding ticket of one slot of `graph` stale.
    pub fn invalidate_slot(&mut self, graph: &GraphId, slot: RequestSlot) {
        self.latest.remove(&(graph.clone(), slot));
    }

    pub fn pending(&self, graph: &GraphId) -> usize {
        self.latest.keys().filter(|(id, _)| id == graph).count()
    }
}
