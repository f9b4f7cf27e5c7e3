//! Slice subscriptions.
//!
//! Observers register for one slice of the store and are called only when
//! that slice differs between the previous and the next snapshot.

use core::fmt;

use ev_core::GraphId;

use crate::state::StoreState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// The part of the store a listener watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slice {
    Databases,
    /// Membership and order of the chart list, not chart contents.
    GraphList,
    Graph(GraphId),
    /// Global loading/error flags.
    Status,
}

impl Slice {
    pub fn changed(&self, old: &StoreState, new: &StoreState) -> bool {
        match self {
            Slice::Databases => old.databases != new.databases,
            Slice::GraphList => {
                old.graphs.len() != new.graphs.len()
                    || old.graphs.iter().zip(&new.graphs).any(|(a, b)| a.id != b.id)
            }
            Slice::Graph(id) => old.graph(id) != new.graph(id),
            Slice::Status => old.is_loading != new.is_loading || old.error != new.error,
        }
    }
}

pub type Listener = Box<dyn FnMut(&StoreState) + Send>;

struct Entry {
    id: SubscriptionId,
    slice: Slice,
    listener: Listener,
}

#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<Entry>,
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl Subscribers {
    pub fn add(&mut self, slice: Slice, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push(Entry {
            id,
            slice,
            listener,
        });
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Call every listener whose slice changed. Returns how many fired.
    pub fn notify(&mut self, old: &StoreState, new: &StoreState) -> usize {
        let mut fired = 0;
        for entry in &mut self.entries {
            if entry.slice.changed(old, new) {
                (entry.listener)(new);
                fired += 1;
            }
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
