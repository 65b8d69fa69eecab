use std::fmt;
use std::sync::mpsc;

use crate::record::SnackRecord;

/// Notification sent to every observer on each list mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// The list was emptied ahead of a new search's results.
    Cleared,
    /// One record was appended at `index`.
    Appended { index: usize, record: SnackRecord },
}

/// Receives clear/append notifications. One call per mutation, in the
/// order the mutations happened.
pub trait ListObserver: Send {
    fn notify(&self, event: &ListEvent);
}

/// Observer that forwards every event over an mpsc channel.
pub struct ChannelListObserver {
    tx: mpsc::Sender<ListEvent>,
}

impl ChannelListObserver {
    pub fn new(tx: mpsc::Sender<ListEvent>) -> Self {
        Self { tx }
    }
}

impl ListObserver for ChannelListObserver {
    fn notify(&self, event: &ListEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Ordered, observable collection of enriched records for the most recent
/// search.
///
/// Invariant: `begin` runs before any `push` for a given search, so
/// observers always see one `Cleared` followed by that search's appends,
/// and records from different searches never mix.
#[derive(Default)]
pub struct ResultList {
    records: Vec<SnackRecord>,
    observers: Vec<Box<dyn ListObserver>>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for all future notifications. Observers never
    /// detach; they live as long as the list.
    pub fn attach(&mut self, observer: Box<dyn ListObserver>) {
        self.observers.push(observer);
    }

    /// Clears in place and tells every observer the list is now empty.
    pub fn begin(&mut self) {
        self.records.clear();
        self.emit(&ListEvent::Cleared);
    }

    /// Appends one record and notifies observers. One event per record,
    /// never batched.
    pub fn push(&mut self, record: SnackRecord) {
        let index = self.records.len();
        self.records.push(record.clone());
        self.emit(&ListEvent::Appended { index, record });
    }

    pub fn records(&self) -> &[SnackRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn emit(&self, event: &ListEvent) {
        for observer in &self.observers {
            observer.notify(event);
        }
    }
}

impl fmt::Debug for ResultList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultList")
            .field("records", &self.records)
            .field("observers", &self.observers.len())
            .finish()
    }
}
