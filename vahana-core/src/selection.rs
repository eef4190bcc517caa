//! The comparison selection: which vehicles are currently being compared.
//!
//! A single [`SelectionStore`] lives for the whole UI session. It keeps the
//! selected vehicles in insertion order, never holds two vehicles with the same
//! id, and never grows past `max_comparison`. Every mutation goes through
//! [`add`](SelectionStore::add), [`remove`](SelectionStore::remove) or
//! [`clear`](SelectionStore::clear).
//!
//! The list is held in a `tokio::sync::watch` channel. Each mutation performs its
//! check-then-act inside one `send_if_modified` call, which holds the channel's
//! write lock, so the store can be shared between threads without breaking the
//! uniqueness or capacity rules. Renderers call [`subscribe`](SelectionStore::subscribe)
//! and re-pull the comparison matrix whenever the receiver reports a change.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::notify::{NoOpSink, Notification, NotificationSink};
use crate::types::Vehicle;

/// Default business cap on the number of vehicles compared at once.
pub const DEFAULT_MAX_COMPARISON: usize = 3;

/// Result of [`SelectionStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended to the end of the selection.
    Added,
    /// A vehicle with the same id is already selected; nothing changed.
    AlreadyPresent,
    /// The selection is full; nothing changed.
    LimitReached,
}

impl AddOutcome {
    pub fn is_added(self) -> bool {
        self == AddOutcome::Added
    }
}

/// Process-wide selection of vehicles for comparison.
pub struct SelectionStore {
    state: watch::Sender<Vec<Arc<Vehicle>>>,
    max_comparison: usize,
    sink: Arc<dyn NotificationSink>,
}

impl SelectionStore {
    /// Create an empty store that discards notifications.
    pub fn new(max_comparison: usize) -> Self {
        Self::with_sink(max_comparison, Arc::new(NoOpSink))
    }

    /// Create an empty store that reports every transition to `sink`.
    pub fn with_sink(max_comparison: usize, sink: Arc<dyn NotificationSink>) -> Self {
        let (state, _initial_rx) = watch::channel(Vec::new());
        Self {
            state,
            max_comparison,
            sink,
        }
    }

    pub fn max_comparison(&self) -> usize {
        self.max_comparison
    }

    /// Add a vehicle to the end of the selection.
    ///
    /// Duplicates (by id) and additions to a full selection are rejected without
    /// mutation; each outcome fires its own notification.
    pub fn add(&self, vehicle: Arc<Vehicle>) -> AddOutcome {
        let max = self.max_comparison;
        let mut outcome = AddOutcome::Added;

        self.state.send_if_modified(|list| {
            if list.iter().any(|v| v.id == vehicle.id) {
                outcome = AddOutcome::AlreadyPresent;
                return false;
            }
            if list.len() >= max {
                outcome = AddOutcome::LimitReached;
                return false;
            }
            list.push(Arc::clone(&vehicle));
            true
        });

        debug!(
            vehicle_id = vehicle.id.as_str(),
            outcome = ?outcome,
            len = self.len(),
            "selection add"
        );

        let notification = match outcome {
            AddOutcome::Added => Notification::Added {
                name: vehicle.name.clone(),
            },
            AddOutcome::AlreadyPresent => Notification::AlreadyPresent {
                name: vehicle.name.clone(),
            },
            AddOutcome::LimitReached => Notification::LimitReached { max },
        };
        self.emit(&notification);
        outcome
    }

    /// Remove the vehicle with `vehicle_id`, returning it if it was selected.
    ///
    /// Removing an id that is not selected is a silent no-op.
    pub fn remove(&self, vehicle_id: &str) -> Option<Arc<Vehicle>> {
        let mut removed = None;
        self.state.send_if_modified(|list| {
            match list.iter().position(|v| v.id == vehicle_id) {
                Some(index) => {
                    removed = Some(list.remove(index));
                    true
                }
                None => false,
            }
        });

        debug!(vehicle_id, found = removed.is_some(), "selection remove");

        if let Some(vehicle) = &removed {
            self.emit(&Notification::Removed {
                name: vehicle.name.clone(),
            });
        }
        removed
    }

    /// Empty the selection.
    ///
    /// The `Cleared` notification fires even when the selection was already
    /// empty; subscribers are only woken if something was actually removed.
    pub fn clear(&self) {
        let mut dropped = 0;
        self.state.send_if_modified(|list| {
            dropped = list.len();
            list.clear();
            dropped > 0
        });

        debug!(dropped, "selection clear");
        self.emit(&Notification::Cleared);
    }

    pub fn contains(&self, vehicle_id: &str) -> bool {
        self.state.borrow().iter().any(|v| v.id == vehicle_id)
    }

    /// Snapshot of the selection, oldest first.
    pub fn list(&self) -> Vec<Arc<Vehicle>> {
        self.state.borrow().clone()
    }

    /// Ids of the selected vehicles, oldest first.
    pub fn ids(&self) -> Vec<String> {
        self.state.borrow().iter().map(|v| v.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.max_comparison
    }

    /// Observe the selection. The receiver is marked changed after every mutation
    /// that altered the list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Arc<Vehicle>>> {
        self.state.subscribe()
    }

    fn emit(&self, notification: &Notification) {
        if let Err(e) = self.sink.notify(notification) {
            warn!(
                kind = notification.kind(),
                error = %e,
                "Notification sink failed; selection state unaffected"
            );
        }
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMPARISON)
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("ids", &self.ids())
            .field("max_comparison", &self.max_comparison)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::notify::RecordingSink;

    fn vehicle(id: &str, name: &str) -> Arc<Vehicle> {
        Arc::new(Vehicle::new(id, "Brand", name, "Scooter"))
    }

    fn recording_store(max: usize) -> (SelectionStore, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let store = SelectionStore::with_sink(max, Arc::clone(&sink) as Arc<dyn NotificationSink>);
        (store, sink)
    }

    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Unavailable {
                message: "toast host gone".into(),
            })
        }
    }

    #[test]
    fn test_add_appends_in_order() {
        let (store, sink) = recording_store(3);
        assert_eq!(store.add(vehicle("a", "A")), AddOutcome::Added);
        assert_eq!(store.add(vehicle("b", "B")), AddOutcome::Added);
        assert_eq!(store.ids(), vec!["a", "b"]);
        assert_eq!(
            sink.last(),
            Some(Notification::Added { name: "B".into() })
        );
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let (store, sink) = recording_store(3);
        store.add(vehicle("a", "Activa"));
        assert_eq!(store.add(vehicle("a", "Activa")), AddOutcome::AlreadyPresent);
        assert_eq!(store.len(), 1);
        assert_eq!(
            sink.last(),
            Some(Notification::AlreadyPresent {
                name: "Activa".into()
            })
        );
    }

    #[test]
    fn test_add_past_capacity_is_rejected() {
        let (store, sink) = recording_store(3);
        for id in ["a", "b", "c"] {
            assert!(store.add(vehicle(id, id)).is_added());
        }
        assert!(store.is_full());
        assert_eq!(store.add(vehicle("d", "d")), AddOutcome::LimitReached);
        assert_eq!(store.ids(), vec!["a", "b", "c"]);
        assert_eq!(sink.last(), Some(Notification::LimitReached { max: 3 }));
    }

    #[test]
    fn test_duplicate_checked_before_capacity() {
        let (store, _sink) = recording_store(1);
        store.add(vehicle("a", "A"));
        assert_eq!(store.add(vehicle("a", "A")), AddOutcome::AlreadyPresent);
    }

    #[test]
    fn test_remove_present_and_absent() {
        let (store, sink) = recording_store(3);
        store.add(vehicle("a", "A"));
        store.add(vehicle("b", "B"));
        let before = sink.len();

        let removed = store.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(store.ids(), vec!["b"]);
        assert_eq!(sink.last(), Some(Notification::Removed { name: "A".into() }));

        assert!(store.remove("zzz").is_none());
        assert_eq!(sink.len(), before + 1);
    }

    #[test]
    fn test_clear_always_notifies() {
        let (store, sink) = recording_store(3);
        store.clear();
        assert_eq!(sink.notifications(), vec![Notification::Cleared]);

        store.add(vehicle("a", "A"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(sink.last(), Some(Notification::Cleared));
    }

    #[test]
    fn test_contains() {
        let store = SelectionStore::default();
        assert!(!store.contains("a"));
        store.add(vehicle("a", "A"));
        assert!(store.contains("a"));
        assert_eq!(store.max_comparison(), DEFAULT_MAX_COMPARISON);
    }

    #[test]
    fn test_failing_sink_does_not_affect_state() {
        let store = SelectionStore::with_sink(2, Arc::new(FailingSink));
        assert_eq!(store.add(vehicle("a", "A")), AddOutcome::Added);
        assert_eq!(store.add(vehicle("b", "B")), AddOutcome::Added);
        assert_eq!(store.add(vehicle("c", "C")), AddOutcome::LimitReached);
        assert!(store.remove("a").is_some());
        assert_eq!(store.ids(), vec!["b"]);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_subscribe_sees_only_real_changes() {
        let store = SelectionStore::new(3);
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add(vehicle("a", "A"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.add(vehicle("a", "A"));
        store.remove("missing");
        assert!(!rx.has_changed().unwrap());

        store.clear();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());

        store.clear();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_concurrent_adds_respect_invariants() {
        let store = Arc::new(SelectionStore::new(3));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..20 {
                        let id = format!("v{}", (t + i) % 5);
                        store.add(Arc::new(Vehicle::new(&id, "B", &id, "C")));
                        if i % 7 == 0 {
                            store.remove(&id);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ids = store.ids();
        assert!(ids.len() <= 3);
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }
}
