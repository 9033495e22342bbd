//! Vehicle state storage.
//!
//! The tracker only needs a key-value mapping from vehicle id to its last
//! [`VehicleState`]. [`StateStore`] is that seam; [`MemoryStateStore`] is the
//! in-process implementation. Nothing here is durable.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::model::VehicleState;

/// Key-value store of vehicle states.
///
/// # Atomicity
///
/// [`update`](StateStore::update) must run its closure while holding exclusive
/// access to the vehicle's entry, so that concurrent updates for the same
/// vehicle are applied one after another. Updates for different vehicles must
/// not block each other for longer than the closure runs.
///
/// The closure must not call back into the store.
pub trait StateStore: Send + Sync {
    /// Current state for a vehicle.
    fn get(&self, vehicle_id: &str) -> Option<VehicleState>;

    /// Atomically replace a vehicle's state with the closure's result.
    ///
    /// The closure receives the existing state, or `None` for a new vehicle.
    fn update(
        &self,
        vehicle_id: &str,
        apply: &mut dyn FnMut(Option<&VehicleState>) -> VehicleState,
    );

    /// Remove a vehicle if the predicate holds for its current state.
    fn remove_if(
        &self,
        vehicle_id: &str,
        predicate: &dyn Fn(&VehicleState) -> bool,
    ) -> Option<VehicleState>;

    /// Copy of every stored state, in no particular order.
    fn snapshot(&self) -> Vec<VehicleState>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store backed by a sharded concurrent map.
///
/// `update` holds the shard write lock for the vehicle's key while the
/// closure runs.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: DashMap<String, VehicleState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, vehicle_id: &str) -> Option<VehicleState> {
        self.states.get(vehicle_id).map(|entry| entry.value().clone())
    }

    fn update(
        &self,
        vehicle_id: &str,
        apply: &mut dyn FnMut(Option<&VehicleState>) -> VehicleState,
    ) {
        match self.states.entry(vehicle_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let next = apply(Some(entry.get()));
                *entry.get_mut() = next;
            }
            Entry::Vacant(entry) => {
                let next = apply(None);
                entry.insert(next);
            }
        }
    }

    fn remove_if(
        &self,
        vehicle_id: &str,
        predicate: &dyn Fn(&VehicleState) -> bool,
    ) -> Option<VehicleState> {
        self.states
            .remove_if(vehicle_id, |_, state| predicate(state))
            .map(|(_, state)| state)
    }

    fn snapshot(&self) -> Vec<VehicleState> {
        self.states
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.states.len()
    }
}
