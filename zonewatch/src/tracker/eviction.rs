//! Explicit removal policies for idle vehicles.
//!
//! Without a policy the store grows with every distinct vehicle id it has
//! seen. A policy is applied by calling
//! [`VehicleTracker::evict`](super::VehicleTracker::evict), typically from the
//! periodic sweeper started by the application.

use std::fmt;
use std::str::FromStr;

use super::model::VehicleState;
use super::store::StateStore;

/// Which vehicles to drop during an eviction sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Keep every vehicle for the lifetime of the process.
    #[default]
    None,
    /// Drop vehicles whose last update is older than `max_age_ms`.
    Ttl { max_age_ms: i64 },
    /// Keep at most `max_vehicles`, dropping the least recently updated.
    Lru { max_vehicles: usize },
}

impl EvictionPolicy {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, EvictionPolicy::None)
    }

    /// Apply the policy to a store. Returns the number of vehicles removed.
    ///
    /// A vehicle that receives a new sample between selection and removal is
    /// kept, because removal is conditional on `last_update` being unchanged.
    pub fn sweep(&self, store: &dyn StateStore, now_ms: i64) -> usize {
        match *self {
            EvictionPolicy::None => 0,
            EvictionPolicy::Ttl { max_age_ms } => {
                let cutoff = now_ms.saturating_sub(max_age_ms);
                store
                    .snapshot()
                    .into_iter()
                    .filter(|state| state.last_update < cutoff)
                    .filter(|state| {
                        store
                            .remove_if(&state.vehicle_id, &|current| current.last_update < cutoff)
                            .is_some()
                    })
                    .count()
            }
            EvictionPolicy::Lru { max_vehicles } => {
                let mut states = store.snapshot();
                if states.len() <= max_vehicles {
                    return 0;
                }
                let excess = states.len() - max_vehicles;
                states.sort_by(|a, b| {
                    a.last_update
                        .cmp(&b.last_update)
                        .then_with(|| a.vehicle_id.cmp(&b.vehicle_id))
                });
                states
                    .iter()
                    .take(excess)
                    .filter(|state| remove_unchanged(store, state))
                    .count()
            }
        }
    }
}

fn remove_unchanged(store: &dyn StateStore, seen: &VehicleState) -> bool {
    let last_update = seen.last_update;
    store
        .remove_if(&seen.vehicle_id, &|current| current.last_update == last_update)
        .is_some()
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::None => write!(f, "none"),
            EvictionPolicy::Ttl { max_age_ms } => write!(f, "ttl ({}s)", max_age_ms / 1000),
            EvictionPolicy::Lru { max_vehicles } => write!(f, "lru ({} vehicles)", max_vehicles),
        }
    }
}

/// Policy kind as written in configuration (`none`, `ttl`, `lru`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionKind {
    #[default]
    None,
    Ttl,
    Lru,
}

impl EvictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionKind::None => "none",
            EvictionKind::Ttl => "ttl",
            EvictionKind::Lru => "lru",
        }
    }
}

impl FromStr for EvictionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(EvictionKind::None),
            "ttl" => Ok(EvictionKind::Ttl),
            "lru" => Ok(EvictionKind::Lru),
            other => Err(format!(
                "unknown eviction policy '{}' (expected none, ttl or lru)",
                other
            )),
        }
    }
}
