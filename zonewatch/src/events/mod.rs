//! Bounded buffer of recently emitted transition events.
//!
//! The tracker itself keeps no event history. Callers that want to show
//! recent activity push the events returned by
//! [`VehicleTracker::process_sample`](crate::tracker::VehicleTracker::process_sample)
//! into a [`RecentEvents`] ring buffer of fixed capacity.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::tracker::ZoneTransitionEvent;

/// Default number of events retained.
pub const DEFAULT_EVENT_CAPACITY: usize = 1000;

/// Fixed-capacity ring buffer; the oldest event is dropped first when full.
#[derive(Debug)]
pub struct RecentEvents {
    capacity: usize,
    events: Mutex<VecDeque<ZoneTransitionEvent>>,
}

impl Default for RecentEvents {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl RecentEvents {
    /// Create a buffer holding at most `capacity` events.
    ///
    /// A capacity of zero retains nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append events in emission order, evicting the oldest as needed.
    pub fn extend<I>(&self, events: I)
    where
        I: IntoIterator<Item = ZoneTransitionEvent>,
    {
        if self.capacity == 0 {
            return;
        }
        let mut buffer = self.events.lock();
        for event in events {
            if buffer.len() == self.capacity {
                buffer.pop_front();
            }
            buffer.push_back(event);
        }
    }

    /// All retained events, newest first.
    pub fn snapshot(&self) -> Vec<ZoneTransitionEvent> {
        self.events.lock().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
