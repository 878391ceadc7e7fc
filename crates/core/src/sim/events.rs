//! Explicit subscription table for simulation-wide notifications.
//! This module exists so pursuers register for the events they react to when they spawn and
//! drop out when the level ends, instead of being reached through a global.
//! It does not decide what a subscriber does with an event; `Simulation::dispatch` does.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::PursuerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    PowerPickup,
    PlayerFirstMove,
}

#[derive(Clone, Debug, Default)]
pub(super) struct EventBus {
    subscribers: BTreeMap<Topic, BTreeSet<PursuerId>>,
}

impl EventBus {
    pub fn subscribe(&mut self, id: PursuerId, topic: Topic) {
        self.subscribers.entry(topic).or_default().insert(id);
    }

    pub fn unsubscribe_all(&mut self, id: PursuerId) {
        for set in self.subscribers.values_mut() {
            set.remove(&id);
        }
        self.subscribers.retain(|_, set| !set.is_empty());
    }

    /// Snapshot in stable order, so handlers may mutate the simulation while iterating.
    pub fn subscribers(&self, topic: Topic) -> Vec<PursuerId> {
        self.subscribers.get(&topic).map(|set| set.iter().copied().collect()).unwrap_or_default()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers.get(&topic).map_or(0, BTreeSet::len)
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn ids(count: usize) -> Vec<PursuerId> {
        let mut map = SlotMap::<PursuerId, ()>::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn subscribers_are_tracked_per_topic() {
        let ids = ids(3);
        let mut bus = EventBus::default();
        bus.subscribe(ids[0], Topic::PowerPickup);
        bus.subscribe(ids[1], Topic::PowerPickup);
        bus.subscribe(ids[1], Topic::PowerPickup);
        bus.subscribe(ids[2], Topic::PlayerFirstMove);
        assert_eq!(bus.subscriber_count(Topic::PowerPickup), 2, "double subscribe is a no-op");
        assert_eq!(bus.subscribers(Topic::PlayerFirstMove), vec![ids[2]]);
    }

    #[test]
    fn unsubscribe_removes_from_every_topic() {
        let ids = ids(2);
        let mut bus = EventBus::default();
        for &id in &ids {
            bus.subscribe(id, Topic::PowerPickup);
            bus.subscribe(id, Topic::PlayerFirstMove);
        }
        bus.unsubscribe_all(ids[0]);
        assert_eq!(bus.subscribers(Topic::PowerPickup), vec![ids[1]]);
        assert_eq!(bus.subscribers(Topic::PlayerFirstMove), vec![ids[1]]);
        bus.unsubscribe_all(ids[1]);
        assert_eq!(bus.subscriber_count(Topic::PowerPickup), 0);
        assert!(bus.subscribers(Topic::PlayerFirstMove).is_empty());
    }
}
