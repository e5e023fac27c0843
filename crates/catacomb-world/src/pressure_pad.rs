//! Pressure pads: floor tiles that set off actuators.
//!
//! A pad keeps one pristine actuator per [`PadEvent`]. When the event
//! happens, a clone of that actuator is registered with the clock, so the
//! same pad can be triggered again while an earlier run is still counting
//! down.

use std::collections::BTreeMap;

use catacomb_core::actuator::{Actuator, ActuatorSlot};
use catacomb_core::clock::{ListenerId, Schedule};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dungeon::Dungeon;

/// Things that happen on a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PadEvent {
    /// The first item landed on the pad.
    ItemDropped,
    /// The last item was taken off the pad.
    ItemPickedUp,
    /// A creature stepped onto the pad.
    CreatureSteppedOn,
    /// A creature stepped off the pad.
    CreatureSteppedOff,
    /// The party stepped onto the pad.
    PartySteppedOn,
    /// The party stepped off the pad.
    PartySteppedOff,
}

/// A floor tile wired to actuators.
#[derive(Debug, Default)]
pub struct PressurePad {
    actuators: BTreeMap<PadEvent, ActuatorSlot<Dungeon>>,
}

impl PressurePad {
    /// A pad with nothing wired.
    pub const fn new() -> Self {
        Self {
            actuators: BTreeMap::new(),
        }
    }

    /// Chain `actuator` after whatever `event` already sets off.
    pub fn add_actuator(&mut self, event: PadEvent, actuator: Actuator<Dungeon>) {
        self.actuators.entry(event).or_default().add(actuator);
    }

    /// Replace what `event` sets off.
    pub fn set_actuator(&mut self, event: PadEvent, actuator: Actuator<Dungeon>) {
        self.actuators.entry(event).or_default().set(actuator);
    }

    /// Unwire `event`.
    pub fn clear_actuator(&mut self, event: PadEvent) {
        self.actuators.remove(&event);
    }

    /// The actuator wired to `event`, if any.
    pub fn actuator(&self, event: PadEvent) -> Option<&Actuator<Dungeon>> {
        self.actuators.get(&event).and_then(ActuatorSlot::get)
    }

    /// Register a fresh copy of the actuator wired to `event`.
    pub fn fire<S>(&self, event: PadEvent, schedule: &mut S) -> Option<ListenerId>
    where
        S: Schedule<Dungeon> + ?Sized,
    {
        let actuator = self.actuator(event)?.clone();
        debug!(?event, actuator = actuator.label(), "Pressure pad triggered");
        Some(schedule.register(Box::new(actuator)))
    }
}

impl Clone for PressurePad {
    fn clone(&self) -> Self {
        let mut pad = Self::new();
        for (event, slot) in &self.actuators {
            if let Some(actuator) = slot.get() {
                pad.set_actuator(*event, actuator.clone());
            }
        }
        pad
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use catacomb_core::clock::Clock;
    use catacomb_types::{Orientation, Position, TriggerAction};

    use super::*;
    use crate::door::{Door, DoorState, DoorSwitch};
    use crate::dungeon::Element;

    fn door_toggle(position: Position, delay: u32) -> Actuator<Dungeon> {
        Actuator::leaf(delay, TriggerAction::Toggle, vec![Arc::new(DoorSwitch::new(position))])
            .unwrap()
    }

    #[test]
    fn unwired_event_fires_nothing() {
        let pad = PressurePad::new();
        let mut clock: Clock<Dungeon> = Clock::new();
        assert!(pad.fire(PadEvent::ItemDropped, &mut clock).is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn add_chains_and_set_replaces() {
        let door = Position::new(1, 0, 0);
        let mut pad = PressurePad::new();
        pad.add_actuator(PadEvent::CreatureSteppedOn, door_toggle(door, 1));
        pad.add_actuator(PadEvent::CreatureSteppedOn, door_toggle(door, 2));
        assert!(
            pad.actuator(PadEvent::CreatureSteppedOn)
                .unwrap()
                .label()
                .starts_with("Sequence[")
        );

        pad.set_actuator(PadEvent::CreatureSteppedOn, door_toggle(door, 3));
        assert_eq!(
            pad.actuator(PadEvent::CreatureSteppedOn).unwrap().label(),
            "Actuator[Door[0:1,0]]"
        );

        pad.clear_actuator(PadEvent::CreatureSteppedOn);
        assert!(pad.actuator(PadEvent::CreatureSteppedOn).is_none());
    }

    #[test]
    fn each_firing_registers_an_independent_copy() {
        let mut dungeon = Dungeon::new();
        dungeon.create_level(0, 5, 5).unwrap();
        let door = Position::new(2, 0, 0);
        dungeon
            .set_element(door, Element::Door(Door::new(Orientation::WestEast)))
            .unwrap();

        let mut pad = PressurePad::new();
        pad.set_actuator(PadEvent::ItemDropped, door_toggle(door, 2));
        let mut clock = Clock::new();

        let first = pad.fire(PadEvent::ItemDropped, &mut clock).unwrap();
        clock.tick(&mut dungeon).unwrap();
        let second = pad.fire(PadEvent::ItemDropped, &mut clock).unwrap();
        assert_ne!(first, second);

        // First copy fires on tick 2 and opens the door.
        clock.tick(&mut dungeon).unwrap();
        assert!(!clock.contains(first));
        assert!(clock.contains(second));
        assert_eq!(dungeon.door(door).unwrap().motion(), crate::door::Motion::Opening);

        // Second copy fires on tick 3 and reverses it.
        clock.tick(&mut dungeon).unwrap();
        assert!(!clock.contains(second));
        assert_eq!(dungeon.door(door).unwrap().motion(), crate::door::Motion::Closing);
        assert_eq!(dungeon.door(door).unwrap().state(), DoorState::Closed);

        // The pristine actuator is untouched.
        assert!(pad.actuator(PadEvent::ItemDropped).is_some());
    }
}
