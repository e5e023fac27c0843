//! Tick callback recording what happened during a run.
//!
//! [`Timeline`] watches the dungeon after every tick and keeps the door's
//! state changes, the projectile peak and the tick the weapon hand became
//! usable again. [`Timeline::finish`] turns that into a serializable
//! [`RunReport`] the binary prints as JSON.

use catacomb_core::clock::TickSummary;
use catacomb_core::runner::{EndReason, RunResult, TickCallback};
use catacomb_types::{ChampionId, Position};
use catacomb_world::{DoorState, Dungeon};
use serde::Serialize;
use tracing::debug;

/// One entry of the door timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoorChange {
    /// Tick at which the door reached `state`.
    pub tick: u64,
    /// The new door state.
    pub state: DoorState,
}

/// Summary of a run, printed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Why the run stopped.
    pub end_reason: EndReason,
    /// Ticks dispatched by the run.
    pub total_ticks: u64,
    /// Every state the door went through, in order.
    pub door_timeline: Vec<DoorChange>,
    /// Most projectiles in flight after any single tick.
    pub peak_projectiles: usize,
    /// Tick at which the champion's weapon hand became usable again.
    pub hand_ready_at: Option<u64>,
    /// Items lying on the floor at the end.
    pub items_on_floor: usize,
    /// Listeners still registered at the end.
    pub listeners_left: usize,
}

/// Callback building a [`RunReport`].
pub struct Timeline {
    door: Position,
    champion: ChampionId,
    last_door_state: Option<DoorState>,
    door_timeline: Vec<DoorChange>,
    peak_projectiles: usize,
    hand_ready_at: Option<u64>,
}

impl Timeline {
    /// Watch the door at `door` and the weapon hand of `champion`.
    pub const fn new(door: Position, champion: ChampionId) -> Self {
        Self {
            door,
            champion,
            last_door_state: None,
            door_timeline: Vec::new(),
            peak_projectiles: 0,
            hand_ready_at: None,
        }
    }

    /// Build the report once the run is over.
    pub fn finish(self, result: &RunResult, dungeon: &Dungeon) -> RunReport {
        RunReport {
            end_reason: result.end_reason,
            total_ticks: result.total_ticks,
            door_timeline: self.door_timeline,
            peak_projectiles: self.peak_projectiles,
            hand_ready_at: self.hand_ready_at,
            items_on_floor: dungeon.item_count(),
            listeners_left: result.last_summary.map_or(0, |summary| summary.live),
        }
    }
}

impl TickCallback<Dungeon> for Timeline {
    fn on_tick(&mut self, summary: &TickSummary, dungeon: &Dungeon) {
        if let Ok(door) = dungeon.door(self.door) {
            let state = door.state();
            if self.last_door_state != Some(state) {
                debug!(tick = summary.tick, ?state, "Door changed");
                self.door_timeline.push(DoorChange {
                    tick: summary.tick,
                    state,
                });
                self.last_door_state = Some(state);
            }
        }

        self.peak_projectiles = self.peak_projectiles.max(dungeon.projectile_count());

        if self.hand_ready_at.is_none()
            && dungeon
                .hand(self.champion)
                .is_some_and(catacomb_world::WeaponHand::is_enabled)
        {
            self.hand_ready_at = Some(summary.tick);
        }
    }
}
