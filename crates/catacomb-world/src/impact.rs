//! Projectile payloads that act on the dungeon.

use catacomb_core::clock::{ListenerError, TickContext};
use catacomb_core::projectile::Impact;
use catacomb_types::{ItemId, Position, Sector};
use tracing::debug;

use crate::dungeon::Dungeon;

/// A thrown or launched item. It falls to the floor where it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDrop {
    /// The flying item.
    pub item: ItemId,
}

impl ItemDrop {
    /// Payload for `item`.
    pub const fn new(item: ItemId) -> Self {
        Self { item }
    }
}

impl Impact<Dungeon> for ItemDrop {
    fn on_impact(
        &mut self,
        ctx: &mut TickContext<'_, Dungeon>,
        position: Position,
        sector: Sector,
    ) -> Result<(), ListenerError> {
        debug!(item = %self.item, %position, ?sector, "Item fell");
        let (dungeon, registry) = ctx.split();
        dungeon.drop_item(registry, self.item, position, sector)?;
        Ok(())
    }
}
