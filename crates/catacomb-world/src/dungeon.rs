//! The dungeon grid.
//!
//! A [`Dungeon`] is a sparse map of cells keyed by [`Position`]. Each cell
//! holds one [`Element`] (floor, wall, door, pressure pad, launcher) plus
//! what stands or lies on it, per sector: creatures, items, projectiles.
//!
//! The dungeon is the world type the clock drives in this crate: doors,
//! hand cooldowns and projectiles all reach it through the tick context.
//! Operations that can set off a pressure pad take a [`Schedule`] to
//! register the pad's actuator with.

use std::collections::BTreeMap;

use catacomb_core::clock::Schedule;
use catacomb_core::projectile::{CellKind, FlightSpace};
use catacomb_types::{ChampionId, CreatureId, Direction, ItemId, Position, ProjectileId, Sector};
use tracing::debug;

use crate::door::Door;
use crate::error::WorldError;
use crate::hand::WeaponHand;
use crate::pressure_pad::{PadEvent, PressurePad};

/// What a cell is made of.
#[derive(Debug, Clone)]
pub enum Element {
    /// Open floor.
    Floor,
    /// Solid rock.
    Wall,
    /// A door in a wall gap.
    Door(Door),
    /// A floor tile wired to actuators.
    PressurePad(PressurePad),
    /// A wall slot that shoots projectiles towards `facing`.
    Launcher {
        /// Direction the launcher shoots.
        facing: Direction,
    },
}

impl Element {
    /// Whether creatures and items can be placed in the cell.
    pub const fn is_solid(&self) -> bool {
        matches!(self, Self::Wall | Self::Launcher { .. })
    }

    fn cell_kind(&self) -> CellKind {
        match self {
            Self::Floor | Self::PressurePad(_) => CellKind::Floor,
            Self::Wall | Self::Launcher { .. } => CellKind::Wall,
            Self::Door(door) => CellKind::Door {
                traversable: door.is_traversable_by_projectile(),
            },
        }
    }
}

/// One cell of the grid.
#[derive(Debug, Clone)]
struct Cell {
    element: Element,
    creatures: BTreeMap<Sector, CreatureId>,
    items: Vec<(ItemId, Sector)>,
    projectiles: BTreeMap<ProjectileId, Sector>,
}

impl Cell {
    const fn new(element: Element) -> Self {
        Self {
            element,
            creatures: BTreeMap::new(),
            items: Vec::new(),
            projectiles: BTreeMap::new(),
        }
    }
}

/// The dungeon: cells, their contents, and the party's weapon hands.
#[derive(Debug, Clone, Default)]
pub struct Dungeon {
    cells: BTreeMap<Position, Cell>,
    hands: BTreeMap<ChampionId, WeaponHand>,
    party: Option<Position>,
}

impl Dungeon {
    /// Create an empty dungeon.
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
            hands: BTreeMap::new(),
            party: None,
        }
    }

    // -------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------

    /// Carve a `width` x `height` level numbered `level`: floor surrounded by
    /// a ring of wall.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LevelTooSmall`] below 3x3 and
    /// [`WorldError::DuplicateLevel`] when the level already has cells.
    pub fn create_level(&mut self, level: i32, width: i32, height: i32) -> Result<(), WorldError> {
        if width < 3 || height < 3 {
            return Err(WorldError::LevelTooSmall { width, height });
        }
        if self.cells.keys().any(|position| position.z == level) {
            return Err(WorldError::DuplicateLevel(level));
        }
        let last_x = width.saturating_sub(1);
        let last_y = height.saturating_sub(1);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == last_x || y == last_y;
                let element = if border { Element::Wall } else { Element::Floor };
                self.cells
                    .insert(Position::new(x, y, level), Cell::new(element));
            }
        }
        debug!(level, width, height, "Level created");
        Ok(())
    }

    /// Replace the element of an existing cell, keeping its contents.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellNotFound`] outside the carved levels.
    pub fn set_element(&mut self, position: Position, element: Element) -> Result<(), WorldError> {
        self.cell_mut(position)?.element = element;
        Ok(())
    }

    /// The element at `position`, if the cell exists.
    pub fn element(&self, position: Position) -> Option<&Element> {
        self.cells.get(&position).map(|cell| &cell.element)
    }

    /// Number of cells across all levels.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The door at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotADoor`] when the cell holds something else.
    pub fn door(&self, position: Position) -> Result<&Door, WorldError> {
        match self.element(position) {
            Some(Element::Door(door)) => Ok(door),
            Some(_) => Err(WorldError::NotADoor(position)),
            None => Err(WorldError::CellNotFound(position)),
        }
    }

    /// Mutable access to the door at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotADoor`] when the cell holds something else.
    pub fn door_mut(&mut self, position: Position) -> Result<&mut Door, WorldError> {
        match &mut self.cell_mut(position)?.element {
            Element::Door(door) => Ok(door),
            _ => Err(WorldError::NotADoor(position)),
        }
    }

    /// Smash the door at `position`. Returns whether it broke; doors that
    /// are open, moving or unbreakable hold.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AlreadyBroken`] for a door already smashed.
    pub fn smash_door(&mut self, position: Position) -> Result<bool, WorldError> {
        let broke = self
            .door_mut(position)?
            .destroy()
            .map_err(|_state| WorldError::AlreadyBroken(position))?;
        if broke {
            debug!(%position, "Door smashed");
        }
        Ok(broke)
    }

    /// Mutable access to the pressure pad at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotAPad`] when the cell holds something else.
    pub fn pad_mut(&mut self, position: Position) -> Result<&mut PressurePad, WorldError> {
        match &mut self.cell_mut(position)?.element {
            Element::PressurePad(pad) => Ok(pad),
            _ => Err(WorldError::NotAPad(position)),
        }
    }

    fn cell(&self, position: Position) -> Result<&Cell, WorldError> {
        self.cells
            .get(&position)
            .ok_or(WorldError::CellNotFound(position))
    }

    fn cell_mut(&mut self, position: Position) -> Result<&mut Cell, WorldError> {
        self.cells
            .get_mut(&position)
            .ok_or(WorldError::CellNotFound(position))
    }

    /// Fire the pad at `position` if there is one.
    fn fire_pad<S>(&self, position: Position, event: PadEvent, schedule: &mut S)
    where
        S: Schedule<Self> + ?Sized,
    {
        if let Some(Element::PressurePad(pad)) = self.element(position) {
            pad.fire(event, schedule);
        }
    }

    // -------------------------------------------------------------------
    // Creatures
    // -------------------------------------------------------------------

    /// Put a creature in `sector` of the cell, stepping on any pad there.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Solid`] for walls and
    /// [`WorldError::SectorOccupied`] when the sector is taken.
    pub fn place_creature<S>(
        &mut self,
        schedule: &mut S,
        creature: CreatureId,
        position: Position,
        sector: Sector,
    ) -> Result<(), WorldError>
    where
        S: Schedule<Self> + ?Sized,
    {
        let cell = self.cell_mut(position)?;
        if cell.element.is_solid() {
            return Err(WorldError::Solid(position));
        }
        if cell.creatures.contains_key(&sector) {
            return Err(WorldError::SectorOccupied { position, sector });
        }
        cell.creatures.insert(sector, creature);
        debug!(%creature, %position, ?sector, "Creature placed");
        self.fire_pad(position, PadEvent::CreatureSteppedOn, schedule);
        Ok(())
    }

    /// Take a creature out of the cell, stepping off any pad there.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CreatureNotFound`] when it is not in the cell.
    pub fn remove_creature<S>(
        &mut self,
        schedule: &mut S,
        creature: CreatureId,
        position: Position,
    ) -> Result<(), WorldError>
    where
        S: Schedule<Self> + ?Sized,
    {
        let cell = self.cell_mut(position)?;
        let sector = cell
            .creatures
            .iter()
            .find_map(|(sector, id)| (*id == creature).then_some(*sector))
            .ok_or(WorldError::CreatureNotFound { creature, position })?;
        cell.creatures.remove(&sector);
        debug!(%creature, %position, "Creature removed");
        self.fire_pad(position, PadEvent::CreatureSteppedOff, schedule);
        Ok(())
    }

    /// Whether any creature stands in the cell.
    pub fn has_creatures(&self, position: Position) -> bool {
        self.cells
            .get(&position)
            .is_some_and(|cell| !cell.creatures.is_empty())
    }

    /// The creature in `sector` of the cell, if any.
    pub fn creature_at(&self, position: Position, sector: Sector) -> Option<CreatureId> {
        self.cells
            .get(&position)
            .and_then(|cell| cell.creatures.get(&sector).copied())
    }

    // -------------------------------------------------------------------
    // Party
    // -------------------------------------------------------------------

    /// Where the party stands, once it has entered the dungeon.
    pub const fn party_position(&self) -> Option<Position> {
        self.party
    }

    /// Move the party to `position`. Leaving a pad fires
    /// [`PadEvent::PartySteppedOff`] there, arriving on one fires
    /// [`PadEvent::PartySteppedOn`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellNotFound`] outside the carved levels and
    /// [`WorldError::Solid`] for walls.
    pub fn move_party<S>(&mut self, schedule: &mut S, position: Position) -> Result<(), WorldError>
    where
        S: Schedule<Self> + ?Sized,
    {
        if self.cell(position)?.element.is_solid() {
            return Err(WorldError::Solid(position));
        }
        let from = self.party.replace(position);
        if from == Some(position) {
            return Ok(());
        }
        if let Some(from) = from {
            self.fire_pad(from, PadEvent::PartySteppedOff, schedule);
        }
        debug!(?from, to = %position, "Party moved");
        self.fire_pad(position, PadEvent::PartySteppedOn, schedule);
        Ok(())
    }

    /// Whether a creature or the party stands in the cell.
    pub fn is_blocked(&self, position: Position) -> bool {
        self.has_creatures(position) || self.party == Some(position)
    }

    // -------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------

    /// Drop an item in `sector` of the cell. The first item on a pad
    /// triggers it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Solid`] for walls.
    pub fn drop_item<S>(
        &mut self,
        schedule: &mut S,
        item: ItemId,
        position: Position,
        sector: Sector,
    ) -> Result<(), WorldError>
    where
        S: Schedule<Self> + ?Sized,
    {
        let cell = self.cell_mut(position)?;
        if cell.element.is_solid() {
            return Err(WorldError::Solid(position));
        }
        cell.items.push((item, sector));
        let first = cell.items.len() == 1;
        debug!(%item, %position, ?sector, "Item dropped");
        if first {
            self.fire_pad(position, PadEvent::ItemDropped, schedule);
        }
        Ok(())
    }

    /// Pick an item up from the cell. Taking the last item off a pad
    /// triggers it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ItemNotFound`] when the item is not there.
    pub fn pick_up_item<S>(
        &mut self,
        schedule: &mut S,
        item: ItemId,
        position: Position,
    ) -> Result<Sector, WorldError>
    where
        S: Schedule<Self> + ?Sized,
    {
        let cell = self.cell_mut(position)?;
        let index = cell
            .items
            .iter()
            .position(|(id, _)| *id == item)
            .ok_or(WorldError::ItemNotFound { item, position })?;
        let (_, sector) = cell.items.remove(index);
        let last = cell.items.is_empty();
        debug!(%item, %position, "Item picked up");
        if last {
            self.fire_pad(position, PadEvent::ItemPickedUp, schedule);
        }
        Ok(sector)
    }

    /// Items lying in the cell, in drop order.
    pub fn items_at(&self, position: Position) -> &[(ItemId, Sector)] {
        self.cells
            .get(&position)
            .map(|cell| cell.items.as_slice())
            .unwrap_or_default()
    }

    /// Number of items lying anywhere in the dungeon.
    pub fn item_count(&self) -> usize {
        self.cells.values().map(|cell| cell.items.len()).sum()
    }

    // -------------------------------------------------------------------
    // Projectiles
    // -------------------------------------------------------------------

    /// Projectiles currently recorded in the cell.
    pub fn projectiles_at(&self, position: Position) -> Vec<(ProjectileId, Sector)> {
        self.cells
            .get(&position)
            .map(|cell| cell.projectiles.iter().map(|(id, sector)| (*id, *sector)).collect())
            .unwrap_or_default()
    }

    /// Number of projectiles in flight across the dungeon.
    pub fn projectile_count(&self) -> usize {
        self.cells.values().map(|cell| cell.projectiles.len()).sum()
    }

    /// Where a projectile currently is.
    pub fn locate_projectile(&self, projectile: ProjectileId) -> Option<(Position, Sector)> {
        self.cells.iter().find_map(|(position, cell)| {
            cell.projectiles
                .get(&projectile)
                .map(|sector| (*position, *sector))
        })
    }

    // -------------------------------------------------------------------
    // Party
    // -------------------------------------------------------------------

    /// Enrol a champion and give them a ready weapon hand.
    pub fn add_champion(&mut self, name: impl Into<String>) -> ChampionId {
        let id = ChampionId::new();
        self.hands.insert(id, WeaponHand::new(name));
        id
    }

    /// The weapon hand of a champion.
    pub fn hand(&self, champion: ChampionId) -> Option<&WeaponHand> {
        self.hands.get(&champion)
    }

    /// Mutable access to the weapon hand of a champion.
    pub fn hand_mut(&mut self, champion: ChampionId) -> Option<&mut WeaponHand> {
        self.hands.get_mut(&champion)
    }
}

impl FlightSpace for Dungeon {
    type Error = WorldError;

    fn cell_kind(&self, position: Position) -> CellKind {
        self.cell(position)
            .map_or(CellKind::Void, |cell| cell.element.cell_kind())
    }

    fn is_occupied(&self, position: Position, sector: Sector) -> bool {
        self.party == Some(position) || self.creature_at(position, sector).is_some()
    }

    fn enter(
        &mut self,
        id: ProjectileId,
        position: Position,
        sector: Sector,
    ) -> Result<(), WorldError> {
        self.cell_mut(position)?.projectiles.insert(id, sector);
        Ok(())
    }

    fn leave(
        &mut self,
        id: ProjectileId,
        position: Position,
        _sector: Sector,
    ) -> Result<(), WorldError> {
        self.cell_mut(position)?
            .projectiles
            .remove(&id)
            .map(|_| ())
            .ok_or(WorldError::ProjectileNotFound {
                projectile: id,
                position,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use catacomb_core::actuator::Actuator;
    use catacomb_core::clock::Clock;
    use catacomb_types::{Orientation, TriggerAction};

    use super::*;
    use crate::door::{DoorState, DoorSwitch, Motion};

    fn room() -> Dungeon {
        let mut dungeon = Dungeon::new();
        dungeon.create_level(1, 6, 4).unwrap();
        dungeon
    }

    #[test]
    fn level_is_floor_ringed_by_wall() {
        let dungeon = room();
        assert_eq!(dungeon.cell_count(), 24);
        assert!(matches!(dungeon.element(Position::new(0, 0, 1)), Some(Element::Wall)));
        assert!(matches!(dungeon.element(Position::new(5, 3, 1)), Some(Element::Wall)));
        assert!(matches!(dungeon.element(Position::new(2, 2, 1)), Some(Element::Floor)));
        assert!(dungeon.element(Position::new(2, 2, 0)).is_none());
    }

    #[test]
    fn level_validation() {
        let mut dungeon = room();
        assert!(matches!(
            dungeon.create_level(1, 5, 5),
            Err(WorldError::DuplicateLevel(1))
        ));
        assert!(matches!(
            dungeon.create_level(2, 2, 5),
            Err(WorldError::LevelTooSmall { .. })
        ));
    }

    #[test]
    fn flight_view_of_cells() {
        let mut dungeon = room();
        let door = Position::new(3, 0, 1);
        dungeon
            .set_element(door, Element::Door(Door::new(Orientation::WestEast)))
            .unwrap();
        assert_eq!(dungeon.cell_kind(Position::new(1, 1, 1)), CellKind::Floor);
        assert_eq!(dungeon.cell_kind(Position::new(0, 1, 1)), CellKind::Wall);
        assert_eq!(dungeon.cell_kind(door), CellKind::Door { traversable: false });
        assert_eq!(dungeon.cell_kind(Position::new(40, 1, 1)), CellKind::Void);
    }

    #[test]
    fn creatures_cannot_share_a_sector_or_stand_in_walls() {
        let mut dungeon = room();
        let mut clock: Clock<Dungeon> = Clock::new();
        let spot = Position::new(1, 1, 1);
        dungeon
            .place_creature(&mut clock, CreatureId::new(), spot, Sector::NorthWest)
            .unwrap();
        assert!(matches!(
            dungeon.place_creature(&mut clock, CreatureId::new(), spot, Sector::NorthWest),
            Err(WorldError::SectorOccupied { .. })
        ));
        assert!(matches!(
            dungeon.place_creature(&mut clock, CreatureId::new(), Position::new(0, 0, 1), Sector::NorthWest),
            Err(WorldError::Solid(_))
        ));
        assert!(dungeon.is_occupied(spot, Sector::NorthWest));
        assert!(!dungeon.is_occupied(spot, Sector::SouthEast));
    }

    #[test]
    fn removing_an_absent_creature_fails() {
        let mut dungeon = room();
        let mut clock: Clock<Dungeon> = Clock::new();
        let result = dungeon.remove_creature(&mut clock, CreatureId::new(), Position::new(1, 1, 1));
        assert!(matches!(result, Err(WorldError::CreatureNotFound { .. })));
    }

    #[test]
    fn projectile_bookkeeping() {
        let mut dungeon = room();
        let id = ProjectileId::new();
        let spot = Position::new(2, 1, 1);
        dungeon.enter(id, spot, Sector::SouthEast).unwrap();
        assert_eq!(dungeon.projectile_count(), 1);
        assert_eq!(dungeon.locate_projectile(id), Some((spot, Sector::SouthEast)));
        dungeon.leave(id, spot, Sector::SouthEast).unwrap();
        assert_eq!(dungeon.projectile_count(), 0);
        assert!(matches!(
            dungeon.leave(id, spot, Sector::SouthEast),
            Err(WorldError::ProjectileNotFound { .. })
        ));
    }

    #[test]
    fn pad_fires_on_first_item_and_on_last_pickup() {
        let mut dungeon = room();
        let mut clock: Clock<Dungeon> = Clock::new();
        let door = Position::new(3, 0, 1);
        let pad = Position::new(3, 1, 1);
        dungeon
            .set_element(door, Element::Door(Door::new(Orientation::WestEast)))
            .unwrap();
        dungeon
            .set_element(pad, Element::PressurePad(PressurePad::new()))
            .unwrap();
        let switch = || -> Vec<catacomb_core::trigger::Target<Dungeon>> {
            vec![Arc::new(DoorSwitch::new(door))]
        };
        let pad_mut = dungeon.pad_mut(pad).unwrap();
        pad_mut.set_actuator(
            PadEvent::ItemDropped,
            Actuator::leaf(1, TriggerAction::Enable, switch()).unwrap(),
        );
        pad_mut.set_actuator(
            PadEvent::ItemPickedUp,
            Actuator::leaf(1, TriggerAction::Disable, switch()).unwrap(),
        );

        let (sword, shield) = (ItemId::new(), ItemId::new());
        dungeon.drop_item(&mut clock, sword, pad, Sector::NorthWest).unwrap();
        assert_eq!(clock.len(), 1);
        dungeon.drop_item(&mut clock, shield, pad, Sector::SouthEast).unwrap();
        assert_eq!(clock.len(), 1);

        clock.tick(&mut dungeon).unwrap();
        assert_eq!(dungeon.door(door).unwrap().motion(), Motion::Opening);

        dungeon.pick_up_item(&mut clock, sword, pad).unwrap();
        // The door animation is running; no new pad actuator yet.
        assert_eq!(clock.len(), 1);
        assert_eq!(dungeon.pick_up_item(&mut clock, shield, pad).unwrap(), Sector::SouthEast);
        assert_eq!(clock.len(), 2);
        assert!(dungeon.items_at(pad).is_empty());

        clock.tick(&mut dungeon).unwrap();
        assert_eq!(dungeon.door(door).unwrap().motion(), Motion::Closing);
        assert_eq!(dungeon.door(door).unwrap().state(), DoorState::Closed);
    }

    #[test]
    fn items_cannot_be_dropped_in_walls() {
        let mut dungeon = room();
        let mut clock: Clock<Dungeon> = Clock::new();
        let result = dungeon.drop_item(&mut clock, ItemId::new(), Position::new(0, 1, 1), Sector::NorthWest);
        assert!(matches!(result, Err(WorldError::Solid(_))));
    }

    #[test]
    fn smashed_door_lets_projectiles_through() {
        let mut dungeon = room();
        let door = Position::new(3, 0, 1);
        dungeon
            .set_element(door, Element::Door(Door::new(Orientation::WestEast)))
            .unwrap();
        assert!(dungeon.smash_door(door).unwrap());
        assert_eq!(dungeon.door(door).unwrap().state(), DoorState::Broken);
        assert_eq!(dungeon.cell_kind(door), CellKind::Door { traversable: true });
        assert!(matches!(
            dungeon.smash_door(door),
            Err(WorldError::AlreadyBroken(_))
        ));
        assert!(matches!(
            dungeon.smash_door(Position::new(1, 1, 1)),
            Err(WorldError::NotADoor(_))
        ));
    }

    #[test]
    fn party_steps_on_and_off_pads() {
        let mut dungeon = room();
        let mut clock: Clock<Dungeon> = Clock::new();
        let door = Position::new(3, 0, 1);
        let pad = Position::new(3, 1, 1);
        dungeon
            .set_element(door, Element::Door(Door::new(Orientation::WestEast)))
            .unwrap();
        dungeon
            .set_element(pad, Element::PressurePad(PressurePad::new()))
            .unwrap();
        let switch = || -> Vec<catacomb_core::trigger::Target<Dungeon>> {
            vec![Arc::new(DoorSwitch::new(door))]
        };
        let pad_mut = dungeon.pad_mut(pad).unwrap();
        pad_mut.set_actuator(
            PadEvent::PartySteppedOn,
            Actuator::leaf(1, TriggerAction::Enable, switch()).unwrap(),
        );
        pad_mut.set_actuator(
            PadEvent::PartySteppedOff,
            Actuator::leaf(1, TriggerAction::Disable, switch()).unwrap(),
        );
        assert_eq!(dungeon.party_position(), None);

        let beside = Position::new(2, 1, 1);
        dungeon.move_party(&mut clock, beside).unwrap();
        assert!(clock.is_empty());

        dungeon.move_party(&mut clock, pad).unwrap();
        assert_eq!(clock.labels(), vec!["Actuator[Door[1:3,0]]"]);
        // Standing still is not stepping on again.
        dungeon.move_party(&mut clock, pad).unwrap();
        assert_eq!(clock.len(), 1);

        dungeon.move_party(&mut clock, beside).unwrap();
        assert_eq!(clock.len(), 2);
        assert_eq!(dungeon.party_position(), Some(beside));
    }

    #[test]
    fn party_cannot_walk_into_walls() {
        let mut dungeon = room();
        let mut clock: Clock<Dungeon> = Clock::new();
        let wall = Position::new(0, 1, 1);
        assert!(matches!(
            dungeon.move_party(&mut clock, wall),
            Err(WorldError::Solid(_))
        ));
        assert!(matches!(
            dungeon.move_party(&mut clock, Position::new(9, 9, 9)),
            Err(WorldError::CellNotFound(_))
        ));
        assert_eq!(dungeon.party_position(), None);
    }

    #[test]
    fn the_party_blocks_its_cell() {
        let mut dungeon = room();
        let mut clock: Clock<Dungeon> = Clock::new();
        let spot = Position::new(2, 2, 1);
        assert!(!dungeon.is_blocked(spot));
        dungeon.move_party(&mut clock, spot).unwrap();
        assert!(dungeon.is_blocked(spot));
        assert!(dungeon.is_occupied(spot, Sector::SouthEast));
        assert!(!dungeon.has_creatures(spot));
    }

    #[test]
    fn champions_start_with_a_ready_hand() {
        let mut dungeon = room();
        let id = dungeon.add_champion("Halk");
        assert!(dungeon.hand(id).unwrap().is_enabled());
        assert!(dungeon.hand(ChampionId::new()).is_none());
    }
}
