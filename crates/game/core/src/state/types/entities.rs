use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::{ActorState, EntityId, ItemState, Position};
use crate::config::GameConfig;
use crate::state::PlacementError;

type Occupants = ArrayVec<EntityId, { GameConfig::MAX_OCCUPANTS_PER_TILE }>;

/// Entity registry: the player, enemies in registration order, items on the
/// floor, and an occupancy index keyed by position.
///
/// At most one living blocking actor stands on a tile; items may share a tile
/// with an actor and with each other up to the per-tile capacity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitiesState {
    player: ActorState,
    enemies: Vec<ActorState>,
    items: Vec<ItemState>,
    occupancy: BTreeMap<Position, Occupants>,
}

impl EntitiesState {
    pub fn new(player: ActorState) -> Self {
        let mut occupancy = BTreeMap::new();
        let mut occupants = Occupants::new();
        occupants.push(player.id);
        occupancy.insert(player.position, occupants);
        Self {
            player,
            enemies: Vec::new(),
            items: Vec::new(),
            occupancy,
        }
    }

    pub fn player(&self) -> &ActorState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut ActorState {
        &mut self.player
    }

    /// Returns a reference to an actor by ID (player or enemy).
    pub fn actor(&self, id: EntityId) -> Option<&ActorState> {
        if self.player.id == id {
            return Some(&self.player);
        }
        self.enemies.iter().find(|actor| actor.id == id)
    }

    /// Returns a mutable reference to an actor by ID (player or enemy).
    ///
    /// Callers must not change `position` through this reference; use
    /// [`Self::relocate`] so the occupancy index follows.
    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorState> {
        if self.player.id == id {
            return Some(&mut self.player);
        }
        self.enemies.iter_mut().find(|actor| actor.id == id)
    }

    pub fn enemies(&self) -> &[ActorState] {
        &self.enemies
    }

    /// Enemy ids in registration order.
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies.iter().map(|enemy| enemy.id).collect()
    }

    pub fn items(&self) -> &[ItemState] {
        &self.items
    }

    pub fn item(&self, id: EntityId) -> Option<&ItemState> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns an iterator over all actors (player + enemies).
    pub fn all_actors(&self) -> impl Iterator<Item = &ActorState> {
        std::iter::once(&self.player).chain(self.enemies.iter())
    }

    pub fn occupants(&self, position: Position) -> &[EntityId] {
        self.occupancy
            .get(&position)
            .map(|occupants| occupants.as_slice())
            .unwrap_or(&[])
    }

    /// Living actor standing on `position`, if any.
    pub fn blocker_at(&self, position: Position) -> Option<EntityId> {
        self.occupants(position).iter().copied().find(|id| {
            self.actor(*id)
                .is_some_and(|actor| actor.alive && actor.position == position)
        })
    }

    /// First item lying on `position`, in registration order.
    pub fn item_at(&self, position: Position) -> Option<&ItemState> {
        self.occupants(position)
            .iter()
            .find_map(|id| self.item(*id))
    }

    pub fn spawn_enemy(&mut self, enemy: ActorState) -> Result<(), PlacementError> {
        self.ensure_unregistered(enemy.id)?;
        if let Some(occupant) = self.blocker_at(enemy.position) {
            return Err(PlacementError::Occupied {
                position: enemy.position,
                occupant,
            });
        }
        self.add_occupant(enemy.position, enemy.id)?;
        self.enemies.push(enemy);
        Ok(())
    }

    pub fn spawn_item(&mut self, item: ItemState) -> Result<(), PlacementError> {
        self.ensure_unregistered(item.id)?;
        self.add_occupant(item.position, item.id)?;
        self.items.push(item);
        Ok(())
    }

    pub fn remove_enemy(&mut self, id: EntityId) -> Option<ActorState> {
        let index = self.enemies.iter().position(|enemy| enemy.id == id)?;
        let enemy = self.enemies.remove(index);
        self.remove_occupant(enemy.position, id);
        Some(enemy)
    }

    pub fn remove_item(&mut self, id: EntityId) -> Option<ItemState> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let item = self.items.remove(index);
        self.remove_occupant(item.position, id);
        Some(item)
    }

    /// Moves an actor and its occupancy entry to `destination`.
    pub fn relocate(&mut self, id: EntityId, destination: Position) -> Result<(), PlacementError> {
        let origin = self
            .actor(id)
            .map(|actor| actor.position)
            .ok_or(PlacementError::UnknownEntity(id))?;
        if origin == destination {
            return Ok(());
        }
        if let Some(occupant) = self.blocker_at(destination) {
            return Err(PlacementError::Occupied {
                position: destination,
                occupant,
            });
        }
        if !self.remove_occupant(origin, id) {
            return Err(PlacementError::OccupancyDesync {
                entity: id,
                position: origin,
            });
        }
        if let Err(error) = self.add_occupant(destination, id) {
            // Rollback on failure
            let _ = self.add_occupant(origin, id);
            return Err(error);
        }
        if let Some(actor) = self.actor_mut(id) {
            actor.position = destination;
        }
        Ok(())
    }

    /// Drops every enemy and item, keeping only the player.
    pub fn clear_level(&mut self) {
        self.enemies.clear();
        self.items.clear();
        self.occupancy.clear();
        let mut occupants = Occupants::new();
        occupants.push(self.player.id);
        self.occupancy.insert(self.player.position, occupants);
    }

    /// Checks that the occupancy index matches entity positions exactly and
    /// that no tile holds two living actors.
    pub fn verify_occupancy(&self) -> Result<(), PlacementError> {
        let positions = self
            .all_actors()
            .map(|actor| (actor.id, actor.position))
            .chain(self.items.iter().map(|item| (item.id, item.position)));
        let mut expected = 0usize;
        for (entity, position) in positions {
            expected += 1;
            if !self.occupants(position).contains(&entity) {
                return Err(PlacementError::OccupancyDesync { entity, position });
            }
        }

        let indexed: usize = self.occupancy.values().map(|occupants| occupants.len()).sum();
        if indexed != expected {
            let (position, entity) = self
                .occupancy
                .iter()
                .flat_map(|(position, occupants)| occupants.iter().map(move |id| (*position, *id)))
                .find(|(position, id)| {
                    self.actor(*id).map(|actor| actor.position) != Some(*position)
                        && self.item(*id).map(|item| item.position) != Some(*position)
                })
                .unwrap_or((self.player.position, self.player.id));
            return Err(PlacementError::OccupancyDesync { entity, position });
        }

        for (position, occupants) in &self.occupancy {
            let living = occupants
                .iter()
                .filter(|id| self.actor(**id).is_some_and(|actor| actor.alive))
                .count();
            if living > 1 {
                return Err(PlacementError::Occupied {
                    position: *position,
                    occupant: occupants[0],
                });
            }
        }
        Ok(())
    }

    fn ensure_unregistered(&self, id: EntityId) -> Result<(), PlacementError> {
        if self.actor(id).is_some() || self.item(id).is_some() {
            return Err(PlacementError::DuplicateId(id));
        }
        Ok(())
    }

    fn add_occupant(&mut self, position: Position, id: EntityId) -> Result<(), PlacementError> {
        let occupants = self.occupancy.entry(position).or_default();
        occupants
            .try_push(id)
            .map_err(|_| PlacementError::TileFull { position })
    }

    fn remove_occupant(&mut self, position: Position, id: EntityId) -> bool {
        let Some(occupants) = self.occupancy.get_mut(&position) else {
            return false;
        };
        let Some(index) = occupants.iter().position(|occupant| *occupant == id) else {
            return false;
        };
        occupants.remove(index);
        if occupants.is_empty() {
            self.occupancy.remove(&position);
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn corrupt_occupancy_for_tests(&mut self, position: Position, id: EntityId) {
        let _ = self.add_occupant(position, id);
    }
}
