use crate::action::{ActionError, ActionTransition, AttackAction, AttackOutcome, live_actor};
use crate::env::GameEnv;
use crate::state::{EntityId, GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    /// Neighbour order used wherever ties must break deterministically.
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::East,
        CardinalDirection::West,
    ];

    /// Unit step with the origin at the top-left corner.
    pub fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, -1),
            CardinalDirection::South => (0, 1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }

    pub fn step(self, origin: Position) -> Position {
        let (dx, dy) = self.delta();
        origin.offset(dx, dy)
    }
}

/// Step onto an adjacent free floor tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub actor: EntityId,
    pub direction: CardinalDirection,
}

impl MoveAction {
    pub fn new(actor: EntityId, direction: CardinalDirection) -> Self {
        Self { actor, direction }
    }
}

impl ActionTransition for MoveAction {
    type Error = ActionError;
    type Result = Position;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let actor = live_actor(state, self.actor)?;
        let destination = self.direction.step(actor.position);

        if !state.map.contains(destination) {
            return Err(ActionError::OutOfBounds { destination });
        }
        if !state.map.is_walkable(destination) {
            return Err(ActionError::Blocked { destination });
        }
        if let Some(occupant) = state.entities.blocker_at(destination) {
            return Err(ActionError::Occupied {
                destination,
                occupant,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<Position, Self::Error> {
        let origin = live_actor(state, self.actor)?.position;
        let destination = self.direction.step(origin);
        state.entities.relocate(self.actor, destination)?;
        Ok(destination)
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        ensure_indexed(state, self.actor)
    }
}

/// What a bump resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BumpOutcome {
    Moved(Position),
    Attacked(AttackOutcome),
}

/// Directional intent: attack whoever stands in the way, otherwise move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BumpAction {
    pub actor: EntityId,
    pub direction: CardinalDirection,
}

impl BumpAction {
    pub fn new(actor: EntityId, direction: CardinalDirection) -> Self {
        Self { actor, direction }
    }

    fn target(&self, state: &GameState) -> Result<Option<EntityId>, ActionError> {
        let actor = live_actor(state, self.actor)?;
        let destination = self.direction.step(actor.position);
        Ok(state.entities.blocker_at(destination))
    }
}

impl ActionTransition for BumpAction {
    type Error = ActionError;
    type Result = BumpOutcome;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match self.target(state)? {
            Some(target) => AttackAction::new(self.actor, target).pre_validate(state, env),
            None => MoveAction::new(self.actor, self.direction).pre_validate(state, env),
        }
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<BumpOutcome, Self::Error> {
        match self.target(state)? {
            Some(target) => {
                let attack = AttackAction::new(self.actor, target);
                let outcome = attack.apply(state, env)?;
                attack.post_validate(state, env)?;
                Ok(BumpOutcome::Attacked(outcome))
            }
            None => {
                let movement = MoveAction::new(self.actor, self.direction);
                let destination = movement.apply(state, env)?;
                movement.post_validate(state, env)?;
                Ok(BumpOutcome::Moved(destination))
            }
        }
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        ensure_indexed(state, self.actor)
    }
}

/// The actor must be listed among the occupants of its own tile.
fn ensure_indexed(state: &GameState, actor: EntityId) -> Result<(), ActionError> {
    let actor_state = state
        .entities
        .actor(actor)
        .ok_or(ActionError::ActorNotFound(actor))?;
    if state
        .entities
        .occupants(actor_state.position)
        .contains(&actor)
    {
        Ok(())
    } else {
        Err(crate::state::PlacementError::OccupancyDesync {
            entity: actor,
            position: actor_state.position,
        }
        .into())
    }
}
