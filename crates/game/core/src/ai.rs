//! Enemy decision making.
//!
//! An enemy is aware of the player only while it stands on a tile the player
//! can see and is within its chase distance. Aware enemies attack when
//! orthogonally adjacent and otherwise take one step along a shortest
//! walkable path. Every dead end (unaware, no path, step blocked by another
//! actor) degrades to waiting.

use std::collections::VecDeque;

use crate::action::{AttackAction, CardinalDirection, CharacterAction, MoveAction, WaitAction};
use crate::state::{AiBehavior, EntityId, GameMap, GameState, Position};

/// Chooses the action `enemy` takes this turn.
pub fn decide(state: &GameState, enemy: EntityId) -> CharacterAction {
    let wait = CharacterAction::Wait(WaitAction::new(enemy));
    let Some(actor) = state.entities.actor(enemy) else {
        return wait;
    };
    let Some(AiBehavior::Hostile { chase_distance }) = actor.ai else {
        return wait;
    };
    let player = state.player();
    if !actor.alive || !player.alive {
        return wait;
    }

    let aware = state.map.is_visible(actor.position)
        && actor.position.chebyshev(player.position) <= chase_distance;
    if !aware {
        return wait;
    }

    if actor.position.manhattan(player.position) == 1 {
        return CharacterAction::Attack(AttackAction::new(enemy, player.id));
    }

    match first_step_towards(&state.map, actor.position, player.position) {
        Some(direction) if state.entities.blocker_at(direction.step(actor.position)).is_none() => {
            CharacterAction::Move(MoveAction::new(enemy, direction))
        }
        _ => wait,
    }
}

/// Breadth-first search over walkable terrain; returns the first step of a
/// shortest path from `from` to `to`. Entities are ignored.
///
/// Neighbours are expanded in [`CardinalDirection::ALL`] order, so ties always
/// break the same way.
pub fn first_step_towards(
    map: &GameMap,
    from: Position,
    to: Position,
) -> Option<CardinalDirection> {
    if from == to {
        return None;
    }
    let dimensions = map.dimensions();
    let mut first_step: Vec<Option<CardinalDirection>> = vec![None; dimensions.area()];
    let mut visited = vec![false; dimensions.area()];
    visited[dimensions.index(from)?] = true;

    let mut queue = VecDeque::new();
    for direction in CardinalDirection::ALL {
        let next = direction.step(from);
        let Some(index) = dimensions.index(next) else {
            continue;
        };
        if map.is_walkable(next) && !visited[index] {
            visited[index] = true;
            first_step[index] = Some(direction);
            queue.push_back(next);
        }
    }

    while let Some(current) = queue.pop_front() {
        let current_index = dimensions.index(current)?;
        if current == to {
            return first_step[current_index];
        }
        for direction in CardinalDirection::ALL {
            let next = direction.step(current);
            let Some(index) = dimensions.index(next) else {
                continue;
            };
            if map.is_walkable(next) && !visited[index] {
                visited[index] = true;
                first_step[index] = first_step[current_index];
                queue.push_back(next);
            }
        }
    }
    None
}
