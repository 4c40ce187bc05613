use crate::action::{ActionError, ActionTransition, live_actor};
use crate::env::GameEnv;
use crate::state::{EntityId, GameState};

pub const PLAYER_DEATH_MESSAGE: &str = "You died!";

/// Melee damage: `power - defense`, never less than 1.
pub fn compute_damage(power: u32, defense: u32) -> u32 {
    power.saturating_sub(defense).max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub attacker: EntityId,
    pub target: EntityId,
    pub damage: u32,
    pub killed: bool,
}

/// Melee attack against an orthogonally adjacent hostile actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAction {
    pub attacker: EntityId,
    pub target: EntityId,
}

impl AttackAction {
    pub fn new(attacker: EntityId, target: EntityId) -> Self {
        Self { attacker, target }
    }
}

impl ActionTransition for AttackAction {
    type Error = ActionError;
    type Result = AttackOutcome;

    fn actor(&self) -> EntityId {
        self.attacker
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let attacker = live_actor(state, self.attacker)?;
        let target = live_actor(state, self.target)?;

        // Enemies only fight the player and the player only fights enemies.
        if attacker.is_player() == target.is_player() {
            return Err(ActionError::FriendlyTarget {
                attacker: self.attacker,
                target: self.target,
            });
        }
        if attacker.position.manhattan(target.position) != 1 {
            return Err(ActionError::NotAdjacent {
                attacker: self.attacker,
                target: self.target,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<AttackOutcome, Self::Error> {
        let attacker = live_actor(state, self.attacker)?;
        let attacker_name = attacker.name.clone();
        let power = attacker.fighter.power;

        let defender = state
            .entities
            .actor_mut(self.target)
            .ok_or(ActionError::ActorNotFound(self.target))?;
        let damage = compute_damage(power, defender.fighter.defense);
        defender.fighter.take_damage(damage);
        let defender_name = defender.name.clone();
        let killed = defender.fighter.is_dead();

        state.messages.push_text(format!(
            "{attacker_name} attacks {defender_name} for {damage} hit points."
        ));

        if killed {
            if self.target.is_player() {
                state.entities.player_mut().alive = false;
                state.messages.push_text(PLAYER_DEATH_MESSAGE);
            } else {
                state
                    .entities
                    .remove_enemy(self.target)
                    .ok_or(ActionError::ActorNotFound(self.target))?;
                state.messages.push_text(format!("{defender_name} is dead!"));
            }
        }

        Ok(AttackOutcome {
            attacker: self.attacker,
            target: self.target,
            damage,
            killed,
        })
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        // A defender at 0 HP must have been taken out of play.
        match state.entities.actor(self.target) {
            Some(target) if target.alive && target.fighter.is_dead() => {
                Err(ActionError::DeathNotResolved(self.target))
            }
            Some(target) if !target.is_player() && !target.alive => {
                Err(ActionError::DeathNotResolved(self.target))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn damage_is_power_minus_defense() {
        assert_eq!(compute_damage(8, 1), 7);
        assert_eq!(compute_damage(4, 0), 4);
    }

    #[test]
    fn damage_floor_is_one() {
        assert_eq!(compute_damage(1, 1), 1);
        assert_eq!(compute_damage(0, 5), 1);
    }

    proptest! {
        #[test]
        fn prop_damage_at_least_one(power in 0u32..1000, defense in 0u32..1000) {
            let damage = compute_damage(power, defense);
            prop_assert!(damage >= 1);
            if power > defense {
                prop_assert_eq!(damage, power - defense);
            }
        }
    }
}
