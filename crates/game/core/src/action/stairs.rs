use crate::action::{ActionError, ActionTransition, live_actor};
use crate::config::GameConfig;
use crate::env::{GameEnv, LEVEL_SEED_CONTEXT, compute_seed};
use crate::state::{EntityId, GameState, LevelStats};

pub const DESCEND_MESSAGE: &str = "You descend the staircase.";
pub const VICTORY_MESSAGE: &str = "You found the exit. You win!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StairsOutcome {
    /// A new procedural level was loaded.
    Descended { dungeon_level: u32, max_hp_gain: u32 },
    /// The exit of a single-level session was reached.
    Escaped,
}

/// Uses the stairs under the player.
///
/// Procedural sessions descend to a freshly generated level; custom and
/// string sessions end in victory without touching the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TakeStairsAction {
    pub actor: EntityId,
}

impl TakeStairsAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl ActionTransition for TakeStairsAction {
    type Error = ActionError;
    type Result = StairsOutcome;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let actor = live_actor(state, self.actor)?;
        if !actor.is_player() {
            return Err(ActionError::NotPlayer(self.actor));
        }
        if !state.map.is_stairs(actor.position) {
            return Err(ActionError::NotOnStairs {
                position: actor.position,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<StairsOutcome, Self::Error> {
        if !state.is_procedural() {
            state.messages.push_text(VICTORY_MESSAGE);
            return Ok(StairsOutcome::Escaped);
        }

        let dungeon_level = state.turn.dungeon_level + 1;
        let seed = compute_seed(
            state.game_seed,
            u64::from(dungeon_level),
            0,
            LEVEL_SEED_CONTEXT,
        );
        let blueprint = env.levels()?.generate(dungeon_level, seed)?;
        state.load_level(&blueprint, env.config())?;

        state.turn.dungeon_level = dungeon_level;
        state.turn.turn = 0;

        let player = state.entities.player_mut();
        let max_hp = GameConfig::max_hp_for_level(dungeon_level);
        let max_hp_gain = max_hp.saturating_sub(player.fighter.max_hp);
        player.fighter.max_hp += max_hp_gain;
        player.fighter.hp += max_hp_gain;
        player.level = Some(LevelStats { dungeon_level });

        state.messages.push_text(DESCEND_MESSAGE);
        if max_hp_gain > 0 {
            state.messages.push_text(format!(
                "You adapt to the dungeon's depth! Max health increased by {max_hp_gain}!"
            ));
        }

        Ok(StairsOutcome::Descended {
            dungeon_level,
            max_hp_gain,
        })
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let player = state.player();
        if state.is_procedural() && player.position != state.map.spawn() {
            return Err(crate::state::PlacementError::OccupancyDesync {
                entity: player.id,
                position: player.position,
            }
            .into());
        }
        Ok(())
    }
}
