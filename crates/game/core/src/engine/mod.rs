//! Turn scheduling and action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. One
//! call to [`GameEngine::submit`] is one turn: the player's action resolves
//! completely, then every enemy acts in registration order against the state
//! left by the previous one, then visibility and terminal conditions are
//! re-evaluated. All state mutations flow through the same three-phase
//! transition pipeline.
//!
//! The engine mutates the state it was handed in place. When a turn fails
//! with [`TurnError::Invariant`] that state may be half-applied, so callers
//! run the engine on a working copy and commit it only on success.

mod errors;
mod phase;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError, TurnError};
pub use phase::{GamePhase, Outcome, PhaseEvent};

use crate::action::available::check_token;
use crate::action::{ActionResult, ActionToken, CharacterAction, WaitAction};
use crate::ai;
use crate::env::GameEnv;
use crate::state::GameState;

/// What one accepted submission did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOutcome {
    /// Result of the player's action. `None` for navigation.
    pub result: Option<ActionResult>,

    /// Phase after the submission.
    pub phase: GamePhase,

    /// Messages produced during the turn, compacted.
    pub messages: Vec<String>,

    /// True when a new level was loaded.
    pub level_changed: bool,
}

/// Game engine that manages action execution, turn scheduling, and game logic.
///
/// All state mutations flow through the three-phase action pipeline:
/// pre_validate → apply → post_validate
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Executes a single action through its transition pipeline.
    ///
    /// No turn bookkeeping happens here; use [`Self::submit`] for a full turn.
    pub fn execute(
        &mut self,
        env: &GameEnv<'_>,
        action: &CharacterAction,
    ) -> Result<ActionResult, ExecuteError> {
        transition::execute_transition(action, self.state, env)
    }

    /// Runs one external submission.
    ///
    /// Illegal tokens and tokens that arrive with no game in progress are
    /// rejected before anything is mutated and do not consume a turn.
    pub fn submit(
        &mut self,
        env: &GameEnv<'_>,
        token: ActionToken,
    ) -> Result<TurnOutcome, TurnError> {
        let phase = self.state.phase;
        if !phase.accepts(token) {
            if phase.is_playing() {
                let reason = crate::action::ActionError::Unavailable;
                return Err(TurnError::Illegal { token, reason });
            }
            return Err(TurnError::NoActiveSession { phase });
        }
        if !phase.is_playing() {
            return self.navigate();
        }

        let action = check_token(self.state, env, token)
            .map_err(|reason| TurnError::Illegal { token, reason })?;

        self.state.messages.begin_turn();
        let result = self.execute(env, &action)?;
        let level_changed = matches!(result, ActionResult::Descended { .. });

        if !result.ends_level() {
            self.run_enemies(env)?;
        }

        self.state.refresh_visibility();
        self.resolve_terminal(&result);

        if !level_changed {
            self.state.turn.turn += 1;
        }
        self.state.turn.nonce += 1;

        self.state
            .entities
            .verify_occupancy()
            .map_err(ExecuteError::Registry)?;

        Ok(TurnOutcome {
            result: Some(result),
            phase: self.state.phase,
            messages: self.state.messages.turn_texts(),
            level_changed,
        })
    }

    fn navigate(&mut self) -> Result<TurnOutcome, TurnError> {
        let phase = self.state.phase;
        let next = phase
            .navigate()
            .ok_or(TurnError::NoActiveSession { phase })?;
        self.state.phase = next;
        self.state.messages.begin_turn();

        Ok(TurnOutcome {
            result: None,
            phase: next,
            messages: Vec::new(),
            level_changed: false,
        })
    }

    /// Every enemy still registered acts once, in registration order.
    fn run_enemies(&mut self, env: &GameEnv<'_>) -> Result<(), ExecuteError> {
        for enemy in self.state.entities.enemy_ids() {
            if self.state.entities.actor(enemy).is_none() {
                continue;
            }

            let action = ai::decide(self.state, enemy);
            match self.execute(env, &action) {
                Ok(_) => {}
                // A refused AI action leaves the state untouched; the enemy waits.
                Err(error) if error.is_rejection() => {
                    let wait = CharacterAction::Wait(WaitAction::new(enemy));
                    self.execute(env, &wait)?;
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    fn resolve_terminal(&mut self, result: &ActionResult) {
        let event = if !self.state.player().alive {
            PhaseEvent::PlayerDied
        } else if matches!(result, ActionResult::Escaped) {
            PhaseEvent::Escaped
        } else {
            return;
        };

        if let Some(next) = self.state.phase.on(event) {
            self.state.phase = next;
            if let Some(outcome) = event.outcome() {
                self.state.outcome = outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionError, VICTORY_MESSAGE};
    use crate::config::GameConfig;
    use crate::env::{LevelBlueprint, LevelOracle, OracleError};
    use crate::state::{EntityId, Position, SessionMode};
    use crate::test_support::{blueprint_from_rows, state_from_rows};

    const CORRIDOR: [&str; 3] = ["#####", "#@.>#", "#####"];

    struct FixedLevels;

    impl LevelOracle for FixedLevels {
        fn generate(&self, _dungeon_level: u32, _seed: u64) -> Result<LevelBlueprint, OracleError> {
            Ok(blueprint_from_rows(&["######", "#.@..#", "#...>#", "######"]))
        }
    }

    fn submit(
        state: &mut GameState,
        env: &GameEnv<'_>,
        token: ActionToken,
    ) -> Result<TurnOutcome, TurnError> {
        GameEngine::new(state).submit(env, token)
    }

    #[test]
    fn corridor_walk_ends_in_victory() {
        let mut state = state_from_rows(&CORRIDOR, SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);

        submit(&mut state, &env, ActionToken::East).unwrap();
        submit(&mut state, &env, ActionToken::East).unwrap();
        assert_eq!(state.player().position, Position::new(3, 1));
        assert_eq!(state.turn.turn, 2);
        assert!(crate::action::legal_actions(&state, &env).contains(&ActionToken::TakeStairs));

        let outcome = submit(&mut state, &env, ActionToken::TakeStairs).unwrap();
        assert_eq!(outcome.result, Some(ActionResult::Escaped));
        assert_eq!(outcome.phase, GamePhase::GameDone);
        assert_eq!(outcome.messages, vec![VICTORY_MESSAGE.to_string()]);
        assert_eq!(state.outcome, Outcome::Victory);
        assert_eq!(state.player().position, Position::new(3, 1));
    }

    #[test]
    fn player_at_one_hp_dies_to_adjacent_ghost() {
        let mut state = state_from_rows(&["######", "#@O.>#", "######"], SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        state.entities.player_mut().fighter.hp = 1;

        let outcome = submit(&mut state, &env, ActionToken::Wait).unwrap();
        assert_eq!(outcome.phase, GamePhase::GameOver);
        assert_eq!(state.outcome, Outcome::Death);
        assert_eq!(
            outcome.messages,
            vec![
                "Ghost attacks Player for 2 hit points.".to_string(),
                "You died!".to_string(),
            ]
        );
        assert!(!state.player().alive);
        assert_eq!(state.player().fighter.hp, 0);
    }

    #[test]
    fn terminal_phase_only_navigates_to_menu() {
        let mut state = state_from_rows(&CORRIDOR, SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        state.phase = GamePhase::GameOver;

        assert_eq!(
            submit(&mut state, &env, ActionToken::Wait),
            Err(TurnError::NoActiveSession {
                phase: GamePhase::GameOver
            })
        );
        let outcome = submit(&mut state, &env, ActionToken::Escape).unwrap();
        assert_eq!(outcome.phase, GamePhase::Menu);
        assert_eq!(outcome.result, None);

        for token in [ActionToken::Wait, ActionToken::Quit] {
            assert_eq!(
                submit(&mut state, &env, token),
                Err(TurnError::NoActiveSession {
                    phase: GamePhase::Menu
                })
            );
        }
    }

    #[test]
    fn pickup_on_empty_tile_is_rejected_without_consuming_a_turn() {
        let mut state = state_from_rows(&CORRIDOR, SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        let before = state.clone();

        let err = submit(&mut state, &env, ActionToken::Pickup).unwrap_err();
        assert_eq!(
            err,
            TurnError::Illegal {
                token: ActionToken::Pickup,
                reason: ActionError::NothingToPickUp {
                    position: Position::new(1, 1)
                },
            }
        );
        assert_eq!(err.to_string(), "illegal action 'g': There is nothing here to pick up.");
        assert_eq!(state, before);
    }

    #[test]
    fn wall_bump_and_navigation_are_rejected_while_playing() {
        let mut state = state_from_rows(&CORRIDOR, SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        let before = state.clone();

        assert!(matches!(
            submit(&mut state, &env, ActionToken::North),
            Err(TurnError::Illegal {
                reason: ActionError::Blocked { .. },
                ..
            })
        ));
        assert!(matches!(
            submit(&mut state, &env, ActionToken::Quit),
            Err(TurnError::Illegal {
                reason: ActionError::Unavailable,
                ..
            })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn empty_inventory_is_idempotent() {
        let mut state = state_from_rows(&CORRIDOR, SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        state.entities.player_mut().fighter.hp = 50;
        state.entities.player_mut().inventory = Some(crate::state::Inventory { potions: 0 });
        let before = state.clone();

        for _ in 0..3 {
            let err = submit(&mut state, &env, ActionToken::UseInventory).unwrap_err();
            assert!(matches!(
                err,
                TurnError::Illegal {
                    reason: ActionError::EmptyInventory,
                    ..
                }
            ));
            assert_eq!(state, before);
        }
    }

    #[test]
    fn potion_heals_and_consumes_a_turn() {
        let mut state = state_from_rows(&CORRIDOR, SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        state.entities.player_mut().fighter.hp = 97;

        let outcome = submit(&mut state, &env, ActionToken::UseInventory).unwrap();
        assert_eq!(outcome.result, Some(ActionResult::Healed { restored: 3 }));
        assert_eq!(state.player().fighter.hp, 100);
        assert_eq!(state.player().potions(), 1);
        assert_eq!(state.turn.turn, 1);
    }

    #[test]
    fn procedural_stairs_descend_and_reset_turn_counter() {
        let mut state = state_from_rows(&["#####", "#@>.#", "#####"], SessionMode::Procedural);
        let config = GameConfig::default();
        let levels = FixedLevels;
        let env = GameEnv::new(&config).with_levels(&levels);

        submit(&mut state, &env, ActionToken::East).unwrap();
        state.entities.player_mut().fighter.hp = 40;
        let outcome = submit(&mut state, &env, ActionToken::TakeStairs).unwrap();

        assert_eq!(
            outcome.result,
            Some(ActionResult::Descended {
                dungeon_level: 2,
                max_hp_gain: 15
            })
        );
        assert!(outcome.level_changed);
        assert_eq!(outcome.phase, GamePhase::Playing);
        assert_eq!(state.turn.dungeon_level, 2);
        assert_eq!(state.turn.turn, 0);
        assert_eq!(state.turn.nonce, 2);
        assert_eq!(state.player().fighter.max_hp, 115);
        assert_eq!(state.player().fighter.hp, 55);
        assert_eq!(state.player().position, Position::new(2, 1));
        assert!(state.map.is_visible(Position::new(4, 2)));
    }

    #[test]
    fn procedural_stairs_without_oracle_abort_the_turn() {
        let mut state = state_from_rows(&["####", "#@>#", "####"], SessionMode::Procedural);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        submit(&mut state, &env, ActionToken::East).unwrap();

        let err = submit(&mut state, &env, ActionToken::TakeStairs).unwrap_err();
        let TurnError::Invariant(inner) = err else {
            panic!("expected an aborted turn, got {err:?}");
        };
        assert_eq!(inner.phase(), Some(TransitionPhase::Apply));
        assert_eq!(
            inner.action_error(),
            Some(&ActionError::Oracle(OracleError::LevelsNotAvailable))
        );
    }

    #[test]
    fn enemies_close_in_one_step_per_turn() {
        let mut state = state_from_rows(&["#######", "#@...O#", "#....>#", "#######"], SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);

        submit(&mut state, &env, ActionToken::Wait).unwrap();
        let ghost = &state.entities.enemies()[0];
        assert_eq!(ghost.position, Position::new(4, 1));

        submit(&mut state, &env, ActionToken::Wait).unwrap();
        submit(&mut state, &env, ActionToken::Wait).unwrap();
        assert_eq!(state.entities.enemies()[0].position, Position::new(2, 1));

        let outcome = submit(&mut state, &env, ActionToken::Wait).unwrap();
        assert_eq!(
            outcome.messages,
            vec!["Ghost attacks Player for 2 hit points.".to_string()]
        );
        assert_eq!(state.player().fighter.hp, 98);
    }

    #[test]
    fn enemies_act_in_registration_order() {
        let mut state = state_from_rows(&["########", "#@..OO>#", "########"], SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);

        // The rear ghost can only step into the tile the front ghost just left.
        submit(&mut state, &env, ActionToken::Wait).unwrap();
        let positions: Vec<Position> =
            state.entities.enemies().iter().map(|enemy| enemy.position).collect();
        assert_eq!(positions, vec![Position::new(3, 1), Position::new(4, 1)]);

        let mut state = state_from_rows(&["#######", "#O@T.>#", "#######"], SessionMode::Text);
        let outcome = submit(&mut state, &env, ActionToken::Wait).unwrap();
        assert_eq!(
            outcome.messages,
            vec![
                "Ghost attacks Player for 2 hit points.".to_string(),
                "Red Ghost attacks Player for 8 hit points.".to_string(),
            ]
        );
        assert_eq!(state.player().fighter.hp, 90);
    }

    #[test]
    fn killing_blow_removes_the_enemy_before_it_acts() {
        let mut state = state_from_rows(&["######", "#@O.>#", "######"], SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        let ghost = state.entities.enemy_ids()[0];
        state.entities.actor_mut(ghost).unwrap().fighter.hp = 1;

        let outcome = submit(&mut state, &env, ActionToken::East).unwrap();
        assert_eq!(
            outcome.messages,
            vec![
                "Player attacks Ghost for 4 hit points.".to_string(),
                "Ghost is dead!".to_string(),
            ]
        );
        assert!(state.entities.enemies().is_empty());
        assert_eq!(state.player().fighter.hp, 100);
    }

    #[test]
    fn registry_corruption_aborts_the_turn() {
        let mut state = state_from_rows(&CORRIDOR, SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        state
            .entities
            .corrupt_occupancy_for_tests(Position::new(2, 1), EntityId::PLAYER);

        let err = submit(&mut state, &env, ActionToken::Wait).unwrap_err();
        assert!(matches!(
            err,
            TurnError::Invariant(ExecuteError::Registry(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn replay_reaches_the_same_state_root() {
        let config = GameConfig::default();
        let env = GameEnv::new(&config);
        let tokens = [ActionToken::East, ActionToken::Wait, ActionToken::East];

        let mut roots = Vec::new();
        for _ in 0..2 {
            let mut state =
                state_from_rows(&["#######", "#@..O>#", "#######"], SessionMode::Text);
            for token in tokens {
                let _ = submit(&mut state, &env, token);
            }
            roots.push(state.state_root().unwrap());
        }
        assert_eq!(roots[0], roots[1]);
        assert_eq!(hex::encode(roots[0]).len(), 64);
    }
}
