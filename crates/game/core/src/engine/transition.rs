//! Action transition dispatch and execution logic.

use crate::action::{
    ActionResult, ActionTransition, BumpOutcome, CharacterAction, StairsOutcome,
};
use crate::env::GameEnv;
use crate::state::GameState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes each action to its transition and wraps the result in [`ActionResult`].
pub(super) fn execute_transition(
    action: &CharacterAction,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<ActionResult, ExecuteError> {
    match action {
        CharacterAction::Move(transition) => {
            let to = drive_transition(transition, state, env).map_err(ExecuteError::Move)?;
            Ok(ActionResult::Moved { to })
        }
        CharacterAction::Bump(transition) => {
            match drive_transition(transition, state, env).map_err(ExecuteError::Bump)? {
                BumpOutcome::Moved(to) => Ok(ActionResult::Moved { to }),
                BumpOutcome::Attacked(outcome) => Ok(ActionResult::Attacked(outcome)),
            }
        }
        CharacterAction::Attack(transition) => {
            let outcome = drive_transition(transition, state, env).map_err(ExecuteError::Attack)?;
            Ok(ActionResult::Attacked(outcome))
        }
        CharacterAction::Wait(transition) => {
            drive_transition(transition, state, env).map_err(ExecuteError::Wait)?;
            Ok(ActionResult::Waited)
        }
        CharacterAction::Pickup(transition) => {
            let item = drive_transition(transition, state, env).map_err(ExecuteError::Pickup)?;
            Ok(ActionResult::PickedUp(item))
        }
        CharacterAction::UseItem(transition) => {
            let restored =
                drive_transition(transition, state, env).map_err(ExecuteError::UseItem)?;
            Ok(ActionResult::Healed { restored })
        }
        CharacterAction::TakeStairs(transition) => {
            match drive_transition(transition, state, env).map_err(ExecuteError::TakeStairs)? {
                StairsOutcome::Descended {
                    dungeon_level,
                    max_hp_gain,
                } => Ok(ActionResult::Descended {
                    dungeon_level,
                    max_hp_gain,
                }),
                StairsOutcome::Escaped => Ok(ActionResult::Escaped),
            }
        }
    }
}
