//! Legal-action computation.
//!
//! Legality is decided by the same `pre_validate` hooks that guard execution,
//! so a token is listed exactly when submitting it would be accepted.

use strum::IntoEnumIterator;

use crate::action::{ActionError, ActionToken, CharacterAction};
use crate::engine::GamePhase;
use crate::env::GameEnv;
use crate::state::{EntityId, GameState};

/// Tokens the player may submit right now, in canonical order.
///
/// - `Playing`: movement toward a walkable or enemy-occupied tile, pickup
///   when an item lies underfoot, potion use when one is carried, stairs when
///   standing on them, and wait.
/// - `GameOver` / `GameDone`: only the navigation tokens.
/// - `Menu`: nothing.
pub fn legal_actions(state: &GameState, env: &GameEnv<'_>) -> Vec<ActionToken> {
    match state.phase {
        GamePhase::Playing => ActionToken::iter()
            .filter(|token| check_token(state, env, *token).is_ok())
            .collect(),
        GamePhase::GameOver | GamePhase::GameDone => ActionToken::iter()
            .filter(|token| token.is_navigation())
            .collect(),
        GamePhase::Menu => Vec::new(),
    }
}

/// Resolves `token` to the player's action and checks its pre-conditions.
///
/// Returns the reason the action is refused otherwise.
pub fn check_token(
    state: &GameState,
    env: &GameEnv<'_>,
    token: ActionToken,
) -> Result<CharacterAction, ActionError> {
    let action =
        CharacterAction::from_token(EntityId::PLAYER, token).ok_or(ActionError::Unavailable)?;
    action.pre_validate(state, env)?;
    Ok(action)
}
