//! Game phase state machine.
//!
//! ```text
//! menu --start--> playing --player died--> game_over --navigate--> menu
//!                         --escaped------> game_done --navigate--> menu
//! ```
//!
//! `start` is accepted from every phase because starting a game replaces the
//! whole session.

use crate::action::ActionToken;

/// Coarse game state gating which operations run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    GameOver,
    GameDone,
}

/// How the session ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    #[default]
    None,
    Victory,
    Death,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    Start,
    PlayerDied,
    Escaped,
    Navigate,
}

impl GamePhase {
    /// Next phase for `event`, or `None` when the event is not accepted in
    /// this phase.
    pub const fn on(self, event: PhaseEvent) -> Option<GamePhase> {
        match (self, event) {
            (_, PhaseEvent::Start) => Some(GamePhase::Playing),
            (GamePhase::Playing, PhaseEvent::PlayerDied) => Some(GamePhase::GameOver),
            (GamePhase::Playing, PhaseEvent::Escaped) => Some(GamePhase::GameDone),
            (GamePhase::GameOver | GamePhase::GameDone, PhaseEvent::Navigate) => {
                Some(GamePhase::Menu)
            }
            _ => None,
        }
    }

    /// Whether a token is meaningful in this phase at all. Playing takes
    /// in-game tokens, terminal phases take navigation tokens, the menu
    /// takes nothing.
    pub fn accepts(self, token: ActionToken) -> bool {
        match self {
            GamePhase::Playing => !token.is_navigation(),
            GamePhase::GameOver | GamePhase::GameDone => token.is_navigation(),
            GamePhase::Menu => false,
        }
    }

    /// Phase reached through a navigation token.
    pub const fn navigate(self) -> Option<GamePhase> {
        self.on(PhaseEvent::Navigate)
    }

    /// Only `Playing` runs the turn scheduler.
    pub const fn is_playing(self) -> bool {
        matches!(self, GamePhase::Playing)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::GameDone)
    }
}

impl PhaseEvent {
    /// Outcome recorded when this event ends the game.
    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            PhaseEvent::PlayerDied => Some(Outcome::Death),
            PhaseEvent::Escaped => Some(Outcome::Victory),
            PhaseEvent::Start | PhaseEvent::Navigate => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_ends_in_exactly_two_ways() {
        assert_eq!(
            GamePhase::Playing.on(PhaseEvent::PlayerDied),
            Some(GamePhase::GameOver)
        );
        assert_eq!(
            GamePhase::Playing.on(PhaseEvent::Escaped),
            Some(GamePhase::GameDone)
        );
        assert_eq!(GamePhase::Playing.on(PhaseEvent::Navigate), None);
    }

    #[test]
    fn terminal_phases_only_navigate_back_to_menu() {
        for phase in [GamePhase::GameOver, GamePhase::GameDone] {
            assert!(phase.is_terminal());
            assert_eq!(phase.on(PhaseEvent::Navigate), Some(GamePhase::Menu));
            assert_eq!(phase.on(PhaseEvent::PlayerDied), None);
            assert_eq!(phase.on(PhaseEvent::Escaped), None);
        }
    }

    #[test]
    fn start_is_accepted_everywhere() {
        for phase in [
            GamePhase::Menu,
            GamePhase::Playing,
            GamePhase::GameOver,
            GamePhase::GameDone,
        ] {
            assert_eq!(phase.on(PhaseEvent::Start), Some(GamePhase::Playing));
        }
        assert_eq!(GamePhase::Menu.on(PhaseEvent::Navigate), None);
    }

    #[test]
    fn accepted_tokens_depend_on_phase() {
        assert!(GamePhase::Playing.accepts(ActionToken::Wait));
        assert!(!GamePhase::Playing.accepts(ActionToken::Escape));
        assert!(GamePhase::GameOver.accepts(ActionToken::Quit));
        assert!(!GamePhase::GameDone.accepts(ActionToken::East));
        assert!(!GamePhase::Menu.accepts(ActionToken::Escape));
        assert_eq!(GamePhase::GameDone.navigate(), Some(GamePhase::Menu));
    }

    #[test]
    fn outcomes_follow_terminal_events() {
        assert_eq!(PhaseEvent::PlayerDied.outcome(), Some(Outcome::Death));
        assert_eq!(PhaseEvent::Escaped.outcome(), Some(Outcome::Victory));
        assert_eq!(PhaseEvent::Navigate.outcome(), None);
        assert_eq!(GamePhase::GameOver.to_string(), "game_over");
    }
}
