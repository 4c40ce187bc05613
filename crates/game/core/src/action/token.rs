//! External action vocabulary.
//!
//! Every token has one canonical spelling (what `legal_actions` reports and
//! what snapshots serialize) plus a few accepted aliases.

use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::action::CardinalDirection;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumIter,
    strum::IntoStaticStr,
    strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "&'static str", try_from = "String"))]
pub enum ActionToken {
    #[strum(serialize = "w")]
    North,
    #[strum(serialize = "a")]
    West,
    #[strum(serialize = "s")]
    South,
    #[strum(serialize = "d")]
    East,
    #[strum(serialize = "g")]
    Pickup,
    #[strum(serialize = "i")]
    UseInventory,
    #[strum(serialize = "space")]
    TakeStairs,
    #[strum(serialize = ".")]
    Wait,
    #[strum(serialize = "esc")]
    Escape,
    #[strum(serialize = "q")]
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown action token '{0}'")]
pub struct UnknownToken(pub String);

impl ActionToken {
    /// Canonical spelling.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Accepted spellings, canonical first. Matching is case-insensitive.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ActionToken::North => &["w", "up", "north", "arrow_up"],
            ActionToken::West => &["a", "left", "west", "arrow_left"],
            ActionToken::South => &["s", "down", "south", "arrow_down"],
            ActionToken::East => &["d", "right", "east", "arrow_right"],
            ActionToken::Pickup => &["g", "pickup"],
            ActionToken::UseInventory => &["i", "use_inventory"],
            ActionToken::TakeStairs => &["space", "take_stairs", ">"],
            ActionToken::Wait => &[".", "wait"],
            ActionToken::Escape => &["esc", "escape"],
            ActionToken::Quit => &["q", "quit"],
        }
    }

    pub fn direction(self) -> Option<CardinalDirection> {
        match self {
            ActionToken::North => Some(CardinalDirection::North),
            ActionToken::West => Some(CardinalDirection::West),
            ActionToken::South => Some(CardinalDirection::South),
            ActionToken::East => Some(CardinalDirection::East),
            _ => None,
        }
    }

    /// Menu-navigation tokens, the only input accepted after the game ends.
    pub fn is_navigation(self) -> bool {
        matches!(self, ActionToken::Escape | ActionToken::Quit)
    }
}

impl FromStr for ActionToken {
    type Err = UnknownToken;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // A bare space is the stairs key as typed.
        if input == " " {
            return Ok(ActionToken::TakeStairs);
        }
        let key = input.trim().to_ascii_lowercase();
        ActionToken::iter()
            .find(|token| token.aliases().contains(&key.as_str()))
            .ok_or_else(|| UnknownToken(input.to_owned()))
    }
}

impl TryFrom<String> for ActionToken {
    type Error = UnknownToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_parses_back_to_its_token() {
        for token in ActionToken::iter() {
            for alias in token.aliases() {
                assert_eq!(alias.parse::<ActionToken>(), Ok(token), "alias {alias}");
            }
            assert_eq!(token.aliases()[0], token.as_str());
        }
    }

    #[test]
    fn parsing_is_case_insensitive_and_trims() {
        assert_eq!("  UP ".parse::<ActionToken>(), Ok(ActionToken::North));
        assert_eq!("Arrow_Right".parse::<ActionToken>(), Ok(ActionToken::East));
        assert_eq!(" ".parse::<ActionToken>(), Ok(ActionToken::TakeStairs));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert_eq!(
            "jump".parse::<ActionToken>(),
            Err(UnknownToken("jump".to_owned()))
        );
        assert!("".parse::<ActionToken>().is_err());
    }

    #[test]
    fn display_uses_canonical_spelling() {
        assert_eq!(ActionToken::TakeStairs.to_string(), "space");
        assert_eq!(ActionToken::Wait.to_string(), ".");
        assert!(ActionToken::Quit.is_navigation());
        assert_eq!(ActionToken::South.direction(), Some(CardinalDirection::South));
    }
}
