/// How the player's field of view is computed.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FovMode {
    /// Omniscient view: every tile on the map is visible.
    All,
    /// Radius-limited, wall-occluded view from the player.
    #[default]
    Partial,
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Default FOV mode for sessions that do not request one.
    pub fov_mode: FovMode,
    /// Default FOV radius (Euclidean, in tiles).
    pub fov_radius: u32,
    /// Chebyshev distance within which a visible enemy starts chasing.
    pub chase_distance: u32,
    /// HP restored by one health potion.
    pub potion_heal: u32,
    /// Potions the player starts every session with.
    pub starting_potions: u32,
    /// Number of entries kept in the cumulative message log.
    pub message_capacity: usize,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_OCCUPANTS_PER_TILE: usize = 4;

    // ===== level progression =====
    pub const BASE_MAX_HP: u32 = 100;
    pub const MAX_HP_PER_LEVEL: u32 = 15;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FOV_RADIUS: u32 = 8;
    pub const DEFAULT_CHASE_DISTANCE: u32 = 8;
    pub const DEFAULT_POTION_HEAL: u32 = 5;
    pub const DEFAULT_STARTING_POTIONS: u32 = 2;
    pub const DEFAULT_MESSAGE_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self {
            fov_mode: FovMode::default(),
            fov_radius: Self::DEFAULT_FOV_RADIUS,
            chase_distance: Self::DEFAULT_CHASE_DISTANCE,
            potion_heal: Self::DEFAULT_POTION_HEAL,
            starting_potions: Self::DEFAULT_STARTING_POTIONS,
            message_capacity: Self::DEFAULT_MESSAGE_CAPACITY,
        }
    }

    pub fn with_fov(mut self, mode: FovMode, radius: u32) -> Self {
        self.fov_mode = mode;
        self.fov_radius = radius;
        self
    }

    pub fn with_chase_distance(mut self, chase_distance: u32) -> Self {
        self.chase_distance = chase_distance;
        self
    }

    pub fn with_potion_heal(mut self, potion_heal: u32) -> Self {
        self.potion_heal = potion_heal;
        self
    }

    pub fn with_starting_potions(mut self, starting_potions: u32) -> Self {
        self.starting_potions = starting_potions;
        self
    }

    pub fn with_message_capacity(mut self, message_capacity: usize) -> Self {
        self.message_capacity = message_capacity;
        self
    }

    /// Player max HP on the given dungeon level (1-based).
    pub const fn max_hp_for_level(dungeon_level: u32) -> u32 {
        Self::BASE_MAX_HP + Self::MAX_HP_PER_LEVEL * dungeon_level.saturating_sub(1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_hp_grows_by_fifteen_per_level() {
        assert_eq!(GameConfig::max_hp_for_level(1), 100);
        assert_eq!(GameConfig::max_hp_for_level(2), 115);
        assert_eq!(GameConfig::max_hp_for_level(5), 160);
        // level 0 is never produced but must not underflow
        assert_eq!(GameConfig::max_hp_for_level(0), 100);
    }

    #[test]
    fn fov_mode_parses_case_insensitively() {
        assert_eq!("ALL".parse::<FovMode>().ok(), Some(FovMode::All));
        assert_eq!("partial".parse::<FovMode>().ok(), Some(FovMode::Partial));
        assert!("cone".parse::<FovMode>().is_err());
    }
}
