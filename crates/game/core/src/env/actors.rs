//! Stat blocks for everything that can be spawned into a level.

/// Stat block used to spawn an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub max_hp: u32,
    pub power: u32,
    pub defense: u32,
}

impl ActorTemplate {
    pub const PLAYER: Self = Self {
        name: "Player",
        glyph: '@',
        max_hp: 100,
        power: 4,
        defense: 0,
    };

    pub const GHOST: Self = Self {
        name: "Ghost",
        glyph: 'O',
        max_hp: 10,
        power: 2,
        defense: 0,
    };

    pub const RED_GHOST: Self = Self {
        name: "Red Ghost",
        glyph: 'T',
        max_hp: 15,
        power: 8,
        defense: 1,
    };
}

/// Hostile actor kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnemyKind {
    Ghost,
    RedGhost,
}

impl EnemyKind {
    pub const fn template(self) -> ActorTemplate {
        match self {
            EnemyKind::Ghost => ActorTemplate::GHOST,
            EnemyKind::RedGhost => ActorTemplate::RED_GHOST,
        }
    }

    pub const fn glyph(self) -> char {
        self.template().glyph
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'O' => Some(EnemyKind::Ghost),
            'T' => Some(EnemyKind::RedGhost),
            _ => None,
        }
    }
}

/// Item kinds. Only consumables exist today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    HealthPotion,
}

impl ItemKind {
    pub const fn name(self) -> &'static str {
        match self {
            ItemKind::HealthPotion => "Health Potion",
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            ItemKind::HealthPotion => 'h',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'h' => Some(ItemKind::HealthPotion),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn glyphs_round_trip() {
        for kind in EnemyKind::iter() {
            assert_eq!(EnemyKind::from_glyph(kind.glyph()), Some(kind));
        }
        for kind in ItemKind::iter() {
            assert_eq!(ItemKind::from_glyph(kind.glyph()), Some(kind));
        }
        assert_eq!(EnemyKind::from_glyph('@'), None);
    }
}
