//! Actors are a core record plus optional capability facets.
//!
//! Every actor fights. Enemies carry an [`AiBehavior`]; the player carries an
//! [`Inventory`] and [`LevelStats`].

use super::{EntityId, Position};
use crate::env::{ActorTemplate, EnemyKind};

/// Hit points and melee stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fighter {
    pub hp: u32,
    pub max_hp: u32,
    pub power: u32,
    pub defense: u32,
}

impl Fighter {
    pub fn from_template(template: &ActorTemplate) -> Self {
        Self {
            hp: template.max_hp,
            max_hp: template.max_hp,
            power: template.power,
            defense: template.defense,
        }
    }

    /// Removes up to `amount` HP and returns how much was actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.hp);
        self.hp -= applied;
        applied
    }

    /// Restores up to `amount` HP, capped at max HP. Returns the HP restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += restored;
        restored
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }
}

/// Enemy decision profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiBehavior {
    /// Chases and attacks the player once it is seen within `chase_distance`.
    Hostile { chase_distance: u32 },
}

/// Consumable stock. Potions have no identity beyond a count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    pub potions: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelStats {
    pub dungeon_level: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub position: Position,
    pub alive: bool,
    pub fighter: Fighter,
    pub ai: Option<AiBehavior>,
    pub inventory: Option<Inventory>,
    pub level: Option<LevelStats>,
}

impl ActorState {
    pub fn player(position: Position, potions: u32) -> Self {
        let template = ActorTemplate::PLAYER;
        Self {
            id: EntityId::PLAYER,
            name: template.name.to_owned(),
            glyph: template.glyph,
            position,
            alive: true,
            fighter: Fighter::from_template(&template),
            ai: None,
            inventory: Some(Inventory { potions }),
            level: Some(LevelStats { dungeon_level: 1 }),
        }
    }

    pub fn enemy(id: EntityId, position: Position, kind: EnemyKind, chase_distance: u32) -> Self {
        let template = kind.template();
        Self {
            id,
            name: template.name.to_owned(),
            glyph: template.glyph,
            position,
            alive: true,
            fighter: Fighter::from_template(&template),
            ai: Some(AiBehavior::Hostile { chase_distance }),
            inventory: None,
            level: None,
        }
    }

    pub fn is_player(&self) -> bool {
        self.id.is_player()
    }

    pub fn potions(&self) -> u32 {
        self.inventory.map_or(0, |inventory| inventory.potions)
    }
}
