//! Immutable read model of a session.
//!
//! A [`Snapshot`] is captured after every committed turn and handed to
//! readers (API layer, renderer). It only exposes what the player can
//! currently perceive: enemies and items on visible tiles, the stairs once
//! seen, and terrain the player has discovered.

use std::fmt;

use crate::action::{ActionToken, legal_actions};
use crate::engine::{GamePhase, Outcome};
use crate::env::{GameEnv, TerrainKind};
use crate::state::{ActorState, EntityId, GameState, ItemState, Position, SessionMode};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub id: EntityId,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub hp: u32,
    pub max_hp: u32,
    pub power: u32,
    pub defense: u32,
    pub potions: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyView {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub x: i32,
    pub y: i32,
    pub hp: u32,
    pub max_hp: u32,
    pub power: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemView {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub x: i32,
    pub y: i32,
}

/// What lies under the player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Ground {
    Floor,
    Stairs,
    Item(String),
}

impl fmt::Display for Ground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ground::Floor => f.write_str("floor"),
            Ground::Stairs => f.write_str("stairs"),
            Ground::Item(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub phase: GamePhase,
    pub outcome: Outcome,
    pub mode: SessionMode,
    pub dungeon_level: u32,
    /// Turns taken on the current level.
    pub turn: u32,
    /// Turns taken over the whole session.
    pub nonce: u64,
    pub width: u32,
    pub height: u32,
    /// Messages of the turn that produced this snapshot.
    pub messages: Vec<String>,
    pub player: PlayerView,
    pub standing_on: Ground,
    pub enemies: Vec<EnemyView>,
    pub items: Vec<ItemView>,
    pub stairs: Option<Position>,
    pub visible_mask: Vec<Vec<bool>>,
    pub discovered_mask: Vec<Vec<bool>>,
    /// Discovered terrain with visible entities drawn on top.
    pub map: Vec<String>,
    pub legal_actions: Vec<ActionToken>,
}

impl Snapshot {
    pub fn capture(state: &GameState, env: &GameEnv<'_>) -> Self {
        let map = &state.map;
        let player = state.player();

        let enemies: Vec<EnemyView> = state
            .entities
            .enemies()
            .iter()
            .filter(|enemy| enemy.alive && map.is_visible(enemy.position))
            .map(enemy_view)
            .collect();
        let items: Vec<ItemView> = state
            .entities
            .items()
            .iter()
            .filter(|item| map.is_visible(item.position))
            .map(item_view)
            .collect();

        let standing_on = if let Some(item) = state.entities.item_at(player.position) {
            Ground::Item(item.name().to_string())
        } else if map.is_stairs(player.position) {
            Ground::Stairs
        } else {
            Ground::Floor
        };

        Self {
            phase: state.phase,
            outcome: state.outcome,
            mode: state.mode,
            dungeon_level: state.turn.dungeon_level,
            turn: state.turn.turn,
            nonce: state.turn.nonce,
            width: map.width(),
            height: map.height(),
            messages: state.messages.turn_texts(),
            player: player_view(player),
            standing_on,
            stairs: map.is_visible(map.stairs()).then(|| map.stairs()),
            visible_mask: map.visible_rows(),
            discovered_mask: map.discovered_rows(),
            map: draw_rows(state, &enemies, &items),
            enemies,
            items,
            legal_actions: legal_actions(state, env),
        }
    }

    /// The map as newline-separated rows.
    pub fn render_ascii(&self) -> String {
        self.map.join("\n")
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }
}

fn player_view(player: &ActorState) -> PlayerView {
    PlayerView {
        id: player.id,
        name: player.name.clone(),
        x: player.position.x,
        y: player.position.y,
        hp: player.fighter.hp,
        max_hp: player.fighter.max_hp,
        power: player.fighter.power,
        defense: player.fighter.defense,
        potions: player.potions(),
    }
}

fn enemy_view(enemy: &ActorState) -> EnemyView {
    EnemyView {
        id: enemy.id,
        name: enemy.name.clone(),
        glyph: enemy.glyph,
        x: enemy.position.x,
        y: enemy.position.y,
        hp: enemy.fighter.hp,
        max_hp: enemy.fighter.max_hp,
        power: enemy.fighter.power,
    }
}

fn item_view(item: &ItemState) -> ItemView {
    ItemView {
        id: item.id,
        name: item.name().to_string(),
        glyph: item.kind.glyph(),
        x: item.position.x,
        y: item.position.y,
    }
}

fn draw_rows(state: &GameState, enemies: &[EnemyView], items: &[ItemView]) -> Vec<String> {
    let map = &state.map;
    let mut cells: Vec<Vec<char>> = (0..map.height() as i32)
        .map(|y| {
            (0..map.width() as i32)
                .map(|x| {
                    let position = Position::new(x, y);
                    if !map.is_discovered(position) {
                        ' '
                    } else if map.is_stairs(position) {
                        '>'
                    } else {
                        match map.terrain(position) {
                            Some(TerrainKind::Floor) => '.',
                            Some(TerrainKind::Wall) => '#',
                            Some(TerrainKind::Void) | None => ' ',
                        }
                    }
                })
                .collect()
        })
        .collect();

    let mut put = |x: i32, y: i32, glyph: char| {
        if let Some(cell) = cells
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = glyph;
        }
    };
    for item in items {
        put(item.x, item.y, item.glyph);
    }
    for enemy in enemies {
        put(enemy.x, enemy.y, enemy.glyph);
    }
    let player = state.player();
    put(player.position.x, player.position.y, player.glyph);

    cells
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FovMode, GameConfig};
    use crate::state::{FovSettings, WELCOME_MESSAGE};
    use crate::test_support::{blueprint_from_rows, state_from_rows};

    #[test]
    fn captures_visible_entities_only() {
        let rows = ["#########", "#@.O#.T.#", "#......>#", "#########"];
        let state = state_from_rows(&rows, SessionMode::Text);
        let config = GameConfig::default();
        let snapshot = Snapshot::capture(&state, &GameEnv::new(&config));

        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(snapshot.messages, vec![WELCOME_MESSAGE.to_string()]);
        assert_eq!(snapshot.player.hp, 100);
        assert_eq!(snapshot.player.potions, 2);
        assert_eq!(snapshot.standing_on, Ground::Floor);
        assert_eq!(snapshot.enemies.len(), 1);
        assert_eq!(snapshot.enemies[0].name, "Ghost");
        assert_eq!(snapshot.visible_mask.len(), 4);
        assert_eq!(snapshot.visible_mask[0].len(), 9);
        assert!(!snapshot.visible_mask[1][6]);
    }

    #[test]
    fn omniscient_view_shows_everything() {
        let rows = ["#########", "#@.O#.T.#", "#......>#", "#########"];
        let config = GameConfig::default().with_fov(FovMode::All, 8);
        let state = GameState::from_blueprint(
            &blueprint_from_rows(&rows),
            SessionMode::Custom,
            FovSettings::from_config(&config),
            1,
            &config,
        )
        .unwrap();
        let snapshot = Snapshot::capture(&state, &GameEnv::new(&config));

        assert_eq!(snapshot.enemies.len(), 2);
        assert_eq!(snapshot.stairs, Some(Position::new(7, 2)));
        assert_eq!(snapshot.render_ascii(), rows.join("\n"));
    }

    #[test]
    fn standing_on_reports_items_and_stairs() {
        let mut state = state_from_rows(&["#####", "#@h>#", "#####"], SessionMode::Text);
        let config = GameConfig::default();
        let env = GameEnv::new(&config);

        state
            .entities
            .relocate(EntityId::PLAYER, Position::new(2, 1))
            .unwrap();
        let snapshot = Snapshot::capture(&state, &env);
        assert_eq!(snapshot.standing_on, Ground::Item("Health Potion".into()));
        assert_eq!(snapshot.standing_on.to_string(), "Health Potion");
        assert!(snapshot.legal_actions.contains(&ActionToken::Pickup));

        state
            .entities
            .relocate(EntityId::PLAYER, Position::new(3, 1))
            .unwrap();
        assert_eq!(Snapshot::capture(&state, &env).standing_on, Ground::Stairs);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_tokens_by_canonical_spelling() {
        let state = state_from_rows(&["#####", "#@.>#", "#####"], SessionMode::Text);
        let config = GameConfig::default();
        let snapshot = Snapshot::capture(&state, &GameEnv::new(&config));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"], "playing");
        assert_eq!(json["mode"], "string");
        assert_eq!(json["legal_actions"], serde_json::json!(["d", "i", "."]));
    }
}
