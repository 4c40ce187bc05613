//! Snapshot output in text or JSON form.

use game_core::{GameError, GamePhase, Outcome, Snapshot};
use runtime::RuntimeError;

use crate::config::OutputFormat;

pub fn render(format: OutputFormat, snapshot: &Snapshot) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(snapshot)),
        OutputFormat::Json => Ok(serde_json::to_string(snapshot)?),
    }
}

/// JSON errors carry the stable error code next to the message.
pub fn render_error(format: OutputFormat, error: &RuntimeError) -> String {
    match format {
        OutputFormat::Text => format!("! {error}"),
        OutputFormat::Json => serde_json::json!({
            "error": error.to_string(),
            "code": error.error_code(),
        })
        .to_string(),
    }
}

/// Map, stats line, the turn's messages and the accepted tokens.
pub fn render_text(snapshot: &Snapshot) -> String {
    let mut lines: Vec<String> = snapshot.map.clone();

    let player = &snapshot.player;
    lines.push(format!(
        "HP: {}/{}  Potions: {}  Dungeon level: {}  Turn: {}  Standing on: {}",
        player.hp,
        player.max_hp,
        player.potions,
        snapshot.dungeon_level,
        snapshot.turn,
        snapshot.standing_on
    ));
    lines.extend(snapshot.messages.iter().map(|message| format!("> {message}")));

    match (snapshot.phase, snapshot.outcome) {
        (GamePhase::GameDone, Outcome::Victory) => lines.push("*** You escaped the dungeon! ***".into()),
        (GamePhase::GameOver, _) => lines.push("*** Game over ***".into()),
        (GamePhase::Menu, _) => lines.push("Type 'start' to play again.".into()),
        _ => {}
    }

    let actions: Vec<&str> = snapshot
        .legal_actions
        .iter()
        .map(|token| token.as_str())
        .collect();
    lines.push(format!("Actions: {}", actions.join(" ")));
    lines.join("\n")
}
