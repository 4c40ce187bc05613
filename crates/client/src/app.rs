//! Line-oriented session loop.
//!
//! Each input line is one action token, or `start [mode]` to begin a new
//! session. Every accepted line prints the resulting snapshot.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use game_core::SessionMode;
use runtime::SessionHandle;

use crate::config::ClientConfig;
use crate::render::{render, render_error};

enum Line {
    Start(SessionMode),
    Token(String),
    Skip,
}

fn classify(line: &str, default_mode: SessionMode) -> std::result::Result<Line, String> {
    // A bare space is the stairs key, not a blank line.
    if line == " " {
        return Ok(Line::Token(line.to_owned()));
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Line::Skip);
    }

    let mut words = trimmed.split_whitespace();
    if words.next() == Some("start") {
        return match words.next() {
            None => Ok(Line::Start(default_mode)),
            Some(mode) => mode
                .parse()
                .map(Line::Start)
                .map_err(|_| format!("unknown mode '{mode}' (procedural, custom, string)")),
        };
    }
    Ok(Line::Token(trimmed.to_owned()))
}

/// Starts a session, then feeds `input` to it until EOF.
pub async fn run<R, W>(handle: &SessionHandle, config: &ClientConfig, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    start(handle, config, config.mode, output).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.strip_suffix('\r').unwrap_or(&line);
        match classify(line, config.mode) {
            Ok(Line::Start(mode)) => start(handle, config, mode, output).await?,
            Ok(Line::Token(token)) => match handle.submit_action(token).await {
                Ok(snapshot) => writeln!(output, "{}", render(config.output, &snapshot)?)?,
                Err(err) => {
                    tracing::debug!(target: "client", error = %err, "submission failed");
                    writeln!(output, "{}", render_error(config.output, &err))?;
                }
            },
            Ok(Line::Skip) => {}
            Err(message) => writeln!(output, "! {message}")?,
        }
        output.flush()?;
    }

    tracing::info!(target: "client", "input closed");
    Ok(())
}

async fn start<W: Write>(
    handle: &SessionHandle,
    config: &ClientConfig,
    mode: SessionMode,
    output: &mut W,
) -> Result<()> {
    match handle.start(config.start_request(mode)).await {
        Ok(snapshot) => {
            tracing::info!(target: "client", %mode, seed = config.seed, "session started");
            writeln!(output, "{}", render(config.output, &snapshot)?)?;
        }
        Err(err) => {
            tracing::warn!(target: "client", %mode, error = %err, "could not start session");
            writeln!(output, "{}", render_error(config.output, &err))?;
        }
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use runtime::Runtime;

    use super::*;
    use crate::config::OutputFormat;

    fn corridor_config(output: OutputFormat) -> ClientConfig {
        ClientConfig {
            mode: SessionMode::Text,
            map_text: Some("#####\n#@.>#\n#####".into()),
            output,
            ..ClientConfig::default()
        }
    }

    #[test]
    fn classifies_lines() {
        assert!(matches!(classify(" ", SessionMode::Text), Ok(Line::Token(t)) if t == " "));
        assert!(matches!(classify("  ", SessionMode::Text), Ok(Line::Skip)));
        assert!(matches!(
            classify("start custom", SessionMode::Text),
            Ok(Line::Start(SessionMode::Custom))
        ));
        assert!(matches!(
            classify("start", SessionMode::Procedural),
            Ok(Line::Start(SessionMode::Procedural))
        ));
        assert!(classify("start arcade", SessionMode::Text).is_err());
        assert!(matches!(classify(" d ", SessionMode::Text), Ok(Line::Token(t)) if t == "d"));
    }

    #[tokio::test]
    async fn plays_a_scripted_session() {
        let runtime = Runtime::builder().build().await.unwrap();
        let handle = runtime.handle();
        let config = corridor_config(OutputFormat::Json);

        let script: &[u8] = b"d\r\nfly\nd\n \n";
        let mut output = Vec::new();
        run(&handle, &config, script, &mut output).await.unwrap();

        let lines: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1]["nonce"], 1);
        assert_eq!(lines[2]["error"], "unknown action token 'fly'");
        assert_eq!(lines[4]["phase"], "game_done");
        assert_eq!(lines[4]["outcome"], "victory");
    }

    #[tokio::test]
    async fn restart_replaces_the_session() {
        let runtime = Runtime::builder().build().await.unwrap();
        let handle = runtime.handle();
        let config = corridor_config(OutputFormat::Text);

        let script: &[u8] = b"d\nstart\n";
        let mut output = Vec::new();
        run(&handle, &config, script, &mut output).await.unwrap();

        let snapshot = handle.snapshot().unwrap();
        assert_eq!(snapshot.nonce, 0);
        assert_eq!((snapshot.player.x, snapshot.player.y), (1, 1));
        assert!(String::from_utf8(output).unwrap().contains("Actions: d i ."));
    }
}
