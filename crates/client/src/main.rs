//! Dungeon crawler terminal client.
//!
//! Reads one action token per line from stdin and prints the session
//! snapshot after every submission. Logs go to stderr (and optionally a file)
//! so stdout carries only game output.
//!
//! ```bash
//! DUNGEON_MODE=string DUNGEON_MAP='#####\n#@.>#\n#####' cargo run -p dungeon-client
//! ```

mod app;
mod config;
mod render;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::ClientConfig;
use runtime::Runtime;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Logging goes up before the full load so malformed-variable warnings are captured.
    let _guard = setup_logging(ClientConfig::log_dir_from_env().as_deref())?;

    let config = ClientConfig::from_env();
    tracing::info!(
        target: "client",
        mode = %config.mode,
        seed = config.seed,
        output = %config.output,
        log_dir = ?config.log_dir,
        "starting dungeon client"
    );

    let runtime = Runtime::builder()
        .config(config.runtime_config())
        .build()
        .await?;
    let handle = runtime.handle();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout().lock();
    app::run(&handle, &config, stdin, &mut stdout).await?;

    drop(handle);
    runtime.shutdown().await?;
    tracing::info!(target: "client", "client shutdown complete");
    Ok(())
}

/// Installs the stderr subscriber, plus a file layer when `log_dir` is set.
fn setup_logging(log_dir: Option<&std::path::Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, "dungeon.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!(target: "client", "Log file: {}/dungeon.log", dir.display());
    }
    Ok(guard)
}
