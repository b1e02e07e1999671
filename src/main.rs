use anyhow::{Context, Result, bail};
use skill_relay::{config, server};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Picks the effective log level: `RUST_LOG` when set, the configured level otherwise.
fn resolve_log_level(env_level: Option<String>, configured: &str) -> Result<String> {
    let level = env_level.unwrap_or_else(|| configured.to_string());
    if level.parse::<LevelFilter>().is_err() {
        bail!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        );
    }
    Ok(level)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is not up yet, so failures here surface through anyhow on stderr
    let config = config::load()
        .await
        .context("Failed to load configuration")?;

    let log_level = resolve_log_level(std::env::var("RUST_LOG").ok(), &config.server.logs.level)
        .context("Failed to configure logging")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .json()
        .init();

    info!("Starting skill relay with log level: {}", log_level);
    info!(
        "Configuration loaded (model: {}, callback timeout: {}s, callback attempts: {})",
        config.llm.model, config.callback.timeout_secs, config.callback.max_attempts
    );

    server::run(config)
        .await
        .context("Skill relay server stopped with an error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_env_level_wins_over_configured() {
        let level = resolve_log_level(Some("debug".to_string()), "info").unwrap();
        assert_eq!(level, "debug");
    }

    #[test]
    fn test_configured_level_used_without_env() {
        let level = resolve_log_level(None, "warn").unwrap();
        assert_eq!(level, "warn");
    }

    #[test]
    fn test_invalid_level_is_error() {
        let err = resolve_log_level(None, "chatty").unwrap_err();
        assert!(err.to_string().contains("Invalid log level: 'chatty'"));
    }
}
