mod types;

pub use types::*;

use crate::Result;
use std::{env, path::Path};
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();

    load_with(
        explicit_path.as_deref().map(Path::new),
        Path::new(DEFAULT_CONFIG_PATH),
        env::var("OPENAI_API_KEY").ok(),
    )
    .await
}

/// Resolves the startup configuration.
///
/// An `explicit_path` must be readable. Without one, `default_path` is used when it
/// exists and built-in defaults otherwise. A non-blank `api_key` replaces the file's.
pub async fn load_with(
    explicit_path: Option<&Path>,
    default_path: &Path,
    api_key: Option<String>,
) -> Result<Config> {
    let mut config = match explicit_path {
        Some(path) => load_from_path(path).await?,
        None if default_path.exists() => load_from_path(default_path).await?,
        None => {
            info!(
                "No {} found, using built-in defaults",
                default_path.display()
            );
            Config::default()
        }
    };

    config.apply_api_key(api_key);
    config.validate()?;

    Ok(config)
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}
