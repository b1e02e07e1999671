use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub callback: CallbackConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Backend credential. `None` or blank leaves the gateway unconfigured.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackConfig {
    #[serde(default = "default_callback_timeout_secs")]
    pub timeout_secs: u64,
    /// Delivery attempts per answer. One means no retry.
    #[serde(default = "default_callback_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Upper bound on concurrently running background tasks; unbounded when unset.
    #[serde(default)]
    pub max_concurrent: Option<usize>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.server.path.starts_with('/') {
            return Err(Error::config(format!(
                "server.path must start with '/', got '{}'",
                self.server.path
            )));
        }
        if self.callback.timeout_secs == 0 {
            return Err(Error::config("callback.timeout_secs must be positive"));
        }
        match self.tasks.max_concurrent {
            Some(0) => {
                return Err(Error::config("tasks.max_concurrent must be positive when set"));
            }
            Some(n) if n > Semaphore::MAX_PERMITS => {
                return Err(Error::config(format!(
                    "tasks.max_concurrent must be at most {}, got {}",
                    Semaphore::MAX_PERMITS,
                    n
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Replaces the backend credential when one is supplied (typically from the environment).
    pub fn apply_api_key(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            system_prompt: None,
            temperature: default_temperature(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_callback_timeout_secs(),
            max_attempts: default_callback_max_attempts(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_path() -> String {
    "/skill".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_callback_timeout_secs() -> u64 {
    10
}

fn default_callback_max_attempts() -> u32 {
    1
}
