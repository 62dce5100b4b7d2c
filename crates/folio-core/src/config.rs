use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::reveal::RevealCadence;
use super::terminal::PromptIdentity;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub chat: ChatConfig,
    pub terminal: TerminalConfig,
    pub reveal: RevealConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub model: String,
    pub endpoint: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub assistant_name: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            assistant_name: "Cortex".to_string(),
        }
    }
}

impl ChatConfig {
    /// Reads the API key from the configured variable, then `API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Blank values count as unset, so the next variable is tried.
    fn api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        [self.api_key_env.as_str(), "API_KEY"]
            .iter()
            .filter(|name| !name.is_empty())
            .find_map(|name| {
                lookup(name)
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty())
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TerminalConfig {
    pub user: String,
    pub host: String,
    pub max_sessions: Option<usize>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        let identity = PromptIdentity::default();
        Self {
            user: identity.user,
            host: identity.host,
            max_sessions: None,
        }
    }
}

impl TerminalConfig {
    pub fn identity(&self) -> PromptIdentity {
        PromptIdentity {
            user: self.user.clone(),
            host: self.host.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RevealConfig {
    pub chars_per_tick: usize,
    pub tick_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        let cadence = RevealCadence::default();
        Self {
            chars_per_tick: cadence.chars_per_tick,
            tick_ms: cadence.tick.as_millis() as u64,
        }
    }
}

impl RevealConfig {
    pub fn cadence(&self) -> RevealCadence {
        RevealCadence {
            chars_per_tick: self.chars_per_tick.max(1),
            tick: Duration::from_millis(self.tick_ms),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
    }

    /// Loads a config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tmpdir");
        let config = Config::load(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.terminal.user, "visitor");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[terminal]\nuser = \"guest\"\nmax_sessions = 4\n\n[reveal]\ntick_ms = 5\n",
        )
        .expect("write");

        let config = Config::load(&path).expect("load");
        assert_eq!(config.terminal.user, "guest");
        assert_eq!(config.terminal.host, "portfolio");
        assert_eq!(config.terminal.max_sessions, Some(4));
        assert_eq!(config.reveal.tick_ms, 5);
        assert_eq!(config.reveal.chars_per_tick, 3);
        assert_eq!(config.chat, ChatConfig::default());
    }

    #[test]
    fn blank_primary_key_falls_back_to_api_key() {
        let chat = ChatConfig::default();
        let env = |name: &str| match name {
            "GEMINI_API_KEY" => Some("  ".to_string()),
            "API_KEY" => Some("fallback-key".to_string()),
            _ => None,
        };
        assert_eq!(chat.api_key_with(env), Some("fallback-key".to_string()));
    }

    #[test]
    fn primary_key_wins_when_set() {
        let chat = ChatConfig::default();
        let env = |name: &str| match name {
            "GEMINI_API_KEY" => Some(" primary ".to_string()),
            "API_KEY" => Some("fallback-key".to_string()),
            _ => None,
        };
        assert_eq!(chat.api_key_with(env), Some("primary".to_string()));
        assert_eq!(chat.api_key_with(|_| None), None);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[terminal\nuser = ").expect("write");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }
}
