//! Configuration module for townsquare.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{BotError, Result};

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "BOTAPIKEY";

/// Environment variable holding the storyteller's user id.
pub const STORYTELLER_ENV: &str = "TOWNSQUARE_STORYTELLER_ID";

/// Discord connection and command configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token. Usually supplied through `BOTAPIKEY`.
    #[serde(default)]
    pub token: String,
    /// Marker the first word of a message must contain.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Timeout for each Discord request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// User id of the storyteller, excluded from the roster.
    #[serde(default)]
    pub storyteller_id: Option<u64>,
    /// Whether `register` should also join the bot to the channel's voice.
    #[serde(default = "default_join_voice")]
    pub join_voice_on_register: bool,
}

fn default_command_prefix() -> String {
    "!botc".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_join_voice() -> bool {
    true
}

impl DiscordConfig {
    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            command_prefix: default_command_prefix(),
            request_timeout_secs: default_request_timeout(),
            storyteller_id: None,
            join_voice_on_register: default_join_voice(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/townsquare.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Discord configuration.
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BotError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BotError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `BOTAPIKEY`: the bot token
    /// - `TOWNSQUARE_STORYTELLER_ID`: the storyteller's user id
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                self.discord.token = token;
            }
        }

        if let Ok(id) = std::env::var(STORYTELLER_ENV) {
            let id = id.trim();
            if !id.is_empty() {
                let id = id.parse::<u64>().map_err(|_| {
                    BotError::Config(format!("{STORYTELLER_ENV} is not a user id: {id}"))
                })?;
                self.discord.storyteller_id = Some(id);
            }
        }

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the token is empty or contains whitespace
    /// - the command prefix is empty
    /// - the request timeout is zero
    /// - the storyteller id is zero
    pub fn validate(&self) -> Result<()> {
        if self.discord.token.is_empty() {
            return Err(BotError::Config(format!(
                "bot token is not set. Set it in config.toml or via the {TOKEN_ENV} environment variable."
            )));
        }
        if self.discord.token.chars().any(char::is_whitespace) {
            return Err(BotError::Config(
                "bot token must not contain whitespace".to_string(),
            ));
        }
        if self.discord.command_prefix.trim().is_empty() {
            return Err(BotError::Config("command_prefix must not be empty".to_string()));
        }
        if self.discord.request_timeout_secs == 0 {
            return Err(BotError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.discord.storyteller_id == Some(0) {
            return Err(BotError::Config("storyteller_id must not be zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests touching process environment must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.discord.token.is_empty());
        assert_eq!(config.discord.command_prefix, "!botc");
        assert_eq!(config.discord.request_timeout_secs, 10);
        assert_eq!(config.discord.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.discord.storyteller_id, None);
        assert!(config.discord.join_voice_on_register);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/townsquare.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[discord]
token = "abc.def.ghi"
command_prefix = "!clock"
request_timeout_secs = 5
storyteller_id = 4242
join_voice_on_register = false

[logging]
level = "debug"
file = "custom/logs/bot.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.discord.token, "abc.def.ghi");
        assert_eq!(config.discord.command_prefix, "!clock");
        assert_eq!(config.discord.request_timeout_secs, 5);
        assert_eq!(config.discord.storyteller_id, Some(4242));
        assert!(!config.discord.join_voice_on_register);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/bot.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[discord]
request_timeout_secs = 3
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.discord.request_timeout_secs, 3);
        assert_eq!(config.discord.command_prefix, "!botc");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.discord.command_prefix, "!botc");
        assert_eq!(config.logging.file, "logs/townsquare.log");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(BotError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(BotError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[discord]\ncommand_prefix = \"!grim\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.discord.command_prefix, "!grim");
    }

    #[test]
    fn test_apply_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original_token = std::env::var(TOKEN_ENV).ok();
        let original_st = std::env::var(STORYTELLER_ENV).ok();

        std::env::set_var(TOKEN_ENV, "env-token");
        std::env::set_var(STORYTELLER_ENV, " 777 ");

        let mut config = Config::default();
        config.apply_env_overrides().unwrap();

        assert_eq!(config.discord.token, "env-token");
        assert_eq!(config.discord.storyteller_id, Some(777));

        restore(TOKEN_ENV, original_token);
        restore(STORYTELLER_ENV, original_st);
    }

    #[test]
    fn test_apply_env_overrides_empty_value() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original_token = std::env::var(TOKEN_ENV).ok();
        let original_st = std::env::var(STORYTELLER_ENV).ok();

        std::env::set_var(TOKEN_ENV, "");
        std::env::remove_var(STORYTELLER_ENV);

        let mut config = Config::default();
        config.discord.token = "file-token".to_string();
        config.apply_env_overrides().unwrap();

        assert_eq!(config.discord.token, "file-token");
        assert_eq!(config.discord.storyteller_id, None);

        restore(TOKEN_ENV, original_token);
        restore(STORYTELLER_ENV, original_st);
    }

    #[test]
    fn test_apply_env_overrides_bad_storyteller() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original_st = std::env::var(STORYTELLER_ENV).ok();

        std::env::set_var(STORYTELLER_ENV, "not-a-number");

        let mut config = Config::default();
        let result = config.apply_env_overrides();
        assert!(matches!(result, Err(BotError::Config(_))));

        restore(STORYTELLER_ENV, original_st);
    }

    #[test]
    fn test_validate_missing_token() {
        let config = Config::default();
        let result = config.validate();
        if let Err(BotError::Config(msg)) = result {
            assert!(msg.contains("BOTAPIKEY"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_token_with_whitespace() {
        let mut config = Config::default();
        config.discord.token = "Bot abc".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.discord.token = "abc".to_string();
        config.discord.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let mut config = Config::default();
        config.discord.token = "abc".to_string();
        config.discord.storyteller_id = Some(5);
        assert!(config.validate().is_ok());
    }

    fn restore(key: &str, value: Option<String>) {
        match value {
            Some(val) => std::env::set_var(key, val),
            None => std::env::remove_var(key),
        }
    }
}
