//! Process configuration loaded from the environment.
//!
//! Built once at startup and passed to each component; there is no
//! process-wide mutable configuration state.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A variable is present but malformed.
    Invalid { var: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { var, reason } => {
                write!(f, "invalid value for {}: {}", var, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Telegram credentials shared by the notifier and the admin bot.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// The single privileged chat user allowed to manage leads.
    pub admin_id: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file shared by both processes.
    pub database_path: PathBuf,
    /// Directory for log files.
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// None when BOT_TOKEN or ADMIN_ID is absent. The web binary then runs
    /// without notifications; the bot binary refuses to start.
    pub telegram: Option<TelegramConfig>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let database_path = PathBuf::from(get("DATABASE_PATH").unwrap_or("database.db"));
        let data_dir = PathBuf::from(get("DATA_DIR").unwrap_or("."));
        let host = get("HOST").unwrap_or("0.0.0.0").to_string();
        let port: u16 = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                reason: format!("'{raw}' is not a port number"),
            })?,
            None => 5000,
        };

        let telegram = match (get("BOT_TOKEN"), get("ADMIN_ID")) {
            (Some(token), Some(admin)) => {
                validate_token(token)?;
                let admin_id: i64 = admin.parse().map_err(|_| ConfigError::Invalid {
                    var: "ADMIN_ID",
                    reason: format!("'{admin}' is not a numeric user id"),
                })?;
                Some(TelegramConfig { bot_token: token.to_string(), admin_id })
            }
            _ => None,
        };

        Ok(Self { database_path, data_dir, host, port, telegram })
    }
}

/// Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric.
fn validate_token(token: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 2 || parts[0].parse::<u64>().is_err() || parts[1].is_empty() {
        return Err(ConfigError::Invalid {
            var: "BOT_TOKEN",
            reason: "expected format 123456789:ABCdefGHI...".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_without_telegram() {
        let config = Config::from_vars(&vars(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("database.db"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert!(config.telegram.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_vars(&vars(&[
            ("BOT_TOKEN", "123456789:ABCdefGHIjklMNO"),
            ("ADMIN_ID", "370884641"),
            ("DATABASE_PATH", "/var/lib/school/leads.db"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        let telegram = config.telegram.expect("telegram config should be present");
        assert_eq!(telegram.admin_id, 370884641);
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/var/lib/school/leads.db"));
    }

    #[test]
    fn test_token_without_admin_id_disables_telegram() {
        let config = Config::from_vars(&vars(&[("BOT_TOKEN", "123456789:ABCdef")])).unwrap();
        assert!(config.telegram.is_none());
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let config = Config::from_vars(&vars(&[("BOT_TOKEN", ""), ("ADMIN_ID", "1")])).unwrap();
        assert!(config.telegram.is_none());
    }

    #[test]
    fn test_invalid_token_format() {
        for bad in ["no_colon", "notanumber:ABCdef", "123456789:"] {
            let err = Config::from_vars(&vars(&[("BOT_TOKEN", bad), ("ADMIN_ID", "1")]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { var: "BOT_TOKEN", .. }), "token: {bad}");
        }
    }

    #[test]
    fn test_invalid_admin_id() {
        let err = Config::from_vars(&vars(&[
            ("BOT_TOKEN", "123456789:ABCdef"),
            ("ADMIN_ID", "not-a-number"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "ADMIN_ID", .. }));
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_vars(&vars(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }
}
