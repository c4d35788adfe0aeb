//! Configuration module for the voter slip service.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! Values are read once at startup; a malformed value stops the process.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::slip::SlipTheme;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where voter records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryConfig {
    /// Local SQLite file.
    Sqlite { db_path: PathBuf },
    /// Hosted database REST endpoint.
    Rest {
        base_url: String,
        api_key: Option<String>,
        table: String,
        timeout: Duration,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub directory: DirectoryConfig,
    /// Number of wards offered in the choice list
    pub ward_count: u8,
    /// Font used for PNG slip exports
    pub font_path: PathBuf,
    pub slip_theme: SlipTheme,
    /// Idle time after which a session is discarded
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = parse("VOTER_BIND_ADDR", var("VOTER_BIND_ADDR", "127.0.0.1:8080"))?;
        let log_level = var("VOTER_LOG_LEVEL", "info");

        let directory = match lookup("VOTER_DIRECTORY_URL").filter(|v| !v.trim().is_empty()) {
            Some(base_url) => DirectoryConfig::Rest {
                base_url,
                api_key: lookup("VOTER_DIRECTORY_KEY").filter(|v| !v.is_empty()),
                table: var("VOTER_DIRECTORY_TABLE", "voters"),
                timeout: Duration::from_secs(parse(
                    "VOTER_DIRECTORY_TIMEOUT_SECS",
                    var("VOTER_DIRECTORY_TIMEOUT_SECS", "15"),
                )?),
            },
            None => DirectoryConfig::Sqlite {
                db_path: var("VOTER_DB_PATH", "./data/voters.sqlite").into(),
            },
        };

        let ward_count: u8 = parse("VOTER_WARD_COUNT", var("VOTER_WARD_COUNT", "20"))?;
        if ward_count == 0 {
            return Err(ConfigError::Invalid {
                key: "VOTER_WARD_COUNT",
                value: "0".to_string(),
                reason: "at least one ward is required".to_string(),
            });
        }

        let theme_name = var("VOTER_SLIP_THEME", "classic");
        let slip_theme = SlipTheme::by_name(&theme_name).ok_or_else(|| ConfigError::Invalid {
            key: "VOTER_SLIP_THEME",
            value: theme_name.clone(),
            reason: "expected classic or emerald".to_string(),
        })?;

        let ttl_secs: u64 = parse(
            "VOTER_SESSION_TTL_SECS",
            var("VOTER_SESSION_TTL_SECS", "1800"),
        )?;
        if i64::try_from(ttl_secs).is_err() {
            return Err(ConfigError::Invalid {
                key: "VOTER_SESSION_TTL_SECS",
                value: ttl_secs.to_string(),
                reason: format!("must not exceed {}", i64::MAX),
            });
        }

        Ok(Self {
            bind_addr,
            log_level,
            directory,
            ward_count,
            font_path: var("VOTER_SLIP_FONT", "./assets/fonts/slip.ttf").into(),
            slip_theme,
            session_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.directory,
            DirectoryConfig::Sqlite {
                db_path: PathBuf::from("./data/voters.sqlite")
            }
        );
        assert_eq!(config.ward_count, 20);
        assert_eq!(config.slip_theme.name, "classic");
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
    }

    #[test]
    fn test_directory_url_selects_rest_backend() {
        let config = load(&[
            ("VOTER_DIRECTORY_URL", "https://example.supabase.co"),
            ("VOTER_DIRECTORY_KEY", "anon"),
            ("VOTER_DIRECTORY_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(
            config.directory,
            DirectoryConfig::Rest {
                base_url: "https://example.supabase.co".to_string(),
                api_key: Some("anon".to_string()),
                table: "voters".to_string(),
                timeout: Duration::from_secs(5),
            }
        );
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(load(&[("VOTER_BIND_ADDR", "nowhere")]).is_err());
        assert!(load(&[("VOTER_WARD_COUNT", "0")]).is_err());
        assert!(load(&[("VOTER_WARD_COUNT", "300")]).is_err());
        assert!(load(&[("VOTER_SLIP_THEME", "neon")]).is_err());

        let err = load(&[("VOTER_SESSION_TTL_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("VOTER_SESSION_TTL_SECS"));
    }

    #[test]
    fn test_session_ttl_must_fit_timestamps() {
        let err = load(&[("VOTER_SESSION_TTL_SECS", "18446744073709551615")]).unwrap_err();
        assert!(err.to_string().contains("VOTER_SESSION_TTL_SECS"));

        let config = load(&[("VOTER_SESSION_TTL_SECS", "9223372036854775807")]).unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(i64::MAX as u64));
    }

    #[test]
    fn test_deployment_ward_count() {
        let config = load(&[("VOTER_WARD_COUNT", "13"), ("VOTER_SLIP_THEME", "emerald")]).unwrap();
        assert_eq!(config.ward_count, 13);
        assert_eq!(config.slip_theme.name, "emerald");
    }
}
