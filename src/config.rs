//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const APP_NAME: &str = "Ticket Triage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_PATH: &str = "./data/tickets.db";
const DEFAULT_MAX_MESSAGE_CHARS: usize = 5000;
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://frontend:5173",
];

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// libSQL database file.
    pub db_path: PathBuf,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Optional JSON lexicon replacing the built-in phrase tables.
    pub lexicon_path: Option<PathBuf>,
    /// Longest accepted ticket message, in characters.
    pub max_message_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            lexicon_path: None,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

impl ServerConfig {
    /// Build from `TICKET_TRIAGE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables fall back to
    /// defaults; set-but-unparseable numbers are an error.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = var("TICKET_TRIAGE_HOST").unwrap_or(defaults.host);

        let port = match var("TICKET_TRIAGE_PORT") {
            Some(s) => s.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "TICKET_TRIAGE_PORT".into(),
                message: format!("{e}"),
            })?,
            None => defaults.port,
        };

        let db_path = var("TICKET_TRIAGE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let cors_origins = match var("TICKET_TRIAGE_CORS_ORIGINS") {
            Some(s) => s
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let lexicon_path = var("TICKET_TRIAGE_LEXICON")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let max_message_chars = match var("TICKET_TRIAGE_MAX_MESSAGE_CHARS") {
            Some(s) => match s.trim().parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::InvalidValue {
                        key: "TICKET_TRIAGE_MAX_MESSAGE_CHARS".into(),
                        message: "must be greater than zero".into(),
                    });
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        key: "TICKET_TRIAGE_MAX_MESSAGE_CHARS".into(),
                        message: format!("{e}"),
                    });
                }
            },
            None => defaults.max_message_chars,
        };

        Ok(Self {
            host,
            port,
            db_path,
            cors_origins,
            lexicon_path,
            max_message_chars,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.db_path, PathBuf::from("./data/tickets.db"));
        assert_eq!(config.cors_origins.len(), 3);
        assert!(config.lexicon_path.is_none());
        assert_eq!(config.max_message_chars, 5000);
    }

    #[test]
    fn reads_overrides() {
        let config = from_map(&[
            ("TICKET_TRIAGE_HOST", "127.0.0.1"),
            ("TICKET_TRIAGE_PORT", "9090"),
            ("TICKET_TRIAGE_DB_PATH", "/tmp/t.db"),
            ("TICKET_TRIAGE_CORS_ORIGINS", "http://a.test, ,http://b.test"),
            ("TICKET_TRIAGE_LEXICON", "/etc/lexicon.json"),
            ("TICKET_TRIAGE_MAX_MESSAGE_CHARS", "200"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.db_path, PathBuf::from("/tmp/t.db"));
        assert_eq!(config.cors_origins, ["http://a.test", "http://b.test"]);
        assert_eq!(config.lexicon_path, Some(PathBuf::from("/etc/lexicon.json")));
        assert_eq!(config.max_message_chars, 200);
    }

    #[test]
    fn invalid_port_is_error() {
        let err = from_map(&[("TICKET_TRIAGE_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("TICKET_TRIAGE_PORT"));
    }

    #[test]
    fn zero_message_limit_is_error() {
        assert!(from_map(&[("TICKET_TRIAGE_MAX_MESSAGE_CHARS", "0")]).is_err());
    }

    #[test]
    fn blank_lexicon_path_is_ignored() {
        let config = from_map(&[("TICKET_TRIAGE_LEXICON", "  ")]).unwrap();
        assert!(config.lexicon_path.is_none());
    }
}
