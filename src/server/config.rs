use serde::Deserialize;
use std::env;
use std::fs;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_APP_HOST: &str = "0.0.0.0";
const DEFAULT_APP_PORT: u16 = 8080;
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 30;
const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationConfig {
    pub host: String,
    pub port: u16,
}

impl ApplicationConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Postgres connection URL with percent-encoded credentials.
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.name
        )
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub application: ApplicationConfig,
    pub database: DatabaseConfig,
}

/// Optional TOML layer. Every field may be omitted; the environment wins over it.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    application: FileApplicationConfig,
    database: FileDatabaseConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileApplicationConfig {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileDatabaseConfig {
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    password: Option<String>,
    name: Option<String>,
    max_connections: Option<u32>,
    acquire_timeout_secs: Option<u64>,
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(None),
    }
}

impl ServerConfig {
    /// Defaults, then the TOML file at `path` (if any), then the process environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_string(),
                    source,
                })?;
                toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_string(),
                    source,
                })?
            }
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| env::var(key).ok())
    }

    fn from_sources<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let application = ApplicationConfig {
            host: lookup("APP_HOST")
                .or(file.application.host)
                .unwrap_or_else(|| DEFAULT_APP_HOST.to_string()),
            port: parse_var(&lookup, "APP_PORT")?
                .or(file.application.port)
                .unwrap_or(DEFAULT_APP_PORT),
        };

        let db = file.database;
        let database = DatabaseConfig {
            host: lookup("DB_HOST")
                .or(db.host)
                .unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port: parse_var(&lookup, "DB_PORT")?
                .or(db.port)
                .unwrap_or(DEFAULT_DB_PORT),
            user: lookup("DB_USER")
                .or(db.user)
                .ok_or(ConfigError::Missing("DB_USER"))?,
            password: lookup("DB_PASSWORD")
                .or(db.password)
                .ok_or(ConfigError::Missing("DB_PASSWORD"))?,
            name: lookup("DB_NAME")
                .or(db.name)
                .ok_or(ConfigError::Missing("DB_NAME"))?,
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS")?
                .or(db.max_connections)
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            acquire_timeout_secs: parse_var(&lookup, "DB_ACQUIRE_TIMEOUT_SECS")?
                .or(db.acquire_timeout_secs)
                .unwrap_or(DEFAULT_DB_ACQUIRE_TIMEOUT_SECS),
        };

        if database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(ServerConfig {
            application,
            database,
        })
    }
}
