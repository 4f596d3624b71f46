//! Layered application configuration.
//!
//! Values come from built-in defaults, then an optional YAML file, then
//! environment variable overrides. String values in the file may reference
//! environment variables as `${VAR}` or `${VAR:default}`.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use std::{env, fs, io};

use serde::{de, Deserialize, Deserializer};
use serde_yaml::Value;
use thiserror::Error;

/// Config file used when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "./configs/config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub migrations: MigrationsConfig,
    pub service: ServiceConfig,
    /// File the configuration was read from, if one was found.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,
    /// `debug` or `release`; controls the default log level.
    pub mode: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            mode: "debug".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_release(&self) -> bool {
        self.mode.eq_ignore_ascii_case("release")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
    #[serde(deserialize_with = "number_or_string")]
    pub max_connections: u32,
    #[serde(deserialize_with = "number_or_string")]
    pub acquire_timeout_secs: u64,
    /// Upper bound for a single data-access call.
    #[serde(deserialize_with = "number_or_string")]
    pub query_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "users".to_string(),
            sslmode: "disable".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 5,
            query_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrationsConfig {
    /// Directory of `.sql` scripts. When unset the compiled-in scripts are used.
    pub path: Option<String>,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            path: Some("./migrations".to_string()),
        }
    }
}

impl MigrationsConfig {
    pub fn directory(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Upper bound for a whole service operation (lookup + hash + write).
    #[serde(deserialize_with = "number_or_string")]
    pub operation_timeout_secs: u64,
    #[serde(deserialize_with = "number_or_string")]
    pub password_hash_cost: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            operation_timeout_secs: 30,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl ServiceConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}

impl Config {
    /// Load configuration from `CONFIG_PATH` (or the default path) and the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path), |key| env::var(key).ok())
    }

    /// Load configuration from `path`, resolving variables through `lookup`.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load_from<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match fs::read_to_string(path) {
            Ok(contents) => {
                let mut config =
                    Self::from_yaml(&contents, &lookup).map_err(|source| ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                config.source = Some(path.to_path_buf());
                config
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    fn from_yaml<F>(contents: &str, lookup: &F) -> Result<Self, serde_yaml::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut value: Value = serde_yaml::from_str(contents)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        interpolate_value(&mut value, lookup);
        serde_yaml::from_value(value)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("SERVER_PORT") {
            self.server.port = parse_override("SERVER_PORT", &v)?;
        }
        if let Some(v) = var("SERVER_MODE") {
            self.server.mode = v;
        }
        if let Some(v) = var("DATABASE_HOST") {
            self.database.host = v;
        }
        if let Some(v) = var("DATABASE_PORT") {
            self.database.port = parse_override("DATABASE_PORT", &v)?;
        }
        if let Some(v) = var("DATABASE_USER") {
            self.database.user = v;
        }
        if let Some(v) = var("DATABASE_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = var("DATABASE_NAME") {
            self.database.dbname = v;
        }
        if let Some(v) = var("DATABASE_SSLMODE") {
            self.database.sslmode = v;
        }
        if let Some(v) = var("MIGRATIONS_PATH") {
            self.migrations.path = Some(v);
        }

        Ok(())
    }
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Replace every `${VAR}` / `${VAR:default}` in `input`.
///
/// An empty variable counts as unset. An unterminated `${` is kept verbatim.
pub fn interpolate<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            output.push_str(&rest[start..]);
            return output;
        };

        let expr = &after[..end];
        let (name, default) = expr.split_once(':').unwrap_or((expr, ""));
        match lookup(name).filter(|v| !v.is_empty()) {
            Some(value) => output.push_str(&value),
            None => output.push_str(default),
        }

        rest = &after[end + 1..];
    }

    output.push_str(rest);
    output
}

fn interpolate_value<F>(value: &mut Value, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(s) if s.contains("${") => *s = interpolate(s, lookup),
        Value::Sequence(items) => {
            for item in items.iter_mut() {
                interpolate_value(item, lookup);
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                interpolate_value(item, lookup);
            }
        }
        Value::Tagged(tagged) => interpolate_value(&mut tagged.value, lookup),
        _ => {}
    }
}

/// Numeric fields may be written as numbers or, after interpolation, as strings.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        Text(String),
    }

    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}
