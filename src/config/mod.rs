//! Source configuration.
//!
//! A source can be configured three ways, all validated by the same path:
//! - a JSON mapping supplied by a hosting rule engine ([`SourceConfig::from_args`])
//! - environment variables in standalone mode ([`SourceConfig::from_env`])
//! - a TOML file with one `[[source]]` table per endpoint ([`load_config`])

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// Path of the server lifecycle collection on the WebLogic admin server.
pub const LIFECYCLE_PATH: &str = "/management/weblogic/latest/domainRuntime/serverLifeCycleRuntimes";

pub const DEFAULT_QUERY: &str = "links=none";
pub const DEFAULT_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Upper bound for the derived request timeout.
const MAX_DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one monitored admin server.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Label used in logs and status keys (defaults to the instance URL)
    pub name: String,
    /// Base URL of the admin server, without trailing slash
    pub instance: String,
    pub username: String,
    pub password: String,
    /// Query string appended to the lifecycle URL
    pub query: String,
    /// Seconds between poll cycles
    pub interval_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl SourceConfig {
    /// Build a config from a rule-engine argument mapping.
    ///
    /// Required keys: `instance`, `username`, `password`.
    /// Optional keys: `query`, `interval`, `request_timeout`, `name`.
    pub fn from_args(args: &Map<String, Value>) -> Result<Self> {
        let instance = required_str(args, "instance")?;
        let instance = instance.trim_end_matches('/').to_string();
        if instance.is_empty() {
            bail!("'instance' must not be empty");
        }

        let username = required_str(args, "username")?;
        let password = required_str(args, "password")?;

        let query = optional_str(args, "query")?.unwrap_or_else(|| DEFAULT_QUERY.to_string());

        let interval_secs = match args.get("interval") {
            None | Some(Value::Null) => DEFAULT_INTERVAL_SECS,
            Some(v) => coerce_secs("interval", v)?,
        };

        let request_timeout_secs = match args.get("request_timeout") {
            None | Some(Value::Null) => default_request_timeout(interval_secs),
            Some(v) => {
                let secs = coerce_secs("request_timeout", v)?;
                if secs == 0 {
                    bail!("'request_timeout' must be at least 1 second");
                }
                secs
            }
        };

        let name = optional_str(args, "name")?.unwrap_or_else(|| instance.clone());

        Ok(Self {
            name,
            instance,
            username,
            password,
            query,
            interval_secs,
            request_timeout_secs,
        })
    }

    /// Build a config from environment variables (standalone mode).
    ///
    /// - `WL_HOST`, `WL_USERNAME`, `WL_PASSWORD` (required)
    /// - `WL_QUERY`, `WL_INTERVAL` (optional)
    pub fn from_env() -> Result<Self> {
        let mut args = Map::new();
        for (var, key) in [
            ("WL_HOST", "instance"),
            ("WL_USERNAME", "username"),
            ("WL_PASSWORD", "password"),
            ("WL_QUERY", "query"),
            ("WL_INTERVAL", "interval"),
        ] {
            if let Ok(value) = std::env::var(var) {
                args.insert(key.to_string(), Value::String(value));
            }
        }

        Self::from_args(&args).context("Invalid WL_* environment configuration")
    }

    /// Full URL of the lifecycle collection, including the query string.
    pub fn lifecycle_url(&self) -> String {
        if self.query.is_empty() {
            format!("{}{}", self.instance, LIFECYCLE_PATH)
        } else {
            format!("{}{}?{}", self.instance, LIFECYCLE_PATH, self.query)
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("name", &self.name)
            .field("instance", &self.instance)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("query", &self.query)
            .field("interval_secs", &self.interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Complete configuration for the standalone binary.
#[derive(Clone, Debug)]
pub struct EdaConfig {
    pub sources: Vec<SourceConfig>,
    /// Capacity of the bounded event channel
    pub queue_capacity: usize,
}

impl EdaConfig {
    /// Single source from `WL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            sources: vec![SourceConfig::from_env()?],
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        })
    }
}

/// Load configuration from a TOML file.
///
/// ```toml
/// queue_capacity = 500
///
/// [[source]]
/// instance = "https://weblogic:7001"
/// username = "ansible"
/// password = "ansible"
/// interval = 1
/// ```
pub fn load_config(path: &str) -> Result<EdaConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("Invalid config file {}", path))
}

/// Parse TOML configuration text.
pub fn parse_config(contents: &str) -> Result<EdaConfig> {
    let document: toml::Value = toml::from_str(contents).context("Failed to parse TOML")?;
    let document = serde_json::to_value(document).context("Failed to convert TOML document")?;

    let queue_capacity = match document.get("queue_capacity") {
        None => DEFAULT_QUEUE_CAPACITY,
        Some(v) => v
            .as_u64()
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .ok_or_else(|| anyhow!("'queue_capacity' must be a positive integer"))?,
    };

    let tables = document
        .get("source")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("at least one [[source]] table is required"))?;

    let mut sources = Vec::with_capacity(tables.len());
    for (index, table) in tables.iter().enumerate() {
        let args = table
            .as_object()
            .ok_or_else(|| anyhow!("source #{} is not a table", index + 1))?;
        let source = SourceConfig::from_args(args)
            .with_context(|| format!("Invalid source #{}", index + 1))?;
        sources.push(source);
    }

    if sources.is_empty() {
        bail!("at least one [[source]] table is required");
    }

    Ok(EdaConfig {
        sources,
        queue_capacity,
    })
}

fn default_request_timeout(interval_secs: u64) -> u64 {
    (interval_secs / 2).clamp(1, MAX_DEFAULT_TIMEOUT_SECS)
}

fn required_str(args: &Map<String, Value>, key: &str) -> Result<String> {
    optional_str(args, key)?.ok_or_else(|| anyhow!("'{}' is required", key))
}

fn optional_str(args: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => bail!("'{}' must be a string, got {}", key, other),
    }
}

/// Coerce a seconds value to an integer.
///
/// Accepts integers, floats (truncated) and decimal strings.
fn coerce_secs(key: &str, value: &Value) -> Result<u64> {
    let secs = match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(u);
            }
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(f64::trunc)
                .ok_or_else(|| anyhow!("'{}' is not a valid number", key))?
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .with_context(|| format!("'{}' must be an integer, got {:?}", key, s))?
            as f64,
        other => bail!("'{}' must be a number, got {}", key, other),
    };

    if secs < 0.0 {
        bail!("'{}' must not be negative", key);
    }
    Ok(secs as u64)
}
