use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Enables Secure cookies
    #[serde(default)]
    pub production: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            production: false,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_token_ttl_days() -> i64 { 7 }
fn default_bcrypt_cost() -> u32 { 12 }

/// AI plan service; generation falls back to local templates without a key
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    pub api_key: Option<String>,
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

fn default_ai_endpoint() -> String { crate::services::ai::DEFAULT_ENDPOINT.to_string() }
fn default_ai_model() -> String { crate::services::ai::DEFAULT_MODEL.to_string() }
fn default_max_tokens() -> u32 { 1000 }
fn default_temperature() -> f32 { 0.7 }
fn default_ai_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Caching is disabled when unset
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    /// Entries kept by the in-process cache
    pub local_capacity: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with FITJOURNEY__)
    /// 4. DATABASE_URL, JWT_SECRET, PERPLEXITY_API_KEY, APP_ENV, LOG_LEVEL and LOG_FORMAT
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FITJOURNEY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FITJOURNEY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FITJOURNEY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }
    if let Ok(api_key) = env::var("PERPLEXITY_API_KEY") {
        builder = builder.set_override("ai.api_key", api_key)?;
    }
    if let Ok(app_env) = env::var("APP_ENV") {
        builder = builder.set_override("server.production", app_env == "production")?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}
