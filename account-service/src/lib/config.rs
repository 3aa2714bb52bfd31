use std::env;

use auth_kit::PasswordParams;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub token: TokenConfig,
    pub password: PasswordConfig,
}

/// Token signing and lifetime settings.
///
/// `signing_keys` is ordered newest first; tokens are signed with the
/// first key and verified against the whole list, so rotating a key in
/// does not invalidate in-flight tokens.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub signing_keys: Vec<String>,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: i64,
    #[serde(default = "default_verify_ttl_secs")]
    pub verify_ttl_secs: i64,
    #[serde(default = "default_reset_ttl_secs")]
    pub reset_ttl_secs: i64,
}

/// Argon2id work factor.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl PasswordConfig {
    /// Work factor in the form the hasher takes at construction.
    pub fn hasher_params(&self) -> PasswordParams {
        PasswordParams {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

fn default_access_ttl_secs() -> i64 {
    900 // 15 minutes
}

fn default_refresh_ttl_secs() -> i64 {
    1_209_600 // 14 days
}

fn default_verify_ttl_secs() -> i64 {
    86_400 // 24 hours
}

fn default_reset_ttl_secs() -> i64 {
    3_600 // 1 hour
}

fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TOKEN__ACCESS_TTL_SECS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// Configuration is loaded once at startup and immutable afterwards;
    /// the codec, hasher, and services take the values they need at
    /// construction instead of reading ambient state.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
