use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    /// Seats a new tour gets when the admin form leaves the field empty.
    #[serde(default = "default_seats")]
    pub default_seats: i32,
}

fn default_seats() -> i32 {
    20
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            default_seats: default_seats(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Then the environment-specific file, if present
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // A local file that shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Finally RINGLINE__-prefixed environment variables
            .add_source(config::Environment::with_prefix("RINGLINE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
