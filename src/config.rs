use chrono::Duration;
use std::env;
use std::fmt;

/// Failure to assemble a [`Config`] from the environment.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid(var, value) => write!(f, "{} has an invalid value: {}", var, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Secrets and lifetimes used by the session authority.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    pub access_secret: String,
    /// HMAC secret for refresh tokens. Must differ from `access_secret`.
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// bcrypt cost factor.
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60;
    pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;
    pub const DEFAULT_BCRYPT_COST: u32 = 10;
    /// Longest lifetime `from_env` accepts for either token kind (ten years).
    pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

    /// Builds a configuration with the default lifetimes and cost.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::seconds(Self::DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(Self::DEFAULT_REFRESH_TTL_SECS),
            bcrypt_cost: Self::DEFAULT_BCRYPT_COST,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

pub struct Config {
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthConfig,
    /// Key material for task description encryption.
    pub encryption_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut auth = AuthConfig::new(required("JWT_SECRET")?, required("REFRESH_SECRET")?);
        auth.access_ttl = ttl("ACCESS_TOKEN_TTL_SECS", AuthConfig::DEFAULT_ACCESS_TTL_SECS)?;
        auth.refresh_ttl = ttl("REFRESH_TOKEN_TTL_SECS", AuthConfig::DEFAULT_REFRESH_TTL_SECS)?;
        auth.bcrypt_cost = parsed("BCRYPT_COST", AuthConfig::DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&auth.bcrypt_cost) {
            return Err(ConfigError::Invalid(
                "BCRYPT_COST",
                auth.bcrypt_cost.to_string(),
            ));
        }

        Ok(Self {
            server_port: parsed("SERVER_PORT", 3001)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            auth,
            encryption_key: required("ENCRYPTION_KEY")?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn parsed<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(var, value)),
        Err(_) => Ok(default),
    }
}

/// A token lifetime in whole seconds, between one second and `MAX_TTL_SECS`.
fn ttl(var: &'static str, default: i64) -> Result<Duration, ConfigError> {
    let secs = parsed(var, default)?;
    if !(1..=AuthConfig::MAX_TTL_SECS).contains(&secs) {
        return Err(ConfigError::Invalid(var, secs.to_string()));
    }
    Ok(Duration::seconds(secs))
}
