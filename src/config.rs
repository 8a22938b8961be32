use std::{str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use argon2::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Local,
    Dev,
    Prod,
}

impl FromStr for Env {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Env::Local),
            "dev" => Ok(Env::Dev),
            "prod" => Ok(Env::Prod),
            other => Err(anyhow!("unknown APP_ENV {other:?}, expected local, dev or prod")),
        }
    }
}

/// Argon2id cost. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashConfig {
    pub fn params(&self) -> anyhow::Result<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| anyhow!("invalid argon2 cost: {e}"))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Env,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub token_ttl: Duration,
    pub request_timeout: Duration,
    pub hash: HashConfig,
}

/// Upper bound on `TOKEN_TTL_MINUTES`: one year.
pub const MAX_TOKEN_TTL_MINUTES: u64 = 365 * 24 * 60;

fn token_ttl(minutes: u64) -> anyhow::Result<Duration> {
    if minutes == 0 || minutes > MAX_TOKEN_TTL_MINUTES {
        return Err(anyhow!(
            "TOKEN_TTL_MINUTES={minutes}: must be between 1 and {MAX_TOKEN_TTL_MINUTES}"
        ));
    }
    Ok(Duration::from_secs(minutes * 60))
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{name}={raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let env = parse_var("APP_ENV", Env::Local)?;
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let defaults = HashConfig::default();
        let hash = HashConfig {
            memory_kib: parse_var("HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_var("HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_var("HASH_PARALLELISM", defaults.parallelism)?,
        };
        hash.params()?;

        Ok(Self {
            env,
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("APP_PORT", 8080)?,
            token_ttl: token_ttl(parse_var("TOKEN_TTL_MINUTES", 60)?)?,
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 5)?),
            hash,
        })
    }
}
