use std::{env, str::FromStr, time::Duration};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub db_max_connections: u32,
    pub db_connect_max_elapsed: Duration,
    pub breaker: BreakerConfig,
    pub otp: OtpConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct BreakerConfig {
    /// Consecutive database failures before the breaker opens.
    pub failure_threshold: u32,
    pub cooldown: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct OtpConfig {
    pub ttl_minutes: i64,
    pub max_attempts: i32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(30),
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 5,
            max_attempts: 5,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env_or("APP_PORT", 3000);

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_ttl_hours: env_or("JWT_TTL_HOURS", 24),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            db_connect_max_elapsed: Duration::from_secs(env_or("DB_CONNECT_MAX_ELAPSED_SECS", 60)),
            breaker: BreakerConfig {
                failure_threshold: env_or("BREAKER_FAILURE_THRESHOLD", 5),
                cooldown: Duration::from_secs(env_or("BREAKER_COOLDOWN_SECS", 30)),
            },
            otp: OtpConfig {
                ttl_minutes: env_or("OTP_TTL_MINUTES", 5),
                max_attempts: env_or("OTP_MAX_ATTEMPTS", 5),
            },
        })
    }

    /// Configuration for tests and tools that only need a database url.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_hours: 24,
            db_max_connections: 5,
            db_connect_max_elapsed: Duration::from_secs(10),
            breaker: BreakerConfig::default(),
            otp: OtpConfig::default(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
