use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use db_pool::DbConfig;

pub const SERVICE_NAME: &str = "betting-service";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment error: {0}")]
    Env(#[from] envy::Error),

    #[error("database configuration error: {0}")]
    Database(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DbConfig,
    pub jwt: JwtConfig,
    pub betting: BettingConfig,
}

/// `APP_*`
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub env: String,

    #[serde(default = "default_app_host")]
    pub host: String,

    #[serde(default = "default_app_port")]
    pub port: u16,

    /// Comma separated list, or `*` for any origin
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,
}

/// `JWT_*`
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,

    #[serde(default = "default_jwt_access_ttl")]
    pub access_token_ttl: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .finish()
    }
}

/// `BETTING_*`
#[derive(Debug, Clone, Deserialize)]
pub struct BettingConfig {
    /// Offset from UTC used to decide which calendar day a bet belongs to
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// Commission credited to a referrer when their code is used at signup
    #[serde(default = "default_referral_bonus")]
    pub referral_bonus: Decimal,

    #[serde(default = "default_recent_bets_limit")]
    pub recent_bets_limit: i64,
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
            referral_bonus: default_referral_bonus(),
            recent_bets_limit: default_recent_bets_limit(),
        }
    }
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    5000
}

fn default_cors_allowed_origins() -> String {
    "*".to_string()
}

fn default_jwt_access_ttl() -> i64 {
    86_400 // 24 hours
}

fn default_utc_offset_minutes() -> i32 {
    390 // UTC+06:30
}

fn default_referral_bonus() -> Decimal {
    Decimal::new(5000, 2)
}

fn default_recent_bets_limit() -> i64 {
    10
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let app: AppConfig = envy::prefixed("APP_").from_env()?;
        let jwt: JwtConfig = envy::prefixed("JWT_").from_env()?;
        let betting: BettingConfig = envy::prefixed("BETTING_").from_env()?;
        let database = DbConfig::from_env(SERVICE_NAME).map_err(ConfigError::Database)?;

        let config = Config {
            app,
            database,
            jwt,
            betting,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // chrono::FixedOffset accepts strictly less than one day
        if self.betting.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::Invalid(format!(
                "BETTING_UTC_OFFSET_MINUTES out of range: {}",
                self.betting.utc_offset_minutes
            )));
        }
        if self.betting.referral_bonus.is_sign_negative() {
            return Err(ConfigError::Invalid(
                "BETTING_REFERRAL_BONUS must not be negative".to_string(),
            ));
        }
        if self.betting.recent_bets_limit <= 0 {
            return Err(ConfigError::Invalid(
                "BETTING_RECENT_BETS_LIMIT must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.app.host.clone(), self.app.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "APP_PORT",
        "JWT_SECRET",
        "JWT_ACCESS_TOKEN_TTL",
        "BETTING_UTC_OFFSET_MINUTES",
        "BETTING_REFERRAL_BONUS",
        "BETTING_RECENT_BETS_LIMIT",
        "DATABASE_URL",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/betting_test");
        std::env::set_var("JWT_SECRET", "test-secret-at-least-16");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 5000);
        assert_eq!(config.app.env, "development");
        assert_eq!(config.jwt.access_token_ttl, 86_400);
        assert_eq!(config.betting.utc_offset_minutes, 390);
        assert_eq!(config.betting.referral_bonus, Decimal::new(5000, 2));
        assert_eq!(config.betting.recent_bets_limit, 10);
        assert_eq!(config.database.service_name, SERVICE_NAME);
        assert!(!config.is_production());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/betting_test");
        std::env::set_var("JWT_SECRET", "test-secret-at-least-16");
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("BETTING_UTC_OFFSET_MINUTES", "-300");
        std::env::set_var("BETTING_REFERRAL_BONUS", "25.50");

        let config = Config::from_env().unwrap();
        assert!(config.is_production());
        assert_eq!(config.betting.utc_offset_minutes, -300);
        assert_eq!(config.betting.referral_bonus, Decimal::new(2550, 2));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_jwt_secret() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/betting_test");

        assert!(matches!(Config::from_env(), Err(ConfigError::Env(_))));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_offset_out_of_range() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/betting_test");
        std::env::set_var("JWT_SECRET", "test-secret-at-least-16");
        std::env::set_var("BETTING_UTC_OFFSET_MINUTES", "1440");

        assert!(matches!(Config::from_env(), Err(ConfigError::Invalid(_))));

        clear_env();
    }

    #[test]
    fn test_jwt_debug_redacts_secret() {
        let jwt = JwtConfig {
            secret: "super-secret-value".to_string(),
            access_token_ttl: 60,
        };
        assert!(!format!("{:?}", jwt).contains("super-secret-value"));
    }
}
