//! # edurapor Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT verification settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) settings
//! - [`database`]: Connection pool settings
//! - [`server`]: Bind address and migration toggle
//! - [`rate_limit`]: API rate limiting
//! - [`promotion`]: Smart-toggle thresholds for the promotion workflow
//!
//! # Example
//!
//! ```ignore
//! use edurapor_config::{JwtConfig, PromotionConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let promotion_config = PromotionConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod promotion;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use promotion::{DEFAULT_MIN_ATTENDANCE_PERCENT, DEFAULT_MIN_PROMOTION_SCORE, PromotionConfig};
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Reads a boolean flag, accepting `true`/`1` and `false`/`0` (case-insensitive).
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| match v.trim().to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => default,
        })
        .unwrap_or(default)
}

pub(crate) fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
