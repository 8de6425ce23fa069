use std::sync::Arc;

use sqlx::PgPool;

use edurapor_config::{CorsConfig, JwtConfig, PromotionConfig, RateLimitConfig};

use crate::middleware::rate_limit::{IpRateLimiter, build_rate_limiter};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub promotion_config: PromotionConfig,
    pub rate_limiter: Option<Arc<IpRateLimiter>>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
        promotion_config: PromotionConfig,
    ) -> Self {
        let rate_limiter = build_rate_limiter(&rate_limit_config);

        Self {
            db,
            jwt_config,
            cors_config,
            rate_limit_config,
            promotion_config,
            rate_limiter,
        }
    }

    pub fn from_env(db: PgPool) -> Self {
        Self::new(
            db,
            JwtConfig::from_env(),
            CorsConfig::from_env(),
            RateLimitConfig::from_env(),
            PromotionConfig::from_env(),
        )
    }
}
