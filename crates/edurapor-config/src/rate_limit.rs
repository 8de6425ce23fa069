use std::num::NonZeroU32;

use governor::Quota;

/// Rate limit configuration for the API
#[derive(Clone, Debug, PartialEq)]
pub struct RateLimitConfig {
    /// Disabled in tests, where requests carry no peer address
    pub enabled: bool,
    /// Sustained requests per second per client IP
    pub per_second: u32,
    /// Burst size per client IP
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 2,
            burst_size: 30,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: crate::env_flag("RATE_LIMIT_ENABLED", defaults.enabled),
            per_second: crate::env_parse("RATE_LIMIT_PER_SECOND", defaults.per_second),
            burst_size: crate::env_parse("RATE_LIMIT_BURST_SIZE", defaults.burst_size),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// The per-IP quota, or `None` when limiting is off or the values are zero.
    pub fn quota(&self) -> Option<Quota> {
        if !self.enabled {
            return None;
        }

        let per_second = NonZeroU32::new(self.per_second)?;
        let burst = NonZeroU32::new(self.burst_size)?;
        Some(Quota::per_second(per_second).allow_burst(burst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_has_no_quota() {
        assert!(RateLimitConfig::disabled().quota().is_none());
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        let config = RateLimitConfig {
            enabled: true,
            per_second: 1,
            burst_size: 0,
        };
        assert!(config.quota().is_none());
    }

    #[test]
    fn test_default_quota() {
        let quota = RateLimitConfig::default().quota().unwrap();
        assert_eq!(quota.burst_size().get(), 30);
    }
}
