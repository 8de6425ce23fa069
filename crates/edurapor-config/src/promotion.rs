//! Thresholds for the smart-toggle promotion suggestion.
//!
//! - `PROMOTION_MIN_SCORE`: minimum average score (default: 65)
//! - `PROMOTION_MIN_ATTENDANCE_PERCENT`: minimum attendance percentage (default: 75)

/// Average score a student needs for the advisory "naik kelas" suggestion.
pub const DEFAULT_MIN_PROMOTION_SCORE: f64 = 65.0;

/// Attendance percentage a student needs for the advisory "naik kelas" suggestion.
pub const DEFAULT_MIN_ATTENDANCE_PERCENT: f64 = 75.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PromotionConfig {
    pub min_score: f64,
    pub min_attendance_percent: f64,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_PROMOTION_SCORE,
            min_attendance_percent: DEFAULT_MIN_ATTENDANCE_PERCENT,
        }
    }
}

impl PromotionConfig {
    pub fn from_env() -> Self {
        Self {
            min_score: crate::env_parse("PROMOTION_MIN_SCORE", DEFAULT_MIN_PROMOTION_SCORE),
            min_attendance_percent: crate::env_parse(
                "PROMOTION_MIN_ATTENDANCE_PERCENT",
                DEFAULT_MIN_ATTENDANCE_PERCENT,
            ),
        }
    }
}
