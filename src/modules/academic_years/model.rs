//! Academic year data models and DTOs.
//!
//! Re-exports the shared models from the `edurapor-models` crate.

pub use edurapor_models::academic_years::*;
