//! # edurapor Core
//!
//! Core types, errors, and utilities for the edurapor API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use edurapor_core::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Class not found"));
//! ```

pub mod errors;
pub mod serde;

pub use errors::AppError;
