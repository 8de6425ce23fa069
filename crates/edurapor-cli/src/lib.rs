//! # edurapor CLI
//!
//! Demo seeding utilities used by the `edurapor-cli` binary.
//!
//! ## Usage
//!
//! ```ignore
//! use edurapor_cli::seeder::{seed_demo, SeedConfig};
//!
//! let config = SeedConfig::new(2024).with_students(30);
//! seed_demo(&pool, config).await?;
//! ```

pub mod seeder;
