//! # edurapor Auth
//!
//! Access-token claims and JWT utilities.
//!
//! Tokens are issued by the school portal's login service; this crate only needs to
//! verify them and, for development tooling, mint them with the same secret.
//!
//! # Example
//!
//! ```ignore
//! use edurapor_auth::{Role, create_access_token, verify_token};
//! use edurapor_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(teacher_id, "wali@sekolah.sch.id", Role::Homeroom, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, Role::Homeroom);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{Claims, Role};
pub use jwt::{create_access_token, verify_token};
