//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: `AuthUser` bearer-token extractor
//! - [`role`]: Route-layer role gates (`require_homeroom`, `require_admin`)
//! - [`rate_limit`]: Per-IP request limiting
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. The role gate on the router verifies the token and the caller's role
//! 3. Handlers read the verified claims through `AuthUser`

pub mod auth;
pub mod rate_limit;
pub mod role;
