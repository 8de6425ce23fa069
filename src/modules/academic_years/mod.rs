//! Academic years module.
//!
//! Administration of academic years and of the single active-year pointer the homeroom
//! workflow resolves against.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::init_academic_years_router;
