//! Homeroom module.
//!
//! The homeroom teacher's end-of-semester workflow:
//!
//! 1. [`validation`]: completeness of UTS, UAS, final scores and behavior records
//! 2. [`promotion`]: planning advance/repeat reassignments at the end of GENAP
//! 3. [`semester`]: moving a class from GANJIL into GENAP
//!
//! [`service::HomeroomService`] loads data and runs the mutating steps in a transaction.

pub mod controller;
pub mod model;
pub mod promotion;
pub mod router;
pub mod semester;
pub mod service;
pub mod validation;

pub use router::init_homeroom_router;
