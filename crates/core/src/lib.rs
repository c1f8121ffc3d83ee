//! Visa Desk Core - Shared types library.
//!
//! This crate provides common types used across all Visa Desk components:
//! - `server` - Public form intake, admin dashboard and JSON API
//! - `cli` - Command-line tools for migrations and admin management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`intake`] - Normalization of loosely-named public form submissions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod intake;
pub mod types;

pub use intake::{ContactIntake, IntakeError, IntakeFields, VisaIntake};
pub use types::*;
