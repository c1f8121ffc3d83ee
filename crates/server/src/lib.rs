//! Visa Desk server library.
//!
//! This crate provides the web server as a library, allowing it to be
//! driven by the CLI and the integration tests.
//!
//! # Security
//!
//! The public intake endpoints accept unauthenticated posts. Everything under
//! `/admin` and the admin JSON API requires a session created by password
//! login.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
