//! Domain models for the server.

pub mod admin;
pub mod application;
pub mod contact;
pub mod session;

pub use admin::Admin;
pub use application::{ApplicationStats, VisaApplication};
pub use contact::ContactSubmission;
pub use session::CurrentAdmin;
