//! Application services.

pub mod auth;
pub mod notifications;
