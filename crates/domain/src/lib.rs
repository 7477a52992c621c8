//! Domain layer for the Lab Portal backend.
//!
//! This crate contains:
//! - Domain models (users, BOM requests, teams, inventories, events)
//! - The BOM approval state machine
//! - Request/response DTOs shared between API and persistence layers

pub mod models;
