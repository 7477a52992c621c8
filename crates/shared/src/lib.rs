//! Shared utilities and common types for the Lab Portal backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token generation and validation with role claims
//! - Password hashing with Argon2id
//! - Refresh token hashing
//! - Common validation logic
//! - Pagination helpers

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
