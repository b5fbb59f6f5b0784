//! Shared utilities and common types for the Checkin Gate backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT access token validation
//! - Email address helpers (domain extraction, allow-list normalization)
//! - Common validation logic

pub mod email;
pub mod jwt;
pub mod validation;
