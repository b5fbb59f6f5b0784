//! Persistence layer for the Checkin Gate backend.
//!
//! This crate contains:
//! - Database connection management and query metrics
//! - Entity definitions (database row mappings)
//! - PostgreSQL implementations of the domain repositories
//! - The Redis-backed certificate job queue

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod queue;
pub mod repositories;

pub use queue::RedisCertificateQueue;
