//! Domain layer for the Checkin Gate backend.
//!
//! This crate contains:
//! - Domain models (Event, Activity, CheckIn, CertificateJob)
//! - Ports the use cases depend on (repositories, user directory, queue,
//!   certificate rendering, email delivery)
//! - Use cases (check-in admission, finishing events, event management)
//! - Domain error types

pub mod errors;
pub mod models;
pub mod ports;
pub mod services;

pub use errors::DomainError;
