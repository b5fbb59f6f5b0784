//! HTTP API and background worker of the Checkin Gate backend.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;
