//! HTTP route handlers.

pub mod activities;
pub mod check_ins;
pub mod events;
pub mod health;
