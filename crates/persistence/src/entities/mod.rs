//! Database entity definitions (row mappings).

pub mod activity;
pub mod check_in;
pub mod event;
pub mod user;

pub use activity::ActivityEntity;
pub use check_in::CheckInEntity;
pub use event::EventEntity;
pub use user::UserEntity;
