//! PostgreSQL implementations of the domain repositories.

pub mod activity;
pub mod check_in;
pub mod event;
pub mod user_directory;

pub use activity::PgActivityRepository;
pub use check_in::PgCheckInRepository;
pub use event::PgEventRepository;
pub use user_directory::PgUserDirectory;
