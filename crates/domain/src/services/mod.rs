//! Use cases of the check-in gate.
//!
//! Each use case holds the ports it needs behind `Arc<dyn _>` and exposes
//! one `execute`-style entry point.

pub mod certificate_content;
pub mod check_in_activity;
pub mod create_activities;
pub mod create_event;
pub mod event_queries;
pub mod finish_event;
pub mod list_user_check_ins;

pub use certificate_content::{
    build_certificate_data, build_certificate_email, certificate_filename, format_long_date,
    format_workload, CertificateSettings,
};
pub use check_in_activity::{CheckInActivity, CheckInPolicy};
pub use create_activities::CreateActivities;
pub use create_event::CreateEvent;
pub use event_queries::EventQueries;
pub use finish_event::{FinishEvent, FinishEventOutcome};
pub use list_user_check_ins::ListUserCheckIns;
