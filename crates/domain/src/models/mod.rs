//! Domain models for the check-in gate.

pub mod activity;
pub mod certificate_job;
pub mod check_in;
pub mod event;
pub mod user;

pub use activity::{
    Activity, CreateActivitiesRequest, CreateActivityItem, NewActivity,
    MAX_ACTIVITIES_PER_REQUEST,
};
pub use certificate_job::{ActivityInfo, CertificateJob, EventInfo, JobUserInfo};
pub use check_in::CheckIn;
pub use event::{
    ActivityWithCheckIns, CreateEventRequest, Event, EventDetails, EventStatus,
    EventWithActivities, NewEvent,
};
pub use user::UserInfo;
