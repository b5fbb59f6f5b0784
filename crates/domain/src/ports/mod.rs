//! Interfaces the use cases depend on.

pub mod certificate;
pub mod mail;
pub mod memory;
pub mod queue;
pub mod repository;
pub mod user_directory;

pub use certificate::{CertificateData, CertificateGenerator, RenderError};
pub use mail::{Attachment, EmailError, EmailSender, OutgoingEmail};
pub use queue::{CertificateQueue, QueueError};
pub use repository::{ActivityRepository, CheckInRepository, EventRepository, RepositoryError};
pub use user_directory::UserAuthorizationService;
