//! Infrastructure adapters that live in the API binary.

pub mod certificate_pdf;
pub mod email;

pub use certificate_pdf::PdfCertificateGenerator;
pub use email::EmailService;
