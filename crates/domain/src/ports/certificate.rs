//! Certificate document rendering contract.

use thiserror::Error;

/// Everything printed on a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateData {
    pub recipient_name: String,
    pub event_name: String,
    pub activity_name: String,
    /// Long-form activity date, e.g. "March 5, 2024".
    pub event_date: String,
    pub workload: String,
    pub director_name: String,
    pub coordinator_name: String,
    pub issue_date: String,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render certificate: {0}")]
    Render(String),
}

/// Renders a certificate into PDF bytes. Rendering is CPU bound and
/// synchronous; async callers should run it on a blocking thread.
pub trait CertificateGenerator: Send + Sync {
    fn generate(&self, data: &CertificateData) -> Result<Vec<u8>, RenderError>;
}
