//! Text and email content derived from a certificate job.

use chrono::{DateTime, Duration, Utc};

use crate::models::CertificateJob;
use crate::ports::{Attachment, CertificateData, OutgoingEmail};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Names printed on or signed under every certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSettings {
    pub director_name: String,
    pub coordinator_name: String,
    pub organization_name: String,
}

impl Default for CertificateSettings {
    fn default() -> Self {
        Self {
            director_name: "Dr. João Silva".to_string(),
            coordinator_name: "Dra. Maria Santos".to_string(),
            organization_name: "Checkin Gate".to_string(),
        }
    }
}

fn plural(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Formats a workload as "2 hours and 30 minutes". Seconds are dropped and
/// non-positive durations render as "0 minutes".
pub fn format_workload(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    if total_minutes <= 0 {
        return "0 minutes".to_string();
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match (hours, minutes) {
        (0, m) => plural(m, "minute", "minutes"),
        (h, 0) => plural(h, "hour", "hours"),
        (h, m) => format!(
            "{} and {}",
            plural(h, "hour", "hours"),
            plural(m, "minute", "minutes")
        ),
    }
}

/// Formats a date as "March 5, 2024" (UTC calendar day).
pub fn format_long_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn certificate_filename(job: &CertificateJob) -> String {
    format!("certificate-{}.pdf", job.job_id())
}

pub fn build_certificate_data(
    job: &CertificateJob,
    settings: &CertificateSettings,
    issued_at: DateTime<Utc>,
) -> CertificateData {
    let activity = job.activity_info();
    CertificateData {
        recipient_name: job.user_info().user_name.clone(),
        event_name: job.event_info().event_name.clone(),
        activity_name: activity.activity_name.clone(),
        event_date: format_long_date(activity.activity_date),
        workload: format_workload(activity.end_time - activity.start_time),
        director_name: settings.director_name.clone(),
        coordinator_name: settings.coordinator_name.clone(),
        issue_date: format_long_date(issued_at),
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn render_email_body(job: &CertificateJob, settings: &CertificateSettings) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333333;">
  <h2>Your certificate is ready</h2>
  <p>Hello {name},</p>
  <p>Thank you for attending <strong>{activity}</strong> at <strong>{event}</strong>.</p>
  <p>Your participation certificate is attached to this message as a PDF file.</p>
  <p>Best regards,<br>{organization}</p>
</body>
</html>"#,
        name = escape_html(&job.user_info().user_name),
        activity = escape_html(&job.activity_info().activity_name),
        event = escape_html(&job.event_info().event_name),
        organization = escape_html(&settings.organization_name),
    )
}

/// Builds the delivery email carrying the rendered certificate.
pub fn build_certificate_email(
    job: &CertificateJob,
    settings: &CertificateSettings,
    pdf: Vec<u8>,
) -> OutgoingEmail {
    OutgoingEmail {
        to: job.user_info().user_email.clone(),
        subject: format!("Certificate - {}", job.event_info().event_name),
        html_body: render_email_body(job, settings),
        attachments: vec![Attachment {
            filename: certificate_filename(job),
            content: pdf,
            content_type: PDF_CONTENT_TYPE.to_string(),
        }],
    }
}
