//! Common validation utilities for `validator` derive macros.

use validator::ValidationError;

use crate::email::normalize_domain;

/// Maximum number of entries accepted in an event's domain allow-list.
pub const MAX_ALLOWED_DOMAINS: usize = 20;

/// Validates that a string contains at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates an allow-list of email domains.
///
/// Each entry must look like a host name (`label.label`), optionally with a
/// leading `@`. Blank entries are ignored; normalization drops them.
pub fn validate_allowed_domains(domains: &[String]) -> Result<(), ValidationError> {
    if domains.len() > MAX_ALLOWED_DOMAINS {
        let mut err = ValidationError::new("allowed_domains_count");
        err.message = Some(format!("At most {} allowed domains", MAX_ALLOWED_DOMAINS).into());
        return Err(err);
    }

    for domain in domains {
        let domain = normalize_domain(domain);
        if domain.is_empty() {
            continue;
        }
        if !is_host_name(&domain) {
            let mut err = ValidationError::new("allowed_domain_format");
            err.message = Some(format!("Invalid email domain: {}", domain).into());
            return Err(err);
        }
    }

    Ok(())
}

fn is_host_name(value: &str) -> bool {
    if value.len() > 253 || !value.contains('.') {
        return false;
    }
    value.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
