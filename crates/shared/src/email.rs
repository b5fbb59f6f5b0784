//! Email address helpers.

/// Returns the domain part of an email address, lower-cased.
///
/// Returns `None` unless the address has exactly one `@` with non-empty
/// local and domain parts.
pub fn extract_domain(email: &str) -> Option<String> {
    let mut parts = email.trim().split('@');
    let local = parts.next()?;
    let domain = parts.next()?;
    if parts.next().is_some() || local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(domain.to_ascii_lowercase())
}

/// Normalizes a single allow-list entry (`" @Example.COM "` -> `"example.com"`).
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('@').to_ascii_lowercase()
}

/// Normalizes an allow-list: drops blank entries and duplicates, keeping
/// the first occurrence order.
pub fn normalize_domains<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for domain in domains {
        let domain = normalize_domain(domain.as_ref());
        if !domain.is_empty() && !normalized.contains(&domain) {
            normalized.push(domain);
        }
    }
    normalized
}
