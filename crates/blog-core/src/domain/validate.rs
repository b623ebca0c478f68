//! Field-level constraints shared by the entities.

use crate::error::DomainError;

/// Longest address accepted by the `email` columns.
pub(crate) const EMAIL_MAX_LEN: usize = 254;

/// Non-empty and at most `max` characters.
pub(crate) fn required(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    at_most(field, value, max)
}

/// At most `max` characters (Unicode scalar values, not bytes).
pub(crate) fn at_most(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}

pub(crate) fn email(field: &str, value: &str) -> Result<(), DomainError> {
    at_most(field, value, EMAIL_MAX_LEN)?;
    if !is_valid_email(value) {
        return Err(DomainError::Validation(format!(
            "{field} is not a valid email address"
        )));
    }
    Ok(())
}

/// Slugs are ASCII letters, digits, hyphens and underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A loose `local@domain.tld` check; deliverability is not our concern.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Lowercase, ASCII-only slug: runs of anything else collapse into one hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
