// Input validation helpers (identities, required text)

use crate::domain::error::{DomainError, Result};

/// Maximum identity length accepted from callers and events
pub const MAX_ID_LEN: usize = 64;

/// Validate an entity/user identity: non-empty, bounded, `[A-Za-z0-9_-]` only
pub fn validate_id(kind: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(DomainError::ValidationError(format!("{} id is empty", kind)));
    }
    if id.len() > MAX_ID_LEN {
        return Err(DomainError::ValidationError(format!(
            "{} id too long (max {} chars)",
            kind, MAX_ID_LEN
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::ValidationError(format!(
            "{} id must be alphanumeric, '-' or '_': {}",
            kind, id
        )));
    }
    Ok(())
}

/// Require a non-blank text field, returning it trimmed
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, dropping it when blank
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
