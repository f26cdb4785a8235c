//! Pre-flight validation of caregiver input, run before any network call.

use thiserror::Error;
use tracing::warn;

/// Minimum trimmed length of a documentation text.
pub const MIN_TEXT_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("patient name must not be empty")]
    EmptyName,
    #[error("documentation text must be at least {MIN_TEXT_LENGTH} characters")]
    TooShort,
}

/// Reject empty or whitespace-only patient names.
pub fn validate_patient_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Reject trivially short texts; warn-only above `max_len`.
///
/// Texts below [`MIN_TEXT_LENGTH`] (after trimming) fail. Texts above the
/// configured maximum still pass — excess length is an advisory condition,
/// not an error.
pub fn validate_documentation_text(text: &str, max_len: usize) -> Result<(), ValidationError> {
    let length = text.trim().chars().count();

    if length < MIN_TEXT_LENGTH {
        return Err(ValidationError::TooShort);
    }

    if length > max_len {
        warn!(length, max_len, "documentation text exceeds maximum length");
    }

    Ok(())
}
