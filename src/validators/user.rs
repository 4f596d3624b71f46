//! User-related custom validators.

use validator::ValidationError;

use crate::constants::ERR_NAME_REQUIRED;

/// Custom validator for display names.
/// Rejects empty and whitespace-only values.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(ERR_NAME_REQUIRED.into());
        return Err(error);
    }
    Ok(())
}
