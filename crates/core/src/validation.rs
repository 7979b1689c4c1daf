//! Field validators shared by request DTOs.

use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is removed.
///
/// Stored text is trimmed, so `"   "` would otherwise land as an empty
/// string.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Value cannot be blank".into()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_blank() {
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }

    #[test]
    fn padded_text_passes() {
        assert!(validate_not_blank("  Left heel ").is_ok());
    }
}
