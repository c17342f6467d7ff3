//! Validation helpers for DTOs.

use validator::ValidationError;

const MAX_POSITION_CODE_LENGTH: usize = 8;

/// Validates that a pitch-position code is 1 to 8 uppercase ASCII
/// letters or digits (e.g. `GK`, `CB`, `RW`, `ST2`).
///
/// # Examples
///
/// ```ignore
/// validate_position_code("GK")   // Ok
/// validate_position_code("gk")   // Err - lowercase
/// validate_position_code("")     // Err - empty
/// ```
pub fn validate_position_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() || code.len() > MAX_POSITION_CODE_LENGTH {
        let mut err = ValidationError::new("position_code_length");
        err.message = Some(
            format!(
                "position code must be 1 to {} characters (got {})",
                MAX_POSITION_CODE_LENGTH,
                code.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        let mut err = ValidationError::new("position_code_format");
        err.message =
            Some("position code must contain only uppercase letters and digits".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_position_code_valid() {
        assert!(validate_position_code("GK").is_ok());
        assert!(validate_position_code("CB").is_ok());
        assert!(validate_position_code("ST2").is_ok());
        assert!(validate_position_code("DEFENSE1").is_ok());
    }

    #[test]
    fn test_validate_position_code_invalid_length() {
        assert!(validate_position_code("").is_err());
        assert!(validate_position_code("VERYLONGCODE").is_err());
    }

    #[test]
    fn test_validate_position_code_invalid_format() {
        assert!(validate_position_code("gk").is_err()); // lowercase
        assert!(validate_position_code("G K").is_err()); // space
        assert!(validate_position_code("GK-2").is_err()); // punctuation
    }
}
