//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dao::models::Score;

/// Validates that a raw score token is one of `1`-`10`, `M`, or `X`.
///
/// # Examples
///
/// ```ignore
/// validate_score_token("X")  // Ok
/// validate_score_token("10") // Ok
/// validate_score_token("11") // Err - out of range
/// validate_score_token("x")  // Err - lowercase
/// ```
pub fn validate_score_token(token: &str) -> Result<(), ValidationError> {
    if Score::parse(token).is_err() {
        let mut err = ValidationError::new("score_token");
        err.message =
            Some(format!("`{token}` is not a valid score token (expected 1-10, M, or X)").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_score_token_valid() {
        for token in [
            "X", "M", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10",
        ] {
            assert!(validate_score_token(token).is_ok(), "token `{token}`");
        }
    }

    #[test]
    fn test_validate_score_token_out_of_range() {
        assert!(validate_score_token("0").is_err());
        assert!(validate_score_token("11").is_err());
        assert!(validate_score_token("100").is_err());
    }

    #[test]
    fn test_validate_score_token_non_canonical() {
        assert!(validate_score_token("+10").is_err()); // sign
        assert!(validate_score_token("01").is_err()); // leading zero
        assert!(validate_score_token(" 9").is_err()); // whitespace
        assert!(validate_score_token("x").is_err()); // lowercase
        assert!(validate_score_token("m").is_err()); // lowercase
        assert!(validate_score_token("Miss").is_err()); // spelled out
        assert!(validate_score_token("").is_err()); // empty
    }
}
