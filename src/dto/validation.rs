//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted quiz identifier.
const QUIZ_ID_MAX_LEN: usize = 64;

/// Validates that a quiz ID is a 1-64 character slug of lowercase letters, digits, `_` and `-`.
///
/// Quiz ids end up in file names and URLs, so anything else is rejected.
///
/// # Examples
///
/// ```ignore
/// validate_quiz_id("spain-provinces") // Ok
/// validate_quiz_id("Spain")           // Err - uppercase
/// validate_quiz_id("../secrets")      // Err - path characters
/// ```
pub fn validate_quiz_id(id: &str) -> Result<(), ValidationError> {
    let len = id.chars().count();
    if len == 0 || len > QUIZ_ID_MAX_LEN {
        let mut err = ValidationError::new("quiz_id_length");
        err.message = Some(
            format!(
                "Quiz ID must be between 1 and {QUIZ_ID_MAX_LEN} characters (got {})",
                len
            )
            .into(),
        );
        return Err(err);
    }

    if !id
        .chars()
        .all(|c| c.is_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        let mut err = ValidationError::new("quiz_id_format");
        err.message =
            Some("Quiz ID must contain only lowercase letters, digits, '-' or '_'".into());
        return Err(err);
    }

    Ok(())
}
