//! Review field validation and the duplicate-review message.

use crate::error::CoreError;

/// Maximum length of a review description in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Message returned when a user tries to review the same movie twice.
///
/// Used both by the in-transaction lookup and by the unique-constraint
/// fallback so concurrent duplicates surface identically.
pub const DUPLICATE_REVIEW_MESSAGE: &str = "You have already reviewed this movie!";

/// Validate review description: may be empty, but not over the length limit.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn empty_description_is_allowed() {
        assert!(validate_description("").is_ok());
    }

    #[test]
    fn overlong_description_is_rejected() {
        let long = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert_matches!(validate_description(&long), Err(CoreError::Validation(_)));
    }

    #[test]
    fn limit_is_counted_in_characters_not_bytes() {
        let long = "é".repeat(MAX_DESCRIPTION_LENGTH);
        assert!(validate_description(&long).is_ok());
    }
}
