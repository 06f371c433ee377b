//! Input validation helpers shared by the API handlers.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::Money;

/// Maximum accepted length for a project code.
pub const MAX_CODE_LEN: usize = 64;

/// Project codes are short, non-empty, and contain no whitespace.
pub fn validate_project_code(code: &str) -> Result<(), CoreError> {
    if code.trim().is_empty() {
        return Err(CoreError::Validation("Project code must not be empty".into()));
    }
    if code.len() > MAX_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "Project code must be at most {MAX_CODE_LEN} characters"
        )));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Project code must not contain whitespace".into(),
        ));
    }
    Ok(())
}

/// Contracted, outsourcing, and ledger amounts are never negative on entry.
pub fn validate_amount(field: &str, amount: Money) -> Result<(), CoreError> {
    if amount < 0 {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

/// A shoot cannot end before it starts.
pub fn validate_shoot_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(CoreError::Validation(
                "Shoot end date must not be before the start date".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_code_rejected() {
        assert!(validate_project_code("").is_err());
        assert!(validate_project_code("   ").is_err());
    }

    #[test]
    fn code_with_spaces_rejected() {
        assert!(validate_project_code("WED 001").is_err());
    }

    #[test]
    fn reasonable_code_accepted() {
        assert!(validate_project_code("WED-2026-014").is_ok());
    }

    #[test]
    fn negative_amount_rejected() {
        let err = validate_amount("amount", -1).unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn inverted_dates_rejected() {
        let start = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 5, 9).unwrap();
        assert!(validate_shoot_dates(Some(start), Some(end)).is_err());
    }

    #[test]
    fn single_date_accepted() {
        let start = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        assert!(validate_shoot_dates(Some(start), None).is_ok());
    }
}
