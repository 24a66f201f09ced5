//! Renewal form and the renewal date rule

use std::borrow::Cow;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationError;

use super::book_instance::BookInstanceDetails;

/// Latest accepted renewal date, counted from today
pub const MAX_RENEWAL_WEEKS: i64 = 4;

/// Date offered to a librarian who has not picked one yet
pub const SUGGESTED_RENEWAL_WEEKS: i64 = 3;

pub const RENEWAL_DATE_FIELD: &str = "renewal_date";

/// Suggested renewal date: three weeks from `today`.
pub fn default_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(SUGGESTED_RENEWAL_WEEKS)
}

fn rejection(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Check a candidate renewal date against `today`.
///
/// The candidate is returned unchanged when it falls within
/// `today..=today + 4 weeks`.
pub fn validate_renewal_date(candidate: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if candidate < today {
        return Err(rejection("renewal_in_past", "Invalid date - renewal in past"));
    }

    if candidate > today + Duration::weeks(MAX_RENEWAL_WEEKS) {
        return Err(rejection(
            "renewal_too_far_ahead",
            "Invalid date - renewal more than 4 weeks ahead",
        ));
    }

    Ok(candidate)
}

/// Parse the raw form value, then apply the renewal rule.
pub fn clean_renewal_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(rejection("required", "This field is required."));
    }

    let candidate = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| rejection("invalid_date", "Enter a valid date."))?;

    validate_renewal_date(candidate, today)
}

/// Submitted renewal form (urlencoded)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RenewBookForm {
    /// Proposed due date (YYYY-MM-DD)
    #[serde(default)]
    pub renewal_date: String,
}

/// Error attached to a single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn from_validation(field: &str, error: &ValidationError) -> Self {
        Self {
            field: field.to_string(),
            code: error.code.to_string(),
            message: error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string()),
        }
    }
}

/// Renewal form as presented to the librarian
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenewalForm {
    pub instance: BookInstanceDetails,
    /// Pre-filled or submitted value of the date field
    pub renewal_date: String,
    pub errors: Vec<FieldError>,
}

impl RenewalForm {
    /// Unbound form, pre-filled with the suggested date
    pub fn initial(instance: BookInstanceDetails, today: NaiveDate) -> Self {
        Self {
            instance,
            renewal_date: default_renewal_date(today).format("%Y-%m-%d").to_string(),
            errors: Vec::new(),
        }
    }

    /// Bound form re-presented with the reason the submitted date was refused
    pub fn rejected(instance: BookInstanceDetails, submitted: &str, error: &ValidationError) -> Self {
        Self {
            instance,
            renewal_date: submitted.to_string(),
            errors: vec![FieldError::from_validation(RENEWAL_DATE_FIELD, error)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 20).unwrap()
    }

    #[test]
    fn past_dates_are_rejected() {
        for days in [1, 2, 30, 365] {
            let err = validate_renewal_date(today() - Duration::days(days), today()).unwrap_err();
            assert_eq!(err.code, "renewal_in_past");
            assert_eq!(err.message.as_deref(), Some("Invalid date - renewal in past"));
        }
    }

    #[test]
    fn dates_within_four_weeks_are_accepted() {
        for days in 0..=28 {
            let candidate = today() + Duration::days(days);
            assert_eq!(validate_renewal_date(candidate, today()), Ok(candidate));
        }
    }

    #[test]
    fn dates_beyond_four_weeks_are_rejected() {
        for days in [29, 30, 60] {
            let err = validate_renewal_date(today() + Duration::days(days), today()).unwrap_err();
            assert_eq!(err.code, "renewal_too_far_ahead");
            assert_eq!(
                err.message.as_deref(),
                Some("Invalid date - renewal more than 4 weeks ahead")
            );
        }
    }

    #[test]
    fn suggested_date_is_three_weeks_out() {
        assert_eq!(default_renewal_date(today()), today() + Duration::days(21));
        assert!(validate_renewal_date(default_renewal_date(today()), today()).is_ok());
    }

    #[test]
    fn raw_values_are_parsed_before_validation() {
        assert_eq!(
            clean_renewal_date(" 2024-03-01 ", today()),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(clean_renewal_date("", today()).unwrap_err().code, "required");
        assert_eq!(clean_renewal_date("01/03/2024", today()).unwrap_err().code, "invalid_date");
        assert_eq!(clean_renewal_date("2024-02-19", today()).unwrap_err().code, "renewal_in_past");
    }
}
