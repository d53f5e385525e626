//! Validation errors and input-boundary parsing

use chrono::NaiveDate;
use std::error::Error;
use std::fmt;

/// Recoverable validation failure raised by mutations and input parsing.
///
/// Every variant carries enough context to render a specific, human-readable
/// reason; callers report the message and leave the model untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Grade lies outside the configured grading scale.
    GradeOutOfScale {
        /// The rejected grade value
        grade: f64,
        /// Best grade on the scale
        scale_min: f64,
        /// Worst grade on the scale
        scale_max: f64,
    },
    /// Grade input that could not be parsed as a number.
    MalformedGrade {
        /// The raw user input
        input: String,
    },
    /// Attempt numbers start at 1.
    InvalidAttempt {
        /// The rejected attempt number
        attempt: u8,
    },
    /// Date input that matches none of the accepted formats.
    MalformedDate {
        /// The raw user input
        input: String,
    },
    /// The module is already passed; results change only via an explicit reopen.
    AlreadyPassed {
        /// Module code
        module: String,
    },
    /// Reopen requested on a module that is not passed.
    NotPassed {
        /// Module code
        module: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GradeOutOfScale {
                grade,
                scale_min,
                scale_max,
            } => write!(
                f,
                "grade {grade} is outside the grading scale {scale_min}..{scale_max}"
            ),
            Self::MalformedGrade { input } => {
                write!(f, "'{input}' is not a valid grade")
            }
            Self::InvalidAttempt { attempt } => {
                write!(f, "attempt number {attempt} is invalid; attempts start at 1")
            }
            Self::MalformedDate { input } => {
                write!(f, "'{input}' is not a valid date (expected YYYY-MM-DD or DD.MM.YYYY)")
            }
            Self::AlreadyPassed { module } => {
                write!(f, "module {module} is already passed; reopen it to change the result")
            }
            Self::NotPassed { module } => {
                write!(f, "module {module} is not passed and cannot be reopened")
            }
        }
    }
}

impl Error for ValidationError {}

/// Parse a user-entered date.
///
/// Accepts ISO `YYYY-MM-DD` and the common `DD.MM.YYYY` form.
///
/// # Errors
/// Returns `ValidationError::MalformedDate` when the input matches neither format.
pub fn parse_date_input(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"))
        .map_err(|_| ValidationError::MalformedDate {
            input: trimmed.to_string(),
        })
}

/// Parse a user-entered grade, accepting a decimal comma.
///
/// # Errors
/// Returns `ValidationError::MalformedGrade` when the input is not numeric.
pub fn parse_grade_input(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim().replace(',', ".");
    trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::MalformedGrade {
            input: input.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let date = parse_date_input("2025-03-14").expect("ISO date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"));
    }

    #[test]
    fn test_parse_dotted_date() {
        let date = parse_date_input("14.03.2025").expect("dotted date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"));
    }

    #[test]
    fn test_parse_date_trims_whitespace() {
        let date = parse_date_input("  2025-01-02  ").expect("padded date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid date"));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date_input("next tuesday").expect_err("garbage should fail");
        assert!(matches!(err, ValidationError::MalformedDate { .. }));
        assert!(err.to_string().contains("next tuesday"));
    }

    #[test]
    fn test_parse_grade_with_comma() {
        let grade = parse_grade_input("2,7").expect("comma decimal should parse");
        assert!((grade - 2.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_grade_with_dot() {
        let grade = parse_grade_input("1.3").expect("dot decimal should parse");
        assert!((grade - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_grade_rejects_text() {
        let err = parse_grade_input("good").expect_err("text should fail");
        assert!(matches!(err, ValidationError::MalformedGrade { .. }));
    }
}
