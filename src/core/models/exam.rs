//! Exam performance model

use crate::core::config::GradingConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of assessment a module is examined by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamKind {
    /// Written exam under supervision
    Written,
    /// Oral examination
    Oral,
    /// Graded project work
    Project,
    /// Portfolio of coursework
    Portfolio,
    /// Term paper
    TermPaper,
    /// Case study
    CaseStudy,
    /// Any other assessment form; also the fallback for unknown values in data files
    #[serde(other)]
    Other,
}

impl fmt::Display for ExamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written => write!(f, "written exam"),
            Self::Oral => write!(f, "oral exam"),
            Self::Project => write!(f, "project"),
            Self::Portfolio => write!(f, "portfolio"),
            Self::TermPaper => write!(f, "term paper"),
            Self::CaseStudy => write!(f, "case study"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ExamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "written" | "exam" | "written exam" => Ok(Self::Written),
            "oral" | "oral exam" => Ok(Self::Oral),
            "project" => Ok(Self::Project),
            "portfolio" => Ok(Self::Portfolio),
            "term paper" | "termpaper" | "paper" => Ok(Self::TermPaper),
            "case study" | "casestudy" => Ok(Self::CaseStudy),
            "other" | "" => Ok(Self::Other),
            _ => Err(format!("Unknown exam kind: {s}")),
        }
    }
}

/// Time-relative state of a single exam performance.
///
/// Derived from the recorded grade and the planned date against a reference
/// date; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamStatus {
    /// No date planned yet
    Planned,
    /// Date planned, on or after the reference date
    Registered,
    /// Graded with a passing grade
    Passed,
    /// Graded with a failing grade
    Failed,
    /// Date before the reference date and no grade recorded
    Overdue,
}

impl fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Registered => write!(f, "registered"),
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Overdue => write!(f, "overdue"),
        }
    }
}

/// A scheduled or recorded assessment attempt for a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamPerformance {
    /// Planned exam date; absent when a grade was recorded without prior scheduling
    pub planned_date: Option<NaiveDate>,

    /// Recorded grade; absent until a result is entered
    pub grade: Option<f64>,

    /// Kind of assessment
    pub kind: ExamKind,

    /// Attempt number, starting at 1
    pub attempt: u8,
}

impl ExamPerformance {
    /// Create a new ungraded, unscheduled performance
    ///
    /// # Arguments
    /// * `kind` - Kind of assessment
    /// * `attempt` - Attempt number (starting at 1)
    #[must_use]
    pub const fn new(kind: ExamKind, attempt: u8) -> Self {
        Self {
            planned_date: None,
            grade: None,
            kind,
            attempt,
        }
    }

    /// Attach a planned date
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.planned_date = Some(date);
        self
    }

    /// Whether a grade has been recorded
    #[must_use]
    pub const fn is_graded(&self) -> bool {
        self.grade.is_some()
    }

    /// Whether the recorded grade passes under the given grading scale
    #[must_use]
    pub fn is_passed(&self, grading: &GradingConfig) -> bool {
        self.grade.is_some_and(|g| grading.is_passing(g))
    }

    /// Derive the time-relative status against a reference date
    ///
    /// # Returns
    /// `Passed`/`Failed` when graded, otherwise `Planned` without a date,
    /// `Overdue` when the date lies strictly before the reference date, and
    /// `Registered` for today or future dates.
    #[must_use]
    pub fn status(&self, reference: NaiveDate, grading: &GradingConfig) -> ExamStatus {
        if self.grade.is_some() {
            return if self.is_passed(grading) {
                ExamStatus::Passed
            } else {
                ExamStatus::Failed
            };
        }
        match self.planned_date {
            None => ExamStatus::Planned,
            Some(date) if date < reference => ExamStatus::Overdue,
            Some(_) => ExamStatus::Registered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_new_performance_is_blank() {
        let exam = ExamPerformance::new(ExamKind::Written, 1);
        assert!(exam.planned_date.is_none());
        assert!(exam.grade.is_none());
        assert_eq!(exam.attempt, 1);
        assert!(!exam.is_graded());
    }

    #[test]
    fn test_status_without_date_is_planned() {
        let exam = ExamPerformance::new(ExamKind::Oral, 1);
        let status = exam.status(date(2025, 6, 1), &GradingConfig::default());
        assert_eq!(status, ExamStatus::Planned);
    }

    #[test]
    fn test_status_future_date_is_registered() {
        let exam = ExamPerformance::new(ExamKind::Written, 1).with_date(date(2025, 6, 10));
        let status = exam.status(date(2025, 6, 1), &GradingConfig::default());
        assert_eq!(status, ExamStatus::Registered);
    }

    #[test]
    fn test_status_on_reference_date_is_registered() {
        let exam = ExamPerformance::new(ExamKind::Written, 1).with_date(date(2025, 6, 1));
        let status = exam.status(date(2025, 6, 1), &GradingConfig::default());
        assert_eq!(status, ExamStatus::Registered);
    }

    #[test]
    fn test_status_past_date_without_grade_is_overdue() {
        let exam = ExamPerformance::new(ExamKind::Written, 1).with_date(date(2025, 5, 31));
        let status = exam.status(date(2025, 6, 1), &GradingConfig::default());
        assert_eq!(status, ExamStatus::Overdue);
    }

    #[test]
    fn test_status_graded_at_cutoff_is_passed() {
        let grading = GradingConfig::default();
        let mut exam = ExamPerformance::new(ExamKind::Written, 1).with_date(date(2025, 5, 1));
        exam.grade = Some(grading.passing_grade);
        assert_eq!(exam.status(date(2025, 6, 1), &grading), ExamStatus::Passed);
    }

    #[test]
    fn test_status_graded_below_cutoff_is_failed() {
        let grading = GradingConfig::default();
        let mut exam = ExamPerformance::new(ExamKind::Written, 1);
        exam.grade = Some(5.0);
        assert_eq!(exam.status(date(2025, 6, 1), &grading), ExamStatus::Failed);
    }

    #[test]
    fn test_exam_kind_from_str() {
        assert_eq!("written".parse::<ExamKind>(), Ok(ExamKind::Written));
        assert_eq!("Case Study".parse::<ExamKind>(), Ok(ExamKind::CaseStudy));
        assert_eq!("".parse::<ExamKind>(), Ok(ExamKind::Other));
        assert!("interpretive dance".parse::<ExamKind>().is_err());
    }
}
