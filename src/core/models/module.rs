//! Module (course unit) model

use crate::core::config::GradingConfig;
use crate::core::models::exam::{ExamKind, ExamPerformance};
use crate::core::models::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored lifecycle state of a module.
///
/// Only the intrinsic state machine is persisted; time-relative facts such
/// as overdue are derived from the reference date at computation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleStatus {
    /// Not started, no exam scheduled
    Planned,
    /// Exam scheduled, result pending
    InProgress,
    /// Completed with a passing grade
    Passed,
    /// Completed with a failing grade; may be re-entered by scheduling a new attempt
    Failed,
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::InProgress => write!(f, "in progress"),
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Represents a single course unit within a semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module code (e.g., "ISEF01")
    pub code: String,

    /// Module title (e.g., "Software Engineering Principles")
    pub title: String,

    /// Target credit value (ECTS, can be fractional)
    pub credits: f32,

    /// Weighting factor for the grade average
    pub weight: f64,

    /// Semester number this module is planned for (starting at 1)
    pub planned_semester: u32,

    /// Stored lifecycle state
    pub status: ModuleStatus,

    /// The current exam attempt, if any was scheduled or graded
    pub exam: Option<ExamPerformance>,
}

impl Module {
    /// Create a new planned module without an exam
    ///
    /// # Arguments
    /// * `code` - Module code
    /// * `title` - Module title
    /// * `credits` - Target credit value
    /// * `weight` - Weighting factor for the grade average
    /// * `planned_semester` - Semester number the module is planned for
    #[must_use]
    pub const fn new(
        code: String,
        title: String,
        credits: f32,
        weight: f64,
        planned_semester: u32,
    ) -> Self {
        Self {
            code,
            title,
            credits,
            weight,
            planned_semester,
            status: ModuleStatus::Planned,
            exam: None,
        }
    }

    /// The recorded grade, if any
    #[must_use]
    pub fn grade(&self) -> Option<f64> {
        self.exam.as_ref().and_then(|e| e.grade)
    }

    /// The current attempt number, 0 when no exam exists yet
    #[must_use]
    pub fn attempt(&self) -> u8 {
        self.exam.as_ref().map_or(0, |e| e.attempt)
    }

    /// Whether the module still awaits a result
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.status, ModuleStatus::Planned | ModuleStatus::InProgress)
            && self.grade().is_none()
    }

    /// Whether the module's planned exam date lies strictly before `reference`
    /// with no grade recorded. A module without an exam, or without a planned
    /// date, is never overdue.
    #[must_use]
    pub fn is_overdue(&self, reference: NaiveDate) -> bool {
        self.is_open()
            && self
                .exam
                .as_ref()
                .and_then(|e| e.planned_date)
                .is_some_and(|date| date < reference)
    }

    /// Record a grade for an attempt, transitioning the module to passed or failed.
    ///
    /// Creates the exam performance if none exists yet (without a planned
    /// date). The grading scale decides the outcome: a grade equal to the
    /// passing cutoff passes.
    ///
    /// # Errors
    /// * `GradeOutOfScale` when the grade lies outside the configured scale
    /// * `InvalidAttempt` when the attempt number is 0
    /// * `AlreadyPassed` when the module is passed; use [`Self::reopen`] first
    ///
    /// State is unchanged on every error path.
    pub fn record_grade(
        &mut self,
        grade: f64,
        attempt: u8,
        grading: &GradingConfig,
    ) -> Result<(), ValidationError> {
        if !grading.contains(grade) {
            return Err(ValidationError::GradeOutOfScale {
                grade,
                scale_min: grading.scale_min,
                scale_max: grading.scale_max,
            });
        }
        if attempt == 0 {
            return Err(ValidationError::InvalidAttempt { attempt });
        }
        if self.status == ModuleStatus::Passed {
            return Err(ValidationError::AlreadyPassed {
                module: self.code.clone(),
            });
        }

        match self.exam.as_mut() {
            Some(exam) => {
                exam.grade = Some(grade);
                exam.attempt = attempt;
            }
            None => {
                let mut exam = ExamPerformance::new(ExamKind::Other, attempt);
                exam.grade = Some(grade);
                self.exam = Some(exam);
            }
        }
        self.status = if grading.is_passing(grade) {
            ModuleStatus::Passed
        } else {
            ModuleStatus::Failed
        };
        Ok(())
    }

    /// Schedule or reschedule the exam, moving the module to in-progress.
    ///
    /// From `Planned` or `InProgress` the performance is created or updated
    /// in place with the grade slot cleared. From `Failed` a new attempt
    /// begins: the attempt number increments and the previous grade is
    /// discarded.
    ///
    /// # Errors
    /// * `AlreadyPassed` when the module is passed
    pub fn schedule_exam(
        &mut self,
        date: NaiveDate,
        kind: ExamKind,
    ) -> Result<(), ValidationError> {
        match self.status {
            ModuleStatus::Passed => Err(ValidationError::AlreadyPassed {
                module: self.code.clone(),
            }),
            ModuleStatus::Failed => {
                let next_attempt = self.exam.as_ref().map_or(1, |e| e.attempt.saturating_add(1));
                self.exam = Some(ExamPerformance::new(kind, next_attempt).with_date(date));
                self.status = ModuleStatus::InProgress;
                Ok(())
            }
            ModuleStatus::Planned | ModuleStatus::InProgress => {
                match self.exam.as_mut() {
                    Some(exam) => {
                        exam.planned_date = Some(date);
                        exam.kind = kind;
                        exam.grade = None;
                    }
                    None => {
                        self.exam = Some(ExamPerformance::new(kind, 1).with_date(date));
                    }
                }
                self.status = ModuleStatus::InProgress;
                Ok(())
            }
        }
    }

    /// Remove the planned exam date, keeping the attempt and kind.
    ///
    /// # Errors
    /// * `AlreadyPassed` when the module is passed
    pub fn clear_exam_date(&mut self) -> Result<(), ValidationError> {
        if self.status == ModuleStatus::Passed {
            return Err(ValidationError::AlreadyPassed {
                module: self.code.clone(),
            });
        }
        if let Some(exam) = self.exam.as_mut() {
            exam.planned_date = None;
        }
        Ok(())
    }

    /// Delete the recorded grade, returning the module to the open state.
    ///
    /// # Errors
    /// * `AlreadyPassed` when the module is passed; use [`Self::reopen`] instead
    pub fn clear_grade(&mut self) -> Result<(), ValidationError> {
        if self.status == ModuleStatus::Passed {
            return Err(ValidationError::AlreadyPassed {
                module: self.code.clone(),
            });
        }
        if let Some(exam) = self.exam.as_mut() {
            exam.grade = None;
        }
        self.status = if self.exam.is_some() {
            ModuleStatus::InProgress
        } else {
            ModuleStatus::Planned
        };
        Ok(())
    }

    /// Administrative reopening of a passed module for grade correction.
    ///
    /// Clears the grade; the module returns to in-progress while its exam
    /// performance remains, or to planned when none exists.
    ///
    /// # Errors
    /// * `NotPassed` when the module is not passed
    pub fn reopen(&mut self) -> Result<(), ValidationError> {
        if self.status != ModuleStatus::Passed {
            return Err(ValidationError::NotPassed {
                module: self.code.clone(),
            });
        }
        if let Some(exam) = self.exam.as_mut() {
            exam.grade = None;
        }
        self.status = if self.exam.is_some() {
            ModuleStatus::InProgress
        } else {
            ModuleStatus::Planned
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample_module() -> Module {
        Module::new(
            "ISEF01".to_string(),
            "Software Engineering Principles".to_string(),
            5.0,
            5.0,
            1,
        )
    }

    #[test]
    fn test_new_module_is_planned_and_open() {
        let module = sample_module();
        assert_eq!(module.status, ModuleStatus::Planned);
        assert!(module.exam.is_none());
        assert!(module.is_open());
        assert!(!module.is_overdue(date(2025, 6, 1)));
    }

    #[test]
    fn test_record_grade_at_cutoff_passes() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .record_grade(grading.passing_grade, 1, &grading)
            .expect("grade at cutoff should be accepted");
        assert_eq!(module.status, ModuleStatus::Passed);
        assert_eq!(module.grade(), Some(grading.passing_grade));
    }

    #[test]
    fn test_record_grade_below_cutoff_fails_module() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .record_grade(5.0, 1, &grading)
            .expect("worst grade on scale should be accepted");
        assert_eq!(module.status, ModuleStatus::Failed);
        assert!(!module.is_open());
    }

    #[test]
    fn test_record_grade_outside_scale_rejected_state_unchanged() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        let err = module
            .record_grade(6.0, 1, &grading)
            .expect_err("6.0 on a 1.0-5.0 scale must be rejected");
        assert!(matches!(err, ValidationError::GradeOutOfScale { .. }));
        assert_eq!(module.status, ModuleStatus::Planned);
        assert!(module.exam.is_none());
    }

    #[test]
    fn test_record_grade_zero_attempt_rejected() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        let err = module
            .record_grade(2.0, 0, &grading)
            .expect_err("attempt 0 must be rejected");
        assert!(matches!(err, ValidationError::InvalidAttempt { attempt: 0 }));
        assert_eq!(module.status, ModuleStatus::Planned);
    }

    #[test]
    fn test_record_grade_without_exam_creates_dateless_performance() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .record_grade(1.7, 1, &grading)
            .expect("grade should be accepted");
        let exam = module.exam.as_ref().expect("performance should exist");
        assert!(exam.planned_date.is_none());
        assert_eq!(exam.attempt, 1);
        assert_eq!(exam.kind, ExamKind::Other);
    }

    #[test]
    fn test_record_grade_on_passed_module_rejected() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .record_grade(2.0, 1, &grading)
            .expect("first grade should be accepted");
        let err = module
            .record_grade(1.0, 2, &grading)
            .expect_err("passed modules must not be regraded silently");
        assert!(matches!(err, ValidationError::AlreadyPassed { .. }));
        assert_eq!(module.grade(), Some(2.0));
    }

    #[test]
    fn test_schedule_exam_moves_planned_to_in_progress() {
        let mut module = sample_module();
        module
            .schedule_exam(date(2025, 7, 15), ExamKind::Written)
            .expect("scheduling should succeed");
        assert_eq!(module.status, ModuleStatus::InProgress);
        let exam = module.exam.as_ref().expect("performance should exist");
        assert_eq!(exam.planned_date, Some(date(2025, 7, 15)));
        assert_eq!(exam.attempt, 1);
    }

    #[test]
    fn test_reschedule_keeps_attempt() {
        let mut module = sample_module();
        module
            .schedule_exam(date(2025, 7, 15), ExamKind::Written)
            .expect("scheduling should succeed");
        module
            .schedule_exam(date(2025, 8, 1), ExamKind::Oral)
            .expect("rescheduling should succeed");
        let exam = module.exam.as_ref().expect("performance should exist");
        assert_eq!(exam.attempt, 1);
        assert_eq!(exam.planned_date, Some(date(2025, 8, 1)));
        assert_eq!(exam.kind, ExamKind::Oral);
    }

    #[test]
    fn test_schedule_after_fail_starts_new_attempt() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .schedule_exam(date(2025, 7, 15), ExamKind::Written)
            .expect("scheduling should succeed");
        module
            .record_grade(5.0, 1, &grading)
            .expect("failing grade should be accepted");
        module
            .schedule_exam(date(2025, 9, 1), ExamKind::Written)
            .expect("re-entry from failed should be allowed");
        assert_eq!(module.status, ModuleStatus::InProgress);
        let exam = module.exam.as_ref().expect("performance should exist");
        assert_eq!(exam.attempt, 2);
        assert!(exam.grade.is_none());
        assert!(module.is_open());
    }

    #[test]
    fn test_schedule_on_passed_module_rejected() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .record_grade(2.0, 1, &grading)
            .expect("grade should be accepted");
        let err = module
            .schedule_exam(date(2025, 9, 1), ExamKind::Written)
            .expect_err("passed modules cannot be rescheduled");
        assert!(matches!(err, ValidationError::AlreadyPassed { .. }));
    }

    #[test]
    fn test_overdue_requires_past_date_and_no_grade() {
        let reference = date(2025, 6, 1);
        let mut module = sample_module();
        module
            .schedule_exam(date(2025, 5, 31), ExamKind::Written)
            .expect("scheduling should succeed");
        assert!(module.is_overdue(reference));
        assert!(!module.is_overdue(date(2025, 5, 31)));
    }

    #[test]
    fn test_reopen_passed_module() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .schedule_exam(date(2025, 5, 1), ExamKind::Written)
            .expect("scheduling should succeed");
        module
            .record_grade(1.3, 1, &grading)
            .expect("grade should be accepted");
        module.reopen().expect("reopen from passed should succeed");
        assert_eq!(module.status, ModuleStatus::InProgress);
        assert!(module.grade().is_none());
        assert!(module.is_open());
    }

    #[test]
    fn test_reopen_unpassed_module_rejected() {
        let mut module = sample_module();
        let err = module.reopen().expect_err("planned modules cannot be reopened");
        assert!(matches!(err, ValidationError::NotPassed { .. }));
    }

    #[test]
    fn test_clear_grade_after_fail_returns_to_in_progress() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .record_grade(4.7, 1, &grading)
            .expect("failing grade should be accepted");
        module.clear_grade().expect("clearing a failed grade is allowed");
        assert_eq!(module.status, ModuleStatus::InProgress);
        assert!(module.is_open());
    }

    #[test]
    fn test_clear_grade_on_passed_module_rejected() {
        let grading = GradingConfig::default();
        let mut module = sample_module();
        module
            .record_grade(2.0, 1, &grading)
            .expect("grade should be accepted");
        let err = module
            .clear_grade()
            .expect_err("passed results are only changed via reopen");
        assert!(matches!(err, ValidationError::AlreadyPassed { .. }));
    }
}
