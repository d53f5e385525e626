//! Semester model

use crate::core::models::module::{Module, ModuleStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A planning period owning a set of modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    /// Sequence number, starting at 1
    pub number: u32,

    /// Credit target planned for this semester
    pub planned_credits: f32,

    /// First day of the semester, if scheduled
    pub start: Option<NaiveDate>,

    /// Last day of the semester, if scheduled
    pub end: Option<NaiveDate>,

    /// Modules assigned to this semester
    pub modules: Vec<Module>,
}

impl Semester {
    /// Create a new semester without a date window
    ///
    /// # Arguments
    /// * `number` - Sequence number (starting at 1)
    /// * `planned_credits` - Credit target for the semester
    #[must_use]
    pub const fn new(number: u32, planned_credits: f32) -> Self {
        Self {
            number,
            planned_credits,
            start: None,
            end: None,
            modules: Vec::new(),
        }
    }

    /// Attach a start/end window
    #[must_use]
    pub const fn with_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Add a module to this semester
    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Credits earned in this semester (passed modules only)
    #[must_use]
    pub fn earned_credits(&self) -> f32 {
        self.modules
            .iter()
            .filter(|m| m.status == ModuleStatus::Passed)
            .map(|m| m.credits)
            .sum()
    }

    /// Whether any module in this semester has been passed
    #[must_use]
    pub fn has_passed_modules(&self) -> bool {
        self.modules.iter().any(|m| m.status == ModuleStatus::Passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GradingConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn module(code: &str, credits: f32) -> Module {
        Module::new(code.to_string(), format!("Module {code}"), credits, 1.0, 1)
    }

    #[test]
    fn test_new_semester_is_empty() {
        let semester = Semester::new(1, 30.0);
        assert_eq!(semester.number, 1);
        assert!(semester.modules.is_empty());
        assert!(semester.start.is_none());
        assert!((semester.earned_credits() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_with_window() {
        let semester = Semester::new(1, 30.0).with_window(date(2025, 4, 1), date(2025, 9, 30));
        assert_eq!(semester.start, Some(date(2025, 4, 1)));
        assert_eq!(semester.end, Some(date(2025, 9, 30)));
    }

    #[test]
    fn test_earned_credits_counts_passed_only() {
        let grading = GradingConfig::default();
        let mut semester = Semester::new(1, 30.0);

        let mut passed = module("A", 5.0);
        passed.record_grade(2.0, 1, &grading).expect("grade accepted");
        let mut failed = module("B", 5.0);
        failed.record_grade(5.0, 1, &grading).expect("grade accepted");
        let open = module("C", 10.0);

        semester.add_module(passed);
        semester.add_module(failed);
        semester.add_module(open);

        assert!((semester.earned_credits() - 5.0).abs() < f32::EPSILON);
        assert!(semester.has_passed_modules());
    }
}
