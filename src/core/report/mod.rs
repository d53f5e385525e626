//! Report assembly and rendering
//!
//! A [`ProgressReport`] is an immutable snapshot of every figure the dashboard
//! and the exported summaries show. It is assembled from the program graph, a
//! reference date and the grading convention, and owns all of its data, so
//! renderers never reach back into the domain model.

pub mod markdown;
pub mod text;

use crate::core::config::GradingConfig;
use crate::core::kpi::{self, CriticalModule, OpenExam, SemesterProgress};
use crate::core::models::{Degree, Program, StudyModel};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use markdown::MarkdownReporter;
pub use text::TextReporter;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain-text dashboard layout
    Text,
    /// Markdown summary
    Markdown,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(Self::Text),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

/// Snapshot of all derived progress figures at one reference date
///
/// Computing a report has no side effects; two snapshots computed from
/// identical inputs compare equal field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    /// Date the time-dependent figures refer to
    pub reference_date: NaiveDate,
    /// Program name
    pub program_name: String,
    /// Degree awarded on completion
    pub degree: Degree,
    /// Enrollment model
    pub study_model: StudyModel,
    /// Standard period of study in months
    pub standard_period_months: u32,
    /// Enrollment date
    pub start_date: NaiveDate,
    /// Highest semester with passed modules, 1 when nothing is passed yet
    pub current_semester: u32,
    /// Number of semesters in the plan
    pub semester_count: usize,
    /// Number of modules in the plan
    pub module_count: usize,
    /// Credits earned from passed modules
    pub credits_earned: f32,
    /// Credit total the program requires
    pub total_credits: f32,
    /// Completion in percent of the required total (may exceed 100)
    pub progress_percent: f32,
    /// Credits a student on plan would have earned by the reference date
    pub planned_credits: f32,
    /// Earned minus planned credits; negative values mean behind plan
    pub schedule_deviation: f32,
    /// Weighted grade average over passed modules, when available
    pub weighted_average: Option<f64>,
    /// Target grade from the grading convention
    pub target_grade: f64,
    /// Passed modules graded worse than the target grade
    pub modules_above_target: usize,
    /// Modules awaiting a result, overdue entries first
    pub open_exams: Vec<OpenExam>,
    /// Modules flagged for risk
    pub critical_modules: Vec<CriticalModule>,
    /// Planned versus earned credits per semester, in order
    pub semesters: Vec<SemesterProgress>,
}

impl ProgressReport {
    /// Assemble the snapshot for a program at a reference date
    #[must_use]
    pub fn compute(program: &Program, reference_date: NaiveDate, grading: &GradingConfig) -> Self {
        Self {
            reference_date,
            program_name: program.name.clone(),
            degree: program.degree,
            study_model: program.study_model,
            standard_period_months: program.standard_period_months,
            start_date: program.start_date,
            current_semester: kpi::current_semester(program),
            semester_count: program.semesters.len(),
            module_count: program.module_count(),
            credits_earned: kpi::credits_earned(program),
            total_credits: program.total_credits,
            progress_percent: kpi::progress_percent(program),
            planned_credits: kpi::planned_credits_by(program, reference_date),
            schedule_deviation: kpi::schedule_deviation(program, reference_date),
            weighted_average: kpi::weighted_average(program),
            target_grade: grading.target_grade,
            modules_above_target: kpi::modules_above_target(program, grading.target_grade),
            open_exams: kpi::open_exams(program, reference_date),
            critical_modules: kpi::critical_modules(program, grading),
            semesters: kpi::semester_progress(program),
        }
    }

    /// Number of modules awaiting a result
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open_exams.len()
    }

    /// Number of open exams whose planned date has passed
    #[must_use]
    pub fn overdue_count(&self) -> usize {
        self.open_exams.iter().filter(|e| e.overdue).count()
    }
}

/// Trait for report renderers
pub trait ReportRenderer {
    /// Write a rendered report to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, report: &ProgressReport, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Render the report as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, report: &ProgressReport) -> Result<String, Box<dyn Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ExamKind, Module, Semester};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample_program() -> Program {
        let grading = GradingConfig::default();
        let mut program = Program::new(
            "Software Engineering".to_string(),
            Degree::BSc,
            StudyModel::PartTimeI,
            15.0,
            18,
            date(2025, 1, 1),
        );
        let mut first = Semester::new(1, 10.0).with_window(date(2025, 1, 1), date(2025, 6, 30));
        let mut passed = Module::new("SE101".to_string(), "Basics".to_string(), 5.0, 1.0, 1);
        passed
            .record_grade(1.7, 1, &grading)
            .expect("grade accepted");
        first.add_module(passed);
        let mut scheduled = Module::new("SE102".to_string(), "Databases".to_string(), 5.0, 1.0, 1);
        scheduled
            .schedule_exam(date(2025, 5, 1), ExamKind::Written)
            .expect("scheduling accepted");
        first.add_module(scheduled);
        program.add_semester(first);

        let mut second = Semester::new(2, 5.0).with_window(date(2025, 7, 1), date(2025, 12, 31));
        second.add_module(Module::new(
            "SE201".to_string(),
            "Algorithms".to_string(),
            5.0,
            1.0,
            2,
        ));
        program.add_semester(second);
        program
    }

    #[test]
    fn test_compute_assembles_all_figures() {
        let program = sample_program();
        let grading = GradingConfig::default();
        let report = ProgressReport::compute(&program, date(2025, 6, 1), &grading);

        assert_eq!(report.program_name, "Software Engineering");
        assert_eq!(report.current_semester, 1);
        assert_eq!(report.semester_count, 2);
        assert_eq!(report.module_count, 3);
        assert!((report.credits_earned - 5.0).abs() < f32::EPSILON);
        assert!((report.total_credits - 15.0).abs() < f32::EPSILON);
        let average = report.weighted_average.expect("one graded module");
        assert!((average - 1.7).abs() < f64::EPSILON);
        assert_eq!(report.open_count(), 2);
        assert_eq!(report.overdue_count(), 1);
        assert_eq!(report.open_exams[0].module_code, "SE102");
        assert_eq!(report.semesters.len(), 2);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let program = sample_program();
        let grading = GradingConfig::default();
        let first = ProgressReport::compute(&program, date(2025, 6, 1), &grading);
        let second = ProgressReport::compute(&program, date(2025, 6, 1), &grading);
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_does_not_mutate_program() {
        let program = sample_program();
        let before = program.clone();
        let _ = ProgressReport::compute(&program, date(2025, 6, 1), &GradingConfig::default());
        assert_eq!(program, before);
    }
}
