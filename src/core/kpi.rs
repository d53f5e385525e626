//! Progress and KPI computations
//!
//! Pure, deterministic functions of (program, reference date, grading
//! convention). No I/O and no clock access; the reference date is always
//! passed in, so results are reproducible.

use crate::core::config::GradingConfig;
use crate::core::models::{ExamKind, ModuleStatus, Program};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A module awaiting its exam result
#[derive(Debug, Clone, PartialEq)]
pub struct OpenExam {
    /// Module code
    pub module_code: String,
    /// Module title
    pub title: String,
    /// Current attempt number; 0 when nothing was scheduled or graded yet
    pub attempt: u8,
    /// Kind of assessment, when an exam performance exists
    pub kind: Option<ExamKind>,
    /// Planned exam date, when scheduled
    pub planned_date: Option<NaiveDate>,
    /// Whether the planned date lies strictly before the reference date
    pub overdue: bool,
}

/// Why a module is flagged critical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalReason {
    /// The recorded attempt failed
    Failed,
    /// More attempts than the configured maximum
    AttemptLimitExceeded {
        /// Attempts taken so far
        attempts: u8,
        /// Configured maximum
        limit: u8,
    },
}

impl fmt::Display for CriticalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed => write!(f, "failed"),
            Self::AttemptLimitExceeded { attempts, limit } => {
                write!(f, "attempt {attempts} exceeds the limit of {limit}")
            }
        }
    }
}

/// A module flagged for risk
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalModule {
    /// Module code
    pub module_code: String,
    /// Module title
    pub title: String,
    /// Why the module is flagged
    pub reason: CriticalReason,
}

/// Planned versus earned credits for one semester
#[derive(Debug, Clone, PartialEq)]
pub struct SemesterProgress {
    /// Semester number
    pub number: u32,
    /// Credit target planned for the semester
    pub planned_credits: f32,
    /// Credits earned from passed modules in the semester
    pub earned_credits: f32,
}

/// Sum of credit values over passed modules
#[must_use]
pub fn credits_earned(program: &Program) -> f32 {
    program
        .modules()
        .filter(|m| m.status == ModuleStatus::Passed)
        .map(|m| m.credits)
        .sum()
}

/// Sum of credit values over all modules in the program
#[must_use]
pub fn credits_target(program: &Program) -> f32 {
    program.modules().map(|m| m.credits).sum()
}

/// Weighted grade average over passed modules.
///
/// Computed as the sum of grade times weighting factor divided by the sum of
/// weighting factors over the same modules. Returns `None` when no passed
/// module carries a grade, or when the weights sum to zero; the average is
/// reported as unavailable instead of dividing by zero.
#[must_use]
pub fn weighted_average(program: &Program) -> Option<f64> {
    let mut weighted_sum = 0.0_f64;
    let mut weight_sum = 0.0_f64;
    for module in program
        .modules()
        .filter(|m| m.status == ModuleStatus::Passed)
    {
        if let Some(grade) = module.grade() {
            weighted_sum += grade * module.weight;
            weight_sum += module.weight;
        }
    }
    if weight_sum > 0.0 {
        Some(weighted_sum / weight_sum)
    } else {
        None
    }
}

/// Overall progress against the program's total credit requirement, in percent.
///
/// 0 when the requirement is 0; may exceed 100 when more than the planned
/// total has been earned.
#[must_use]
pub fn progress_percent(program: &Program) -> f32 {
    if program.total_credits <= 0.0 {
        return 0.0;
    }
    credits_earned(program) / program.total_credits * 100.0
}

/// Modules still awaiting a result, as display-ready entries.
///
/// Ordering: overdue entries first by earliest date, then upcoming entries
/// by date, then entries without a date.
#[must_use]
pub fn open_exams(program: &Program, reference: NaiveDate) -> Vec<OpenExam> {
    let mut entries: Vec<OpenExam> = program
        .modules()
        .filter(|m| m.is_open())
        .map(|m| OpenExam {
            module_code: m.code.clone(),
            title: m.title.clone(),
            attempt: m.attempt(),
            kind: m.exam.as_ref().map(|e| e.kind),
            planned_date: m.exam.as_ref().and_then(|e| e.planned_date),
            overdue: m.is_overdue(reference),
        })
        .collect();

    entries.sort_by_key(|entry| match (entry.overdue, entry.planned_date) {
        (true, Some(date)) => (0_u8, date),
        (false, Some(date)) => (1, date),
        (_, None) => (2, NaiveDate::MAX),
    });
    entries
}

/// The subset of open exams whose planned date lies strictly before the
/// reference date. Modules without an exam performance, or without a planned
/// date, are open but never overdue.
#[must_use]
pub fn overdue_exams(program: &Program, reference: NaiveDate) -> Vec<OpenExam> {
    open_exams(program, reference)
        .into_iter()
        .filter(|entry| entry.overdue)
        .collect()
}

/// Modules flagged for risk: failed, or attempted more often than the
/// configured maximum. The threshold comes from the grading config and is
/// never hard-coded here.
#[must_use]
pub fn critical_modules(program: &Program, grading: &GradingConfig) -> Vec<CriticalModule> {
    program
        .modules()
        .filter_map(|module| {
            let reason = if module.status == ModuleStatus::Failed {
                CriticalReason::Failed
            } else if module.attempt() > grading.max_attempts {
                CriticalReason::AttemptLimitExceeded {
                    attempts: module.attempt(),
                    limit: grading.max_attempts,
                }
            } else {
                return None;
            };
            Some(CriticalModule {
                module_code: module.code.clone(),
                title: module.title.clone(),
                reason,
            })
        })
        .collect()
}

/// The highest semester number with earned credits, 1 when nothing has been
/// passed yet.
#[must_use]
pub fn current_semester(program: &Program) -> u32 {
    program
        .semesters
        .iter()
        .filter(|s| s.has_passed_modules())
        .map(|s| s.number)
        .max()
        .unwrap_or(1)
}

/// Expected cumulative credits by a date, rounded to whole credits.
///
/// Semesters with a start/end window contribute linearly across the window:
/// fully once the date passed the end, proportionally while inside, nothing
/// before the start. When no semester carries a window, falls back to a
/// months-elapsed estimate over the standard period of study.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn planned_credits_by(program: &Program, date: NaiveDate) -> f32 {
    let mut planned = 0.0_f32;

    // Precise pass over semesters that have a date window.
    for semester in &program.semesters {
        let (Some(start), Some(end)) = (semester.start, semester.end) else {
            continue;
        };
        if date >= end {
            planned += semester.planned_credits;
        } else if date > start {
            let total_days = (end - start).num_days().max(1);
            let elapsed_days = (date - start).num_days();
            let fraction = (elapsed_days as f64 / total_days as f64).clamp(0.0, 1.0);
            planned += semester.planned_credits * fraction as f32;
        }
    }

    // Estimate over the standard period when no window contributed.
    if planned == 0.0 && !program.semesters.is_empty() {
        let months_per_semester =
            f64::from(program.standard_period_months) / program.semesters.len() as f64;
        let months_elapsed = ((date.year() - program.start_date.year()) * 12
            + (date.month() as i32 - program.start_date.month() as i32))
            .max(0);
        if months_per_semester > 0.0 {
            let completed = (f64::from(months_elapsed) / months_per_semester) as usize;
            let completed = completed.min(program.semesters.len());
            planned = program.semesters[..completed]
                .iter()
                .map(|s| s.planned_credits)
                .sum();
        }
    }

    planned.round()
}

/// Earned credits minus the expected credits by the date; negative values
/// mean the student is behind plan.
#[must_use]
pub fn schedule_deviation(program: &Program, date: NaiveDate) -> f32 {
    credits_earned(program) - planned_credits_by(program, date)
}

/// Count of passed modules whose grade is worse than the target grade
/// (numerically greater, on the lower-is-better scale).
#[must_use]
pub fn modules_above_target(program: &Program, target_grade: f64) -> usize {
    program
        .modules()
        .filter(|m| m.status == ModuleStatus::Passed)
        .filter_map(|m| m.grade())
        .filter(|grade| *grade > target_grade)
        .count()
}

/// Planned versus earned credits for every semester, in order
#[must_use]
pub fn semester_progress(program: &Program) -> Vec<SemesterProgress> {
    program
        .semesters
        .iter()
        .map(|s| SemesterProgress {
            number: s.number,
            planned_credits: s.planned_credits,
            earned_credits: s.earned_credits(),
        })
        .collect()
}
