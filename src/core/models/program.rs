//! Study program model

use crate::core::config::GradingConfig;
use crate::core::models::module::Module;
use crate::core::models::semester::Semester;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Degree awarded by the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
    /// Bachelor of Science
    BSc,
    /// Master of Science
    MSc,
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BSc => write!(f, "B.Sc."),
            Self::MSc => write!(f, "M.Sc."),
        }
    }
}

/// Enrollment model the program is studied under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyModel {
    /// Full-time enrollment
    FullTime,
    /// Part-time enrollment, variant I
    PartTimeI,
    /// Part-time enrollment, variant II
    PartTimeII,
}

impl fmt::Display for StudyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullTime => write!(f, "full-time"),
            Self::PartTimeI => write!(f, "part-time I"),
            Self::PartTimeII => write!(f, "part-time II"),
        }
    }
}

/// Root of the study-program graph: identity plus the ordered semesters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Program name (e.g., "Computer Science")
    pub name: String,

    /// Degree awarded
    pub degree: Degree,

    /// Enrollment model
    pub study_model: StudyModel,

    /// Total credits required for the degree (e.g., 180.0)
    pub total_credits: f32,

    /// Standard period of study in months
    pub standard_period_months: u32,

    /// First day of enrollment
    pub start_date: NaiveDate,

    /// Ordered semesters; numbers are unique and contiguous from 1
    pub semesters: Vec<Semester>,
}

impl Program {
    /// Create a new program without semesters
    ///
    /// # Arguments
    /// * `name` - Program name
    /// * `degree` - Degree awarded
    /// * `study_model` - Enrollment model
    /// * `total_credits` - Total credits required
    /// * `standard_period_months` - Standard period of study in months
    /// * `start_date` - First day of enrollment
    #[must_use]
    pub const fn new(
        name: String,
        degree: Degree,
        study_model: StudyModel,
        total_credits: f32,
        standard_period_months: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            name,
            degree,
            study_model,
            total_credits,
            standard_period_months,
            start_date,
            semesters: Vec::new(),
        }
    }

    /// Append a semester
    pub fn add_semester(&mut self, semester: Semester) {
        self.semesters.push(semester);
    }

    /// Iterate over all modules across semesters, in semester order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.semesters.iter().flat_map(|s| s.modules.iter())
    }

    /// Iterate mutably over all modules across semesters
    pub fn modules_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.semesters.iter_mut().flat_map(|s| s.modules.iter_mut())
    }

    /// Total number of modules in the program
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.semesters.iter().map(|s| s.modules.len()).sum()
    }

    /// Check the structural invariants of the graph.
    ///
    /// Semester numbers must run 1..n in order; credit values must be
    /// non-negative; date windows must not be inverted; attempts start at 1;
    /// stored grades must lie within the configured scale.
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn validate(&self, grading: &GradingConfig) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("program name must not be empty".to_string());
        }
        if self.total_credits <= 0.0 {
            return Err("total credits must be positive".to_string());
        }
        if self.standard_period_months == 0 {
            return Err("standard period of study must be positive".to_string());
        }
        if self.semesters.is_empty() {
            return Err("program must contain at least one semester".to_string());
        }

        for (index, semester) in self.semesters.iter().enumerate() {
            let expected = u32::try_from(index)
                .map_err(|_| "semester count exceeds the supported range".to_string())?
                + 1;
            if semester.number != expected {
                return Err(format!(
                    "semester numbers must be contiguous from 1; found {} at position {}",
                    semester.number, expected
                ));
            }
            if semester.planned_credits <= 0.0 {
                return Err(format!(
                    "semester {} has a non-positive credit target",
                    semester.number
                ));
            }
            if let (Some(start), Some(end)) = (semester.start, semester.end) {
                if end < start {
                    return Err(format!(
                        "semester {} ends before it starts ({end} < {start})",
                        semester.number
                    ));
                }
            }

            for module in &semester.modules {
                if module.code.trim().is_empty() {
                    return Err(format!(
                        "semester {} contains a module without a code",
                        semester.number
                    ));
                }
                if module.credits < 0.0 {
                    return Err(format!("module {} has negative credits", module.code));
                }
                if module.weight < 0.0 {
                    return Err(format!("module {} has a negative weight", module.code));
                }
                if module.planned_semester == 0 {
                    return Err(format!(
                        "module {} has planned semester 0; numbering starts at 1",
                        module.code
                    ));
                }
                if let Some(exam) = &module.exam {
                    if exam.attempt == 0 {
                        return Err(format!(
                            "module {} has exam attempt 0; attempts start at 1",
                            module.code
                        ));
                    }
                    if let Some(grade) = exam.grade {
                        if !grading.contains(grade) {
                            return Err(format!(
                                "module {} stores grade {} outside the grading scale {}..{}",
                                module.code, grade, grading.scale_min, grading.scale_max
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
