//! Data models for `studytrack`

pub mod exam;
pub mod module;
pub mod program;
pub mod semester;
pub mod validation;

pub use exam::{ExamKind, ExamPerformance, ExamStatus};
pub use module::{Module, ModuleStatus};
pub use program::{Degree, Program, StudyModel};
pub use semester::Semester;
pub use validation::{parse_date_input, parse_grade_input, ValidationError};
