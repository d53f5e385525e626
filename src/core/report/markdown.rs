//! Markdown report generator
//!
//! Writes the progress summary as Markdown. These files render well in
//! GitHub, GitLab, and VS Code.

use crate::core::report::{ProgressReport, ReportRenderer};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("templates/summary.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, report: &ProgressReport) -> String {
        let mut output = MARKDOWN_TEMPLATE.to_string();

        // Substitute header metadata
        output = output.replace("{{program_name}}", &report.program_name);
        output = output.replace("{{degree}}", &report.degree.to_string());
        output = output.replace("{{study_model}}", &report.study_model.to_string());
        output = output.replace(
            "{{standard_period_months}}",
            &report.standard_period_months.to_string(),
        );
        output = output.replace("{{start_date}}", &report.start_date.to_string());
        output = output.replace("{{reference_date}}", &report.reference_date.to_string());
        output = output.replace(
            "{{current_semester}}",
            &report.current_semester.to_string(),
        );
        output = output.replace("{{semester_count}}", &report.semester_count.to_string());

        // Substitute progress figures
        output = output.replace(
            "{{credits_earned}}",
            &format!("{:.1}", report.credits_earned),
        );
        output = output.replace("{{total_credits}}", &format!("{:.1}", report.total_credits));
        output = output.replace(
            "{{progress_percent}}",
            &format!("{:.0}", report.progress_percent),
        );
        output = output.replace(
            "{{planned_credits}}",
            &format!("{:.1}", report.planned_credits),
        );
        output = output.replace(
            "{{schedule_deviation}}",
            &format!("{:+.1}", report.schedule_deviation),
        );
        let average = report
            .weighted_average
            .map_or_else(|| "n/a".to_string(), |grade| format!("{grade:.2}"));
        output = output.replace("{{weighted_average}}", &average);
        output = output.replace("{{target_grade}}", &format!("{:.1}", report.target_grade));
        output = output.replace(
            "{{modules_above_target}}",
            &report.modules_above_target.to_string(),
        );
        output = output.replace("{{open_count}}", &report.open_count().to_string());
        output = output.replace("{{overdue_count}}", &report.overdue_count().to_string());

        // Generate the tables
        output = output.replace("{{semester_table}}", &Self::semester_table(report));
        output = output.replace("{{open_exam_table}}", &Self::open_exam_table(report));
        output = output.replace("{{critical_list}}", &Self::critical_list(report));

        output
    }

    /// Generate the per-semester progress table
    fn semester_table(report: &ProgressReport) -> String {
        let mut table = String::new();
        table.push_str("| Semester | Planned | Earned |\n");
        table.push_str("|---|---|---|\n");

        for row in &report.semesters {
            let _ = writeln!(
                table,
                "| {} | {:.1} | {:.1} |",
                row.number, row.planned_credits, row.earned_credits
            );
        }
        table
    }

    /// Generate the open-exam table, overdue entries first
    fn open_exam_table(report: &ProgressReport) -> String {
        if report.open_exams.is_empty() {
            return "No open exams.\n".to_string();
        }

        let mut table = String::new();
        table.push_str("| Module | Title | Kind | Attempt | Date | Overdue |\n");
        table.push_str("|---|---|---|---|---|---|\n");

        for exam in &report.open_exams {
            let kind = exam
                .kind
                .map_or_else(|| "-".to_string(), |k| k.to_string());
            let attempt = if exam.attempt == 0 {
                "-".to_string()
            } else {
                exam.attempt.to_string()
            };
            let date = exam
                .planned_date
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            let overdue = if exam.overdue { "yes" } else { "no" };

            let _ = writeln!(
                table,
                "| {} | {} | {kind} | {attempt} | {date} | {overdue} |",
                exam.module_code, exam.title
            );
        }
        table
    }

    /// Generate the list of flagged modules
    fn critical_list(report: &ProgressReport) -> String {
        if report.critical_modules.is_empty() {
            return "None.\n".to_string();
        }

        let mut list = String::new();
        for module in &report.critical_modules {
            let _ = writeln!(
                list,
                "- **{}** ({}): {}",
                module.title, module.module_code, module.reason
            );
        }
        list
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for MarkdownReporter {
    fn generate(&self, report: &ProgressReport, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(report)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, report: &ProgressReport) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(report))
    }
}
