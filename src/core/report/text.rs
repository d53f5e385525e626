//! Console dashboard renderer
//!
//! Draws the bordered KPI overview the interactive session prints. Rows are
//! padded and truncated to one fixed layout width so the frame stays intact
//! regardless of content.

use crate::core::kpi::{OpenExam, SemesterProgress};
use crate::core::report::{ProgressReport, ReportRenderer};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Narrowest layout that still fits the semester table
const MIN_WIDTH: usize = 80;

/// Cells in the progress bar
const BAR_LENGTH: usize = 20;

/// Rows shown in the risk section before the list is cut off
const MAX_RISK_ROWS: usize = 8;

/// Renders the console dashboard
pub struct TextReporter {
    width: usize,
}

impl TextReporter {
    /// Create a reporter with the default layout width
    #[must_use]
    pub const fn new() -> Self {
        Self { width: 100 }
    }

    /// Create a reporter with a custom width, clamped to the minimum
    #[must_use]
    pub const fn with_width(width: usize) -> Self {
        let width = if width < MIN_WIDTH { MIN_WIDTH } else { width };
        Self { width }
    }

    fn build(&self, report: &ProgressReport) -> String {
        let heavy = self.rule('═');
        let light = self.rule('─');
        let mut out = String::new();

        let _ = writeln!(out, "{heavy}");
        let title = format!(
            "Study Dashboard: {} ({}, {}, {} months)",
            report.program_name, report.degree, report.study_model, report.standard_period_months
        );
        let _ = writeln!(out, "{}", self.framed(&title));
        let header = format!(
            "Start: {}   Semester: {} / {}   Required credits: {}",
            report.start_date.format("%d.%m.%Y"),
            report.current_semester,
            report.semester_count,
            fmt_credits(report.total_credits)
        );
        let _ = writeln!(out, "{}", self.framed(&header));
        let _ = writeln!(out, "{heavy}");

        let _ = writeln!(
            out,
            "{}",
            self.framed_2col("STUDY PROGRESS", "GRADES & RESULTS")
        );
        let progress = format!(
            "{} {}/{} credits ({:.0}%)",
            progress_bar(report.progress_percent),
            fmt_credits(report.credits_earned),
            fmt_credits(report.total_credits),
            report.progress_percent
        );
        let average = format!(
            "Average grade: {} (target {:.1})",
            fmt_grade(report.weighted_average),
            report.target_grade
        );
        let _ = writeln!(out, "{}", self.framed_2col(&progress, &average));

        let deviation_symbol = if report.schedule_deviation >= 0.0 {
            '✓'
        } else {
            'X'
        };
        let plan = format!(
            "Planned by now: {} credits   Deviation: {} {deviation_symbol}",
            fmt_credits(report.planned_credits),
            fmt_signed_credits(report.schedule_deviation)
        );
        let above_target = format!(
            "Modules worse than {:.1}: {}",
            report.target_grade, report.modules_above_target
        );
        let _ = writeln!(out, "{}", self.framed_2col(&plan, &above_target));
        let _ = writeln!(out, "{light}");

        out.push_str(&self.semester_table(report));
        let _ = writeln!(out, "{light}");

        let _ = writeln!(out, "{}", self.framed("CRITICAL MODULES & OPEN EXAMS"));
        let risk = risk_lines(report);
        if risk.is_empty() {
            let _ = writeln!(out, "{}", self.framed(" No critical entries"));
        } else {
            for line in risk {
                let _ = writeln!(out, "{}", self.framed(&line));
            }
        }

        let overdue = report.overdue_count();
        let exam_symbol = if overdue > 0 { 'X' } else { '✓' };
        let totals = format!(
            "Open exams: {}    Overdue exams: {overdue} {exam_symbol}",
            report.open_count()
        );
        let _ = writeln!(out, "{}", self.framed(&totals));
        let _ = writeln!(out, "{heavy}");

        out
    }

    fn semester_table(&self, report: &ProgressReport) -> String {
        let mut out = String::new();
        let header = format!(
            "{:<9} │ {:<10} │ {:<9} │ {:<25}",
            "Semester", "Planned", "Earned", "Status"
        );
        let _ = writeln!(out, "{}", self.framed(&header));
        let rule = format!(
            "{} │ {} │ {} │ {}",
            "─".repeat(9),
            "─".repeat(10),
            "─".repeat(9),
            "─".repeat(25)
        );
        let _ = writeln!(out, "{}", self.framed(&rule));

        for row in &report.semesters {
            let line = format!(
                "{:<9} │ {:>10} │ {:>9} │ {:<25}",
                row.number,
                fmt_credits(row.planned_credits),
                fmt_credits(row.earned_credits),
                semester_status(row)
            );
            let _ = writeln!(out, "{}", self.framed(&line));
        }
        out
    }

    fn rule(&self, fill: char) -> String {
        let mut line = String::with_capacity(self.width);
        line.push('+');
        for _ in 0..self.width - 2 {
            line.push(fill);
        }
        line.push('+');
        line
    }

    fn framed(&self, text: &str) -> String {
        format!("│{}│", pad_cell(text, self.width - 2))
    }

    fn framed_2col(&self, left: &str, right: &str) -> String {
        let inner = self.width - 2;
        let separator = " │ ";
        let separator_width = separator.chars().count();
        let left_width = (inner - separator_width) / 2;
        let right_width = inner - separator_width - left_width;
        format!(
            "│{}{separator}{}│",
            pad_cell(left, left_width),
            pad_cell(right, right_width)
        )
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TextReporter {
    fn generate(&self, report: &ProgressReport, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(report)?;
        fs::write(output_path, content)?;
        Ok(())
    }

    fn render(&self, report: &ProgressReport) -> Result<String, Box<dyn Error>> {
        Ok(self.build(report))
    }
}

/// Truncate or pad to an exact cell width, counted in characters
fn pad_cell(text: &str, width: usize) -> String {
    let mut cell: String = text.chars().take(width).collect();
    let used = cell.chars().count();
    for _ in used..width {
        cell.push(' ');
    }
    cell
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn progress_bar(percent: f32) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = (((clamped / 100.0) * BAR_LENGTH as f32).round() as usize).min(BAR_LENGTH);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_LENGTH - filled))
}

/// One decimal place, with a trailing `.0` removed
fn fmt_credits(value: f32) -> String {
    let text = format!("{value:.1}");
    match text.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => text,
    }
}

fn fmt_signed_credits(value: f32) -> String {
    if value < 0.0 {
        format!("-{}", fmt_credits(-value))
    } else {
        format!("+{}", fmt_credits(value))
    }
}

fn fmt_grade(grade: Option<f64>) -> String {
    grade.map_or_else(|| "-".to_string(), |g| format!("{g:.1}"))
}

fn semester_status(row: &SemesterProgress) -> String {
    if row.earned_credits > row.planned_credits {
        "ahead of plan".to_string()
    } else if row.earned_credits >= row.planned_credits {
        "on plan".to_string()
    } else {
        let missing = row.planned_credits - row.earned_credits;
        format!("behind plan (-{} credits)", fmt_credits(missing))
    }
}

/// Rows for the risk section: flagged modules first, open exams after,
/// capped so the dashboard stays one screen tall. Open entries for modules
/// already flagged are skipped.
fn risk_lines(report: &ProgressReport) -> Vec<String> {
    let mut lines = Vec::new();

    for module in &report.critical_modules {
        lines.push(format!(
            " X {} ({})  {}",
            shorten(&module.title, 45),
            module.module_code,
            module.reason
        ));
    }

    let flagged: Vec<&str> = report
        .critical_modules
        .iter()
        .map(|m| m.module_code.as_str())
        .collect();
    for exam in &report.open_exams {
        if flagged.contains(&exam.module_code.as_str()) {
            continue;
        }
        let (marker, note) = exam_note(exam, report.reference_date);
        lines.push(format!(
            " {marker} {} ({})  {note}",
            shorten(&exam.title, 45),
            exam.module_code
        ));
    }

    lines.truncate(MAX_RISK_ROWS);
    lines
}

fn exam_note(exam: &OpenExam, reference: NaiveDate) -> (char, String) {
    match exam.planned_date {
        Some(date) if exam.overdue => (
            'X',
            format!("exam overdue (planned: {})", date.format("%d.%m.%Y")),
        ),
        Some(date) => {
            let days = (date - reference).num_days();
            let text = match days {
                0 => format!("exam TODAY: {}", date.format("%d.%m.%Y")),
                1 => format!("exam TOMORROW: {}", date.format("%d.%m.%Y")),
                _ => format!("exam in {days} days: {}", date.format("%d.%m.%Y")),
            };
            ('+', text)
        }
        None => ('·', "exam not scheduled".to_string()),
    }
}

fn shorten(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
