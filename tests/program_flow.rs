//! Integration tests over the bundled sample program
//!
//! Loads `samples/program.json`, checks the derived figures and the rendered
//! reports against hand-computed values, and runs a full retake cycle through
//! the store to confirm nothing is lost between save and reload.

use chrono::NaiveDate;
use std::fs;
use studytrack::config::GradingConfig;
use studytrack::core::kpi::{self, CriticalReason};
use studytrack::core::models::{Degree, ExamKind, ModuleStatus, Program, StudyModel};
use studytrack::core::report::{MarkdownReporter, ProgressReport, ReportRenderer, TextReporter};
use studytrack::core::storage::{JsonProgramStore, ProgramStore, StorageError};
use tempfile::TempDir;

const SAMPLE_FILE: &str = "samples/program.json";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn load_sample() -> Program {
    JsonProgramStore::new(SAMPLE_FILE, GradingConfig::default())
        .load()
        .expect("sample program should load")
}

/// Reference date between the semester 2 exams: BIWI02 is already overdue,
/// BIPM02 is still upcoming.
fn reference() -> NaiveDate {
    date(2025, 8, 1)
}

#[test]
fn test_load_sample_program() {
    let program = load_sample();

    assert_eq!(program.name, "Business Informatics");
    assert_eq!(program.degree, Degree::BSc);
    assert_eq!(program.study_model, StudyModel::PartTimeI);
    assert!((program.total_credits - 180.0).abs() < f32::EPSILON);
    assert_eq!(program.standard_period_months, 48);
    assert_eq!(program.start_date, date(2024, 10, 1));
    assert_eq!(program.semesters.len(), 4);
    assert_eq!(program.module_count(), 13);

    let databases = program
        .modules()
        .find(|m| m.code == "BIDB02")
        .expect("BIDB02 should exist");
    assert_eq!(databases.title, "Databases");
    assert_eq!(databases.status, ModuleStatus::Passed);
    assert_eq!(databases.grade(), Some(2.0));
    assert_eq!(databases.attempt(), 1);
    let exam = databases.exam.as_ref().expect("BIDB02 carries an exam");
    assert_eq!(exam.kind, ExamKind::Written);
    assert_eq!(exam.planned_date, Some(date(2025, 6, 11)));
}

#[test]
fn test_sample_program_kpis() {
    let program = load_sample();
    let grading = GradingConfig::default();

    // Five passed modules: 5 + 7.5 + 5 + 5 + 5 credits.
    assert!((kpi::credits_earned(&program) - 27.5).abs() < f32::EPSILON);
    assert!((kpi::credits_target(&program) - 75.0).abs() < f32::EPSILON);

    let average = kpi::weighted_average(&program).expect("graded modules exist");
    assert!((average - 57.25 / 27.5).abs() < 1e-9);

    let percent = kpi::progress_percent(&program);
    assert!((percent - 27.5 / 180.0 * 100.0).abs() < 1e-4);

    // Overdue first, then upcoming by date, then the dateless rest in
    // plan order.
    let open = kpi::open_exams(&program, reference());
    let codes: Vec<&str> = open.iter().map(|e| e.module_code.as_str()).collect();
    assert_eq!(
        codes,
        ["BIWI02", "BIPM02", "BISE03", "BICN03", "BIAC03", "BIOS04", "BILA04"]
    );
    assert!(open[0].overdue);
    assert!(!open[1].overdue);
    assert_eq!(open[2].attempt, 0, "unscheduled modules have no attempt yet");
    assert_eq!(kpi::overdue_exams(&program, reference()).len(), 1);

    let critical = kpi::critical_modules(&program, &grading);
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].module_code, "BIST02");
    assert_eq!(critical[0].reason, CriticalReason::Failed);

    assert_eq!(kpi::current_semester(&program), 2);

    // Semester 1 fully elapsed (22.5), semester 2 at day 122 of 182.
    assert!((kpi::planned_credits_by(&program, reference()) - 38.0).abs() < f32::EPSILON);
    assert!((kpi::schedule_deviation(&program, reference()) + 10.5).abs() < f32::EPSILON);

    // Only BIEN01 (3.0) is worse than the 2.5 target.
    assert_eq!(kpi::modules_above_target(&program, grading.target_grade), 1);

    let semesters = kpi::semester_progress(&program);
    let earned: Vec<f32> = semesters.iter().map(|s| s.earned_credits).collect();
    assert_eq!(earned, [22.5, 5.0, 0.0, 0.0]);
}

#[test]
fn test_sample_report_snapshot() {
    let program = load_sample();
    let report = ProgressReport::compute(&program, reference(), &GradingConfig::default());

    assert_eq!(report.current_semester, 2);
    assert_eq!(report.semester_count, 4);
    assert_eq!(report.module_count, 13);
    assert_eq!(report.open_count(), 7);
    assert_eq!(report.overdue_count(), 1);
    assert_eq!(report.critical_modules.len(), 1);
}

#[test]
fn test_sample_text_dashboard() {
    let program = load_sample();
    let report = ProgressReport::compute(&program, reference(), &GradingConfig::default());
    let rendered = TextReporter::new()
        .render(&report)
        .expect("render succeeds");

    assert!(rendered.contains("Study Dashboard: Business Informatics (B.Sc., part-time I, 48 months)"));
    assert!(rendered.contains("Start: 01.10.2024   Semester: 2 / 4   Required credits: 180"));
    assert!(rendered.contains("27.5/180 credits (15%)"));
    assert!(rendered.contains("Average grade: 2.1 (target 2.5)"));
    assert!(rendered.contains("Planned by now: 38 credits"));
    assert!(rendered.contains("Deviation: -10.5 X"));
    assert!(rendered.contains("Modules worse than 2.5: 1"));
    assert!(rendered.contains("behind plan (-17.5 credits)"));

    assert!(rendered.contains("X Statistics (BIST02)  failed"));
    assert!(rendered.contains("X Information Systems (BIWI02)  exam overdue (planned: 22.07.2025)"));
    assert!(rendered.contains("+ Project Management (BIPM02)  exam in 32 days: 02.09.2025"));
    assert!(rendered.contains("· Software Engineering (BISE03)  exam not scheduled"));
    assert!(rendered.contains("Open exams: 7    Overdue exams: 1 X"));
}

#[test]
fn test_sample_markdown_report() {
    let program = load_sample();
    let report = ProgressReport::compute(&program, reference(), &GradingConfig::default());
    let rendered = MarkdownReporter::new()
        .render(&report)
        .expect("render succeeds");

    assert!(rendered.contains("# Study Progress Report: Business Informatics"));
    assert!(rendered.contains("- **Current semester:** 2 of 4"));
    assert!(rendered.contains("| Credits earned | 27.5 / 180.0 |"));
    assert!(rendered.contains("| Completion | 15% |"));
    assert!(rendered.contains("| Planned by reference date | 38.0 |"));
    assert!(rendered.contains("| Schedule deviation | -10.5 |"));
    assert!(rendered.contains("| Average grade | 2.08 (target 2.5) |"));
    assert!(rendered.contains("| 2 | 22.5 | 5.0 |"));
    assert!(rendered.contains("| BIWI02 | Information Systems | case study | 1 | 2025-07-22 | yes |"));
    assert!(rendered.contains("| BIPM02 | Project Management | project | 1 | 2025-09-02 | no |"));
    assert!(rendered.contains("| BISE03 | Software Engineering | - | - | - | no |"));
    assert!(rendered.contains("- **Statistics** (BIST02): failed"));
}

#[test]
fn test_save_load_round_trip_preserves_program() {
    let program = load_sample();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = JsonProgramStore::new(
        temp_dir.path().join("program.json"),
        GradingConfig::default(),
    );

    store.save(&program).expect("save succeeds");
    let reloaded = store.load().expect("reload succeeds");
    assert_eq!(program, reloaded);
}

#[test]
fn test_retake_cycle_survives_save_and_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let data_file = temp_dir.path().join("program.json");
    fs::copy(SAMPLE_FILE, &data_file).expect("copy sample");

    let grading = GradingConfig::default();
    let store = JsonProgramStore::new(&data_file, grading.clone());
    let mut program = store.load().expect("sample program should load");

    // Re-enter the failed statistics exam and pass it on the second attempt.
    let statistics = program
        .modules_mut()
        .find(|m| m.code == "BIST02")
        .expect("BIST02 should exist");
    statistics
        .schedule_exam(date(2025, 9, 20), ExamKind::Written)
        .expect("re-entry accepted");
    assert_eq!(statistics.status, ModuleStatus::InProgress);
    assert_eq!(statistics.attempt(), 2);
    statistics
        .record_grade(3.7, 2, &grading)
        .expect("passing grade accepted");
    assert_eq!(statistics.status, ModuleStatus::Passed);
    assert_eq!(statistics.grade(), Some(3.7));

    store.save(&program).expect("save succeeds");
    let reloaded = store.load().expect("reload succeeds");
    assert_eq!(program, reloaded);

    assert!((kpi::credits_earned(&reloaded) - 35.0).abs() < f32::EPSILON);
    assert!(kpi::critical_modules(&reloaded, &grading).is_empty());
    let average = kpi::weighted_average(&reloaded).expect("graded modules exist");
    assert!((average - 85.0 / 35.0).abs() < 1e-9);
}

#[test]
fn test_missing_data_file_is_an_io_error() {
    let store = JsonProgramStore::new("samples/does_not_exist.json", GradingConfig::default());
    let err = store.load().expect_err("load should fail");
    assert!(matches!(err, StorageError::Io(_)));
}
