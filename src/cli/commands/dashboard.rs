//! Interactive dashboard session
//!
//! Loads the program data file, renders the dashboard and runs the menu loop
//! for recording grades and planning exam dates. Every successful mutation is
//! saved back to disk right away, so a dropped terminal loses nothing.

use chrono::{Local, NaiveDate};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use studytrack::config::{Config, GradingConfig};
use studytrack::core::kpi;
use studytrack::core::models::{
    parse_date_input, parse_grade_input, ExamKind, Module, Program,
};
use studytrack::core::report::{ProgressReport, ReportRenderer, TextReporter};
use studytrack::core::storage::{JsonProgramStore, ProgramStore};
use studytrack::logger::{error, info, warn};

/// Run the dashboard command.
///
/// # Arguments
/// * `file` - Optional path to the program data file
/// * `config` - Configuration with the default data file and grading scale
pub fn run(file: Option<&Path>, config: &Config) {
    let data_file: PathBuf = file.map_or_else(
        || PathBuf::from(&config.paths.data_file),
        Path::to_path_buf,
    );
    let store = JsonProgramStore::new(&data_file, config.grading.clone());
    let program = match store.load() {
        Ok(program) => program,
        Err(err) => {
            error!("Failed to load program {}: {err}", data_file.display());
            eprintln!("✗ Failed to load {}: {err}", data_file.display());
            std::process::exit(1);
        }
    };

    info!("Program data loaded: {}", data_file.display());

    let reference = prompt_reference_date();
    let mut session = Session {
        store,
        program,
        grading: config.grading.clone(),
        reference,
        unsaved_changes: false,
    };

    session.show_dashboard();
    session.menu_loop();
}

/// One interactive sitting over a loaded program
struct Session {
    store: JsonProgramStore,
    program: Program,
    grading: GradingConfig,
    reference: NaiveDate,
    unsaved_changes: bool,
}

impl Session {
    fn menu_loop(&mut self) {
        loop {
            print_menu();
            let Some(choice) = prompt("Choice: ") else {
                // stdin closed; nothing more can be asked
                break;
            };
            match choice.as_str() {
                "1" => self.show_dashboard(),
                "2" => self.list_modules(),
                "3" => self.list_open_exams(),
                "4" => self.record_grade(),
                "5" => self.schedule_exam(),
                "6" => self.save(),
                "0" => {
                    self.quit();
                    break;
                }
                _ => println!("Invalid choice."),
            }
        }
    }

    fn show_dashboard(&self) {
        let report = ProgressReport::compute(&self.program, self.reference, &self.grading);
        match TextReporter::new().render(&report) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                error!("Dashboard rendering failed: {err}");
                eprintln!("✗ Failed to render dashboard: {err}");
            }
        }
    }

    fn list_modules(&self) {
        println!("\n=== All modules ===");
        let mut rows: Vec<(u32, &Module)> = self
            .program
            .semesters
            .iter()
            .flat_map(|semester| {
                semester
                    .modules
                    .iter()
                    .map(move |module| (semester.number, module))
            })
            .collect();
        rows.sort_by_key(|(number, module)| (*number, module.planned_semester));

        for (number, module) in rows {
            let grade = module
                .grade()
                .map_or_else(|| "-".to_string(), |g| format!("{g:.1}"));
            let exam_status = module.exam.as_ref().map_or_else(
                || "-".to_string(),
                |exam| exam.status(self.reference, &self.grading).to_string(),
            );
            println!(
                "  Sem {number} | {:<12} | {:<40} | {:>5} credits | {:<11} | exam {exam_status:<10} | grade {grade}",
                module.code, module.title, module.credits, module.status
            );
        }
        println!();
    }

    fn list_open_exams(&self) {
        println!("\n=== Open exams ===");
        let open = kpi::open_exams(&self.program, self.reference);
        if open.is_empty() {
            println!("  No open exams.");
            println!();
            return;
        }
        for entry in &open {
            let date = entry
                .planned_date
                .map_or_else(|| "-".to_string(), |d| d.format("%d.%m.%Y").to_string());
            let kind = entry.kind.map_or_else(|| "-".to_string(), |k| k.to_string());
            let attempt = if entry.attempt == 0 {
                "-".to_string()
            } else {
                entry.attempt.to_string()
            };
            let marker = if entry.overdue { "  (overdue)" } else { "" };
            println!(
                "  {:<12} | {:<40} | attempt {attempt} | {kind:<12} | {date:<10}{marker}",
                entry.module_code, entry.title
            );
        }
        println!();
    }

    fn record_grade(&mut self) {
        let Some(code) = prompt("Module code: ") else { return };
        if code.is_empty() {
            return;
        }
        let Some((si, mi)) = self.select_module(&code) else {
            return;
        };

        let module = &self.program.semesters[si].modules[mi];
        println!("Selected: {} ({})", module.title, module.code);
        let Some(attempt) = prompt_attempt(self.grading.max_attempts, module.attempt().max(1))
        else {
            return;
        };

        let current_grade = self.program.semesters[si].modules[mi]
            .grade()
            .map_or_else(|| "-".to_string(), |g| format!("{g:.1}"));
        let question = format!(
            "Grade {:.1}..{:.1} (decimal comma or dot), empty = delete (current: {current_grade}): ",
            self.grading.scale_min, self.grading.scale_max
        );
        let Some(raw) = prompt(&question) else { return };

        if raw.is_empty() {
            match self.program.semesters[si].modules[mi].clear_grade() {
                Ok(()) => {
                    println!("Grade deleted.");
                    self.mark_changed();
                }
                Err(err) => println!("✗ {err}"),
            }
            return;
        }

        let grade = match parse_grade_input(&raw) {
            Ok(grade) => grade,
            Err(err) => {
                println!("✗ {err}");
                return;
            }
        };

        match self.program.semesters[si].modules[mi].record_grade(grade, attempt, &self.grading) {
            Ok(()) => {
                let outcome = if self.grading.is_passing(grade) {
                    "passed"
                } else {
                    "failed"
                };
                println!("Grade {grade:.1} recorded ({outcome}).");
                self.mark_changed();
            }
            Err(err) => println!("✗ {err}"),
        }
    }

    fn schedule_exam(&mut self) {
        let Some(code) = prompt("Module code: ") else { return };
        if code.is_empty() {
            return;
        }
        let Some((si, mi)) = self.select_module(&code) else {
            return;
        };

        let module = &self.program.semesters[si].modules[mi];
        println!("Selected: {} ({})", module.title, module.code);
        let current_kind = module.exam.as_ref().map_or(ExamKind::Written, |e| e.kind);
        let current_date = module
            .exam
            .as_ref()
            .and_then(|e| e.planned_date)
            .map_or_else(|| "-".to_string(), |d| d.format("%d.%m.%Y").to_string());

        let question = format!(
            "Exam date (YYYY-MM-DD or DD.MM.YYYY), empty = delete (current: {current_date}): "
        );
        let Some(raw) = prompt(&question) else { return };

        if raw.is_empty() {
            match self.program.semesters[si].modules[mi].clear_exam_date() {
                Ok(()) => {
                    println!("Exam date deleted.");
                    self.mark_changed();
                }
                Err(err) => println!("✗ {err}"),
            }
            return;
        }

        let date = match parse_date_input(&raw) {
            Ok(date) => date,
            Err(err) => {
                println!("✗ {err}");
                return;
            }
        };

        let Some(kind) = prompt_kind(current_kind) else {
            return;
        };

        match self.program.semesters[si].modules[mi].schedule_exam(date, kind) {
            Ok(()) => {
                println!("Exam planned for {}.", date.format("%d.%m.%Y"));
                self.mark_changed();
            }
            Err(err) => println!("✗ {err}"),
        }
    }

    /// Find the module by code, asking the user to choose when several share it
    fn select_module(&self, code: &str) -> Option<(usize, usize)> {
        let matches: Vec<(usize, usize)> = self
            .program
            .semesters
            .iter()
            .enumerate()
            .flat_map(|(si, semester)| {
                semester
                    .modules
                    .iter()
                    .enumerate()
                    .filter(|(_, module)| module.code.trim() == code)
                    .map(move |(mi, _)| (si, mi))
            })
            .collect();

        match matches.len() {
            0 => {
                println!("No module with code '{code}' found.");
                None
            }
            1 => Some(matches[0]),
            _ => self.disambiguate(code, &matches),
        }
    }

    fn disambiguate(&self, code: &str, matches: &[(usize, usize)]) -> Option<(usize, usize)> {
        println!("\nSeveral modules share the code '{code}':");
        for (i, (si, mi)) in matches.iter().enumerate() {
            let module = &self.program.semesters[*si].modules[*mi];
            println!(
                "  {}) {} (semester {}, {} credits)",
                i + 1,
                module.title,
                module.planned_semester,
                module.credits
            );
        }
        let input = prompt(&format!("Select (1-{}, 0 = cancel): ", matches.len()))?;
        match input.parse::<usize>() {
            Ok(0) => None,
            Ok(choice) if choice <= matches.len() => Some(matches[choice - 1]),
            _ => {
                println!("Invalid choice.");
                None
            }
        }
    }

    fn mark_changed(&mut self) {
        self.unsaved_changes = true;
        self.auto_save();
    }

    fn auto_save(&mut self) {
        match self.store.save(&self.program) {
            Ok(()) => self.unsaved_changes = false,
            Err(err) => {
                warn!("Auto-save failed: {err}");
                println!("⚠ Auto-save failed: {err} (data kept in memory, use Save to retry)");
            }
        }
    }

    fn save(&mut self) {
        match self.store.save(&self.program) {
            Ok(()) => {
                self.unsaved_changes = false;
                println!("✓ Saved to {}", self.store.path().display());
            }
            Err(err) => {
                error!("Save failed: {err}");
                eprintln!("✗ Save failed: {err}");
            }
        }
    }

    fn quit(&mut self) {
        if self.unsaved_changes {
            if let Some(answer) = prompt("Unsaved changes. Save before quitting? (y/n): ") {
                if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
                    self.save();
                }
            }
        }
        println!("Goodbye.");
    }
}

fn print_menu() {
    println!("\n╔{}╗", "═".repeat(39));
    println!("║{:^39}║", "MAIN MENU");
    println!("╠{}╣", "═".repeat(39));
    for entry in [
        "1) Show dashboard",
        "2) List modules",
        "3) List open exams",
        "4) Record or change a grade",
        "5) Plan or change an exam date",
        "6) Save",
        "0) Quit",
    ] {
        println!("║  {entry:<37}║");
    }
    println!("╚{}╝", "═".repeat(39));
}

/// Read one trimmed input line; `None` when stdin is closed
fn prompt(question: &str) -> Option<String> {
    print!("{question}");
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn prompt_reference_date() -> NaiveDate {
    let today = Local::now().date_naive();
    let Some(input) = prompt("Reference date (YYYY-MM-DD or DD.MM.YYYY, empty = today): ") else {
        return today;
    };
    if input.is_empty() {
        return today;
    }
    match parse_date_input(&input) {
        Ok(date) => date,
        Err(err) => {
            println!("✗ {err}; using today.");
            today
        }
    }
}

fn prompt_attempt(max_attempts: u8, current: u8) -> Option<u8> {
    let input = prompt(&format!("Attempt (1..{max_attempts}, empty = {current}): "))?;
    if input.is_empty() {
        return Some(current);
    }
    match input.parse::<u8>() {
        Ok(value) if value >= 1 => Some(value),
        _ => {
            println!("Invalid attempt number.");
            None
        }
    }
}

fn prompt_kind(current: ExamKind) -> Option<ExamKind> {
    let input = prompt(&format!(
        "Exam kind (written, oral, project, portfolio, term paper, case study, other; empty = {current}): "
    ))?;
    if input.is_empty() {
        return Some(current);
    }
    match input.parse::<ExamKind>() {
        Ok(kind) => Some(kind),
        Err(err) => {
            println!("✗ {err}");
            None
        }
    }
}
