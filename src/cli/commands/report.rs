//! Report command handler
//!
//! Generates a one-shot progress report (plain text or Markdown) from the
//! program data file, without entering the interactive menu loop.

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use studytrack::config::Config;
use studytrack::core::{
    models::parse_date_input,
    report::{MarkdownReporter, ProgressReport, ReportFormat, ReportRenderer, TextReporter},
    storage::{JsonProgramStore, ProgramStore},
};
use studytrack::logger::{error, info};

/// Run the report command.
///
/// # Arguments
/// * `file` - Optional path to the program data file
/// * `as_of` - Optional reference date string
/// * `format_str` - Report format (text, markdown)
/// * `output` - Optional output path
/// * `config` - Configuration with the default data file and reports directory
pub fn run(
    file: Option<&Path>,
    as_of: Option<&str>,
    format_str: &str,
    output: Option<&Path>,
    config: &Config,
) {
    if let Err(err) = generate_report(file, as_of, format_str, output, config) {
        error!("Report generation failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Resolve the reference date from the `--as-of` flag, defaulting to today
fn resolve_reference_date(as_of: Option<&str>) -> Result<NaiveDate, String> {
    match as_of {
        Some(raw) => parse_date_input(raw).map_err(|e| format!("✗ {e}")),
        None => Ok(Local::now().date_naive()),
    }
}

fn generate_report(
    file: Option<&Path>,
    as_of: Option<&str>,
    format_str: &str,
    output: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    // Parse the format
    let format =
        ReportFormat::from_str(format_str).map_err(|e| format!("✗ {e}. Use: text or markdown"))?;

    let reference = resolve_reference_date(as_of)?;

    // Load the program
    let data_file: PathBuf = file.map_or_else(
        || PathBuf::from(&config.paths.data_file),
        Path::to_path_buf,
    );
    let store = JsonProgramStore::new(&data_file, config.grading.clone());
    let program = store.load().map_err(|e| {
        error!("Failed to load program {}: {e}", data_file.display());
        format!("✗ Failed to load {}: {e}", data_file.display())
    })?;

    info!("Program data loaded: {}", data_file.display());

    let report = ProgressReport::compute(&program, reference, &config.grading);

    match format {
        ReportFormat::Text => {
            let reporter = TextReporter::new();
            if let Some(path) = output {
                reporter
                    .generate(&report, path)
                    .map_err(|e| format!("✗ Failed to write report: {e}"))?;
                println!("✓ Report generated: {}", path.display());
                info!("Report exported to: {}", path.display());
            } else {
                let rendered = reporter
                    .render(&report)
                    .map_err(|e| format!("✗ Failed to render report: {e}"))?;
                println!("{rendered}");
            }
        }
        ReportFormat::Markdown => {
            // Markdown always goes to a file; default under the reports directory
            let output_path: PathBuf = if let Some(path) = output {
                path.to_path_buf()
            } else {
                let reports_dir = PathBuf::from(&config.paths.reports_dir);
                std::fs::create_dir_all(&reports_dir).map_err(|e| {
                    format!(
                        "✗ Failed to create reports directory {}: {e}",
                        reports_dir.display()
                    )
                })?;

                let filename = data_file
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("program")
                    .to_string();
                let output_filename = format!("{filename}_report.{}", format.extension());
                reports_dir.join(output_filename)
            };

            let reporter = MarkdownReporter::new();
            reporter
                .generate(&report, &output_path)
                .map_err(|e| format!("✗ Failed to generate Markdown report: {e}"))?;

            println!("✓ Report generated: {}", output_path.display());
            info!("Report exported to: {}", output_path.display());
        }
    }

    Ok(())
}
