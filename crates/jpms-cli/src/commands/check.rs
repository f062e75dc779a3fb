//! Check command implementation.

use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::{CheckArgs, ReportFormat};
use crate::commands::utils;
use crate::error::Result;
use crate::report::{JsonReport, ReportRenderer, SourceTexts};
use crate::ui;

/// Execute the check command.
///
/// 1. Load and validate compiler options
/// 2. Parse the directives and read the project description
/// 3. Build the module graph (configuration problems abort here)
/// 4. Print every diagnostic and the summary
///
/// Returns a failing exit code when the report contains errors.
pub fn execute(args: CheckArgs) -> Result<ExitCode> {
    let options = utils::load_options(&args.options)?;
    let analyzer = utils::analyzer(&options)?;
    let input = utils::read_input(&args.input)?;
    let texts = SourceTexts::from_input(&input);

    let outcome = analyzer.analyze(input)?;
    let report = &outcome.report;

    match args.format {
        ReportFormat::Text => {
            let root = args.sources.clone().unwrap_or_else(|| {
                args.input
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_default()
            });
            let rendered = ReportRenderer::new(root, texts)
                .with_color(ui::colors_enabled())
                .render(report);
            print!("{rendered}");
            if report.is_empty() {
                ui::success(&format!(
                    "{} modules resolved, no problems",
                    outcome.graph.module_count()
                ));
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&JsonReport::new(report))?);
        }
    }

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
