//! Graph command implementation.

use std::process::ExitCode;

use crate::cli::{GraphArgs, GraphFormat};
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

pub fn execute(args: GraphArgs) -> Result<ExitCode> {
    let options = utils::load_options(&args.options)?;
    let analyzer = utils::analyzer(&options)?;
    let graph = analyzer.build_graph(utils::read_input(&args.input)?)?;

    let rendered = match args.format {
        GraphFormat::Dot => graph.to_dot_format(),
        GraphFormat::Json => graph.to_json()?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            ui::success(&format!(
                "Wrote {} modules to {}",
                graph.module_count(),
                path.display()
            ));
        }
        None => println!("{rendered}"),
    }
    Ok(ExitCode::SUCCESS)
}
