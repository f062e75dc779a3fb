//! Attribute command implementation.

use std::process::ExitCode;

use jpms_graph::{GraphError, ModuleAttribute, ModuleName, ModuleOrigin};

use crate::cli::{AttributeCommand, DecodeArgs, EncodeArgs};
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

pub fn execute(command: AttributeCommand) -> Result<ExitCode> {
    match command {
        AttributeCommand::Encode(args) => encode(args),
        AttributeCommand::Decode(args) => decode(args),
    }
}

/// Writes the attribute of one explicit module. Modules compiled in this
/// run get `--module-version`, if one is configured.
fn encode(args: EncodeArgs) -> Result<ExitCode> {
    let options = utils::load_options(&args.options)?;
    let analyzer = utils::analyzer(&options)?;
    let graph = analyzer.build_graph(utils::read_input(&args.input)?)?;

    let name = ModuleName::new(&args.module).map_err(GraphError::from)?;
    let id = graph
        .id_of(&name)
        .ok_or_else(|| CliError::ModuleNotFound(args.module.clone()))?;

    let mut attribute = ModuleAttribute::for_module(&graph, id)?;
    if graph.descriptor(id).origin == ModuleOrigin::Source {
        if let Some(version) = options.parsed_module_version()? {
            attribute.version = Some(version.as_str().to_string());
        }
    }

    let bytes = attribute.to_bytes()?;
    std::fs::write(&args.output, &bytes)?;
    ui::success(&format!(
        "Wrote {} bytes for module {} to {}",
        bytes.len(),
        name,
        args.output.display()
    ));
    Ok(ExitCode::SUCCESS)
}

fn decode(args: DecodeArgs) -> Result<ExitCode> {
    let bytes = utils::read_file(&args.input)?;
    let declaration = ModuleAttribute::from_bytes(&bytes)?.into_declaration()?;
    println!("{}", serde_json::to_string_pretty(&declaration)?);
    Ok(ExitCode::SUCCESS)
}
