use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use stencil::cli::{self, Cli};
use stencil::config::{DEFAULT_CONFIG_DIR, ProfileConfig};
use stencil::engine::{PromptEngine, PromptRequest};
use stencil::input;
use stencil::loader::FsTemplateLoader;
use stencil::logging;
use stencil::pattern::TwoTokenCommand;
use stencil::selector::DEFAULT_ORIGIN_LAYER;
use stencil::vars::StandardVariables;
use stencil::writer;

fn main() -> ExitCode {
    // Custom variables come out first; clap never sees --uv-* options.
    let (clap_args, custom_vars) = match cli::extract_custom_vars(std::env::args_os()) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let cli = Cli::parse_from(clap_args);

    match run(cli, custom_vars, Path::new(DEFAULT_CONFIG_DIR)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, custom_vars: Vec<(String, String)>, config_dir: &Path) -> anyhow::Result<()> {
    logging::init(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let profile = ProfileConfig::load(&cli.config, config_dir)?;
    info!(
        profile = %profile.name,
        prompt_base_dir = %profile.prompt_base_dir.display(),
        "profile loaded"
    );

    let input = input::read_input(cli.from.as_deref())?;

    let command = TwoTokenCommand {
        directive: cli.directive.clone(),
        layer: cli.layer.clone(),
    };
    let standard_vars = StandardVariables {
        input_text: input.as_ref().map(|i| i.text.clone()),
        input_text_file: input.as_ref().and_then(|i| i.file_name.clone()),
        destination_path: cli.destination.as_ref().map(|p| p.display().to_string()),
        schema_file: Some(
            profile
                .schema_file_path(&command.directive, &command.layer)
                .display()
                .to_string(),
        ),
    };

    let request = PromptRequest {
        command,
        origin_layer: cli
            .input
            .clone()
            .unwrap_or_else(|| DEFAULT_ORIGIN_LAYER.to_owned()),
        adaptation: cli.adaptation.clone(),
        standard_vars,
        custom_vars,
    };

    let loader = FsTemplateLoader;
    let engine = PromptEngine::new(&profile, &loader);
    let prompt = engine.resolve(&request)?;

    info!(
        template = %prompt.template_path.display(),
        text_len = prompt.text.len(),
        "prompt resolved"
    );
    if !prompt.unresolved_placeholders.is_empty() {
        warn!(
            placeholders = ?prompt.unresolved_placeholders,
            "unresolved placeholders left verbatim"
        );
    }

    writer::write_prompt(&prompt.text, cli.destination.as_deref())?;
    Ok(())
}
