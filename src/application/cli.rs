#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Error;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendBox;
use crate::domain::models::GenerationError;
use crate::domain::models::ModelOption;
use crate::domain::services::AppState;
use crate::domain::services::Downloads;
use crate::infrastructure::backends::BackendManager;

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Tab - Switch between the Generate and Gallery tabs.
- Enter - Generate an image from the prompt, or save the selected gallery image.
- CTRL+N / CTRL+P - Select the next or previous model.
- CTRL+S - Save the current image to the output directory.
- Up arrow / Down arrow - Move through the gallery.
- CTRL+C - Exit Texty.
        "#;

    return text.trim().to_string();
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn format_models() -> String {
    return ModelOption::all()
        .iter()
        .map(|model| {
            return format!("- {} ({})", model.id, model.display_name);
        })
        .collect::<Vec<String>>()
        .join("\n");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

/// Message shown for errors caused by a failed generation rather than a
/// broken install. Anything else gets the full crash report.
pub fn generation_failure(err: &Error) -> Option<String> {
    return err
        .downcast_ref::<GenerationError>()
        .map(|gen_err| return format!("Error: {gen_err}"));
}

async fn generate_headless(
    backend: &BackendBox,
    model: &str,
    prompt: &str,
    data_uri: bool,
) -> Result<()> {
    let mut app_state = AppState::new(model);
    app_state.set_prompt(prompt);
    app_state.generate(backend).await?;

    let record = app_state
        .current_image
        .ok_or_else(|| return anyhow!("No image was generated"))?;

    if data_uri {
        println!("{}", record.image.data_uri());
        return Ok(());
    }

    let file_path = Downloads::default()
        .save(&record.image, &Downloads::file_name_now(None))
        .await?;

    println!("Saved image to {}", file_path.to_string_lossy());
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_generate() -> Command {
    return Command::new("generate")
        .about("Generate a single image without starting the UI, and save it to the output directory.")
        .arg(
            Arg::new("prompt")
                .short('p')
                .long("prompt")
                .help("Description of the image to generate.")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("data-uri")
                .long("data-uri")
                .help("Print the image as a data URI to stdout instead of saving it.")
                .action(ArgAction::SetTrue),
        );
}

pub fn build() -> Command {
    let hotkeys_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("HOTKEYS:") {
                return Paint::new(format!("UI {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("texty")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(hotkeys_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_generate())
        .subcommand(Command::new("models").about("List all models available for generation."))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("TEXTY_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::Model.to_string())
                .short('m')
                .long(ConfigKey::Model.to_string())
                .env("TEXTY_MODEL")
                .num_args(1)
                .help(format!("The initial model used for generations. [default: {}]", Config::default(ConfigKey::Model)))
                .value_parser(PossibleValuesParser::new(ModelOption::ids()))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ApiUrl.to_string())
                .long(ConfigKey::ApiUrl.to_string())
                .env("TEXTY_API_URL")
                .num_args(1)
                .help(format!("Stability AI API URL. Can be swapped to a compatible proxy. [default: {}]", Config::default(ConfigKey::ApiUrl)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ApiKey.to_string())
                .long(ConfigKey::ApiKey.to_string())
                .env("TEXTY_API_KEY")
                .num_args(1)
                .hide_env_values(true)
                .help("Stability AI API key. Falls back to the STABILITY_API_KEY environment variable.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::OutputDir.to_string())
                .short('o')
                .long(ConfigKey::OutputDir.to_string())
                .env("TEXTY_OUTPUT_DIR")
                .num_args(1)
                .help(format!("Directory generated images are saved to. [default: {}]", Config::default(ConfigKey::OutputDir)))
                .global(true),
        );
}

/// Handles subcommands, returning true when the UI should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("generate", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let prompt = subcmd_matches
                .get_one::<String>("prompt")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            generate_headless(
                &BackendManager::get(),
                &Config::get(ConfigKey::Model),
                &prompt,
                subcmd_matches.get_flag("data-uri"),
            )
            .await?;
            return Ok(false);
        }
        Some(("models", _)) => {
            println!("{}", format_models());
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
