use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use gramlight::checker::{GrammarChecker, LanguageToolClient};
use gramlight::cli::output::{self, OutputFormat};
use gramlight::config::{Overrides, LOCAL_CONFIG_FILE};
use gramlight::highlight::word_diff::DiffStrategy;
use gramlight::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gramlight")]
#[command(version, about = "Grammar-check text and highlight errors and corrections", long_about = None)]
struct Cli {
    /// Files to check (reads stdin when neither files nor --text are given)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Check this text instead of files
    #[arg(short, long, conflicts_with = "files")]
    text: Option<String>,

    /// Language code passed to the grammar service (e.g., en-US, en-GB)
    #[arg(short, long)]
    language: Option<String>,

    /// Base URL of the LanguageTool API
    #[arg(long, env = "GRAMLIGHT_API_URL")]
    api_url: Option<String>,

    /// How corrected words are compared with the original (positional, aligned)
    #[arg(long)]
    diff: Option<DiffStrategy>,

    /// Output format (text, json, html)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if grammar issues are found
    #[arg(long)]
    no_fail: bool,

    /// Log debug information to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Parser, Debug)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file locations
    Path,
}

/// A block of text to check and the name it is reported under.
struct Input {
    label: Option<String>,
    text: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "gramlight", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(Overrides {
        language: cli.language.clone(),
        api_url: cli.api_url.clone(),
        diff_strategy: cli.diff,
    })?;

    if let Some(command) = cli.command {
        return handle_command(command, &config);
    }

    let colored = !cli.no_color;
    if !colored {
        colored::control::set_override(false);
    }

    let inputs = read_inputs(&cli)?;
    debug!(inputs = inputs.len(), language = %config.language, "Starting grammar check");

    let service = LanguageToolClient::new(&config)?;
    let checker = GrammarChecker::new(service, config.highlight_options());

    let mut total_issues = 0;
    let mut failed = 0;

    for input in &inputs {
        let label = input.label.as_deref();
        let spinner = (cli.format == OutputFormat::Text).then(|| start_spinner(label));

        let result = checker.check(&input.text);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result {
            Ok(report) => {
                total_issues += report.matches.len();
                output::print_report(label, &report, colored, cli.format)?;
            }
            Err(err) => {
                debug!(error = %err, "Check failed");
                failed += 1;
                output::print_error(label, &err, colored, cli.format)?;
            }
        }
    }

    if cli.format == OutputFormat::Text && inputs.len() > 1 {
        output::print_check_summary(total_issues, inputs.len(), failed, colored);
    }

    if failed > 0 {
        std::process::exit(2);
    }
    if total_issues > 0 && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_inputs(cli: &Cli) -> Result<Vec<Input>> {
    if let Some(text) = &cli.text {
        return Ok(vec![Input {
            label: None,
            text: text.clone(),
        }]);
    }

    if cli.files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read text from stdin")?;
        return Ok(vec![Input { label: None, text }]);
    }

    cli.files
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            Ok(Input {
                label: Some(path.display().to_string()),
                text,
            })
        })
        .collect()
}

fn start_spinner(label: Option<&str>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Checking {}...", label.unwrap_or("text")));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Config { action } => match action {
            ConfigCommands::Show => {
                print!("{}", config.to_toml()?);
            }
            ConfigCommands::Path => {
                match Config::global_config_path() {
                    Some(path) => println!("global: {}", path.display()),
                    None => println!("global: (no home directory)"),
                }
                println!("local:  {}", LOCAL_CONFIG_FILE);
            }
        },
    }
    Ok(())
}
