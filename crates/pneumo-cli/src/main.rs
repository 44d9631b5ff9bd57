use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use serde_json::Value;

use pneumo_cli::config::{self, PneumoConfig};
use pneumo_cli::session::{self, SessionRequest};

#[derive(Parser)]
#[command(name = "pneumo-cli")]
#[command(about = "Pneumologické kalkulačky")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List calculator ids and names
    List,
    /// Print the input fields of a calculator as JSON
    Describe { id: String },
    /// Evaluate one calculator on a JSON object
    Eval {
        id: String,
        /// JSON file with the inputs (reads stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Print the whole evaluation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a JSON array of {calculator, input} requests and print the history
    Session { file: PathBuf },
    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(default_filter: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_input(path: Option<&Path>) -> Result<Value> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&raw).wrap_err("input is not valid JSON")
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let config = config::load_config(&config_path)?;
    init_tracing(&config.log_filter, cli.json_logs);

    match cli.command {
        Command::List => {
            for calculator in pneumo_calculators::all_calculators() {
                println!("{:<20} {}", calculator.id(), calculator.name());
            }
        }
        Command::Describe { id } => {
            let calculator = pneumo_calculators::get_calculator(&id)
                .ok_or_else(|| eyre::eyre!("unknown calculator: {id}"))?;
            println!("{}", serde_json::to_string_pretty(calculator.fields())?);
        }
        Command::Eval { id, input, json } => {
            let input = session::apply_config(&id, read_input(input.as_deref())?, &config);
            let evaluation = pneumo_calculators::evaluate(&id, &input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                println!("{}", evaluation.report());
            }
        }
        Command::Session { file } => {
            let contents = std::fs::read_to_string(&file)
                .wrap_err_with(|| format!("failed to read {}", file.display()))?;
            let requests: Vec<SessionRequest> =
                serde_json::from_str(&contents).wrap_err("session file must be a JSON array")?;
            let history = session::run(&requests, &config)?;
            println!(
                "{}",
                session::render_history(&history, &jiff::tz::TimeZone::system())
            );
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                println!("# {}", config_path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    eyre::bail!(
                        "config already exists at {} (use --force to overwrite)",
                        config_path.display()
                    );
                }
                config::save_config(&PneumoConfig::default(), &config_path)?;
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}
