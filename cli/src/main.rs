use clap::Parser;
use clap_complete::Shell;
use jira_reindex_api::JiraClient;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};

mod commands;
mod config;
mod logging;

use commands::reindex::{Reindexer, SystemClock};
use config::{AppConfig, ConfigError};
use logging::LogOptions;

pub const APP: &str = "Jira Reindex Runner";

#[derive(Parser, Debug)]
#[command(name = "jira-reindex-runner", version)]
#[command(about = "Tool for periodical running Jira re-index process", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long = "config", default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Disable colors in output
    #[arg(long = "no-color", default_value_t = false)]
    no_color: bool,

    /// Show verbose information about application and environment
    #[arg(long = "verbose-version", default_value_t = false)]
    verbose_version: bool,

    /// Print man page
    #[arg(long = "generate-man", default_value_t = false)]
    generate_man: bool,

    /// Print completion script for the given shell
    #[arg(long = "completion", value_name = "SHELL")]
    completion: Option<Shell>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        commands::completion::print_completion(shell);
        return;
    }

    if cli.generate_man {
        if let Err(e) = commands::man::print_man() {
            eprintln!("Can't generate man page: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if cli.verbose_version {
        commands::version::print_verbose_version().await;
        return;
    }

    std::process::exit(run(cli).await);
}

/// Load configuration, set up logging and run the re-index workflow.
/// Returns the process exit code.
async fn run(cli: Cli) -> i32 {
    let color = !cli.no_color && std::io::stderr().is_terminal();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            print_error(color, &e.to_string());
            return 1;
        }
    };

    if let Err(errors) = config.validate() {
        print_validation_errors(color, &errors);
        return 1;
    }

    // Keeps the file writer alive until the run is over
    let _guard = match logging::init(&LogOptions::from_config(&config, color)) {
        Ok(guard) => guard,
        Err(e) => {
            print_error(color, &e.to_string());
            return 1;
        }
    };

    if !config.main.enabled {
        return 0;
    }

    info!("{}", "-".repeat(80));
    info!("{} {} starting…", APP, env!("CARGO_PKG_VERSION"));

    let client = match JiraClient::new(&config.client_config()) {
        Ok(client) => client,
        Err(e) => {
            error!(critical = true, "Can't create Jira client: {}", e);
            return 1;
        }
    };

    Reindexer::new(client, config.effective_reindex_type(), SystemClock)
        .run()
        .await
        .code()
}

fn print_error(color: bool, message: &str) {
    if color {
        eprintln!("\x1b[31m{}\x1b[0m", message);
    } else {
        eprintln!("{}", message);
    }
}

fn print_validation_errors(color: bool, errors: &[ConfigError]) {
    print_error(color, "Error while configuration file validation:");
    for e in errors {
        print_error(color, &format!("  {}", e));
    }
}
