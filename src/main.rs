use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use landreg::config::{CliOverrides, LandregConfig};
use landreg::models::Urgency;

mod cmd;

#[derive(Parser)]
#[command(name = "landreg")]
#[command(version, about = "Land registration client: accounts, property requests and agents")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to landreg.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL. Overrides landreg.toml and LANDREG_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_path: self.config.clone(),
            api_url: self.api_url.clone(),
            json_logs: self.json_logs,
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account with the two-step registration wizard
    Register,
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List or submit property registration requests
    Requests {
        #[command(subcommand)]
        command: Option<RequestsCommands>,
    },
    /// List agents that can be assigned to a request
    Agents,
    /// View, validate or create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum RequestsCommands {
    /// List your requests, newest first
    List,
    /// Submit a new request. Missing fields are prompted for.
    New {
        #[arg(long)]
        property_type: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        urgency: Urgency,
        /// Agent id to assign
        #[arg(long)]
        agent: Option<String>,
        /// Supporting document (PDF or image); repeat for several
        #[arg(long = "document")]
        documents: Vec<PathBuf>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default landreg.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = LandregConfig::load(cli.overrides())?;
    landreg::logging::init(&config.log_filter, config.json_logs)?;

    match cli.command {
        Commands::Login { email, password } => {
            cmd::cmd_login(&config, email, password).await?
        }
        Commands::Register => cmd::cmd_register(&config).await?,
        Commands::Logout => cmd::cmd_logout(&config)?,
        Commands::Whoami => cmd::cmd_whoami(&config)?,
        Commands::Requests { command } => cmd::cmd_requests(&config, command).await?,
        Commands::Agents => cmd::cmd_agents(&config).await?,
        Commands::Config { command } => cmd::cmd_config(&config, command)?,
    }

    Ok(())
}
