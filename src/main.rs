use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod cli;

#[derive(Parser)]
#[command(name = "linkhub")]
#[command(about = "Domain-ownership verification and hostname resolution for LinkHub pages")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "linkhub.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the verification daemon and HTTP API
    Serve {
        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool,

        /// Write logs to a file instead of stdout
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Check a hostname's DNS challenge without changing stored state
    Check {
        /// Hostname to check
        hostname: String,

        /// Verification token to expect (defaults to the stored one)
        #[arg(long)]
        token: Option<String>,
    },

    /// Import a legacy per-page domain export into the unified store
    Migrate {
        /// Path to the legacy export file
        legacy: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { verbose, log_file } => cli::serve::execute(&cli.config, verbose, log_file),
        Commands::Check { hostname, token } => cli::check::execute(&cli.config, &hostname, token),
        Commands::Migrate { legacy } => cli::migrate::execute(&cli.config, &legacy),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
