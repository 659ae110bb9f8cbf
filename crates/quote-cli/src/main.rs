//! Quote Keeper CLI
//!
//! Development tooling: run the full stack locally, check database
//! connectivity, and probe the external quote source.

mod commands;
mod supervisor;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

#[derive(Parser)]
#[command(name = "quotes")]
#[command(author, version, about = "Quote Keeper - development tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server and the front-end dev server
    Dev {
        /// Command that starts the API server
        #[arg(long, default_value = "cargo run -p quote-server")]
        server_cmd: String,

        /// Command that starts the front-end dev server
        #[arg(long, default_value = "npm run dev")]
        frontend_cmd: String,

        /// Directory the front-end command runs in
        #[arg(long, default_value = "frontend")]
        frontend_dir: PathBuf,

        /// Seconds to wait for the API server before starting the front-end
        #[arg(long, default_value_t = 5)]
        startup_delay: u64,

        /// Seconds each process gets to exit before it is killed
        #[arg(long, default_value_t = 5)]
        grace: u64,
    },

    /// Check that the configured database is reachable
    #[command(name = "db-check")]
    DbCheck,

    /// Fetch one quote from the external source
    Fetch {
        /// Author to look for
        #[arg(short, long)]
        author: Option<String>,

        /// Keyword to search for
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "quote_cli=debug,quote_server=debug"
        } else {
            "quote_cli=info,quote_server=warn"
        })
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let result = match cli.command {
        Commands::Dev {
            server_cmd,
            frontend_cmd,
            frontend_dir,
            startup_delay,
            grace,
        } => {
            commands::dev::run(commands::dev::DevOptions {
                server_cmd,
                frontend_cmd,
                frontend_dir,
                startup_delay: Duration::from_secs(startup_delay),
                grace: Duration::from_secs(grace),
            })
            .await
        }
        Commands::DbCheck => commands::db_check::run().await,
        Commands::Fetch { author, query } => commands::fetch::run(author, query).await,
    };

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_defaults() {
        let cli = Cli::try_parse_from(["quotes", "dev"]).unwrap();
        let Commands::Dev {
            server_cmd,
            frontend_cmd,
            frontend_dir,
            startup_delay,
            grace,
        } = cli.command
        else {
            panic!("expected dev command");
        };
        assert_eq!(server_cmd, "cargo run -p quote-server");
        assert_eq!(frontend_cmd, "npm run dev");
        assert_eq!(frontend_dir, PathBuf::from("frontend"));
        assert_eq!(startup_delay, 5);
        assert_eq!(grace, 5);
    }

    #[test]
    fn test_fetch_arguments() {
        let cli = Cli::try_parse_from(["quotes", "-v", "fetch", "--author", "Albert Einstein"])
            .unwrap();
        assert!(cli.verbose);
        let Commands::Fetch { author, query } = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(author.as_deref(), Some("Albert Einstein"));
        assert_eq!(query, None);
    }

    #[test]
    fn test_db_check_name() {
        let cli = Cli::try_parse_from(["quotes", "db-check"]).unwrap();
        assert!(matches!(cli.command, Commands::DbCheck));
    }
}
