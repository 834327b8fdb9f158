//! Request Desk CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! request-desk-cli migrate
//!
//! # Seed accounts and the settings row
//! request-desk-cli seed --file seed/default.yaml
//!
//! # Create (or reset) one account
//! request-desk-cli user create -e ana@exemplo.com -p 's3cret' -r responsavel
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed users and settings from YAML
//! - `user create` - Create or overwrite a user

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "request-desk-cli")]
#[command(author, version, about = "Request Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed users and the settings row from a YAML file
    Seed {
        /// Path to the seed file
        #[arg(short, long, default_value = "seed/default.yaml")]
        file: PathBuf,
    },
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user, replacing password and role if the email exists
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Password in clear; stored as an Argon2id hash
        #[arg(short, long)]
        password: String,

        /// Role (`solicitante`, `responsavel`, `solicitante_ti`, `responsavel_ti`)
        #[arg(short, long, default_value = "solicitante")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                role,
            } => commands::user::create(&email, &password, &role).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_user_create_args() {
        let cli = Cli::try_parse_from([
            "request-desk-cli",
            "user",
            "create",
            "-e",
            "ana@exemplo.com",
            "-p",
            "pw",
            "-r",
            "responsavel_ti",
        ])
        .unwrap();
        let Commands::User {
            action: UserAction::Create { email, role, .. },
        } = cli.command
        else {
            panic!("expected user create");
        };
        assert_eq!(email, "ana@exemplo.com");
        assert_eq!(role, "responsavel_ti");
    }

    #[test]
    fn test_seed_defaults_file() {
        let cli = Cli::try_parse_from(["request-desk-cli", "seed"]).unwrap();
        let Commands::Seed { file } = cli.command else {
            panic!("expected seed");
        };
        assert_eq!(file, PathBuf::from("seed/default.yaml"));
    }
}
