//! Tradepost CLI - migrations and back-office user management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! tp-cli migrate
//!
//! # Create a user
//! tp-cli user create -u dispatch -e dispatch@shop.example -p '…' -r staff
//!
//! # Reset a password
//! tp-cli user set-password -u dispatch -p '…'
//!
//! # Print a session token for scripting
//! tp-cli token issue -u dispatch
//! ```
//!
//! Connection settings come from `DATABASE_URL` or `DB_USER`/`DB_PASSWORD`/
//! `DB_HOST`/`DB_NAME`, read from the environment or `.env`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(author, version, about = "Tradepost CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage back-office users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Session tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Falls back to `TP_PASSWORD` so it stays out of shell history
        #[arg(short, long, env = "TP_PASSWORD", hide_env_values = true)]
        password: String,

        /// `admin`, `staff` or `viewer`
        #[arg(short, long, default_value = "staff")]
        role: String,
    },
    /// Replace a user's password
    SetPassword {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "TP_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Print a signed token for a user
    Issue {
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
                role,
            } => {
                commands::user::create(&username, &email, &password, &role).await?;
            }
            UserAction::SetPassword { username, password } => {
                commands::user::set_password(&username, &password).await?;
            }
        },
        Commands::Token { action } => match action {
            TokenAction::Issue { username } => {
                let token = commands::token::issue(&username).await?;
                #[allow(clippy::print_stdout)]
                {
                    println!("{token}");
                }
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_user_create() {
        let cli = Cli::try_parse_from([
            "tp-cli", "user", "create", "-u", "ops", "-e", "ops@shop.example", "-p",
            "correct horse battery", "-r", "admin",
        ])
        .expect("parse");
        match cli.command {
            Commands::User {
                action: UserAction::Create { username, role, .. },
            } => {
                assert_eq!(username, "ops");
                assert_eq!(role, "admin");
            }
            _ => panic!("expected user create"),
        }
    }
}
