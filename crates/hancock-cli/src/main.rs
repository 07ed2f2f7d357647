//! `hancock`: certificate authority and key management from the shell.

mod commands;
mod error;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{ca::CaCommand, cert::CertCommand, key::KeyCommand, Context},
    error::CliResult,
    settings::Settings,
};

#[derive(Parser)]
#[command(name = "hancock")]
#[command(about = "Hancock - X.509 certificate authority and key management")]
#[command(version)]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = "hancock.toml")]
    config: PathBuf,

    /// Owner id the command acts for
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage private keys
    #[command(subcommand)]
    Key(KeyCommand),

    /// Manage certificate authorities
    #[command(subcommand)]
    Ca(CaCommand),

    /// Issue and inspect certificates
    #[command(subcommand)]
    Cert(CertCommand),
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let settings = Settings::load(&cli.config)?;
    init_tracing(&settings.log.level);
    tracing::debug!(
        config = %cli.config.display(),
        data_dir = %settings.storage.data_dir.display(),
        "loaded settings"
    );

    let ctx = Context::open(&settings, cli.user)?;
    match cli.command {
        Commands::Key(command) => commands::key::handle(&ctx, command),
        Commands::Ca(command) => commands::ca::handle(&ctx, command),
        Commands::Cert(command) => commands::cert::handle(&ctx, command),
    }
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("{} {}", "✗".red(), err.user_message());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue() {
        let cli = Cli::try_parse_from([
            "hancock",
            "--user",
            "alice",
            "cert",
            "issue",
            "--ca",
            "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "--name",
            "web",
            "--key",
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "--common-name",
            "www.example.com",
            "--san",
            "example.com",
            "--usage",
            "digitalSignature",
            "--usage",
            "serverAuth",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert!(matches!(cli.command, Commands::Cert(CertCommand::Issue(_))));
    }

    #[test]
    fn test_parse_typed_values() {
        let cli = Cli::try_parse_from([
            "hancock", "key", "create", "--name", "k", "--algorithm", "ed25519",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Key(KeyCommand::Create {
                algorithm: hancock_key::KeyAlgorithm::Ed25519,
                ..
            })
        ));

        assert!(Cli::try_parse_from(["hancock", "key", "create", "--name", "k", "--algorithm", "dsa"])
            .is_err());
        assert!(Cli::try_parse_from(["hancock", "cert", "list", "--type", "leaf"]).is_err());
        assert!(Cli::try_parse_from(["hancock", "cert", "list", "--type", "root_ca"]).is_ok());
    }
}
