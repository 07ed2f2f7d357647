use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;
use hancock_key::{KeyAlgorithm, KeyLight};
use uuid::Uuid;

use super::{emit, timestamp, Context};
use crate::error::CliResult;

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Generate and store a new private key
    Create {
        #[arg(short, long)]
        name: String,

        /// ECDSA (P-521), ED25519 or RSA (4096 bits by default)
        #[arg(short, long)]
        algorithm: KeyAlgorithm,

        /// Encrypt the stored key with this passphrase
        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// List your keys
    List,

    /// Print the stored PEM, still encrypted if it was created with a passphrase
    Export {
        #[arg(long)]
        id: Uuid,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the supported key algorithms
    Types,
}

pub fn handle(ctx: &Context, command: KeyCommand) -> CliResult<()> {
    match command {
        KeyCommand::Create {
            name,
            algorithm,
            password,
        } => {
            println!("{}", format!("Generating {algorithm} key...").cyan());
            let key = ctx.keys.create_key(ctx.user()?, &name, algorithm, &password)?;
            println!("{} key created", "✓".green());
            print_key(&key);
        }
        KeyCommand::List => {
            let keys = ctx.keys.get_keys_for_user(ctx.user()?)?;
            if keys.is_empty() {
                println!("{}", "no keys".yellow());
            }
            for key in &keys {
                print_key(key);
            }
        }
        KeyCommand::Export { id, out } => {
            let pem = ctx.keys.get_key_as_pem_for_user(id, ctx.user()?)?;
            emit(&pem, out.as_deref())?;
        }
        KeyCommand::Types => {
            for algorithm in ctx.keys.supported_algorithms() {
                println!("{algorithm}");
            }
        }
    }
    Ok(())
}

fn print_key(key: &KeyLight) {
    println!(
        "{}  {:<8} {}  {}",
        key.id.to_string().bold(),
        key.algorithm.to_string(),
        timestamp(key.created_at),
        key.name
    );
}
