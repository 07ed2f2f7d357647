use clap::{Args, Subcommand};
use colored::Colorize;
use hancock_pki::{CertificateType, CreateCaRequest};
use uuid::Uuid;

use super::{cert::print_cert, expiration_in, Context};
use crate::error::CliResult;

#[derive(Subcommand)]
pub enum CaCommand {
    /// Create a root CA, or an intermediate CA when --parent is given
    Create(CreateCaArgs),

    /// List your certificate authorities
    List,
}

#[derive(Args)]
pub struct CreateCaArgs {
    /// Name of the CA, also used as its common name
    #[arg(short, long)]
    name: String,

    /// Key the CA certifies
    #[arg(short, long)]
    key: Uuid,

    #[arg(long, default_value = "")]
    key_password: String,

    /// Parent CA that signs this one
    #[arg(long)]
    parent: Option<Uuid>,

    #[arg(long, default_value = "")]
    parent_key_password: String,

    #[arg(long, default_value = "")]
    organization: String,

    #[arg(long, default_value = "")]
    country: String,

    #[arg(long, default_value = "")]
    state: String,

    #[arg(long, default_value = "")]
    locality: String,

    #[arg(long, default_value = "")]
    street_address: String,

    #[arg(long, default_value = "")]
    postal_code: String,

    /// Validity in days
    #[arg(long, default_value_t = 3650)]
    days: i64,
}

pub fn handle(ctx: &Context, command: CaCommand) -> CliResult<()> {
    match command {
        CaCommand::Create(args) => {
            let request = CreateCaRequest {
                name: args.name,
                organization: args.organization,
                country: args.country,
                state: args.state,
                locality: args.locality,
                postal_code: args.postal_code,
                street_address: args.street_address,
                expiration: expiration_in(args.days)?,
                parent_ca: args.parent,
                parent_key_password: args.parent_key_password,
                key_id: args.key,
                key_password: args.key_password,
            };
            let ca = ctx.certs.create_ca(&request, ctx.user()?)?;
            println!("{} {} created", "✓".green(), ca.cert_type);
            print_cert(&ca);
        }
        CaCommand::List => {
            let cas = ctx.certs.get_user_certs(
                ctx.user()?,
                &[CertificateType::RootCa, CertificateType::IntermediateCa],
            )?;
            if cas.is_empty() {
                println!("{}", "no certificate authorities".yellow());
            }
            for ca in &cas {
                print_cert(ca);
            }
        }
    }
    Ok(())
}
