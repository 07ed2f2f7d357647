use std::path::PathBuf;

use clap::{Args, Subcommand};
use colored::Colorize;
use hancock_pki::{CertificateLight, CertificateType, CreateCertificateRequest};
use uuid::Uuid;

use super::{emit, expiration_in, timestamp, Context};
use crate::error::CliResult;

#[derive(Subcommand)]
pub enum CertCommand {
    /// Issue a leaf certificate under a CA
    Issue(IssueArgs),

    /// Show a certificate as JSON
    Show {
        #[arg(long)]
        id: Uuid,
    },

    /// Print the certificate in PEM form
    Pem {
        #[arg(long)]
        id: Uuid,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    Delete {
        #[arg(long)]
        id: Uuid,
    },

    /// List your certificates, optionally by type
    List {
        /// root_ca, intermediate_ca or certificate; repeatable
        #[arg(long = "type")]
        types: Vec<CertificateType>,
    },

    /// List your certificates issued directly by a CA
    Children {
        #[arg(long)]
        ca: Uuid,
    },
}

#[derive(Args)]
pub struct IssueArgs {
    /// Issuing CA
    #[arg(long)]
    ca: Uuid,

    #[arg(long, default_value = "")]
    ca_key_password: String,

    #[arg(short, long)]
    name: String,

    /// Key the certificate certifies
    #[arg(short, long)]
    key: Uuid,

    #[arg(long, default_value = "")]
    key_password: String,

    #[arg(long)]
    common_name: String,

    /// Extra DNS name; repeatable
    #[arg(long = "san")]
    sans: Vec<String>,

    /// Key usage or extended key usage name; repeatable
    #[arg(long = "usage")]
    usages: Vec<String>,

    /// Validity in days
    #[arg(long, default_value_t = 365)]
    days: i64,
}

pub fn handle(ctx: &Context, command: CertCommand) -> CliResult<()> {
    match command {
        CertCommand::Issue(args) => {
            let request = CreateCertificateRequest {
                name: args.name,
                key_id: args.key,
                key_password: args.key_password,
                key_usages: args.usages,
                common_name: args.common_name,
                subject_alternative_names: args.sans,
                expiration: expiration_in(args.days)?,
                ca_key_password: args.ca_key_password,
            };
            let cert = ctx.certs.create_cert(args.ca, &request, ctx.user()?)?;
            println!("{} certificate issued", "✓".green());
            print_cert(&cert);
        }
        CertCommand::Show { id } => {
            let cert = ctx.certs.get_cert_for_user(id, ctx.user()?)?;
            println!("{}", serde_json::to_string_pretty(&cert)?);
        }
        CertCommand::Pem { id, out } => {
            let pem = ctx.certs.get_cert_as_pem_for_user(id, ctx.user()?)?;
            emit(&pem, out.as_deref())?;
        }
        CertCommand::Delete { id } => {
            ctx.certs.delete_cert_for_user(id, ctx.user()?)?;
            println!("{} certificate {id} deleted", "✓".green());
        }
        CertCommand::List { types } => {
            let certs = ctx.certs.get_user_certs(ctx.user()?, &types)?;
            print_all(&certs);
        }
        CertCommand::Children { ca } => {
            let certs = ctx.certs.get_certs_by_parent_ca_for_user(ca, ctx.user()?)?;
            print_all(&certs);
        }
    }
    Ok(())
}

fn print_all(certs: &[CertificateLight]) {
    if certs.is_empty() {
        println!("{}", "no certificates".yellow());
    }
    for cert in certs {
        print_cert(cert);
    }
}

pub(crate) fn print_cert(cert: &CertificateLight) {
    println!(
        "{}  {:<15} {}  {}",
        cert.id.to_string().bold(),
        cert.cert_type.to_string(),
        timestamp(cert.created_at),
        cert.name
    );
}
