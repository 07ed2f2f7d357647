pub mod ca;
pub mod cert;
pub mod key;

use std::{fs, path::Path, sync::Arc};

use colored::Colorize;
use hancock_key::{FileKeyRepository, KeyService};
use hancock_pki::{CertificateService, FileCertRepository};
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};

use crate::{
    error::{CliError, CliResult},
    settings::Settings,
};

/// Services opened on the configured data directory, plus the caller.
pub struct Context {
    pub keys: KeyService,
    pub certs: CertificateService,
    user: Option<String>,
}

impl Context {
    pub fn open(settings: &Settings, user: Option<String>) -> CliResult<Self> {
        let data_dir = &settings.storage.data_dir;
        let key_repo = FileKeyRepository::new(data_dir.join("keys"))?;
        let cert_repo = FileCertRepository::new(data_dir.join("certs"))?;

        let keys = KeyService::new(Arc::new(key_repo), settings.keys.clone());
        let certs = CertificateService::new(Arc::new(cert_repo), keys.clone(), settings.pki.clone());

        Ok(Self { keys, certs, user })
    }

    /// Owner id for the operation
    pub fn user(&self) -> CliResult<&str> {
        match self.user.as_deref() {
            Some(user) if !user.trim().is_empty() => Ok(user),
            _ => Err(CliError::InvalidInput("--user is required".to_string())),
        }
    }
}

pub(crate) fn expiration_in(days: i64) -> CliResult<OffsetDateTime> {
    if days <= 0 {
        return Err(CliError::InvalidInput("--days must be positive".to_string()));
    }
    Ok(OffsetDateTime::now_utc() + Duration::days(days))
}

pub(crate) fn timestamp(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_default()
}

/// Write `content` to `out`, or print it when no path is given
pub(crate) fn emit(content: &str, out: Option<&Path>) -> CliResult<()> {
    match out {
        Some(path) => {
            fs::write(path, content)?;
            println!("{} written to {}", "✓".green(), path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
