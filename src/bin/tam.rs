// src/bin/tam.rs
//! `tam`: export and import Track-A-Mole backups from the command line

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rpassword::prompt_password;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trackamole_backup::container;
use trackamole_backup::{load_config, BackupService, ContainerKind, SqliteStore};

#[derive(Parser)]
#[command(name = "tam", version, about = "Track-A-Mole backup tool")]
struct Cli {
    /// Local record store (overrides config and TAM_STORE_DB)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write every record to a backup file
    Export {
        /// Output directory (defaults to the configured export dir)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Protect the backup with a password
        #[arg(long)]
        encrypt: bool,
    },
    /// Replace every record with the contents of a backup file
    Import {
        file: PathBuf,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Show what a backup file contains without importing it
    Inspect { file: PathBuf },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config();

    let store_path = cli.store.clone().unwrap_or_else(|| config.store_db_path());
    let open_store = || {
        SqliteStore::open(&store_path, config.store_key().as_ref())
            .with_context(|| format!("Failed to open local store {}", store_path.display()))
    };

    match cli.command {
        Command::Export { out, encrypt } => {
            let service = BackupService::from_config(open_store()?, config);
            let password = if encrypt {
                Some(read_new_password()?)
            } else {
                None
            };
            let dir = out.unwrap_or_else(|| config.paths.export_dir.clone());
            let path = service
                .export_to_dir(&dir, password.as_deref())
                .context("Export failed")?;
            info!("Backup written → {}", path.display());
        }
        Command::Import { file, yes } => {
            let bytes =
                std::fs::read(&file).with_context(|| format!("Cannot read {}", file.display()))?;

            let password = match container::detect(&bytes) {
                Ok(ContainerKind::Encrypted) => Some(prompt_password("Backup password: ")?),
                _ => None,
            };

            if !yes
                && !confirm("Importing data will replace all your current mole records. Continue?")?
            {
                println!("  → cancelled");
                return Ok(());
            }

            let mut service = BackupService::from_config(open_store()?, config);
            match service.import_data(&bytes, password.as_deref()) {
                Ok(report) => info!("Data imported successfully: {}", report.summary),
                Err(e) => {
                    warn!(error = %e, "import failed");
                    bail!("Import failed. {}.", e.user_message());
                }
            }
        }
        Command::Inspect { file } => {
            let bytes =
                std::fs::read(&file).with_context(|| format!("Cannot read {}", file.display()))?;
            match container::detect(&bytes) {
                Ok(ContainerKind::Plain) => {
                    let dataset = container::deserialize(&bytes)
                        .context("Plaintext backup is not valid")?;
                    println!("plaintext backup: {}", dataset.summary());
                }
                Ok(ContainerKind::Encrypted) => {
                    let envelope = container::parse_envelope(&bytes)?;
                    println!(
                        "encrypted backup: {} (m={} KiB, t={}, p={}), {}",
                        envelope.kdf.algorithm,
                        envelope.kdf.memory_kib,
                        envelope.kdf.iterations,
                        envelope.kdf.parallelism,
                        envelope.cipher
                    );
                }
                Err(e) => bail!("Not a Track-A-Mole backup: {e}"),
            }
        }
    }

    Ok(())
}

fn read_new_password() -> Result<String> {
    let first = prompt_password("New backup password: ")?;
    if first.trim().is_empty() {
        bail!("Password must not be empty");
    }
    let second = prompt_password("Repeat password: ")?;
    if first != second {
        bail!("Passwords do not match");
    }
    Ok(first)
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
