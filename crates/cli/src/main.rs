use crate::{commands::Commands, error::CliError};
use clap::Parser;
use connectors::{
    container::ContainerStore,
    delete::{ContactDeleter, StoreBackedDeleter},
    file::csv::CsvSource,
    log::TracingLog,
    memory::FixedTokenProvider,
    rest::{
        auth::{AuthClient, AuthConfig, TokenProvider},
        delete::RestContactDeleter,
    },
    source::{DEFAULT_PAGE_SIZE, SubscriberSource},
};
use engine::{
    containers::SledContainers,
    delete::{DeletionOrchestrator, DeletionOutcome},
    extract::{ExtractionOrchestrator, RunOutcome},
    ledger::{LedgerStore, sled_store::SledLedger},
    replicator::DualWriter,
    router::CapacityPolicy,
    settings::EngineSettings,
};
use model::{ledger::LedgerCategory, naming::NamingScheme};
use std::{path::PathBuf, sync::Arc};
use tracing::Level;

mod commands;
mod error;

#[derive(Parser)]
#[command(
    name = "cull",
    version = "0.1.0",
    about = "Checkpointed subscriber batch extraction and deletion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            source,
            capacity,
            page_size,
            state_dir,
            active_prefix,
            backup_prefix,
        } => {
            let state = state_path(state_dir)?;
            let mut settings =
                EngineSettings::default().with_naming(naming(active_prefix, backup_prefix));
            if let Some(capacity) = capacity {
                settings = settings.with_capacity(capacity);
            }

            let ledger: Arc<dyn LedgerStore> = Arc::new(SledLedger::open(state.join("ledger"))?);
            let containers: Arc<dyn ContainerStore> =
                Arc::new(SledContainers::open(state.join("containers"))?);
            let csv: Arc<dyn SubscriberSource> = Arc::new(CsvSource::new(
                &source,
                page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            ));

            let orchestrator = ExtractionOrchestrator::new(
                ledger,
                csv,
                DualWriter::new(containers, settings.naming.clone()),
                CapacityPolicy::new(settings.batch_capacity),
                Arc::new(TracingLog),
            );
            print_extraction(&orchestrator.run().await);
        }

        Commands::Delete {
            state_dir,
            local,
            active_prefix,
            backup_prefix,
        } => {
            let state = state_path(state_dir)?;
            let ledger: Arc<dyn LedgerStore> = Arc::new(SledLedger::open(state.join("ledger"))?);

            let (tokens, deleter): (Arc<dyn TokenProvider>, Arc<dyn ContactDeleter>) = if local {
                let containers: Arc<dyn ContainerStore> =
                    Arc::new(SledContainers::open(state.join("containers"))?);
                (
                    Arc::new(FixedTokenProvider::default()),
                    Arc::new(StoreBackedDeleter::new(containers)),
                )
            } else {
                (
                    Arc::new(AuthClient::new(AuthConfig::from_env()?)),
                    Arc::new(RestContactDeleter::new()),
                )
            };

            let orchestrator = DeletionOrchestrator::new(
                ledger,
                tokens,
                deleter,
                naming(active_prefix, backup_prefix),
                Arc::new(TracingLog),
            );
            print_deletion(&orchestrator.run().await);
        }

        Commands::Progress { state_dir, json } => {
            let state = state_path(state_dir)?;
            let ledger = SledLedger::open(state.join("ledger"))?;
            show_progress(&ledger, json).await?;
        }
    }

    Ok(())
}

fn state_path(state_dir: Option<String>) -> Result<PathBuf, CliError> {
    match state_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => {
            let home = dirs::home_dir().ok_or(CliError::NoHomeDir)?;
            Ok(home.join(".cull"))
        }
    }
}

fn naming(active_prefix: Option<String>, backup_prefix: Option<String>) -> NamingScheme {
    let defaults = NamingScheme::default();
    NamingScheme::new(
        active_prefix.unwrap_or(defaults.active_prefix),
        backup_prefix.unwrap_or(defaults.backup_prefix),
    )
}

fn print_extraction(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Committed {
            batch,
            rows,
            cursor,
            batch_full,
        } => {
            println!("Batch {} committed ({} rows, cursor {cursor})", batch.label(), rows);
            if *batch_full {
                println!("Batch reached capacity; the next run continues from here.");
            }
        }
        RunOutcome::SourceDrained { cursor } => {
            println!("Source drained at cursor {cursor}; nothing committed.");
        }
        RunOutcome::Failed { error } => {
            println!("Run failed, nothing committed: {error}");
        }
    }
}

fn print_deletion(outcome: &DeletionOutcome) {
    match outcome {
        DeletionOutcome::Committed { batch, container } => {
            println!("Batch {} deleted (container '{container}')", batch.label());
        }
        DeletionOutcome::NothingPending => {
            println!("No pending batches to delete.");
        }
        DeletionOutcome::Failed {
            batch,
            phase,
            error,
        } => match batch {
            Some(batch) => println!(
                "Deletion of batch {} failed at {phase:?}; it stays pending: {error}",
                batch.label()
            ),
            None => println!("Deletion run failed: {error}"),
        },
    }
}

async fn show_progress(ledger: &SledLedger, as_json: bool) -> Result<(), CliError> {
    let creation = ledger.latest(LedgerCategory::BatchCreation).await?;
    let deletion = ledger.latest(LedgerCategory::BatchDeletion).await?;

    if as_json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "batch_creation": creation,
            "batch_deletion": deletion,
        }))
        .map_err(CliError::JsonSerialize)?;
        println!("{json}");
        return Ok(());
    }

    println!("Ledger progress:");
    println!("-----------------------------");
    match creation {
        Some(entry) => println!(
            "{:<18} {} (cursor {}, committed {})",
            "Last extraction",
            entry.batch_label,
            entry.last_row_key,
            entry.committed_at.to_rfc3339()
        ),
        None => println!("{:<18} none", "Last extraction"),
    }
    match deletion {
        Some(entry) => println!(
            "{:<18} {} (committed {})",
            "Last deletion",
            entry.batch_label,
            entry.committed_at.to_rfc3339()
        ),
        None => println!("{:<18} none", "Last deletion"),
    }

    Ok(())
}
