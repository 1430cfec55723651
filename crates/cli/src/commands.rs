//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tracing::{info, warn};

use glpi_batch_core::{
    export_template, glpi, load_file, spawn_batch, validate_config, Config, GlpiHttpClient,
    LoadReport, SanitizedConfig, SessionContext, TicketingApi,
};

pub fn template(path: &Path) -> Result<()> {
    export_template(path).context("Could not save the CSV template")?;
    println!("CSV template saved to {}", path.display());
    Ok(())
}

pub fn check(csv: &Path) -> Result<()> {
    let report = load_csv(csv)?;
    print_load_report(&report);
    Ok(())
}

pub async fn test_connection(config: &Config) -> Result<()> {
    validate_config(config).context("Configuration validation failed")?;
    let api = GlpiHttpClient::new(&config.glpi).context("Failed to create GLPI client")?;
    let mut session = SessionContext::from_config(&config.glpi);

    glpi::begin(&api, &mut session)
        .await
        .context("Failed to start session")?;
    println!("Session started successfully");

    glpi::end(&api, &mut session).await;
    Ok(())
}

pub async fn submit(config: &Config, csv: &Path) -> Result<()> {
    validate_config(config).context("Configuration validation failed")?;

    let report = load_csv(csv)?;
    print_load_report(&report);
    if report.is_empty() {
        bail!("No valid tickets to create in {}", csv.display());
    }

    let api: Arc<dyn TicketingApi> =
        Arc::new(GlpiHttpClient::new(&config.glpi).context("Failed to create GLPI client")?);
    let mut session = SessionContext::from_config(&config.glpi);
    glpi::begin(api.as_ref(), &mut session)
        .await
        .context("Failed to start session")?;

    let mut handle = spawn_batch(Arc::clone(&api), session.clone(), report.rows);
    let cancel = handle.cancel_signal();

    let interrupt = interrupt_signal();
    tokio::pin!(interrupt);
    let mut interrupted = false;

    loop {
        tokio::select! {
            progress = handle.next_progress() => match progress {
                Some(progress) => info!("{}", progress),
                None => break,
            },
            _ = &mut interrupt, if !interrupted => {
                interrupted = true;
                warn!("Processing interrupted by user, finishing the ticket in flight");
                cancel.cancel();
            }
        }
    }

    let result = handle.join().await;
    glpi::end(api.as_ref(), &mut session).await;
    let result = result.context("Batch run failed")?;

    println!("{}", result.summary(config.batch.summary_failure_limit));
    Ok(())
}

pub fn show_config(config: &Config) -> Result<()> {
    let sanitized = SanitizedConfig::from(config);
    println!("{}", serde_json::to_string_pretty(&sanitized)?);
    Ok(())
}

fn load_csv(csv: &Path) -> Result<LoadReport> {
    load_file(csv).with_context(|| format!("Could not read CSV file {}", csv.display()))
}

fn print_load_report(report: &LoadReport) {
    println!("{} valid tickets loaded", report.rows.len());
    if report.rejected_count() > 0 {
        println!("{} rows were skipped due to invalid data:", report.rejected_count());
        for rejected in &report.rejected {
            println!("  {}", rejected);
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM. Never resolves if no handler can be installed.
async fn interrupt_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
