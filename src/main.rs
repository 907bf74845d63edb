use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};

use outreach::{
    cli::{CliCommand, parse_args},
    config::Config,
    gateway::{EnvCredentialProvider, GeminiClient},
    logging::init_tracing,
    orchestrator::CampaignOrchestrator,
    pipeline::SendLog,
    session::FileSessionStore,
    types::Prospect,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let config = Config::load_or_default(&args.config_path)
        .with_context(|| format!("failed to load config from {}", args.config_path.display()))?;

    let logging_guard = init_tracing(&config.logging)?;
    tracing::info!(
        target: "outreach",
        run_id = %logging_guard.run_id(),
        config = %args.config_path.display(),
        "starting"
    );

    let gateway = Arc::new(
        GeminiClient::new(config.gateway.clone(), Arc::new(EnvCredentialProvider))
            .context("failed to construct gemini gateway")?,
    );
    let store = Arc::new(FileSessionStore::new(config.campaign.sessions_dir.clone()));
    let send_log = SendLog::new(&config.campaign.data_dir);
    let orchestrator = CampaignOrchestrator::new(gateway, store, send_log, &config.campaign);

    match args.command {
        CliCommand::RunProspects { prospects_path } => {
            run_prospects(&orchestrator, &prospects_path).await
        }
        CliCommand::Approve { prospect_id } => approve(&orchestrator, &prospect_id).await,
    }
}

/// Sequential bulk run: one prospect at a time, one gateway round-trip
/// per stage, matching the single-user interactive model. A failure on
/// one prospect does not stop the rest of the batch.
async fn run_prospects(orchestrator: &CampaignOrchestrator, prospects_path: &Path) -> Result<()> {
    let content = fs::read_to_string(prospects_path)
        .with_context(|| format!("failed to read {}", prospects_path.display()))?;
    let prospects: Vec<Prospect> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", prospects_path.display()))?;

    tracing::info!(
        target: "outreach",
        file = %prospects_path.display(),
        count = prospects.len(),
        "prospects_loaded"
    );

    let mut failures = 0usize;
    for (index, prospect) in prospects.iter().enumerate() {
        let prospect_id = assigned_id(prospect, index);
        match orchestrator.run(&prospect_id, prospect, false).await {
            Ok(session) => {
                tracing::info!(
                    target: "outreach",
                    prospect_id = %prospect_id,
                    company = %session.enriched_data.company_name,
                    status = ?session.status,
                    quality_score = session.enriched_data.quality_score,
                    subject = %session.email.subject,
                    "prospect_processed"
                );
            }
            Err(err) => {
                failures += 1;
                tracing::error!(
                    target: "outreach",
                    prospect_id = %prospect_id,
                    error = %err,
                    "prospect_failed"
                );
            }
        }
    }

    if failures > 0 {
        tracing::warn!(target: "outreach", failures, "run_finished_with_failures");
    }
    Ok(())
}

async fn approve(orchestrator: &CampaignOrchestrator, prospect_id: &str) -> Result<()> {
    let session = orchestrator
        .approve(prospect_id)
        .await
        .with_context(|| format!("failed to approve prospect '{prospect_id}'"))?;

    let result = session
        .result
        .as_ref()
        .context("sent session is missing its delivery record")?;
    tracing::info!(
        target: "outreach",
        prospect_id,
        to = %result.to,
        subject = %result.subject,
        sent_at = %result.sent_at,
        "approved_and_sent"
    );
    Ok(())
}

/// Prospect records may carry their own `prospect_id`; otherwise ids
/// are positional, stable across re-runs of the same file.
fn assigned_id(prospect: &Prospect, index: usize) -> String {
    prospect
        .extra
        .get("prospect_id")
        .and_then(|value| value.as_str())
        .map(|id| id.to_string())
        .unwrap_or_else(|| format!("prospect-{index}"))
}
