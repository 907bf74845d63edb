use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    config::CampaignConfig,
    gateway::CompletionGateway,
    pipeline::{
        PublishError, PublishErrorKind, SendLog, enrich, generate_email, send,
    },
    session::{SessionStore, SessionStoreError},
    types::{Prospect, Session, SessionStatus},
};

/// What to do when `run` is called without approval while a session
/// already exists. `Regenerate` re-runs enrichment and generation every
/// time (the historical behavior, paying one LLM round-trip per call);
/// `ReuseExisting` returns the stored pending session untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerunPolicy {
    #[default]
    Regenerate,
    ReuseExisting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorErrorKind {
    /// Approved send on a prospect with no usable contact. Surfaced to
    /// the caller; the stored session stays pending.
    MissingRecipient,
    /// Send log persistence failed; the sent transition is blocked.
    LogWrite,
    /// Session persistence failed for this action.
    SessionWrite,
    /// Approval was requested for a prospect with no stored session.
    NoSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorError {
    pub kind: OrchestratorErrorKind,
    pub message: String,
}

impl OrchestratorError {
    pub fn new(kind: OrchestratorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OrchestratorError {}

impl From<PublishError> for OrchestratorError {
    fn from(err: PublishError) -> Self {
        let kind = match err.kind {
            PublishErrorKind::MissingRecipient => OrchestratorErrorKind::MissingRecipient,
            PublishErrorKind::LogWrite => OrchestratorErrorKind::LogWrite,
        };
        Self::new(kind, err.message)
    }
}

impl From<SessionStoreError> for OrchestratorError {
    fn from(err: SessionStoreError) -> Self {
        Self::new(OrchestratorErrorKind::SessionWrite, err.message)
    }
}

/// Workflow coordinator: decides per call whether to resume a stored
/// session (approved send) or run the enrich + generate pipeline and
/// persist a fresh pending session.
pub struct CampaignOrchestrator {
    gateway: Arc<dyn CompletionGateway>,
    store: Arc<dyn SessionStore>,
    send_log: SendLog,
    rerun_policy: RerunPolicy,
    email_min_words: u32,
    email_max_words: u32,
}

impl CampaignOrchestrator {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        store: Arc<dyn SessionStore>,
        send_log: SendLog,
        campaign: &CampaignConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            send_log,
            rerun_policy: campaign.rerun_policy,
            email_min_words: campaign.email_min_words,
            email_max_words: campaign.email_max_words,
        }
    }

    pub fn rerun_policy(&self) -> RerunPolicy {
        self.rerun_policy
    }

    /// One orchestration step for a prospect. The only transition into
    /// `sent` is an approved call over an existing session; everything
    /// else produces (or reuses) a `pending_approval` session.
    ///
    /// Approving an already-sent session publishes again and appends a
    /// second delivery record: the approved branch resumes whatever
    /// session is stored, regardless of its status. Deduplicating
    /// re-approvals is the dashboard's call, not the orchestrator's.
    pub async fn run(
        &self,
        prospect_id: &str,
        prospect: &Prospect,
        approved: bool,
    ) -> Result<Session, OrchestratorError> {
        if let Some(mut session) = self.store.load(prospect_id) {
            if approved {
                let record = send(&session.email, &session.enriched_data, &self.send_log)?;
                session.status = SessionStatus::Sent;
                session.result = Some(record);
                self.store.save(prospect_id, &session)?;
                tracing::info!(
                    target: "orchestrator",
                    prospect_id,
                    company = %session.enriched_data.company_name,
                    "campaign_sent"
                );
                return Ok(session);
            }

            if self.rerun_policy == RerunPolicy::ReuseExisting
                && session.status == SessionStatus::PendingApproval
            {
                tracing::debug!(
                    target: "orchestrator",
                    prospect_id,
                    company = %session.enriched_data.company_name,
                    "session_reused"
                );
                return Ok(session);
            }
        }

        let enriched = enrich(self.gateway.as_ref(), prospect).await;
        let email = generate_email(
            self.gateway.as_ref(),
            &enriched,
            self.email_min_words,
            self.email_max_words,
        )
        .await;

        let session = Session::pending(enriched, email);
        self.store.save(prospect_id, &session)?;
        tracing::info!(
            target: "orchestrator",
            prospect_id,
            company = %session.enriched_data.company_name,
            quality_score = session.enriched_data.quality_score,
            degraded = session.enriched_data.error.is_some(),
            "campaign_pending_approval"
        );
        Ok(session)
    }

    /// Approves and sends an existing session without supplying a
    /// prospect record; errors when no session is stored rather than
    /// enriching a placeholder.
    pub async fn approve(&self, prospect_id: &str) -> Result<Session, OrchestratorError> {
        if self.store.load(prospect_id).is_none() {
            return Err(OrchestratorError::new(
                OrchestratorErrorKind::NoSession,
                format!("no session stored for prospect '{prospect_id}'"),
            ));
        }
        // The prospect argument is unused on the approved branch.
        self.run(prospect_id, &Prospect::new("Unknown"), true).await
    }
}
