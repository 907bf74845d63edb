use std::{fs, sync::Arc};

use outreach::{
    gateway::error::network_error,
    orchestrator::{CampaignOrchestrator, OrchestratorErrorKind, RerunPolicy},
    pipeline::SendLog,
    session::{FileSessionStore, InMemorySessionStore, SessionStore},
    types::SessionStatus,
};

use crate::support::{
    CannedGateway, EMAIL_RESPONSE, RESEARCH_RESPONSE, acme_prospect, campaign_config, scratch_dir,
};

fn orchestrator(
    gateway: Arc<CannedGateway>,
    store: Arc<dyn SessionStore>,
    root: &std::path::PathBuf,
    rerun_policy: RerunPolicy,
) -> CampaignOrchestrator {
    let campaign = campaign_config(root, rerun_policy);
    CampaignOrchestrator::new(gateway, store, SendLog::new(&campaign.data_dir), &campaign)
}

#[tokio::test]
async fn first_run_persists_a_pending_session() {
    let root = scratch_dir("campaign");
    let gateway = Arc::new(CannedGateway::with_responses(vec![
        Ok(RESEARCH_RESPONSE.to_string()),
        Ok(EMAIL_RESPONSE.to_string()),
    ]));
    let store = Arc::new(FileSessionStore::new(root.join("sessions")));
    let orchestrator = orchestrator(
        gateway.clone(),
        store.clone(),
        &root,
        RerunPolicy::Regenerate,
    );

    let session = orchestrator
        .run("p1", &acme_prospect(), false)
        .await
        .expect("run should succeed");

    assert_eq!(session.status, SessionStatus::PendingApproval);
    assert_eq!(session.enriched_data.quality_score, 40);
    assert!(session.result.is_none());
    assert_eq!(gateway.call_count(), 2, "one research call, one email call");

    let loaded = store.load("p1").expect("session should be persisted");
    assert_eq!(loaded, session);

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn approved_run_sends_and_records_the_first_contact() {
    let root = scratch_dir("campaign");
    let gateway = Arc::new(CannedGateway::with_responses(vec![
        Ok(RESEARCH_RESPONSE.to_string()),
        Ok(EMAIL_RESPONSE.to_string()),
    ]));
    let store = Arc::new(FileSessionStore::new(root.join("sessions")));
    let orchestrator = orchestrator(
        gateway.clone(),
        store.clone(),
        &root,
        RerunPolicy::Regenerate,
    );

    let prospect = acme_prospect();
    orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("first run should succeed");
    let sent = orchestrator
        .run("p1", &prospect, true)
        .await
        .expect("approved run should succeed");

    assert_eq!(sent.status, SessionStatus::Sent);
    let result = sent.result.as_ref().expect("sent session carries a record");
    assert_eq!(result.to, "jane.roe@acme.test");
    assert_eq!(result.prospect, "Acme");
    assert_eq!(result.status, "sent");
    // The approved branch resumes the stored session; no new LLM calls.
    assert_eq!(gateway.call_count(), 2);

    let log = SendLog::new(&root.join("data"));
    assert_eq!(log.read_all().len(), 1);

    let persisted = store.load("p1").expect("sent session should be persisted");
    assert_eq!(persisted.status, SessionStatus::Sent);

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn approving_a_degraded_session_surfaces_missing_recipient() {
    let root = scratch_dir("campaign");
    // Both stages degrade: no contacts will be stored.
    let gateway = Arc::new(CannedGateway::with_responses(vec![
        Err(network_error("research down")),
        Err(network_error("content down")),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator(
        gateway.clone(),
        store.clone(),
        &root,
        RerunPolicy::Regenerate,
    );

    let prospect = acme_prospect();
    let session = orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("degraded run still yields a pending session");
    assert_eq!(session.status, SessionStatus::PendingApproval);
    assert!(session.enriched_data.contacts.is_empty());
    assert!(session.enriched_data.error.is_some());

    let err = orchestrator
        .run("p1", &prospect, true)
        .await
        .expect_err("no recipient means no send");
    assert_eq!(err.kind, OrchestratorErrorKind::MissingRecipient);

    // Blocked send leaves the stored session pending and the log empty.
    let stored = store.load("p1").expect("session should remain");
    assert_eq!(stored.status, SessionStatus::PendingApproval);
    assert!(SendLog::new(&root.join("data")).read_all().is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn log_write_failure_blocks_the_sent_transition() {
    let root = scratch_dir("campaign");
    // A regular file where the data directory should be makes every
    // send-log write fail.
    fs::write(root.join("data"), "not a directory").expect("blocker file should be written");

    let gateway = Arc::new(CannedGateway::with_responses(vec![
        Ok(RESEARCH_RESPONSE.to_string()),
        Ok(EMAIL_RESPONSE.to_string()),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator(
        gateway.clone(),
        store.clone(),
        &root,
        RerunPolicy::Regenerate,
    );

    let prospect = acme_prospect();
    orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("first run should succeed");

    let err = orchestrator
        .run("p1", &prospect, true)
        .await
        .expect_err("unwritable log must block the send");
    assert_eq!(err.kind, OrchestratorErrorKind::LogWrite);

    let stored = store.load("p1").expect("session should remain");
    assert_eq!(stored.status, SessionStatus::PendingApproval);
    assert!(stored.result.is_none());

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn re_approving_a_sent_session_appends_another_record() {
    let root = scratch_dir("campaign");
    let gateway = Arc::new(CannedGateway::with_responses(vec![
        Ok(RESEARCH_RESPONSE.to_string()),
        Ok(EMAIL_RESPONSE.to_string()),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator(
        gateway.clone(),
        store.clone(),
        &root,
        RerunPolicy::Regenerate,
    );

    let prospect = acme_prospect();
    orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("first run should succeed");
    orchestrator
        .run("p1", &prospect, true)
        .await
        .expect("first approval should succeed");
    let resent = orchestrator
        .run("p1", &prospect, true)
        .await
        .expect("re-approval resumes the stored session");

    // Deduplicating re-approvals is the caller's responsibility; the
    // orchestrator publishes the stored session again.
    assert_eq!(resent.status, SessionStatus::Sent);
    assert_eq!(SendLog::new(&root.join("data")).read_all().len(), 2);

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn regenerate_policy_reruns_the_pipeline_on_repeat_calls() {
    let root = scratch_dir("campaign");
    let gateway = Arc::new(CannedGateway::with_responses(vec![
        Ok(RESEARCH_RESPONSE.to_string()),
        Ok(EMAIL_RESPONSE.to_string()),
        Ok(RESEARCH_RESPONSE.to_string()),
        Ok(EMAIL_RESPONSE.to_string()),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator(
        gateway.clone(),
        store.clone(),
        &root,
        RerunPolicy::Regenerate,
    );

    let prospect = acme_prospect();
    orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("first run should succeed");
    orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("second run should succeed");

    assert_eq!(gateway.call_count(), 4, "both runs hit the gateway");

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn reuse_existing_policy_returns_the_cached_session() {
    let root = scratch_dir("campaign");
    let gateway = Arc::new(CannedGateway::with_responses(vec![
        Ok(RESEARCH_RESPONSE.to_string()),
        Ok(EMAIL_RESPONSE.to_string()),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator(
        gateway.clone(),
        store.clone(),
        &root,
        RerunPolicy::ReuseExisting,
    );

    let prospect = acme_prospect();
    let first = orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("first run should succeed");
    let second = orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("repeat run should succeed");

    assert_eq!(first, second);
    assert_eq!(gateway.call_count(), 2, "repeat run must not hit the gateway");

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn approve_without_a_session_is_refused() {
    let root = scratch_dir("campaign");
    let gateway = Arc::new(CannedGateway::with_responses(vec![]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator(gateway, store, &root, RerunPolicy::Regenerate);

    let err = orchestrator
        .approve("missing")
        .await
        .expect_err("approval without a session must fail");
    assert_eq!(err.kind, OrchestratorErrorKind::NoSession);

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn approved_send_uses_the_stored_email_even_if_edited() {
    let root = scratch_dir("campaign");
    let gateway = Arc::new(CannedGateway::with_responses(vec![
        Ok(RESEARCH_RESPONSE.to_string()),
        Ok(EMAIL_RESPONSE.to_string()),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator(
        gateway.clone(),
        store.clone(),
        &root,
        RerunPolicy::Regenerate,
    );

    let prospect = acme_prospect();
    let mut session = orchestrator
        .run("p1", &prospect, false)
        .await
        .expect("first run should succeed");

    // Dashboard-style edit round-tripped through the store before approval.
    session.email.subject = "edited subject".to_string();
    store.save("p1", &session).expect("edited save should succeed");

    let sent = orchestrator
        .run("p1", &prospect, true)
        .await
        .expect("approved run should succeed");
    assert_eq!(
        sent.result.expect("delivery record expected").subject,
        "edited subject"
    );

    let _ = fs::remove_dir_all(&root);
}
