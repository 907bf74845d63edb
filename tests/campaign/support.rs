use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use outreach::{
    config::CampaignConfig,
    gateway::{CompletionGateway, GatewayError, error::internal_error},
    orchestrator::RerunPolicy,
    types::{Contact, DraftEmail, EnrichedProspect, Prospect, Session},
};

/// Gateway fake replaying queued results; counts calls so rerun-policy
/// tests can assert whether the pipeline actually ran.
pub struct CannedGateway {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: AtomicUsize,
}

impl CannedGateway {
    pub fn with_responses(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionGateway for CannedGateway {
    async fn complete(&self, _prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .expect("response mutex")
            .pop_front()
            .unwrap_or_else(|| Err(internal_error("no canned response left")))
    }
}

pub fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("outreach-{label}-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).expect("scratch dir should be created");
    dir
}

pub fn campaign_config(root: &PathBuf, rerun_policy: RerunPolicy) -> CampaignConfig {
    CampaignConfig {
        data_dir: root.join("data"),
        sessions_dir: root.join("sessions"),
        rerun_policy,
        email_min_words: 100,
        email_max_words: 150,
    }
}

pub fn acme_prospect() -> Prospect {
    Prospect {
        industry: Some("Tools".to_string()),
        ..Prospect::new("Acme")
    }
}

pub fn pending_session(company: &str, contacts: Vec<Contact>) -> Session {
    Session::pending(
        EnrichedProspect {
            company_name: company.to_string(),
            industry: Some("Tools".to_string()),
            location: None,
            contacts,
            company_info: Default::default(),
            recent_news: vec!["Raised a Series B".to_string()],
            quality_score: 20,
            error: None,
        },
        DraftEmail {
            subject: "acme partnership".to_string(),
            body: "Hi Jane,\n\nShort note.".to_string(),
            word_count: 5,
            error: None,
        },
    )
}

pub fn jane() -> Contact {
    Contact {
        name: "Jane Roe".to_string(),
        title: "CEO".to_string(),
        email: "jane.roe@acme.test".to_string(),
        linkedin: None,
        phone: None,
    }
}

pub const RESEARCH_RESPONSE: &str = r#"{
  "contacts": [
    {"name": "Jane Roe", "title": "CEO", "email": "jane.roe@acme.test"},
    {"name": "Sam Poe", "title": "CTO", "email": "sam.poe@acme.test"}
  ],
  "company_info": { "description": "Industrial tooling supplier", "website": "https://acme.test" },
  "recent_news": ["Acme raised a Series B round"]
}"#;

pub const EMAIL_RESPONSE: &str =
    "Subject: acme partnership\nBody: Hi Jane,\nCongrats on the round.\nBest,\nAlex";
