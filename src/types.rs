use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-assigned identifier a prospect is tracked under across the
/// whole workflow (session file name, log fields, approval actions).
pub type ProspectId = String;

pub const QUALITY_SCORE_PER_CONTACT: u32 = 20;

fn default_company_name() -> String {
    "Unknown".to_string()
}

/// Raw input record for one target company. Extra columns from the
/// caller's upload are preserved but never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    #[serde(default = "default_company_name")]
    pub company_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Prospect {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            industry: None,
            location: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn industry_label(&self) -> &str {
        self.industry.as_deref().unwrap_or("Unknown")
    }

    pub fn location_label(&self) -> &str {
        self.location.as_deref().unwrap_or("Unknown")
    }
}

/// Best-effort contact researched for a prospect. Any field may carry a
/// placeholder such as "Not Available".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub employee_count: Option<Value>,
    #[serde(default)]
    pub revenue: Option<Value>,
}

/// Output of the enrichment stage. Created once, never mutated; a
/// degraded result carries `error` and an empty contact list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedProspect {
    pub company_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub company_info: CompanyInfo,
    #[serde(default)]
    pub recent_news: Vec<String>,
    #[serde(default)]
    pub quality_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EnrichedProspect {
    pub fn industry_label(&self) -> &str {
        self.industry.as_deref().unwrap_or("Unknown")
    }
}

/// Draft produced by the content stage. The dashboard may replace the
/// stored copy with a human-edited one before approval; whatever the
/// session holds at send time is what goes out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEmail {
    pub subject: String,
    pub body: String,
    pub word_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    PendingApproval,
    Sent,
    Skipped,
}

/// Per-prospect workflow state persisted between the generate and the
/// approve/send steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub status: SessionStatus,
    pub enriched_data: EnrichedProspect,
    pub email: DraftEmail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DeliveryRecord>,
}

impl Session {
    pub fn pending(enriched_data: EnrichedProspect, email: DraftEmail) -> Self {
        Self {
            status: SessionStatus::PendingApproval,
            enriched_data,
            email,
            result: None,
        }
    }
}

/// One entry of the append-only send log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub prospect: String,
    pub to: String,
    pub subject: String,
    pub sent_at: String,
    pub status: String,
}
