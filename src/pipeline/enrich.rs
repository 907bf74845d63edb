use serde::Deserialize;

use crate::{
    gateway::CompletionGateway,
    types::{CompanyInfo, Contact, EnrichedProspect, Prospect, QUALITY_SCORE_PER_CONTACT},
};

/// Shape expected back from the research prompt. Every key is optional;
/// anything missing defaults to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchPayload {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub company_info: CompanyInfo,
    #[serde(default)]
    pub recent_news: Vec<String>,
}

/// Tagged decode result: either the model's payload parsed, or we fall
/// back and record why. The degrade path is an explicit branch, not a
/// swallowed exception.
#[derive(Debug)]
pub enum ResearchOutcome {
    Parsed(ResearchPayload),
    Fallback(String),
}

/// Enriches a prospect with contacts, company info and recent news.
/// Total: any gateway or parse failure degrades to an empty-contacts
/// result with `error` set, never an Err to the orchestrator.
pub async fn enrich(gateway: &dyn CompletionGateway, prospect: &Prospect) -> EnrichedProspect {
    let prompt = build_research_prompt(prospect);

    let outcome = match gateway.complete(&prompt).await {
        Ok(raw) => decode_research(&raw),
        Err(err) => ResearchOutcome::Fallback(format!("gateway: {err}")),
    };

    match outcome {
        ResearchOutcome::Parsed(payload) => {
            let quality_score = QUALITY_SCORE_PER_CONTACT * payload.contacts.len() as u32;
            tracing::info!(
                target: "enrich",
                company = %prospect.company_name,
                contacts = payload.contacts.len(),
                news_items = payload.recent_news.len(),
                quality_score,
                "research_parsed"
            );
            EnrichedProspect {
                company_name: prospect.company_name.clone(),
                industry: prospect.industry.clone(),
                location: prospect.location.clone(),
                contacts: payload.contacts,
                company_info: payload.company_info,
                recent_news: payload.recent_news,
                quality_score,
                error: None,
            }
        }
        ResearchOutcome::Fallback(reason) => {
            tracing::warn!(
                target: "enrich",
                company = %prospect.company_name,
                reason = %reason,
                "research_degraded"
            );
            fallback_enrichment(prospect, reason)
        }
    }
}

/// Decodes the raw completion as the research JSON payload, stripping
/// Markdown code fences first.
pub fn decode_research(raw: &str) -> ResearchOutcome {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return ResearchOutcome::Fallback("empty response".to_string());
    }
    match serde_json::from_str::<ResearchPayload>(cleaned) {
        Ok(payload) => ResearchOutcome::Parsed(payload),
        Err(err) => ResearchOutcome::Fallback(format!("malformed research json: {err}")),
    }
}

fn build_research_prompt(prospect: &Prospect) -> String {
    format!(
        r#"You are a B2B research assistant. Research this company and find real, actionable contact information.

Company: {company}
Industry: {industry}
Location: {location}

Find and provide:

1. DECISION MAKERS (3-5 key contacts):
   - Full name
   - Exact job title (CEO, CTO, VP Sales, etc.)
   - Email address (use common patterns: firstname.lastname@company.com)
   - Phone number if available

2. COMPANY INFORMATION:
   - Brief description (what they do)
   - Company website

3. RECENT NEWS (2-3 items from last 6 months):
   - Funding, product launches, partnerships

Return ONLY valid JSON in this exact format:
{{
  "contacts": [
    {{"name": "John Smith", "title": "CEO", "email": "john.smith@company.com", "linkedin": "https://linkedin.com/in/johnsmith", "phone": "+1-555-0100"}}
  ],
  "company_info": {{
    "description": "Brief description here",
    "website": "https://company.com",
    "linkedin": "https://linkedin.com/company/companyname"
  }},
  "recent_news": [
    "Recent activity here"
  ]
}}

IMPORTANT: If any information is not found, use "Not Available" instead of leaving it empty."#,
        company = prospect.company_name,
        industry = prospect.industry_label(),
        location = prospect.location_label(),
    )
}

/// Removes a wrapping ``` or ```json fence if the model added one.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn fallback_enrichment(prospect: &Prospect, reason: String) -> EnrichedProspect {
    EnrichedProspect {
        company_name: prospect.company_name.clone(),
        industry: prospect.industry.clone(),
        location: prospect.location.clone(),
        contacts: Vec::new(),
        company_info: CompanyInfo {
            description: format!(
                "{} operates in {}",
                prospect.company_name,
                prospect.industry_label()
            ),
            website: String::new(),
            linkedin: None,
            employee_count: None,
            revenue: None,
        },
        recent_news: Vec::new(),
        quality_score: 0,
        error: Some(reason),
    }
}
