use crate::{
    gateway::CompletionGateway,
    types::{DraftEmail, EnrichedProspect},
};

const FALLBACK_WORD_COUNT: u32 = 20;

/// Drafts the outreach email for an enriched prospect. Total: a gateway
/// failure or an unusable response degrades to a deterministic fallback
/// draft with `error` set, never an Err.
pub async fn generate_email(
    gateway: &dyn CompletionGateway,
    enriched: &EnrichedProspect,
    min_words: u32,
    max_words: u32,
) -> DraftEmail {
    let (contact_name, contact_title) = target_contact(enriched);
    let news_item = enriched.recent_news.first().cloned().unwrap_or_else(|| {
        format!(
            "{} is active in {}",
            enriched.company_name,
            enriched.industry_label()
        )
    });

    let prompt = build_email_prompt(
        enriched,
        &contact_name,
        &contact_title,
        &news_item,
        min_words,
        max_words,
    );

    match gateway.complete(&prompt).await {
        Ok(raw) => match parse_email_response(&raw) {
            Some((subject, body)) => {
                let word_count = body.split_whitespace().count() as u32;
                tracing::info!(
                    target: "content",
                    company = %enriched.company_name,
                    contact = %contact_name,
                    word_count,
                    "email_generated"
                );
                DraftEmail {
                    subject,
                    body,
                    word_count,
                    error: None,
                }
            }
            None => {
                tracing::warn!(
                    target: "content",
                    company = %enriched.company_name,
                    "email_response_unusable"
                );
                fallback_email(enriched, &contact_name, "unusable email response".to_string())
            }
        },
        Err(err) => {
            tracing::warn!(
                target: "content",
                company = %enriched.company_name,
                reason = %err,
                "email_generation_degraded"
            );
            fallback_email(enriched, &contact_name, format!("gateway: {err}"))
        }
    }
}

fn target_contact(enriched: &EnrichedProspect) -> (String, String) {
    match enriched.contacts.first() {
        Some(contact) => {
            let name = if contact.name.trim().is_empty() {
                "Decision Maker".to_string()
            } else {
                contact.name.clone()
            };
            let title = if contact.title.trim().is_empty() {
                "Executive".to_string()
            } else {
                contact.title.clone()
            };
            (name, title)
        }
        None => ("Decision Maker".to_string(), "Executive".to_string()),
    }
}

fn build_email_prompt(
    enriched: &EnrichedProspect,
    contact_name: &str,
    contact_title: &str,
    news_item: &str,
    min_words: u32,
    max_words: u32,
) -> String {
    format!(
        r#"Generate a B2B sales email:

Company: {company}
Industry: {industry}
Contact: {contact_name}, {contact_title}
Recent: {news_item}

Requirements:
- {min_words}-{max_words} words
- Professional tone
- Reference their recent activity
- Clear call-to-action
- Subject line (3 words max, lowercase)

Format:
Subject: [subject]
Body: [email body]
"#,
        company = enriched.company_name,
        industry = enriched.industry_label(),
    )
}

/// Splits the completion into subject and body: first non-empty line
/// (minus a leading `Subject:` label) is the subject, the rest joined
/// is the body. Returns `None` when there is nothing usable.
pub fn parse_email_response(raw: &str) -> Option<(String, String)> {
    let mut lines = raw.trim().lines();
    let subject_line = lines.find(|line| !line.trim().is_empty())?;
    let subject = subject_line
        .trim()
        .strip_prefix("Subject:")
        .unwrap_or(subject_line)
        .trim()
        .to_string();

    let mut body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    if let Some(rest) = body.strip_prefix("Body:") {
        body = rest.trim_start().to_string();
    }

    if subject.is_empty() && body.is_empty() {
        return None;
    }
    Some((subject, body))
}

fn fallback_email(enriched: &EnrichedProspect, contact_name: &str, reason: String) -> DraftEmail {
    DraftEmail {
        subject: format!("{} partnership", enriched.company_name.to_lowercase()),
        body: format!(
            "Hi {contact_name},\n\nI noticed {}'s work in {}. Would love to discuss potential collaboration.\n\nBest regards",
            enriched.company_name,
            enriched.industry_label(),
        ),
        word_count: FALLBACK_WORD_COUNT,
        error: Some(reason),
    }
}
