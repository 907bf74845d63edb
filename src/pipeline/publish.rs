use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    pipeline::error::{PublishError, log_write_failure, missing_recipient},
    types::{DeliveryRecord, DraftEmail, EnrichedProspect},
};

pub const SEND_LOG_FILE: &str = "sent_emails.json";

/// Append-only delivery log: a single JSON array of DeliveryRecord.
/// Rewritten through a temp file and rename so a partial write never
/// clobbers records already on disk.
#[derive(Debug, Clone)]
pub struct SendLog {
    path: PathBuf,
}

impl SendLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SEND_LOG_FILE),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Reads every record logged so far. An absent or unreadable log is
    /// an empty list, never an error.
    pub fn read_all(&self) -> Vec<DeliveryRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(
                    target: "publish",
                    path = %self.path.display(),
                    error = %err,
                    "send_log_unreadable"
                );
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    target: "publish",
                    path = %self.path.display(),
                    error = %err,
                    "send_log_corrupt"
                );
                Vec::new()
            }
        }
    }

    pub fn append(&self, record: &DeliveryRecord) -> Result<(), PublishError> {
        let mut records = self.read_all();
        records.push(record.clone());

        let parent = self.path.parent().ok_or_else(|| {
            log_write_failure(format!(
                "send log path '{}' has no parent",
                self.path.display()
            ))
        })?;
        fs::create_dir_all(parent).map_err(|err| {
            log_write_failure(format!(
                "failed to create data directory '{}': {err}",
                parent.display()
            ))
        })?;

        let tmp_path = self.path.with_extension("tmp");
        let file = fs::File::create(&tmp_path).map_err(|err| {
            log_write_failure(format!(
                "failed to create send log temp file '{}': {err}",
                tmp_path.display()
            ))
        })?;
        {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &records).map_err(|err| {
                log_write_failure(format!(
                    "failed to serialize send log '{}': {err}",
                    tmp_path.display()
                ))
            })?;
            writer.write_all(b"\n").map_err(|err| {
                log_write_failure(format!(
                    "failed to finalize send log '{}': {err}",
                    tmp_path.display()
                ))
            })?;
            writer.flush().map_err(|err| {
                log_write_failure(format!(
                    "failed to flush send log '{}': {err}",
                    tmp_path.display()
                ))
            })?;
        }

        let tmp_file = fs::OpenOptions::new()
            .read(true)
            .open(&tmp_path)
            .map_err(|err| {
                log_write_failure(format!(
                    "failed to reopen send log temp file '{}': {err}",
                    tmp_path.display()
                ))
            })?;
        tmp_file.sync_all().map_err(|err| {
            log_write_failure(format!(
                "failed to sync send log temp file '{}': {err}",
                tmp_path.display()
            ))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|err| {
            log_write_failure(format!(
                "failed to replace send log '{}' from '{}': {err}",
                self.path.display(),
                tmp_path.display()
            ))
        })?;

        if let Ok(parent_file) = fs::File::open(parent) {
            let _ = parent_file.sync_all();
        }

        Ok(())
    }
}

/// "Sends" an approved email by appending a delivery record to the log.
/// Fails with MissingRecipient when the enriched prospect has no
/// contact to address; nothing is appended in that case.
pub fn send(
    email: &DraftEmail,
    enriched: &EnrichedProspect,
    log: &SendLog,
) -> Result<DeliveryRecord, PublishError> {
    let recipient = enriched
        .contacts
        .first()
        .map(|contact| contact.email.trim())
        .filter(|address| !address.is_empty())
        .ok_or_else(|| {
            missing_recipient(format!(
                "prospect '{}' has no contact with an email address",
                enriched.company_name
            ))
        })?;

    let sent_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| log_write_failure(format!("failed to format send timestamp: {err}")))?;

    let record = DeliveryRecord {
        prospect: enriched.company_name.clone(),
        to: recipient.to_string(),
        subject: email.subject.clone(),
        sent_at,
        status: "sent".to_string(),
    };

    log.append(&record)?;
    tracing::info!(
        target: "publish",
        prospect = %record.prospect,
        to = %record.to,
        subject = %record.subject,
        "email_logged_as_sent"
    );
    Ok(record)
}
