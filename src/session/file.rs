use std::{
    fs,
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::{
    session::{SessionStore, SessionStoreError, invalid_id, write_failure},
    types::Session,
};

/// One pretty-printed JSON document per prospect id under the sessions
/// directory. No locking: last writer wins, which the single-user
/// interactive model never exercises.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn session_path(&self, prospect_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_id(prospect_id)))
    }
}

/// Maps a prospect id onto a filename-safe form so ids from uploads
/// cannot escape the sessions directory. Unsafe bytes (including the
/// `_` escape char itself) become `_xx` hex, so distinct ids never
/// share a session file.
fn sanitize_id(prospect_id: &str) -> String {
    let mut sanitized = String::with_capacity(prospect_id.len());
    for c in prospect_id.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '.') {
            sanitized.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                sanitized.push_str(&format!("_{byte:02x}"));
            }
        }
    }
    sanitized
}

impl SessionStore for FileSessionStore {
    fn load(&self, prospect_id: &str) -> Option<Session> {
        let path = self.session_path(prospect_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(
                    target: "session",
                    prospect_id,
                    path = %path.display(),
                    error = %err,
                    "session_unreadable"
                );
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!(
                    target: "session",
                    prospect_id,
                    path = %path.display(),
                    error = %err,
                    "session_corrupt"
                );
                None
            }
        }
    }

    fn save(&self, prospect_id: &str, session: &Session) -> Result<(), SessionStoreError> {
        if prospect_id.trim().is_empty() {
            return Err(invalid_id("prospect id cannot be empty"));
        }
        fs::create_dir_all(&self.dir).map_err(|err| {
            write_failure(format!(
                "failed to create sessions directory '{}': {err}",
                self.dir.display()
            ))
        })?;

        let path = self.session_path(prospect_id);
        let tmp_path = path.with_extension("tmp");
        let file = fs::File::create(&tmp_path).map_err(|err| {
            write_failure(format!(
                "failed to create session temp file '{}': {err}",
                tmp_path.display()
            ))
        })?;
        {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, session).map_err(|err| {
                write_failure(format!(
                    "failed to serialize session '{}': {err}",
                    tmp_path.display()
                ))
            })?;
            writer.write_all(b"\n").map_err(|err| {
                write_failure(format!(
                    "failed to finalize session '{}': {err}",
                    tmp_path.display()
                ))
            })?;
            writer.flush().map_err(|err| {
                write_failure(format!(
                    "failed to flush session '{}': {err}",
                    tmp_path.display()
                ))
            })?;
        }

        let tmp_file = fs::OpenOptions::new()
            .read(true)
            .open(&tmp_path)
            .map_err(|err| {
                write_failure(format!(
                    "failed to reopen session temp file '{}': {err}",
                    tmp_path.display()
                ))
            })?;
        tmp_file.sync_all().map_err(|err| {
            write_failure(format!(
                "failed to sync session temp file '{}': {err}",
                tmp_path.display()
            ))
        })?;

        fs::rename(&tmp_path, &path).map_err(|err| {
            write_failure(format!(
                "failed to replace session '{}' from '{}': {err}",
                path.display(),
                tmp_path.display()
            ))
        })?;

        if let Ok(dir_file) = fs::File::open(&self.dir) {
            let _ = dir_file.sync_all();
        }

        Ok(())
    }
}
