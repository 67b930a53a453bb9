use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use cricketchat_types::{Message, TableData};

#[derive(Serialize)]
struct TranscriptEntry<'a> {
    timestamp: String, // ISO‑8601 Local time
    identity: &'a str,
    role: &'a str,
    content: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<&'a TableData>,
}

/// Appends every conversation turn to a JSONL file under `<base>/logs`
pub struct TranscriptLogger {
    file_path: PathBuf,
    file: Option<tokio::fs::File>,
}

impl TranscriptLogger {
    /// Create a new logger; the file name is derived from the current local time.
    pub async fn new(base: &Path) -> Result<Self> {
        let logs_dir = crate::get_logs_dir(base)?;

        let filename = format!("chat-{}.jsonl", Local::now().format("%Y-%m-%d-%H%M%S"));
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        Ok(Self {
            file_path,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Record one message. Write failures disable the logger instead of
    /// interrupting the conversation.
    pub async fn log(&mut self, identity: &str, message: &Message) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let entry = TranscriptEntry {
            timestamp: Local::now().to_rfc3339(),
            identity,
            role: message.role.as_str(),
            content: &message.content,
            format: message.format.as_str(),
            table: message.table.as_ref(),
        };

        let mut line = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize transcript entry: {}", e);
                return;
            }
        };
        line.push('\n');

        let written = match file.write_all(line.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            log::warn!(
                "Transcript logging disabled, write to {} failed: {}",
                self.file_path.display(),
                e
            );
            self.file = None;
        }
    }

    /// False once a write has failed
    pub fn is_active(&self) -> bool {
        self.file.is_some()
    }
}
