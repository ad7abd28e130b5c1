// docmatch/src/state/reports.rs
//
// Append-only JSONL persistence for comparison output.
//
//   reports.jsonl   one ReportRecord per line, looked up by report id
//   history.jsonl   one HistoryEntry per completed batch, per user
//
// The engine never touches this; the CLI persists a batch only after it
// finished successfully. Later lines win when an id repeats.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::FilterConfig;
use crate::model::{BatchOutcome, ComparisonResult};

const REPORTS_FILE: &str = "reports.jsonl";
const HISTORY_FILE: &str = "history.jsonl";

/// A standalone pair report, addressable by `report_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(flatten)]
    pub result:    ComparisonResult,
    pub user:      Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_public: bool,
}

/// One completed batch as shown in a user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user:        String,
    pub timestamp:   DateTime<Utc>,
    pub comparisons: Vec<ComparisonResult>,
    #[serde(default)]
    pub dropped:     Vec<String>,
    pub settings:    FilterConfig,
}

pub struct ReportStore {
    dir:   PathBuf,
    write: Mutex<()>,
}

impl ReportStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir: PathBuf = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        Ok(Self { dir, write: Mutex::new(()) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist every pair of a finished batch, then its history entry.
    pub async fn save_batch(&self, user: &str, outcome: &BatchOutcome, settings: &FilterConfig) -> Result<()> {
        let now = Utc::now();
        for result in &outcome.comparisons {
            self.save_report(&ReportRecord {
                result:    result.clone(),
                user:      Some(user.to_string()),
                timestamp: now,
                is_public: true,
            })
            .await?;
        }
        self.append_history(&HistoryEntry {
            user:        user.to_string(),
            timestamp:   now,
            comparisons: outcome.comparisons.clone(),
            dropped:     outcome.dropped.clone(),
            settings:    settings.clone(),
        })
        .await?;
        info!("saved {} reports for user={}", outcome.comparisons.len(), user);
        Ok(())
    }

    pub async fn save_report(&self, record: &ReportRecord) -> Result<()> {
        self.append(REPORTS_FILE, &(serde_json::to_string(record)? + "\n")).await
    }

    pub async fn find_report(&self, report_id: &str) -> Result<Option<ReportRecord>> {
        let records: Vec<ReportRecord> = self.read_all(REPORTS_FILE).await?;
        Ok(records.into_iter().rev().find(|r| r.result.report_id.eq_ignore_ascii_case(report_id)))
    }

    pub async fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.append(HISTORY_FILE, &(serde_json::to_string(entry)? + "\n")).await
    }

    /// Newest first.
    pub async fn list_history(&self, user: &str) -> Result<Vec<HistoryEntry>> {
        let mut entries: Vec<HistoryEntry> = self.read_all(HISTORY_FILE).await?;
        entries.retain(|e| e.user == user);
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    /// Removes the user's entries; returns how many were removed.
    pub async fn clear_history(&self, user: &str) -> Result<usize> {
        let _guard = self.write.lock().await;
        let entries: Vec<HistoryEntry> = self.read_all(HISTORY_FILE).await?;
        let before = entries.len();
        let kept: Vec<&HistoryEntry> = entries.iter().filter(|e| e.user != user).collect();
        let removed = before - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        let mut body = String::new();
        for entry in kept {
            body.push_str(&serde_json::to_string(entry)?);
            body.push('\n');
        }
        let tmp = self.dir.join(format!("{}.tmp", HISTORY_FILE));
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, self.dir.join(HISTORY_FILE)).await?;
        info!("cleared {} history entries for user={}", removed, user);
        Ok(removed)
    }

    async fn append(&self, file: &str, content: &str) -> Result<()> {
        let _guard = self.write.lock().await;
        let mut f = OpenOptions::new().create(true).append(true)
            .open(self.dir.join(file)).await?;
        f.write_all(content.as_bytes()).await?;
        Ok(())
    }

    /// Every parseable line; malformed lines are skipped with a warning.
    async fn read_all<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file);
        let f = match tokio::fs::File::open(&path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("opening {}", path.display())),
        };

        let mut out = Vec::new();
        let mut lines = BufReader::new(f).lines();
        let mut lineno = 0usize;
        while let Some(line) = lines.next_line().await? {
            lineno += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(v) => out.push(v),
                Err(e) => warn!("{}:{} skipped: {}", path.display(), lineno, e),
            }
        }
        Ok(out)
    }
}
