//! Submitted-request log
//!
//! Keeps a local record of repair requests submitted from this machine so
//! `track` can poll them without the user memorizing ids. Stored in the
//! XDG data directory (~/.local/share/repairhub/). The backend remains the
//! source of truth; this is a convenience cache only.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "repairhub";
const LOG_FILE_NAME: &str = "requests.json";
const MAX_LOG_ENTRIES: usize = 100;

/// One submitted repair request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedRequest {
    /// Backend-assigned request id
    pub request_id: i64,
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    /// Status seen on the last poll, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
}

impl SubmittedRequest {
    pub fn new(request_id: i64, brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            request_id,
            brand: brand.into(),
            model: model.into(),
            issue_code: None,
            center_name: None,
            submitted_at: Utc::now(),
            last_status: None,
        }
    }

    pub fn with_issue(mut self, issue_code: impl Into<String>) -> Self {
        self.issue_code = Some(issue_code.into());
        self
    }

    pub fn with_center(mut self, center_name: impl Into<String>) -> Self {
        self.center_name = Some(center_name.into());
        self
    }
}

/// Request log storage manager
#[derive(Debug)]
pub struct RequestLog {
    entries: Vec<SubmittedRequest>,
    path: PathBuf,
}

impl RequestLog {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Get the log file path
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(LOG_FILE_NAME))
    }

    /// Load the log from disk
    pub fn load() -> Result<Self> {
        Self::load_from(Self::log_path()?)
    }

    /// Load the log from a specific path (for testing)
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read request log: {}", e)))?;

            serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse request log: {}", e)))?
        } else {
            Vec::new()
        };

        Ok(Self { entries, path })
    }

    /// Save the log to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create data directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)
            .map_err(|e| Error::Config(format!("Failed to write request log: {}", e)))?;

        Ok(())
    }

    /// Add an entry, newest first, trimming to the cap
    pub fn add(&mut self, entry: SubmittedRequest) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_LOG_ENTRIES);
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[SubmittedRequest] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, request_id: i64) -> Option<&SubmittedRequest> {
        self.entries.iter().find(|e| e.request_id == request_id)
    }

    /// Record the status seen on the latest poll
    ///
    /// Returns false when the id is not in the log.
    pub fn update_status(&mut self, request_id: i64, status: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.request_id == request_id) {
            Some(entry) => {
                entry.last_status = Some(status.to_string());
                true
            }
            None => false,
        }
    }

    /// Remove an entry, returning it if present
    pub fn remove(&mut self, request_id: i64) -> Option<SubmittedRequest> {
        let idx = self.entries.iter().position(|e| e.request_id == request_id)?;
        Some(self.entries.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_log() -> (TempDir, RequestLog) {
        let dir = TempDir::new().unwrap();
        let log = RequestLog::load_from(dir.path().join("requests.json")).unwrap();
        (dir, log)
    }

    #[test]
    fn test_empty_log() {
        let (_dir, log) = temp_log();
        assert!(log.is_empty());
        assert!(log.get(1).is_none());
    }

    #[test]
    fn test_add_and_get() {
        let (_dir, mut log) = temp_log();

        log.add(
            SubmittedRequest::new(42, "Apple", "iPhone 13")
                .with_issue("screen")
                .with_center("Downtown"),
        );

        let entry = log.get(42).unwrap();
        assert_eq!(entry.brand, "Apple");
        assert_eq!(entry.issue_code.as_deref(), Some("screen"));
        assert_eq!(entry.center_name.as_deref(), Some("Downtown"));
        assert!(entry.last_status.is_none());
    }

    #[test]
    fn test_newest_first_and_cap() {
        let (_dir, mut log) = temp_log();

        for i in 0..(MAX_LOG_ENTRIES + 10) {
            log.add(SubmittedRequest::new(i as i64, "Apple", "iPhone 13"));
        }

        assert_eq!(log.entries().len(), MAX_LOG_ENTRIES);
        // Newest entry is first, oldest ones were trimmed
        assert_eq!(log.entries()[0].request_id, (MAX_LOG_ENTRIES + 9) as i64);
        assert!(log.get(0).is_none());
    }

    #[test]
    fn test_update_status() {
        let (_dir, mut log) = temp_log();
        log.add(SubmittedRequest::new(42, "Apple", "iPhone 13"));

        assert!(log.update_status(42, "ready"));
        assert_eq!(log.get(42).unwrap().last_status.as_deref(), Some("ready"));

        assert!(!log.update_status(99, "ready"));
    }

    #[test]
    fn test_remove() {
        let (_dir, mut log) = temp_log();
        log.add(SubmittedRequest::new(42, "Apple", "iPhone 13"));

        let removed = log.remove(42).unwrap();
        assert_eq!(removed.request_id, 42);
        assert!(log.is_empty());
        assert!(log.remove(42).is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requests.json");

        let mut log = RequestLog::load_from(path.clone()).unwrap();
        log.add(SubmittedRequest::new(42, "Apple", "iPhone 13").with_issue("screen"));
        log.update_status(42, "accepted");
        log.save().unwrap();

        let reloaded = RequestLog::load_from(path).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        let entry = reloaded.get(42).unwrap();
        assert_eq!(entry.last_status.as_deref(), Some("accepted"));
    }
}
