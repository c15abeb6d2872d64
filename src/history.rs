//! Recent-calls log
//!
//! Completed calls are recorded so the presentation layer can show a
//! call history after hangup.

use crate::session::state::CallMode;
use crate::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// One completed call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: Uuid,
    pub mode: CallMode,
    /// When the call entered the active state
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Whole seconds the call was active, as captured at hangup
    pub duration_secs: u64,
}

impl CallRecord {
    pub fn new(
        mode: CallMode,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        duration_secs: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            started_at,
            ended_at,
            duration_secs,
        }
    }
}

/// Shared, append-only log of completed calls
#[derive(Debug, Clone)]
pub struct CallLog {
    records: Arc<RwLock<Vec<CallRecord>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn add(&self, record: CallRecord) {
        self.records.write().push(record);
    }

    pub fn get_all(&self) -> Vec<CallRecord> {
        self.records.read().clone()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Persist the log as JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.records.read())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously saved log
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let records: Vec<CallRecord> = serde_json::from_str(&json)?;
        Ok(Self {
            records: Arc::new(RwLock::new(records)),
        })
    }
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new()
    }
}
