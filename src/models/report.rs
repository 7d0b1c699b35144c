use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one batch insert: how many rows were actually written and
/// how many were skipped as duplicate URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Outcome of one full harvest cycle over the configured sources.
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    pub sources_ok: usize,
    pub failed_sources: Vec<String>,
    pub inserted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Running,
    Completed,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(RunState::Running),
            "completed" => Some(RunState::Completed),
            "failed" => Some(RunState::Failed),
            _ => None,
        }
    }
}

/// Status of the most recent harvest run, as stored in the database.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatus {
    pub state: RunState,
    pub message: String,
    pub item_count: i64,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Aggregate counts over the stored items.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentStats {
    pub total: i64,
    pub by_type: BTreeMap<String, i64>,
    pub by_source: BTreeMap<String, i64>,
}
