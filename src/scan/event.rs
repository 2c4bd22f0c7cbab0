//! 流式扫描事件
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detector::ProbeOutcome;

/// 扫描事件，顺序：Start → (Progress, Result)×N → Complete | Cancelled
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanEvent {
    Start {
        username: String,
        #[serde(rename = "total_platforms")]
        total_sites: usize,
        timestamp: DateTime<Utc>,
    },
    Progress {
        #[serde(rename = "current_platform")]
        site: String,
        processed: usize,
        #[serde(rename = "total")]
        total_sites: usize,
        percentage: u8,
    },
    Result {
        #[serde(flatten)]
        outcome: ProbeOutcome,
    },
    Complete {
        username: String,
        #[serde(rename = "total_platforms")]
        total_sites: usize,
        found_count: usize,
        timestamp: DateTime<Utc>,
    },
    Cancelled {
        username: String,
        processed: usize,
        #[serde(rename = "total_platforms")]
        total_sites: usize,
        found_count: usize,
        timestamp: DateTime<Utc>,
    },
}

impl ScanEvent {
    /// 是否为终止事件
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanEvent::Complete { .. } | ScanEvent::Cancelled { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScanEvent::Start { .. } => "start",
            ScanEvent::Progress { .. } => "progress",
            ScanEvent::Result { .. } => "result",
            ScanEvent::Complete { .. } => "complete",
            ScanEvent::Cancelled { .. } => "cancelled",
        }
    }

    pub(crate) fn progress(site: &str, processed: usize, total_sites: usize) -> Self {
        let percentage = if total_sites == 0 {
            100
        } else {
            (processed * 100 / total_sites).min(100) as u8
        };
        ScanEvent::Progress {
            site: site.to_string(),
            processed,
            total_sites,
            percentage,
        }
    }
}
