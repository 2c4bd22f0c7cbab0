//! 单次扫描的汇总报告
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detector::{ProbeOutcome, ProbeStatus};
use crate::error::RshResult;

/// 扫描报告（结果顺序与目录顺序一致）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub username: String,
    #[serde(rename = "total_platforms")]
    pub total_sites: usize,
    pub found_count: usize,
    #[serde(rename = "results")]
    pub outcomes: Vec<ProbeOutcome>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl ScanReport {
    /// found_count 由结果列表计算，不单独传入
    pub fn new(username: String, total_sites: usize, outcomes: Vec<ProbeOutcome>, cancelled: bool) -> Self {
        let found_count = outcomes.iter().filter(|o| o.is_found()).count();
        Self {
            username,
            total_sites,
            found_count,
            outcomes,
            timestamp: Utc::now(),
            cancelled,
        }
    }

    /// 所有站点都已出结果
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.outcomes.len() == self.total_sites
    }

    pub fn found(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes.iter().filter(|o| o.is_found())
    }

    pub fn count(&self, status: ProbeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn to_json(&self, pretty: bool) -> RshResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
