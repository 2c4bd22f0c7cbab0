//! 单站点探测结果
//! 创建后不再修改，按值传递给汇总方

use std::fmt;
use serde::{Deserialize, Serialize};

/// 探测状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Found,
    NotFound,
    // 用户名含句点而站点不允许，未发起请求
    #[serde(rename = "not_allowed")]
    Disallowed,
    ConnectionError,
    ClassificationError,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Found => "found",
            ProbeStatus::NotFound => "not_found",
            ProbeStatus::Disallowed => "not_allowed",
            ProbeStatus::ConnectionError => "connection_error",
            ProbeStatus::ClassificationError => "classification_error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ProbeStatus::ConnectionError | ProbeStatus::ClassificationError)
    }
}

/// 单次探测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    #[serde(rename = "platform")]
    pub site: String,
    #[serde(rename = "url")]
    pub resolved_url: String,
    pub status: ProbeStatus,
    pub message: String,
}

impl ProbeOutcome {
    fn new(site: &str, resolved_url: String, status: ProbeStatus, message: impl Into<String>) -> Self {
        Self {
            site: site.to_string(),
            resolved_url,
            status,
            message: message.into(),
        }
    }

    pub fn found(site: &str, resolved_url: String) -> Self {
        Self::new(site, resolved_url, ProbeStatus::Found, "Profile found")
    }

    pub fn not_found(site: &str, resolved_url: String) -> Self {
        Self::new(site, resolved_url, ProbeStatus::NotFound, "Profile not found")
    }

    pub fn disallowed(site: &str, resolved_url: String) -> Self {
        Self::new(
            site,
            resolved_url,
            ProbeStatus::Disallowed,
            "Username not allowed (contains period)",
        )
    }

    pub fn connection_error(site: &str, resolved_url: String, detail: impl fmt::Display) -> Self {
        Self::new(
            site,
            resolved_url,
            ProbeStatus::ConnectionError,
            format!("Connection error: {}", detail),
        )
    }

    pub fn classification_error(site: &str, resolved_url: String, detail: impl fmt::Display) -> Self {
        Self::new(
            site,
            resolved_url,
            ProbeStatus::ClassificationError,
            format!("Classification error: {}", detail),
        )
    }

    pub fn is_found(&self) -> bool {
        self.status == ProbeStatus::Found
    }
}

// ======== 终端输出格式 ========
impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ProbeStatus::Found => write!(f, "[+] {}: {}", self.site, self.resolved_url),
            ProbeStatus::NotFound => write!(f, "[-] {}: Not Found!", self.site),
            ProbeStatus::Disallowed => write!(f, "[-] {}: User Name Not Allowed!", self.site),
            ProbeStatus::ConnectionError | ProbeStatus::ClassificationError => {
                write!(f, "[-] {}: Error! ({})", self.site, self.message)
            }
        }
    }
}
