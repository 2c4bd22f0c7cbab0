//! 响应分析器：按站点检测模式判定用户名是否存在
use thiserror::Error;

use super::fetcher::FetchedResponse;
use crate::rule::DetectionMode;
use crate::utils::BodyGuard;

/// 判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Found,
    NotFound,
}

/// 分类失败（规则缺失或响应形态不符合预期）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("no detection rule configured")]
    NoRule,
    #[error("response body is not text ({0})")]
    NonTextBody(String),
}

/// 响应分析器
pub struct ResponseAnalyzer;

impl ResponseAnalyzer {
    /// 404 视为不存在，其余状态码均视为存在
    pub const NOT_FOUND_STATUS: u16 = 404;

    pub fn classify(mode: &DetectionMode, response: &FetchedResponse) -> Result<Verdict, ClassifyError> {
        match mode {
            DetectionMode::BodyContains { error_signal } => {
                let body = BodyGuard::as_text(response.content_type.as_deref(), &response.body)
                    .map_err(ClassifyError::NonTextBody)?;
                Ok(Self::absent_means_found(&body, error_signal))
            }
            DetectionMode::StatusCode => {
                if response.status == Self::NOT_FOUND_STATUS {
                    Ok(Verdict::NotFound)
                } else {
                    Ok(Verdict::Found)
                }
            }
            DetectionMode::ResponseUrlContains { error_signal } => {
                Ok(Self::absent_means_found(&response.final_url, error_signal))
            }
            DetectionMode::Unknown => Err(ClassifyError::NoRule),
        }
    }

    fn absent_means_found(haystack: &str, error_signal: &str) -> Verdict {
        if haystack.contains(error_signal) {
            Verdict::NotFound
        } else {
            Verdict::Found
        }
    }
}
