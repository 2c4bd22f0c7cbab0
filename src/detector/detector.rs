//! 探测器核心：对单个（站点, 用户名）发起请求并分类
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use super::analyzer::{ResponseAnalyzer, Verdict};
use super::fetcher::{HttpFetcher, ReqwestFetcher};
use super::outcome::ProbeOutcome;
use crate::config::GlobalConfig;
use crate::error::RshResult;
use crate::rule::{DetectionMode, SiteRule};

/// 单站点探测器
///
/// `probe` 不返回错误：所有失败都落在 [`ProbeOutcome`] 的状态里。
#[derive(Clone)]
pub struct ProbeExecutor {
    fetcher: Arc<dyn HttpFetcher>,
    timeout: Duration,
}

impl ProbeExecutor {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// 按全局配置创建（reqwest 客户端 + 配置的超时）
    pub fn from_config(config: &GlobalConfig) -> RshResult<Self> {
        let fetcher = ReqwestFetcher::new(config)?;
        Ok(Self::new(Arc::new(fetcher), Duration::from_secs(config.http_timeout)))
    }

    /// 探测单个站点
    pub async fn probe(&self, site: &SiteRule, username: &str) -> ProbeOutcome {
        let resolved_url = site.url_template.resolve(username);

        // 1. 句点限制：不发请求
        if !site.accepts(username) {
            debug!("[{}] 用户名含句点，站点不允许，跳过", site.name);
            return ProbeOutcome::disallowed(&site.name, resolved_url);
        }

        // 2. 无检测规则：不发请求
        if site.detection == DetectionMode::Unknown {
            debug!("[{}] 未配置检测规则", site.name);
            return ProbeOutcome::classification_error(
                &site.name,
                resolved_url,
                "no detection rule configured",
            );
        }

        // 3. URL 合法性
        let url = match Url::parse(&resolved_url) {
            Ok(url) => url,
            Err(e) => {
                debug!("[{}] URL无效：{}，错误：{}", site.name, resolved_url, e);
                return ProbeOutcome::classification_error(
                    &site.name,
                    resolved_url,
                    format!("invalid url ({})", e),
                );
            }
        };

        // 4. 单次请求，外层超时兜底，不重试；仅响应体模式读取响应体
        let read_body = site.detection.needs_body();
        let response = match tokio::time::timeout(self.timeout, self.fetcher.fetch(&url, read_body)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!("[{}] 请求失败：{}", site.name, e);
                return ProbeOutcome::connection_error(&site.name, resolved_url, e);
            }
            Err(_) => {
                debug!("[{}] 请求超时（{:?}）", site.name, self.timeout);
                return ProbeOutcome::connection_error(&site.name, resolved_url, "request timed out");
            }
        };

        // 5. 按检测模式分类
        let outcome = match ResponseAnalyzer::classify(&site.detection, &response) {
            Ok(Verdict::Found) => ProbeOutcome::found(&site.name, resolved_url),
            Ok(Verdict::NotFound) => ProbeOutcome::not_found(&site.name, resolved_url),
            Err(e) => ProbeOutcome::classification_error(&site.name, resolved_url, e),
        };
        debug!(
            "[{}] 探测完成：模式={}，状态码={}，结果={}",
            site.name,
            site.detection.as_str(),
            response.status,
            outcome.status.as_str()
        );
        outcome
    }
}
