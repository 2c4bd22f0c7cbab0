//! HTTP 拉取层
//! 探测器只依赖 [`HttpFetcher`] trait，默认实现基于 reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use thiserror::Error;
use url::Url;

use crate::config::GlobalConfig;
use crate::error::RshResult;

/// 拉取到的响应（状态码、重定向后的最终 URL、响应体）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// 传输层错误（DNS、连接、超时、TLS、读取响应体）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("redirect failed: {0}")]
    Redirect(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_redirect() {
            FetchError::Redirect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Other(e.to_string())
        }
    }
}

/// HTTP 拉取接口：一次 GET，跟随重定向
///
/// `read_body` 为 false 时不读取响应体，返回的 `body` 为空。
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, url: &Url, read_body: bool) -> Result<FetchedResponse, FetchError>;
}

/// 基于 reqwest 的默认实现
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    user_agent: String,
    max_body_bytes: usize,
}

impl ReqwestFetcher {
    /// 按全局配置构建客户端（超时、重定向上限、UA）
    pub fn new(config: &GlobalConfig) -> RshResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout))
            .redirect(Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// 分块读取响应体，超过上限后截断
    async fn read_capped(mut response: Response, limit: usize) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let remaining = limit - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                break;
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url, read_body: bool) -> Result<FetchedResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = if read_body {
            Self::read_capped(response, self.max_body_bytes).await?
        } else {
            Vec::new()
        };

        Ok(FetchedResponse {
            status,
            final_url,
            content_type,
            body,
        })
    }
}
