//! 测试辅助：可编排响应的 HttpFetcher 与小型目录构造

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::detector::{FetchError, FetchedResponse, HttpFetcher};
use crate::rule::{CatalogLoader, SiteCatalog};

/// 单个 URL 的预设行为
#[derive(Debug, Clone)]
pub enum MockRoute {
    Respond(FetchedResponse),
    Fail(FetchError),
    Delay(Duration, FetchedResponse),
    Hang,
    Panic,
}

/// 按 URL 返回预设响应，并记录每次调用
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: HashMap<String, MockRoute>,
    calls: Mutex<Vec<String>>,
    body_reads: Mutex<Vec<String>>,
}

fn normalize(url: &str) -> String {
    Url::parse(url).map(|u| u.to_string()).unwrap_or_else(|_| url.to_string())
}

pub fn html(status: u16, final_url: &str, body: &str) -> FetchedResponse {
    FetchedResponse {
        status,
        final_url: normalize(final_url),
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: body.as_bytes().to_vec(),
    }
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, route: MockRoute) -> Self {
        self.routes.insert(normalize(url), route);
        self
    }

    pub fn respond(self, url: &str, status: u16, body: &str) -> Self {
        let response = html(status, url, body);
        self.route(url, MockRoute::Respond(response))
    }

    pub fn redirect(self, url: &str, final_url: &str) -> Self {
        let response = html(200, final_url, "");
        self.route(url, MockRoute::Respond(response))
    }

    pub fn fail(self, url: &str, error: FetchError) -> Self {
        self.route(url, MockRoute::Fail(error))
    }

    pub fn delayed(self, url: &str, delay: Duration, status: u16, body: &str) -> Self {
        let response = html(status, url, body);
        self.route(url, MockRoute::Delay(delay, response))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// 要求读取响应体的调用
    pub fn body_reads(&self) -> Vec<String> {
        self.body_reads.lock().unwrap().clone()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl HttpFetcher for MockFetcher {
    async fn fetch(&self, url: &Url, read_body: bool) -> Result<FetchedResponse, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if read_body {
            self.body_reads.lock().unwrap().push(url.to_string());
        }
        let strip = |mut response: FetchedResponse| {
            if !read_body {
                response.body.clear();
            }
            response
        };
        let route = self.routes.get(url.as_str()).cloned();
        match route {
            Some(MockRoute::Respond(response)) => Ok(strip(response)),
            Some(MockRoute::Fail(error)) => Err(error),
            Some(MockRoute::Delay(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(strip(response))
            }
            Some(MockRoute::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(FetchError::Timeout)
            }
            Some(MockRoute::Panic) => panic!("mock fetcher panic for {}", url),
            None => Err(FetchError::Connect(format!("no route for {}", url))),
        }
    }
}

/// 从 JSON 字符串构造目录
pub fn catalog(json: &str) -> Arc<SiteCatalog> {
    Arc::new(CatalogLoader::load_str(json).unwrap())
}

/// 三站点目录：状态码 / 响应体 / 最终URL 各一个
pub fn three_site_catalog() -> Arc<SiteCatalog> {
    catalog(
        r#"{
            "Alpha": {"url": "https://alpha.test/{}", "errorType": "status_code"},
            "Beta": {"url": "https://beta.test/u/{}", "errorType": "message", "errorMsg": "No such user"},
            "Gamma": {"url": "https://gamma.test/{}/", "errorType": "response_url", "errorUrl": "show_error=true"}
        }"#,
    )
}
