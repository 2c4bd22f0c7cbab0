//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;

use crate::error::{RshResult, RsherlockError};

/// 默认浏览器 UA：部分站点会对未知客户端返回不同内容
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.12; rv:55.0) Gecko/20100101 Firefox/55.0";

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 站点目录路径（None 时使用内置目录）
    pub catalog_path: Option<PathBuf>,
    // 单次探测超时（单位：秒）
    pub http_timeout: u64,
    // 并发探测上限
    pub concurrency: usize,
    // 请求 User-Agent
    pub user_agent: String,
    // 最大重定向次数
    pub max_redirects: usize,
    // 响应体读取上限（字节），超出部分丢弃
    pub max_body_bytes: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            http_timeout: 10,
            concurrency: 16,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

impl GlobalConfig {
    /// 校验配置合法性
    pub fn validate(&self) -> RshResult<()> {
        if self.concurrency == 0 {
            return Err(RsherlockError::InvalidConfig("并发数必须大于0".to_string()));
        }
        if self.http_timeout == 0 {
            return Err(RsherlockError::InvalidConfig("超时时间必须大于0秒".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(RsherlockError::InvalidConfig("响应体读取上限必须大于0".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(RsherlockError::InvalidConfig("User-Agent 不能为空".to_string()));
        }
        Ok(())
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn catalog_path(mut self, path: PathBuf) -> Self {
        self.config.catalog_path = Some(path);
        self
    }

    pub fn http_timeout(mut self, timeout: u64) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    pub fn max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.config.max_body_bytes = max_body_bytes;
        self
    }

    /// 构建并校验配置
    pub fn build(self) -> RshResult<GlobalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConfigManager::get_default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_timeout, 10);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_builder_rejects_zero_concurrency() {
        let err = ConfigManager::custom().concurrency(0).build().unwrap_err();
        assert!(matches!(err, RsherlockError::InvalidConfig(_)));

        let err = ConfigManager::custom().max_body_bytes(0).build().unwrap_err();
        assert!(matches!(err, RsherlockError::InvalidConfig(_)));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigManager::custom()
            .concurrency(4)
            .http_timeout(3)
            .catalog_path(PathBuf::from("sites.json"))
            .build()
            .unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.http_timeout, 3);
        assert_eq!(config.catalog_path, Some(PathBuf::from("sites.json")));
    }
}
