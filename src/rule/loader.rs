//! 站点目录加载管理器
//! 负责从本地文件、JSON 字符串或内置目录加载站点规则

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, warn};

use super::model::{RawSiteEntry, RejectedEntry, SiteCatalog, SiteRule};
use crate::config::GlobalConfig;
use crate::error::{RshResult, RsherlockError};

/// 内置站点目录原文
pub static EMBEDDED_CATALOG_JSON: &str = include_str!("../../data/sites.json");

/// 内置目录单例：首次访问时解析，进程内仅一份
static EMBEDDED_CATALOG: Lazy<Result<Arc<SiteCatalog>, String>> = Lazy::new(|| {
    CatalogLoader::load_str(EMBEDDED_CATALOG_JSON)
        .map(Arc::new)
        .map_err(|e| e.to_string())
});

/// 站点目录加载管理器
///
/// 整体失败（文件缺失、JSON 损坏、顶层不是对象）直接返回错误；
/// 单个条目无效时记录警告并跳过，跳过原因可通过 [`SiteCatalog::rejected`] 查看。
pub struct CatalogLoader;

impl CatalogLoader {
    /// 按配置加载目录（未指定路径时使用内置目录）
    pub async fn load(config: &GlobalConfig) -> RshResult<Arc<SiteCatalog>> {
        match &config.catalog_path {
            Some(path) => Ok(Arc::new(Self::load_path(path).await?)),
            None => Self::embedded(),
        }
    }

    /// 从本地文件加载
    pub async fn load_path(path: &Path) -> RshResult<SiteCatalog> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            RsherlockError::CatalogLoad(format!("读取目录文件 {} 失败：{}", path.display(), e))
        })?;
        debug!("读取目录文件成功：{}，大小：{} 字节", path.display(), raw.len());
        Self::load_str(&raw)
    }

    /// 从 JSON 字符串加载
    pub fn load_str(raw: &str) -> RshResult<SiteCatalog> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| RsherlockError::CatalogLoad(format!("目录JSON解析失败：{}", e)))?;

        let Value::Object(entries) = value else {
            return Err(RsherlockError::CatalogLoad(
                "目录顶层必须是 站点名 -> 规则 的对象".to_string(),
            ));
        };

        let mut sites = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();

        // serde_json 开启 preserve_order，遍历顺序即文件顺序
        for (name, entry) in entries {
            match Self::parse_entry(&name, entry) {
                Ok(rule) => sites.push(rule),
                Err(reason) => {
                    warn!("跳过无效站点规则 [{}]：{}", name, reason);
                    rejected.push(RejectedEntry { name, reason });
                }
            }
        }

        debug!("站点目录加载完成，有效规则：{}，跳过：{}", sites.len(), rejected.len());
        Ok(SiteCatalog::new(sites, rejected))
    }

    /// 内置目录
    pub fn embedded() -> RshResult<Arc<SiteCatalog>> {
        EMBEDDED_CATALOG
            .as_ref()
            .map(Arc::clone)
            .map_err(|e| RsherlockError::CatalogLoad(format!("内置目录损坏：{}", e)))
    }

    fn parse_entry(name: &str, entry: Value) -> Result<SiteRule, String> {
        if name.trim().is_empty() {
            return Err("站点名为空".to_string());
        }
        let raw: RawSiteEntry =
            serde_json::from_value(entry).map_err(|e| format!("条目格式错误：{}", e))?;
        raw.into_rule(name)
    }
}
