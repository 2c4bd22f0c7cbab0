//! 规则模块：负责站点目录的加载与数据模型定义
pub mod model;
pub mod loader;

// 导出核心接口
pub use self::model::{
    DetectionMode, RawSiteEntry, RejectedEntry, SiteCatalog, SiteRule, UrlTemplate,
};
pub use self::loader::{CatalogLoader, EMBEDDED_CATALOG_JSON};
