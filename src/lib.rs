//! rsherlock - Rust 社交平台用户名探测工具
//!
//! 按站点目录逐站点发起一次 HTTP 请求，并依据站点的检测规则
//! 判定该用户名是否已注册。探测并发执行，结果按目录顺序输出。

// 导出全局错误类型
pub use self::error::{RsherlockError, RshResult};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, GlobalConfig, DEFAULT_USER_AGENT};

// 导出规则模块核心接口
pub use self::rule::{
    CatalogLoader, DetectionMode, RejectedEntry, SiteCatalog, SiteRule, UrlTemplate,
};

// 导出探测模块核心接口
pub use self::detector::{
    FetchError, FetchedResponse, HttpFetcher, ProbeExecutor, ProbeOutcome, ProbeStatus,
    ReqwestFetcher, ResponseAnalyzer,
};

// 导出扫描模块核心接口
pub use self::scan::{
    CancelSignal, ScanEvent, ScanOrchestrator, ScanReport, ScanStream, UsernameValidator,
};

// 导出结果输出接口
pub use self::reporter::{
    EventEncoder, EventReporter, FoundUrlFileWriter, StreamReporter, TerminalReporter, WireFormat,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod utils;
pub mod detector;
pub mod scan;
pub mod reporter;

#[cfg(test)]
pub(crate) mod test_utils;
