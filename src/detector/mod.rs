//! 探测模块：单站点探测核心逻辑
pub mod fetcher;
pub mod analyzer;
pub mod outcome;
pub mod detector;

// 导出核心接口
pub use self::fetcher::{FetchError, FetchedResponse, HttpFetcher, ReqwestFetcher};
pub use self::analyzer::{ClassifyError, ResponseAnalyzer, Verdict};
pub use self::outcome::{ProbeOutcome, ProbeStatus};
pub use self::detector::ProbeExecutor;
