//! 扫描模块：整目录并发探测、事件流与汇总报告
pub mod cancel;
pub mod event;
pub mod report;
pub mod validate;
pub mod orchestrator;

// 导出核心接口
pub use self::cancel::CancelSignal;
pub use self::event::ScanEvent;
pub use self::report::ScanReport;
pub use self::validate::UsernameValidator;
pub use self::orchestrator::{ScanOrchestrator, ScanStream};
