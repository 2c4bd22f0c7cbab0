//! 结果输出模块：消费扫描事件（结果文件、事件流、终端）
pub mod file;
pub mod stream;
pub mod terminal;

use async_trait::async_trait;

use crate::error::RshResult;
use crate::scan::ScanEvent;

/// 扫描事件消费者
#[async_trait]
pub trait EventReporter: Send {
    async fn on_event(&mut self, event: &ScanEvent) -> RshResult<()>;

    /// 扫描结束后调用（落盘、刷新缓冲）
    async fn finish(&mut self) -> RshResult<()> {
        Ok(())
    }
}

// 导出核心接口
pub use self::file::FoundUrlFileWriter;
pub use self::stream::{EventEncoder, StreamReporter, WireFormat};
pub use self::terminal::TerminalReporter;
