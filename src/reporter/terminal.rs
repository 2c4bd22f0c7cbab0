//! 终端输出：每个站点一行
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::EventReporter;
use crate::error::RshResult;
use crate::scan::ScanEvent;

pub struct TerminalReporter<W> {
    writer: W,
}

impl<W> TerminalReporter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(event: &ScanEvent) -> Option<String> {
        match event {
            ScanEvent::Start { username, total_sites, .. } => Some(format!(
                "[*] Checking username {} on {} sites:",
                username, total_sites
            )),
            ScanEvent::Progress { .. } => None,
            ScanEvent::Result { outcome } => Some(outcome.to_string()),
            ScanEvent::Complete { found_count, total_sites, .. } => {
                Some(format!("[*] Found {} of {} sites", found_count, total_sites))
            }
            ScanEvent::Cancelled { processed, total_sites, found_count, .. } => Some(format!(
                "[!] Scan cancelled after {} of {} sites, found {}",
                processed, total_sites, found_count
            )),
        }
    }
}

#[async_trait]
impl<W> EventReporter for TerminalReporter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn on_event(&mut self, event: &ScanEvent) -> RshResult<()> {
        if let Some(line) = Self::render(event) {
            self.writer.write_all(line.as_bytes()).await?;
            self.writer.write_all(b"\n").await?;
            self.writer.flush().await?;
        }
        Ok(())
    }
}
