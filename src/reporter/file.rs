//! 命中 URL 结果文件：`<username>.txt`
//! 扫描开始时删除旧文件，此后每命中一个站点追加一行

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::EventReporter;
use crate::error::RshResult;
use crate::scan::{ScanEvent, ScanReport};

pub struct FoundUrlFileWriter {
    path: PathBuf,
    file: Option<File>,
    written: usize,
}

impl FoundUrlFileWriter {
    /// 结果文件名（路径分隔符替换为下划线）
    pub fn file_name(username: &str) -> String {
        let safe: String = username
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}.txt", safe)
    }

    /// 准备结果文件：存在则删除，首次命中时再创建
    pub async fn create(dir: &Path, username: &str) -> RshResult<Self> {
        let path = dir.join(Self::file_name(username));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("删除旧结果文件：{}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(Self {
            path,
            file: None,
            written: 0,
        })
    }

    /// 把一份报告的命中结果追加到文件（按目录顺序）
    pub async fn append_report(&mut self, report: &ScanReport) -> RshResult<()> {
        for outcome in report.found() {
            self.append(&outcome.resolved_url).await?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 已写入的行数
    pub fn written(&self) -> usize {
        self.written
    }

    pub async fn append(&mut self, url: &str) -> RshResult<()> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            self.file = Some(file);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(format!("{}\n", url).as_bytes()).await?;
            self.written += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl EventReporter for FoundUrlFileWriter {
    async fn on_event(&mut self, event: &ScanEvent) -> RshResult<()> {
        if let ScanEvent::Result { outcome } = event {
            if outcome.is_found() {
                self.append(&outcome.resolved_url).await?;
            }
        }
        Ok(())
    }

    async fn finish(&mut self) -> RshResult<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush().await?;
        }
        debug!("结果文件 {} 写入 {} 行", self.path.display(), self.written);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ProbeOutcome;

    #[test]
    fn test_file_name_strips_separators() {
        assert_eq!(FoundUrlFileWriter::file_name("alice"), "alice.txt");
        assert_eq!(FoundUrlFileWriter::file_name("../etc/x"), ".._etc_x.txt");
    }

    #[tokio::test]
    async fn test_previous_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.txt");
        tokio::fs::write(&path, "https://stale.test/alice\n").await.unwrap();

        let outcomes = vec![
            ProbeOutcome::found("A", "https://a.test/alice".to_string()),
            ProbeOutcome::not_found("B", "https://b.test/alice".to_string()),
            ProbeOutcome::found("C", "https://c.test/alice".to_string()),
        ];
        let report = ScanReport::new("alice".to_string(), 3, outcomes, false);

        // 扫描开始前旧文件即被删除
        let mut writer = FoundUrlFileWriter::create(dir.path(), "alice").await.unwrap();
        assert!(!path.exists());

        writer.append_report(&report).await.unwrap();
        writer.finish().await.unwrap();
        assert_eq!(writer.written(), 2);
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "https://a.test/alice\nhttps://c.test/alice\n");
    }

    #[tokio::test]
    async fn test_no_hits_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bob.txt");
        tokio::fs::write(&path, "old\n").await.unwrap();

        let mut writer = FoundUrlFileWriter::create(dir.path(), "bob").await.unwrap();
        let event = ScanEvent::Result {
            outcome: ProbeOutcome::not_found("A", "https://a.test/bob".to_string()),
        };
        writer.on_event(&event).await.unwrap();
        writer.finish().await.unwrap();

        assert!(!path.exists());
    }
}
