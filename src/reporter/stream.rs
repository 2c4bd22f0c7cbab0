//! 事件流编码：NDJSON 或 SSE 帧
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::EventReporter;
use crate::error::RshResult;
use crate::scan::ScanEvent;

/// 线上格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// `<json>\n`
    Ndjson,
    /// `data: <json>\n\n`
    Sse,
}

pub struct EventEncoder;

impl EventEncoder {
    pub fn encode(event: &ScanEvent, format: WireFormat) -> RshResult<String> {
        let json = serde_json::to_string(event)?;
        Ok(match format {
            WireFormat::Ndjson => format!("{}\n", json),
            WireFormat::Sse => format!("data: {}\n\n", json),
        })
    }
}

/// 把事件逐条编码写入任意异步输出（stdout、socket 等），每条都 flush
pub struct StreamReporter<W> {
    writer: W,
    format: WireFormat,
}

impl<W> StreamReporter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W, format: WireFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> EventReporter for StreamReporter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn on_event(&mut self, event: &ScanEvent) -> RshResult<()> {
        let frame = EventEncoder::encode(event, self.format)?;
        self.writer.write_all(frame.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ProbeOutcome;

    #[test]
    fn test_sse_framing() {
        let event = ScanEvent::progress("GitHub", 2, 4);
        let frame = EventEncoder::encode(&event, WireFormat::Sse).unwrap();
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("}\n\n"));

        let json: serde_json::Value = serde_json::from_str(frame.trim_start_matches("data: ").trim()).unwrap();
        assert_eq!(json["percentage"], 50);
    }

    #[tokio::test]
    async fn test_ndjson_one_line_per_event() {
        let mut reporter = StreamReporter::new(Vec::new(), WireFormat::Ndjson);
        reporter.on_event(&ScanEvent::progress("A", 1, 1)).await.unwrap();
        reporter
            .on_event(&ScanEvent::Result {
                outcome: ProbeOutcome::found("A", "https://a.test/x".to_string()),
            })
            .await
            .unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let json: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(json["type"].is_string());
        }
    }
}
