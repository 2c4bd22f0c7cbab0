//! rsherlock 命令行入口
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rsherlock::{
    CancelSignal, ConfigManager, EventReporter, FoundUrlFileWriter, ScanOrchestrator, StreamReporter,
    TerminalReporter, UsernameValidator, WireFormat,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// 每个站点一行
    Text,
    /// 扫描结束后输出完整 JSON 报告
    Json,
    /// 每个事件一行 JSON
    Ndjson,
    /// Server-Sent-Events 帧
    Sse,
}

#[derive(Debug, Parser)]
#[command(
    name = "rsherlock",
    version,
    about = "Search for a username across social media platforms",
    after_help = "Example: rsherlock johndoe"
)]
struct Cli {
    /// 要搜索的用户名
    username: String,

    /// 输出调试日志
    #[arg(short, long)]
    debug: bool,

    /// 站点目录 JSON 文件（默认使用内置目录）
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// 并发探测数
    #[arg(short, long, default_value_t = 16)]
    concurrency: usize,

    /// 单次探测超时（秒）
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// 结果文件 <username>.txt 所在目录
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// 不写结果文件
    #[arg(long)]
    no_file: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("rsherlock=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rsherlock=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 处理一次中断：首次触发取消并返回 false，已取消时返回 true（应强制退出）
fn on_interrupt(cancel: &CancelSignal) -> bool {
    if cancel.is_cancelled() {
        return true;
    }
    cancel.cancel();
    false
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let username = UsernameValidator::validate(&cli.username)?;

    let mut builder = ConfigManager::custom()
        .concurrency(cli.concurrency)
        .http_timeout(cli.timeout);
    if let Some(path) = cli.catalog.clone() {
        builder = builder.catalog_path(path);
    }
    let config = builder.build()?;

    let orchestrator = ScanOrchestrator::from_config(&config)
        .await
        .context("扫描器初始化失败")?;

    // 第一次 Ctrl-C：停止派发，已在途的探测自然结束；第二次：立即退出
    let cancel = CancelSignal::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if on_interrupt(&cancel) {
                    warn!("再次收到中断信号，强制退出");
                    std::process::exit(130);
                }
                warn!("收到中断信号，正在停止扫描（再按一次 Ctrl-C 强制退出）");
            }
        });
    }

    if cli.format == OutputFormat::Json {
        // 旧结果文件在扫描开始前删除
        let mut writer = if cli.no_file {
            None
        } else {
            Some(FoundUrlFileWriter::create(&cli.output_dir, &username).await?)
        };
        let report = orchestrator.scan_with_cancel(&username, cancel).await?;
        if let Some(writer) = writer.as_mut() {
            writer.append_report(&report).await?;
            writer.finish().await?;
            info!("结果已保存：{}", writer.path().display());
        }
        println!("{}", report.to_json(true)?);
        return Ok(());
    }

    let mut reporters: Vec<Box<dyn EventReporter>> = Vec::new();
    let mut saved_path = None;
    match cli.format {
        OutputFormat::Ndjson => reporters.push(Box::new(StreamReporter::new(tokio::io::stdout(), WireFormat::Ndjson))),
        OutputFormat::Sse => reporters.push(Box::new(StreamReporter::new(tokio::io::stdout(), WireFormat::Sse))),
        _ => reporters.push(Box::new(TerminalReporter::new(tokio::io::stdout()))),
    }
    if !cli.no_file {
        let writer = FoundUrlFileWriter::create(&cli.output_dir, &username).await?;
        saved_path = Some(writer.path().to_path_buf());
        reporters.push(Box::new(writer));
    }

    let mut stream = orchestrator.scan_streaming_with_cancel(&username, cancel)?;
    while let Some(event) = stream.next().await {
        for reporter in reporters.iter_mut() {
            reporter.on_event(&event).await?;
        }
    }
    for reporter in reporters.iter_mut() {
        reporter.finish().await?;
    }

    if let Some(path) = saved_path {
        info!("结果已保存：{}", path.display());
    }
    Ok(())
}
