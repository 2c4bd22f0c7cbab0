//! 扫描编排器：按并发上限并发探测整个目录，按目录顺序输出结果
use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use super::cancel::CancelSignal;
use super::event::ScanEvent;
use super::report::ScanReport;
use super::validate::UsernameValidator;
use crate::config::GlobalConfig;
use crate::detector::{ProbeExecutor, ProbeOutcome};
use crate::error::{RshResult, RsherlockError};
use crate::rule::{CatalogLoader, SiteCatalog};

/// 事件通道容量（消费方过慢时对派发形成背压）
const EVENT_BUFFER: usize = 64;

/// 扫描编排器
///
/// 探测并发执行，结果先进入重排缓冲区，再按目录顺序逐个发出，
/// 因此输出顺序与串行执行完全一致。
#[derive(Clone)]
pub struct ScanOrchestrator {
    catalog: Arc<SiteCatalog>,
    executor: Arc<ProbeExecutor>,
    concurrency: usize,
}

impl ScanOrchestrator {
    pub fn new(catalog: Arc<SiteCatalog>, executor: ProbeExecutor, concurrency: usize) -> Self {
        Self {
            catalog,
            executor: Arc::new(executor),
            concurrency: concurrency.max(1),
        }
    }

    /// 按全局配置创建：加载目录 + 构建 reqwest 探测器
    pub async fn from_config(config: &GlobalConfig) -> RshResult<Self> {
        config.validate()?;
        let catalog = CatalogLoader::load(config).await?;
        let executor = ProbeExecutor::from_config(config)?;
        info!(
            "扫描器初始化完成，站点数：{}，并发：{}，超时：{}秒",
            catalog.len(),
            config.concurrency,
            config.http_timeout
        );
        Ok(Self::new(catalog, executor, config.concurrency))
    }

    pub fn catalog(&self) -> &SiteCatalog {
        &self.catalog
    }

    /// 批量模式：返回一份汇总报告
    pub async fn scan(&self, username: &str) -> RshResult<ScanReport> {
        self.scan_with_cancel(username, CancelSignal::new()).await
    }

    /// 批量模式（可取消）
    pub async fn scan_with_cancel(&self, username: &str, cancel: CancelSignal) -> RshResult<ScanReport> {
        let mut stream = self.scan_streaming_with_cancel(username, cancel)?;
        let mut username = String::new();
        let mut total_sites = 0;
        let mut outcomes = Vec::new();

        while let Some(event) = stream.next().await {
            match event {
                ScanEvent::Start { username: name, total_sites: total, .. } => {
                    username = name;
                    total_sites = total;
                    outcomes.reserve(total);
                }
                ScanEvent::Progress { .. } => {}
                ScanEvent::Result { outcome } => outcomes.push(outcome),
                ScanEvent::Complete { .. } => {
                    return Ok(ScanReport::new(username, total_sites, outcomes, false));
                }
                ScanEvent::Cancelled { .. } => {
                    return Ok(ScanReport::new(username, total_sites, outcomes, true));
                }
            }
        }

        Err(RsherlockError::AsyncTask("扫描任务未发出终止事件".to_string()))
    }

    /// 流式模式：返回事件流（需在 tokio 运行时内调用）
    pub fn scan_streaming(&self, username: &str) -> RshResult<ScanStream> {
        self.scan_streaming_with_cancel(username, CancelSignal::new())
    }

    /// 流式模式（可取消）
    ///
    /// 提前丢弃返回的 [`ScanStream`] 会触发 `cancel`。
    pub fn scan_streaming_with_cancel(&self, username: &str, cancel: CancelSignal) -> RshResult<ScanStream> {
        let username = UsernameValidator::validate(username)?;
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        let driver = ScanDriver {
            catalog: Arc::clone(&self.catalog),
            executor: Arc::clone(&self.executor),
            concurrency: self.concurrency,
            username,
            cancel: cancel.clone(),
            tx,
        };
        tokio::spawn(driver.run());

        Ok(ScanStream {
            rx,
            cancel,
            finished: false,
        })
    }
}

/// 扫描事件流：有限、仅一个终止事件、不可重启
pub struct ScanStream {
    rx: mpsc::Receiver<ScanEvent>,
    cancel: CancelSignal,
    finished: bool,
}

impl ScanStream {
    /// 下一个事件；终止事件之后返回 None
    pub async fn next(&mut self) -> Option<ScanEvent> {
        if self.finished {
            return None;
        }
        match self.rx.recv().await {
            Some(event) => {
                if event.is_terminal() {
                    self.finished = true;
                }
                Some(event)
            }
            None => {
                self.finished = true;
                None
            }
        }
    }

    /// 当前扫描使用的取消信号
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for ScanStream {
    fn drop(&mut self) {
        // 消费方提前离开，等同于取消
        if !self.finished {
            self.cancel.cancel();
        }
    }
}

/// 后台驱动任务
struct ScanDriver {
    catalog: Arc<SiteCatalog>,
    executor: Arc<ProbeExecutor>,
    concurrency: usize,
    username: String,
    cancel: CancelSignal,
    tx: mpsc::Sender<ScanEvent>,
}

impl ScanDriver {
    async fn run(self) {
        let total = self.catalog.len();
        info!("开始扫描用户名：{}，站点数：{}", self.username, total);

        let start = ScanEvent::Start {
            username: self.username.clone(),
            total_sites: total,
            timestamp: chrono::Utc::now(),
        };
        if self.tx.send(start).await.is_err() {
            return;
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        // 每个探测任务恰好回传一条 (目录下标, 结果)
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<(usize, ProbeOutcome)>();
        let mut pending: BTreeMap<usize, ProbeOutcome> = BTreeMap::new();
        let mut dispatched = 0usize;
        let mut emitted = 0usize;
        let mut found_count = 0usize;
        let mut error_count = 0usize;

        loop {
            let can_dispatch = dispatched < total && !self.cancel.is_cancelled();
            if !can_dispatch && emitted == dispatched {
                break;
            }

            tokio::select! {
                biased;

                _ = self.cancel.cancelled(), if can_dispatch => {
                    warn!("扫描已取消，停止派发，已派发 {}/{}", dispatched, total);
                }

                Some((index, outcome)) = result_rx.recv(), if emitted < dispatched => {
                    pending.insert(index, outcome);

                    // 按目录顺序发出已就绪的结果
                    while let Some(outcome) = pending.remove(&emitted) {
                        emitted += 1;
                        if outcome.is_found() {
                            found_count += 1;
                        } else if outcome.status.is_error() {
                            error_count += 1;
                        }
                        let progress = ScanEvent::progress(&outcome.site, emitted, total);
                        if self.tx.send(progress).await.is_err()
                            || self.tx.send(ScanEvent::Result { outcome }).await.is_err()
                        {
                            debug!("事件消费方已断开，终止扫描");
                            self.cancel.cancel();
                            return;
                        }
                    }
                }

                permit = Arc::clone(&semaphore).acquire_owned(), if can_dispatch => {
                    let Ok(permit) = permit else { break };
                    self.spawn_probe(dispatched, permit, result_tx.clone());
                    dispatched += 1;
                }

                else => break,
            }
        }

        let terminal = if emitted < total {
            ScanEvent::Cancelled {
                username: self.username.clone(),
                processed: emitted,
                total_sites: total,
                found_count,
                timestamp: chrono::Utc::now(),
            }
        } else {
            ScanEvent::Complete {
                username: self.username.clone(),
                total_sites: total,
                found_count,
                timestamp: chrono::Utc::now(),
            }
        };
        info!(
            "扫描结束：{}，已处理 {}/{}，命中 {}，失败 {}",
            self.username, emitted, total, found_count, error_count
        );
        let _ = self.tx.send(terminal).await;
    }

    /// 派发单个探测；内层 spawn 用于把 panic 转成分类错误，保证结果一定回传
    fn spawn_probe(
        &self,
        index: usize,
        permit: tokio::sync::OwnedSemaphorePermit,
        result_tx: mpsc::UnboundedSender<(usize, ProbeOutcome)>,
    ) {
        let catalog = Arc::clone(&self.catalog);
        let executor = Arc::clone(&self.executor);
        let username = self.username.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let probe = {
                let catalog = Arc::clone(&catalog);
                let username = username.clone();
                tokio::spawn(async move { executor.probe(&catalog.sites()[index], &username).await })
            };

            let outcome = match probe.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let site = &catalog.sites()[index];
                    warn!("[{}] 探测任务异常：{}", site.name, e);
                    ProbeOutcome::classification_error(
                        &site.name,
                        site.url_template.resolve(&username),
                        format!("probe task failed ({})", e),
                    )
                }
            };
            let _ = result_tx.send((index, outcome));
        });
    }
}
