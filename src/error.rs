//! 全局错误类型定义
//! 仅覆盖会中止整次扫描的错误；单站点失败以 ProbeStatus 形式记录在结果里

use thiserror::Error;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum RsherlockError {
    // 站点目录相关错误
    #[error("站点目录加载失败：{0}")]
    CatalogLoad(String),

    // 输入校验错误（扫描开始前拒绝）
    #[error("用户名无效：{0}")]
    Validation(String),

    // 配置错误
    #[error("配置无效：{0}")]
    InvalidConfig(String),

    // 网络相关错误（仅客户端构建阶段，单次探测失败不会走到这里）
    #[error("HTTP客户端初始化失败：{0}")]
    Http(#[from] reqwest::Error),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    Json(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    Io(#[from] IoError),
    #[error("URL解析失败：{0}")]
    Url(#[from] UrlParseError),

    #[error("异步任务执行失败：{0}")]
    AsyncTask(String),
}

// 全局Result类型
pub type RshResult<T> = Result<T, RsherlockError>;
