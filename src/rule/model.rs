//! 站点规则数据模型定义
//! 仅存储规则数据，无任何网络逻辑

use std::fmt;
use serde::Deserialize;
use serde_json::Value;

/// 检测模式（错误特征直接挂在变体上，加载后即保证一致性）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionMode {
    /// 响应体中不包含 error_signal 即判定存在
    BodyContains { error_signal: String },
    /// 状态码不是 404 即判定存在
    StatusCode,
    /// 最终（重定向后）URL 中不包含 error_signal 即判定存在
    ResponseUrlContains { error_signal: String },
    /// 未配置检测规则
    Unknown,
}

impl DetectionMode {
    /// 对应目录文件中的 errorType 取值
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::BodyContains { .. } => "message",
            DetectionMode::StatusCode => "status_code",
            DetectionMode::ResponseUrlContains { .. } => "response_url",
            DetectionMode::Unknown => "",
        }
    }

    /// 判定时是否需要读取响应体
    pub fn needs_body(&self) -> bool {
        matches!(self, DetectionMode::BodyContains { .. })
    }
}

/// URL 模板，保证恰好一个 `{}` 占位符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
}

impl UrlTemplate {
    /// 用户名占位符
    pub const SLOT: &'static str = "{}";

    /// 解析模板，占位符数量不为 1 时返回原因
    pub fn parse(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        match raw.matches(Self::SLOT).count() {
            1 => Ok(Self { raw }),
            0 => Err(format!("URL模板缺少占位符：{}", raw)),
            n => Err(format!("URL模板包含{}个占位符：{}", n, raw)),
        }
    }

    /// 代入用户名
    pub fn resolve(&self, username: &str) -> String {
        self.raw.replacen(Self::SLOT, username, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 单个站点的检测规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRule {
    pub name: String,
    pub url_template: UrlTemplate,
    pub detection: DetectionMode,
    pub allow_period_in_username: bool,
}

impl SiteRule {
    /// 该站点是否接受此用户名（仅检查句点限制）
    pub fn accepts(&self, username: &str) -> bool {
        self.allow_period_in_username || !username.contains('.')
    }
}

/// 目录文件中的原始条目（兼容 sherlock data.json 格式，urlMain 等其余字段忽略）
#[derive(Debug, Clone, Deserialize)]
pub struct RawSiteEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "errorType", default)]
    pub error_type: Option<String>,
    #[serde(rename = "errorMsg", default)]
    pub error_msg: Option<String>,
    #[serde(rename = "errorUrl", default)]
    pub error_url: Option<String>,
    // "True" 字符串或布尔值
    #[serde(rename = "noPeriod", default)]
    pub no_period: Option<Value>,
}

impl RawSiteEntry {
    /// 转换为校验后的站点规则，失败时返回跳过原因
    pub fn into_rule(self, name: &str) -> Result<SiteRule, String> {
        let url = self.url.ok_or_else(|| "缺少url字段".to_string())?;
        let url_template = UrlTemplate::parse(url)?;

        let detection = match self.error_type.as_deref().unwrap_or("") {
            "message" => DetectionMode::BodyContains {
                error_signal: Self::required_signal(self.error_msg, "errorMsg")?,
            },
            "status_code" => DetectionMode::StatusCode,
            "response_url" => DetectionMode::ResponseUrlContains {
                error_signal: Self::required_signal(self.error_url, "errorUrl")?,
            },
            "" => DetectionMode::Unknown,
            other => return Err(format!("未知的errorType：{}", other)),
        };

        let no_period = match &self.no_period {
            Some(Value::String(s)) => s == "True",
            Some(Value::Bool(b)) => *b,
            _ => false,
        };

        Ok(SiteRule {
            name: name.to_string(),
            url_template,
            detection,
            allow_period_in_username: !no_period,
        })
    }

    fn required_signal(signal: Option<String>, field: &str) -> Result<String, String> {
        match signal {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(format!("缺少{}字段或为空", field)),
        }
    }
}

/// 加载时被跳过的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub name: String,
    pub reason: String,
}

/// 站点目录（保持源文件中的顺序）
#[derive(Debug, Clone, Default)]
pub struct SiteCatalog {
    sites: Vec<SiteRule>,
    rejected: Vec<RejectedEntry>,
}

impl SiteCatalog {
    pub fn new(sites: Vec<SiteRule>, rejected: Vec<RejectedEntry>) -> Self {
        Self { sites, rejected }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &[SiteRule] {
        &self.sites
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteRule> {
        self.sites.iter()
    }

    pub fn get(&self, name: &str) -> Option<&SiteRule> {
        self.sites.iter().find(|site| site.name == name)
    }

    /// 加载时被跳过的无效条目
    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }
}
