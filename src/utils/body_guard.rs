/// 响应体守卫：负责在做字符串匹配前
/// 判断响应体「是不是文本」，非文本内容不参与检测
use std::borrow::Cow;

pub struct BodyGuard;

impl BodyGuard {
    /// 嗅探 NUL 字节的窗口大小（8KB）
    pub const SNIFF_LEN: usize = 8 * 1024;

    /// 明确不是文本的 MIME 前缀
    const BINARY_MIME_PREFIXES: [&'static str; 5] = ["image/", "audio/", "video/", "font/", "application/octet-stream"];

    /// 将响应体视为文本；非文本时返回原因
    pub fn as_text<'a>(content_type: Option<&str>, body: &'a [u8]) -> Result<Cow<'a, str>, String> {
        // 1. Content-Type 明确是二进制
        if let Some(content_type) = content_type {
            let mime = content_type
                .split(';')
                .next()
                .unwrap_or("")
                .trim()
                .to_ascii_lowercase();
            if Self::BINARY_MIME_PREFIXES.iter().any(|prefix| mime.starts_with(prefix)) {
                return Err(format!("content-type {}", mime));
            }
        }

        // 2. 头部出现 NUL 字节，按二进制处理
        let window = &body[..body.len().min(Self::SNIFF_LEN)];
        if window.contains(&0u8) {
            return Err("binary content".to_string());
        }

        // 3. 宽松解码（非法 UTF-8 替换为 U+FFFD）
        Ok(String::from_utf8_lossy(body))
    }
}
