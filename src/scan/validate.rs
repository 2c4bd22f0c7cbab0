//! 用户名输入校验（扫描开始前执行）
use crate::error::{RshResult, RsherlockError};

pub struct UsernameValidator;

impl UsernameValidator {
    /// 最短长度（按字符计）
    pub const MIN_LEN: usize = 2;

    /// 去除首尾空白后校验，返回规范化的用户名
    pub fn validate(raw: &str) -> RshResult<String> {
        let username = raw.trim();
        if username.is_empty() {
            return Err(RsherlockError::Validation("用户名不能为空".to_string()));
        }
        if username.chars().count() < Self::MIN_LEN {
            return Err(RsherlockError::Validation(format!(
                "用户名至少需要{}个字符",
                Self::MIN_LEN
            )));
        }
        Ok(username.to_string())
    }
}
