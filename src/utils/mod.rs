//! 通用工具模块
pub mod body_guard;

pub use self::body_guard::BodyGuard;
