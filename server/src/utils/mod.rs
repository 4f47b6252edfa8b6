//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`logger`] - tracing 日志初始化
//! - [`time`] - 日期/时间戳转换
//! - [`validation`] - 输入验证

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult};
pub use error::{ok, ok_with_message};
