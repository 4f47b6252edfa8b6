//! Marketplace Order Server - 订单生命周期与履约服务
//!
//! # 架构概述
//!
//! 多租户外卖市场的订单子系统：下单、状态流转、餐厅端查询与通知。
//!
//! # 模块结构
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证 (actor id + role)
//! ├── api/           # HTTP 路由和处理器 (薄封装)
//! ├── orders/        # 订单生命周期引擎、金额计算、查询投影
//! ├── services/      # 通知分发 (best-effort)
//! ├── db/            # SQLite 连接池与 repository
//! └── utils/         # 错误、日志、时间、验证
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
