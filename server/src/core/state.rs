use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::Notifier;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的共享引用
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt | Arc<JwtService> | JWT 认证服务 |
/// | notifier | Notifier | 通知分发 (best-effort) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务
    pub jwt: Arc<JwtService>,
    /// 通知分发服务
    pub notifier: Notifier,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：数据库 (含迁移) → JWT → 通知分发
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        let jwt = Arc::new(JwtService::new(config.jwt_secret.clone()));
        let notifier = Notifier::new(db.pool.clone());

        Ok(Self {
            config: config.clone(),
            db,
            jwt,
            notifier,
        })
    }

    /// 测试用：内存数据库
    pub async fn initialize_in_memory(config: &Config) -> AppResult<Self> {
        let db = DbService::open_in_memory().await?;
        let jwt = Arc::new(JwtService::new(config.jwt_secret.clone()));
        let notifier = Notifier::new(db.pool.clone());

        Ok(Self {
            config: config.clone(),
            db,
            jwt,
            notifier,
        })
    }
}
