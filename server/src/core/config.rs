/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | orders.db | SQLite 数据库路径 |
/// | JWT_SECRET | (dev default) | JWT 签名密钥 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录 (可选) |
/// | TAX_RATE | 0.08 | 税率 (占小计的比例) |
/// | DELIVERY_FEE | 3.99 | 固定配送费 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/orders.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// JWT 签名密钥
    pub jwt_secret: String,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 日志文件目录 (未设置时仅输出到 stdout)
    pub log_dir: Option<String>,

    // === 财务策略 ===
    /// 税率，按订单小计计算 (服务端推导，不信任客户端)
    pub tax_rate: f64,
    /// 固定配送费
    pub delivery_fee: f64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "orders.db".into()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-in-production".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.08),
            delivery_fee: std::env::var("DELIVERY_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3.99),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            database_path: "orders.db".into(),
            jwt_secret: "dev-secret-change-in-production".into(),
            log_level: "info".into(),
            log_dir: None,
            tax_rate: 0.08,
            delivery_fee: 3.99,
        }
    }
}
