//! 认证授权模块
//!
//! 提供 JWT 认证和请求上下文：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文 (id + role)
//! - [`require_auth`] - 认证中间件
//!
//! 凭证签发（登录）属于外部协作方；本服务只验证令牌并信任其中的
//! actor id 和 role。

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtError, JwtService, Role};
pub use middleware::require_auth;
