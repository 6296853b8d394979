//! 统一错误类型模块
//!
//! 提供 roleguard 库中所有操作的错误类型定义。

use thiserror::Error;

/// roleguard 库的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// roleguard 库的错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// 访问被拒绝
    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// 创建一个匿名访问错误
    pub fn anonymous() -> Self {
        Error::AccessDenied(AccessDeniedError::Anonymous)
    }

    /// 创建一个禁止访问错误
    pub fn forbidden(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Error::AccessDenied(AccessDeniedError::Forbidden {
            resource: resource.into(),
            operation: operation.into(),
        })
    }

    /// 是否为访问拒绝（包括匿名访问）
    ///
    /// 宿主应用可据此映射为 "forbidden" 响应
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Error::AccessDenied(_))
    }

    /// 是否为匿名访问
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Error::AccessDenied(AccessDeniedError::Anonymous))
    }
}

/// 访问拒绝相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDeniedError {
    /// 当前没有已认证的主体
    #[error("forbidden for anonymous")]
    Anonymous,
    /// 主体的任何角色都未授予该权限
    #[error("forbidden for the user: {operation} on '{resource}'")]
    Forbidden {
        /// 资源标识
        resource: String,
        /// 请求的操作（access/create/update/delete）
        operation: String,
    },
}

/// 配置相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 缺少必需的配置
    #[error("missing required configuration: {0}")]
    MissingRequired(String),
    /// 无效的配置值
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    /// 配置解析失败
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
