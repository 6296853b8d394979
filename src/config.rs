//! 访问控制配置模块
//!
//! [`GuardConfig`] 控制通配角色名称、认证层角色前缀等行为，
//! 可以在代码中构建，也可以从 JSON 加载。
//!
//! ## 示例
//!
//! ```rust
//! use roleguard::GuardConfig;
//!
//! let config = GuardConfig::from_json_str(r#"{ "role_prefix": null }"#).unwrap();
//! assert_eq!(config.wildcard_role, "ALL");
//! assert!(config.role_prefix.is_none());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// 默认的通配角色名称
pub const DEFAULT_WILDCARD_ROLE: &str = "ALL";

/// 认证层授予的角色权限默认前缀
pub const DEFAULT_ROLE_PREFIX: &str = "ROLE_";

/// 访问控制配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// 通配角色：为它注册的权限对所有主体生效
    pub wildcard_role: String,

    /// 认证层权限字符串的角色前缀
    ///
    /// 设置时只保留带此前缀的权限并去掉前缀；为 `None` 时全部权限都视为角色
    pub role_prefix: Option<String>,

    /// 同一 (角色, 资源) 的重复注册是否合并为一个持有者（操作取并集）
    pub merge_duplicate_holders: bool,

    /// 查询从未被任何角色注册的资源时是否输出警告日志
    pub warn_on_unregistered_resource: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            wildcard_role: DEFAULT_WILDCARD_ROLE.to_string(),
            role_prefix: Some(DEFAULT_ROLE_PREFIX.to_string()),
            merge_duplicate_holders: true,
            warn_on_unregistered_resource: true,
        }
    }
}

impl GuardConfig {
    /// 创建新的配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 字符串加载配置，缺省字段使用默认值
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GuardConfig = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// 设置通配角色名称
    pub fn with_wildcard_role(mut self, role: impl Into<String>) -> Self {
        self.wildcard_role = role.into();
        self
    }

    /// 设置角色前缀
    pub fn with_role_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.role_prefix = Some(prefix.into());
        self
    }

    /// 不使用角色前缀，所有权限字符串都视为角色
    pub fn without_role_prefix(mut self) -> Self {
        self.role_prefix = None;
        self
    }

    /// 设置是否合并重复的持有者
    pub fn with_merge_duplicate_holders(mut self, enabled: bool) -> Self {
        self.merge_duplicate_holders = enabled;
        self
    }

    /// 设置是否对未注册资源输出警告
    pub fn with_unregistered_resource_warning(mut self, enabled: bool) -> Self {
        self.warn_on_unregistered_resource = enabled;
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.wildcard_role.trim().is_empty() {
            return Err(ConfigError::MissingRequired("wildcard_role".to_string()).into());
        }

        if let Some(prefix) = &self.role_prefix {
            if prefix.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "role_prefix".to_string(),
                    message: "must not be blank, use null to disable".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// 把认证层的权限字符串转换为角色名
    ///
    /// 不符合前缀约定的权限返回 `None`
    pub fn role_from_authority<'a>(&self, authority: &'a str) -> Option<&'a str> {
        let role = match &self.role_prefix {
            Some(prefix) => authority.strip_prefix(prefix.as_str())?,
            None => authority,
        };

        if role.trim().is_empty() {
            None
        } else {
            Some(role)
        }
    }
}
