//! # RoleGuard
//!
//! 一个基于角色的资源访问控制库。
//!
//! ## 功能特性
//!
//! - **权限持有者**: 资源标识与允许的创建/更新/删除操作
//! - **角色注册表**: 线程安全的角色到权限映射
//! - **解析器**: 按 (角色, 资源) 回答访问和操作查询，支持 `ALL` 通配角色
//! - **配置器**: 角色优先和资源优先两种链式配置方式
//! - **访问守卫**: 结合当前认证主体做出放行或拒绝决策
//! - **审计日志**: 记录访问授予、拒绝和登出事件
//!
//! ## 快速开始
//!
//! ```rust
//! use roleguard::{
//!     CurrentUserGate, Principal, ProtectedResource, RoleRegistry, StaticAuthenticationContext,
//! };
//!
//! struct InvoicesView;
//! impl ProtectedResource for InvoicesView {}
//!
//! let registry = RoleRegistry::shared();
//! registry
//!     .role_configurator()
//!     .for_roles(["ACCOUNTANT"])
//!     .allow_access([InvoicesView::resource_id()])
//!     .allow_all_operations();
//!
//! let context = StaticAuthenticationContext::authenticated(
//!     Principal::new("alice").with_authority("ROLE_ACCOUNTANT"),
//! );
//! let gate = CurrentUserGate::for_registry(context, &registry);
//!
//! assert!(gate.before_enter::<InvoicesView>().is_ok());
//! assert!(gate.is_delete_operation_allowed(&InvoicesView::resource_id()).unwrap());
//! ```
//!
//! ## 配置示例
//!
//! ```rust
//! use roleguard::GuardConfig;
//!
//! let config = GuardConfig::from_json_str(r#"{"wildcard_role": "*"}"#).unwrap();
//! assert_eq!(config.wildcard_role, "*");
//! assert_eq!(config.role_from_authority("ROLE_ADMIN"), Some("ADMIN"));
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod gate;
pub mod rbac;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};

// ============================================================================
// 配置相关导出
// ============================================================================

pub use config::{DEFAULT_ROLE_PREFIX, DEFAULT_WILDCARD_ROLE, GuardConfig};

// ============================================================================
// RBAC 相关导出
// ============================================================================

pub use rbac::{
    Operation, OperationConfigurator, OperationSet, PermissionHolder, ProtectedResource,
    ResourceConfigurator, ResourceId, ResourceOperationConfigurator, RoleConfigurator,
    RoleRegistry, RoleResolver, StaticRoleResolver,
};

// ============================================================================
// 访问守卫相关导出
// ============================================================================

pub use gate::{AuthenticationContext, CurrentUserGate, Principal, StaticAuthenticationContext};

// ============================================================================
// 审计日志相关导出
// ============================================================================

pub use audit::{
    AuditLogger, EventSeverity, EventType, InMemoryAuditLogger, NoOpAuditLogger, SecurityEvent,
    TracingAuditLogger,
};
