//! 访问守卫模块
//!
//! 从认证上下文取得当前主体及其角色，通过 [`RoleResolver`] 做出决策。
//! 路由层在进入受保护视图前调用 [`CurrentUserGate::before_enter`]，
//! 页面内的操作按钮可使用 `is_*_operation_allowed` 决定是否可用。
//!
//! ## 示例
//!
//! ```rust
//! use roleguard::gate::{CurrentUserGate, Principal, StaticAuthenticationContext};
//! use roleguard::rbac::{ResourceId, RoleRegistry};
//!
//! let registry = RoleRegistry::shared();
//! let orders = ResourceId::new("orders");
//! registry
//!     .role_configurator()
//!     .for_roles(["EDITOR"])
//!     .allow_access([orders.clone()])
//!     .allow_update_operations()
//!     .accept();
//!
//! let context = StaticAuthenticationContext::authenticated(
//!     Principal::new("alice").with_authority("ROLE_EDITOR"),
//! );
//! let gate = CurrentUserGate::for_registry(context, &registry);
//!
//! assert!(gate.check_access(&orders).is_ok());
//! assert!(gate.is_update_operation_allowed(&orders).unwrap());
//! assert!(!gate.is_delete_operation_allowed(&orders).unwrap());
//! ```

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::audit::{AuditLogger, NoOpAuditLogger, SecurityEvent};
use crate::config::GuardConfig;
use crate::error::{Error, Result};
use crate::rbac::{
    Operation, ProtectedResource, ResourceId, RoleRegistry, RoleResolver, StaticRoleResolver,
};

/// 访问类型名称，用于错误信息和审计事件
const ACCESS: &str = "access";

// ============================================================================
// Principal
// ============================================================================

/// 已认证的访问主体
///
/// `authorities` 是认证层授予的原始权限字符串（例如 `ROLE_EDITOR`），
/// 由 [`GuardConfig::role_from_authority`] 转换为角色名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// 用户名
    pub username: String,
    /// 权限字符串
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl Principal {
    /// 创建新的主体
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            authorities: Vec::new(),
        }
    }

    /// 添加权限字符串
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.push(authority.into());
        self
    }

    /// 添加多个权限字符串
    pub fn with_authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorities.extend(authorities.into_iter().map(Into::into));
        self
    }

    /// 获取用户名
    pub fn username(&self) -> &str {
        &self.username
    }

    /// 按配置提取角色名
    pub fn roles(&self, config: &GuardConfig) -> Vec<String> {
        let mut roles: Vec<String> = Vec::new();
        for authority in &self.authorities {
            if let Some(role) = config.role_from_authority(authority) {
                if !roles.iter().any(|r| r == role) {
                    roles.push(role.to_string());
                }
            }
        }
        roles
    }
}

// ============================================================================
// AuthenticationContext
// ============================================================================

/// 认证上下文 trait
///
/// 由宿主应用的认证层实现
pub trait AuthenticationContext: Send + Sync {
    /// 当前已认证的主体，匿名时返回 `None`
    fn authenticated_principal(&self) -> Option<Principal>;

    /// 登出当前主体
    fn logout(&self);
}

impl<C: AuthenticationContext + ?Sized> AuthenticationContext for Arc<C> {
    fn authenticated_principal(&self) -> Option<Principal> {
        (**self).authenticated_principal()
    }

    fn logout(&self) {
        (**self).logout()
    }
}

/// 内存认证上下文
///
/// 用于测试、演示以及单主体的嵌入式场景
#[derive(Debug, Default)]
pub struct StaticAuthenticationContext {
    principal: RwLock<Option<Principal>>,
}

impl StaticAuthenticationContext {
    /// 创建匿名上下文
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// 创建已认证的上下文
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: RwLock::new(Some(principal)),
        }
    }

    /// 切换当前主体
    pub fn sign_in(&self, principal: Principal) {
        *self.principal.write() = Some(principal);
    }
}

impl AuthenticationContext for StaticAuthenticationContext {
    fn authenticated_principal(&self) -> Option<Principal> {
        self.principal.read().clone()
    }

    fn logout(&self) {
        self.principal.write().take();
    }
}

// ============================================================================
// CurrentUserGate
// ============================================================================

/// 当前用户访问守卫
///
/// 每次调用都重新读取主体和注册表，不缓存决策。
/// 任意一个角色授予即放行，角色的迭代顺序不影响结果。
pub struct CurrentUserGate<C, R = StaticRoleResolver> {
    context: C,
    resolver: R,
    config: GuardConfig,
    audit: Arc<dyn AuditLogger>,
}

impl<C> CurrentUserGate<C, StaticRoleResolver>
where
    C: AuthenticationContext,
{
    /// 基于注册表创建守卫，沿用注册表的配置
    pub fn for_registry(context: C, registry: &Arc<RoleRegistry>) -> Self {
        Self::new(context, registry.resolver()).with_config(registry.config().clone())
    }
}

impl<C, R> CurrentUserGate<C, R>
where
    C: AuthenticationContext,
    R: RoleResolver,
{
    /// 创建新的守卫（默认配置，不记录审计日志）
    pub fn new(context: C, resolver: R) -> Self {
        Self {
            context,
            resolver,
            config: GuardConfig::default(),
            audit: Arc::new(NoOpAuditLogger),
        }
    }

    /// 设置配置
    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置审计日志记录器
    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// 获取解析器
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// 获取认证上下文
    pub fn context(&self) -> &C {
        &self.context
    }

    /// 当前主体，匿名时返回访问拒绝
    fn current_principal(&self) -> Result<Principal> {
        self.context
            .authenticated_principal()
            .ok_or_else(Error::anonymous)
    }

    /// 为资源取得当前主体，匿名访问记录审计事件
    fn principal_for(&self, resource: &ResourceId) -> Result<Principal> {
        self.current_principal().inspect_err(|_| {
            tracing::debug!(resource = %resource, "anonymous principal denied");
            self.audit
                .log(SecurityEvent::anonymous_access_denied(resource.as_str()));
        })
    }

    /// 当前用户名
    pub fn username(&self) -> Result<String> {
        Ok(self.current_principal()?.username)
    }

    /// 当前用户的角色
    pub fn current_user_roles(&self) -> Result<Vec<String>> {
        Ok(self.current_principal()?.roles(&self.config))
    }

    /// 登出当前用户
    pub fn logout(&self) {
        if let Some(principal) = self.context.authenticated_principal() {
            self.audit.log(SecurityEvent::logout(principal.username));
        }
        self.context.logout();
    }

    /// 按名称与谓词判断是否有任意角色授予
    fn any_role_grants<F>(
        &self,
        resource: &ResourceId,
        operation: &str,
        grants: F,
    ) -> Result<(Principal, bool)>
    where
        F: Fn(&str) -> bool,
    {
        let principal = self.principal_for(resource)?;
        let allowed = principal
            .roles(&self.config)
            .iter()
            .any(|role| grants(role.as_str()));

        if !allowed
            && self.config.warn_on_unregistered_resource
            && !self.resolver.is_resource_registered(resource)
        {
            tracing::warn!(
                user = %principal.username,
                resource = %resource,
                operation,
                "resource has no permission holders under any role"
            );
        }

        tracing::debug!(
            user = %principal.username,
            resource = %resource,
            operation,
            allowed,
            "access decision"
        );
        Ok((principal, allowed))
    }

    /// 当前用户是否可以访问资源
    pub fn is_access_allowed(&self, resource: &ResourceId) -> Result<bool> {
        self.any_role_grants(resource, ACCESS, |role| {
            self.resolver.is_access_allowed(role, resource)
        })
        .map(|(_, allowed)| allowed)
    }

    /// 当前用户是否可以执行变更操作
    pub fn is_operation_allowed(
        &self,
        resource: &ResourceId,
        operation: Operation,
    ) -> Result<bool> {
        self.any_role_grants(resource, operation.as_str(), |role| {
            self.resolver.is_operation_allowed(role, resource, operation)
        })
        .map(|(_, allowed)| allowed)
    }

    /// 当前用户是否可以创建
    pub fn is_create_operation_allowed(&self, resource: &ResourceId) -> Result<bool> {
        self.is_operation_allowed(resource, Operation::Create)
    }

    /// 当前用户是否可以更新
    pub fn is_update_operation_allowed(&self, resource: &ResourceId) -> Result<bool> {
        self.is_operation_allowed(resource, Operation::Update)
    }

    /// 当前用户是否可以删除
    pub fn is_delete_operation_allowed(&self, resource: &ResourceId) -> Result<bool> {
        self.is_operation_allowed(resource, Operation::Delete)
    }

    /// 要求当前用户可以访问资源，否则返回访问拒绝
    pub fn check_access(&self, resource: &ResourceId) -> Result<()> {
        let (principal, allowed) = self.any_role_grants(resource, ACCESS, |role| {
            self.resolver.is_access_allowed(role, resource)
        })?;
        self.enforce(principal, resource, ACCESS, allowed)
    }

    /// 要求当前用户可以执行变更操作，否则返回访问拒绝
    pub fn check_operation(&self, resource: &ResourceId, operation: Operation) -> Result<()> {
        let (principal, allowed) = self.any_role_grants(resource, operation.as_str(), |role| {
            self.resolver.is_operation_allowed(role, resource, operation)
        })?;
        self.enforce(principal, resource, operation.as_str(), allowed)
    }

    /// 进入受保护视图前的检查
    pub fn before_enter<V: ProtectedResource>(&self) -> Result<()> {
        self.check_access(&V::resource_id())
    }

    fn enforce(
        &self,
        principal: Principal,
        resource: &ResourceId,
        operation: &str,
        allowed: bool,
    ) -> Result<()> {
        if allowed {
            self.audit.log(SecurityEvent::access_granted(
                principal.username,
                resource.as_str(),
                operation,
            ));
            Ok(())
        } else {
            self.audit.log(SecurityEvent::access_denied(
                principal.username,
                resource.as_str(),
                operation,
            ));
            Err(Error::forbidden(resource.as_str(), operation))
        }
    }
}
