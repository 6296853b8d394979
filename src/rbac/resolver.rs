//! 权限解析模块
//!
//! 给定角色和资源标识，回答访问/创建/更新/删除是否允许。

use std::sync::Arc;

use super::permission::{Operation, PermissionHolder, ResourceId};
use super::registry::RoleRegistry;
use crate::error::Result;

/// 角色权限解析器 trait
///
/// 定义按 (角色, 资源) 查询权限的接口
pub trait RoleResolver: Send + Sync {
    /// 角色是否可以访问（读取）资源
    fn is_access_allowed(&self, role: &str, resource: &ResourceId) -> bool;

    /// 角色是否可以对资源执行指定的变更操作
    fn is_operation_allowed(&self, role: &str, resource: &ResourceId, operation: Operation)
    -> bool;

    /// 角色是否可以创建
    fn is_create_allowed(&self, role: &str, resource: &ResourceId) -> bool {
        self.is_operation_allowed(role, resource, Operation::Create)
    }

    /// 角色是否可以更新
    fn is_update_allowed(&self, role: &str, resource: &ResourceId) -> bool {
        self.is_operation_allowed(role, resource, Operation::Update)
    }

    /// 角色是否可以删除
    fn is_delete_allowed(&self, role: &str, resource: &ResourceId) -> bool {
        self.is_operation_allowed(role, resource, Operation::Delete)
    }

    /// 是否有任意角色持有该资源
    ///
    /// 用于诊断未配置的资源；无法判断的实现保持默认的 `true`
    fn is_resource_registered(&self, _resource: &ResourceId) -> bool {
        true
    }

    /// 重新加载权限配置
    fn update(&self) -> Result<()>;
}

impl<R: RoleResolver + ?Sized> RoleResolver for Arc<R> {
    fn is_access_allowed(&self, role: &str, resource: &ResourceId) -> bool {
        (**self).is_access_allowed(role, resource)
    }

    fn is_operation_allowed(
        &self,
        role: &str,
        resource: &ResourceId,
        operation: Operation,
    ) -> bool {
        (**self).is_operation_allowed(role, resource, operation)
    }

    fn is_resource_registered(&self, resource: &ResourceId) -> bool {
        (**self).is_resource_registered(resource)
    }

    fn update(&self) -> Result<()> {
        (**self).update()
    }
}

/// 基于内存注册表的解析器
///
/// 精确角色与通配角色分别检查，结果取或；没有"拒绝优先"规则。
///
/// # 示例
///
/// ```rust
/// use roleguard::rbac::{ResourceId, RoleRegistry, RoleResolver};
///
/// let registry = RoleRegistry::shared();
/// let orders = ResourceId::new("orders");
///
/// let resolver = registry
///     .role_configurator()
///     .for_all()
///     .allow_access([orders.clone()])
///     .accept()
///     .wrap();
///
/// assert!(resolver.is_access_allowed("ANYONE", &orders));
/// assert!(!resolver.is_create_allowed("ANYONE", &orders));
/// ```
#[derive(Debug, Clone)]
pub struct StaticRoleResolver {
    registry: Arc<RoleRegistry>,
}

impl StaticRoleResolver {
    /// 创建新的解析器
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self { registry }
    }

    /// 获取底层注册表
    pub fn registry(&self) -> &Arc<RoleRegistry> {
        &self.registry
    }

    /// 先查精确角色，再查通配角色
    fn check<F>(&self, role: &str, predicate: F) -> bool
    where
        F: Fn(&PermissionHolder) -> bool,
    {
        let wildcard = self.registry.wildcard_role();
        self.registry.any_holder(role, &predicate)
            || (role != wildcard && self.registry.any_holder(wildcard, &predicate))
    }
}

impl RoleResolver for StaticRoleResolver {
    fn is_access_allowed(&self, role: &str, resource: &ResourceId) -> bool {
        self.check(role, |holder| holder.covers(resource))
    }

    fn is_operation_allowed(
        &self,
        role: &str,
        resource: &ResourceId,
        operation: Operation,
    ) -> bool {
        self.check(role, |holder| {
            holder.covers(resource) && holder.allows(operation)
        })
    }

    fn is_resource_registered(&self, resource: &ResourceId) -> bool {
        self.registry.is_registered(resource)
    }

    /// 静态注册表没有外部数据源，重新加载不做任何事
    fn update(&self) -> Result<()> {
        Ok(())
    }
}
