//! 权限配置器模块
//!
//! 提供两种填充 [`RoleRegistry`] 的构建器：
//!
//! - [`RoleConfigurator`]：先选角色，再选资源和操作
//! - [`ResourceConfigurator`]：先选资源，再按角色授予操作
//!
//! 两者都以 `accept()` 结束，把暂存的持有者一次性提交到注册表。
//! 暂存数据随构建器按值传递，提交前不会触及共享状态。

use std::collections::BTreeSet;
use std::sync::Arc;

use super::permission::{Operation, OperationSet, PermissionHolder, ResourceId};
use super::registry::{RoleRegistry, StagedHolders};
use super::resolver::StaticRoleResolver;

/// 去掉空白角色名并去重
fn collect_roles<I, S>(roles: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    roles
        .into_iter()
        .map(Into::into)
        .filter(|role: &String| !role.trim().is_empty())
        .collect()
}

/// 去重资源标识，保持首次出现的顺序
fn collect_resources<I, R>(resources: I) -> Vec<ResourceId>
where
    I: IntoIterator<Item = R>,
    R: Into<ResourceId>,
{
    let mut seen = BTreeSet::new();
    resources
        .into_iter()
        .map(Into::into)
        .filter(|resource| seen.insert(resource.clone()))
        .collect()
}

// ============================================================================
// RoleConfigurator
// ============================================================================

/// 角色优先的权限配置器
///
/// # 示例
///
/// ```rust
/// use roleguard::rbac::{ResourceId, RoleRegistry, RoleResolver};
///
/// let registry = RoleRegistry::shared();
/// let orders = ResourceId::new("orders");
/// let reports = ResourceId::new("reports");
///
/// let resolver = registry
///     .role_configurator()
///     .for_roles(["EDITOR"])
///     .allow_access([orders.clone()])
///     .allow_all_operations()
///     .for_roles(["VIEWER", "EDITOR"])
///     .allow_access([reports.clone()])
///     .accept()
///     .wrap();
///
/// assert!(resolver.is_delete_allowed("EDITOR", &orders));
/// assert!(resolver.is_access_allowed("VIEWER", &reports));
/// assert!(!resolver.is_access_allowed("VIEWER", &orders));
/// ```
#[derive(Debug, Clone)]
pub struct RoleConfigurator {
    registry: Arc<RoleRegistry>,
    roles: Option<BTreeSet<String>>,
}

impl RoleConfigurator {
    /// 创建新的配置器
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self {
            registry,
            roles: None,
        }
    }

    /// 为所有主体配置权限（使用通配角色）
    pub fn for_all(self) -> Self {
        let wildcard = self.registry.wildcard_role().to_string();
        self.for_roles([wildcard])
    }

    /// 选择目标角色，替换之前的选择
    ///
    /// 空白角色名会被忽略
    pub fn for_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(collect_roles(roles));
        self
    }

    /// 当前选择的角色
    pub fn selected_roles(&self) -> Option<&BTreeSet<String>> {
        self.roles.as_ref()
    }

    /// 允许访问指定资源，进入操作配置阶段
    pub fn allow_access<I, R>(self, resources: I) -> OperationConfigurator
    where
        I: IntoIterator<Item = R>,
        R: Into<ResourceId>,
    {
        OperationConfigurator {
            resources: collect_resources(resources),
            operations: OperationSet::new(),
            parent: self,
        }
    }

    /// 返回基于同一注册表的解析器
    pub fn wrap(&self) -> StaticRoleResolver {
        StaticRoleResolver::new(Arc::clone(&self.registry))
    }
}

/// 角色优先配置器的操作阶段
///
/// 每个资源在提交时获得独立的持有者
#[derive(Debug, Clone)]
#[must_use = "permissions are only registered after accept() or allow_all_operations()"]
pub struct OperationConfigurator {
    parent: RoleConfigurator,
    resources: Vec<ResourceId>,
    operations: OperationSet,
}

impl OperationConfigurator {
    /// 允许创建
    pub fn allow_create_operations(mut self) -> Self {
        self.operations.insert(Operation::Create);
        self
    }

    /// 允许更新
    pub fn allow_update_operations(mut self) -> Self {
        self.operations.insert(Operation::Update);
        self
    }

    /// 允许删除
    pub fn allow_delete_operations(mut self) -> Self {
        self.operations.insert(Operation::Delete);
        self
    }

    /// 允许全部操作并提交
    pub fn allow_all_operations(mut self) -> RoleConfigurator {
        self.operations = OperationSet::all();
        self.accept()
    }

    /// 提交 (角色 × 资源) 的持有者，并清空角色选择
    pub fn accept(self) -> RoleConfigurator {
        let OperationConfigurator {
            mut parent,
            resources,
            operations,
        } = self;

        match parent.roles.take() {
            Some(roles) if !roles.is_empty() => {
                let mut batch = StagedHolders::new();
                for role in roles {
                    let holders = resources
                        .iter()
                        .map(|resource| PermissionHolder::new(resource.clone(), operations.clone()))
                        .collect();
                    batch.insert(role, holders);
                }

                let committed = parent.registry.commit(batch);
                tracing::debug!(
                    committed,
                    operations = %operations,
                    "role-first permissions accepted"
                );
            }
            _ => {
                tracing::warn!(
                    resources = resources.len(),
                    "accept() called without selected roles, nothing registered"
                );
            }
        }

        parent
    }
}

// ============================================================================
// ResourceConfigurator
// ============================================================================

/// 资源优先的权限配置器
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
///     .resource_configurator()
///     .for_resources([orders.clone()])
///     .allow_access(true, true, false, ["EDITOR"])
///     .allow_access_for_all(false, false, false)
///     .accept()
///     .get();
///
/// assert!(resolver.is_update_allowed("EDITOR", &orders));
/// assert!(resolver.is_access_allowed("GUEST", &orders));
/// assert!(!resolver.is_update_allowed("GUEST", &orders));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceConfigurator {
    registry: Arc<RoleRegistry>,
}

impl ResourceConfigurator {
    /// 创建新的配置器
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self { registry }
    }

    /// 选择目标资源，进入按角色授权阶段
    pub fn for_resources<I, R>(self, resources: I) -> ResourceOperationConfigurator
    where
        I: IntoIterator<Item = R>,
        R: Into<ResourceId>,
    {
        ResourceOperationConfigurator {
            resources: collect_resources(resources),
            staged: StagedHolders::new(),
            parent: self,
        }
    }

    /// 返回基于同一注册表的解析器
    pub fn get(&self) -> StaticRoleResolver {
        StaticRoleResolver::new(Arc::clone(&self.registry))
    }
}

/// 资源优先配置器的授权阶段
///
/// 多次 `allow_access` 累积在同一暂存表中，`accept()` 时一起提交
#[derive(Debug, Clone)]
#[must_use = "permissions are only registered after accept()"]
pub struct ResourceOperationConfigurator {
    parent: ResourceConfigurator,
    resources: Vec<ResourceId>,
    staged: StagedHolders,
}

impl ResourceOperationConfigurator {
    /// 为所有主体授予访问权，并按开关授予变更操作
    pub fn allow_access_for_all(self, create: bool, update: bool, delete: bool) -> Self {
        let wildcard = self.parent.registry.wildcard_role().to_string();
        self.allow_access(create, update, delete, [wildcard])
    }

    /// 为指定角色授予访问权，并按开关授予变更操作
    pub fn allow_access<I, S>(self, create: bool, update: bool, delete: bool, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_operations(OperationSet::from_flags(create, update, delete), roles)
    }

    /// 为指定角色授予访问权和给定的操作集合
    pub fn allow_operations<I, S>(mut self, operations: OperationSet, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for role in collect_roles(roles) {
            let entry = self.staged.entry(role).or_default();
            entry.extend(
                self.resources
                    .iter()
                    .map(|resource| PermissionHolder::new(resource.clone(), operations.clone())),
            );
        }
        self
    }

    /// 暂存的持有者数量
    pub fn staged_count(&self) -> usize {
        self.staged.values().map(Vec::len).sum()
    }

    /// 把暂存表合并到注册表
    pub fn accept(self) -> ResourceConfigurator {
        let ResourceOperationConfigurator { parent, staged, .. } = self;
        let committed = parent.registry.commit(staged);
        tracing::debug!(committed, "resource-first permissions accepted");
        parent
    }
}
