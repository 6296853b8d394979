//! 角色注册表模块
//!
//! 角色名到权限持有者集合的映射，是解析器查询的唯一数据来源。

use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::configurator::{ResourceConfigurator, RoleConfigurator};
use super::permission::{PermissionHolder, ResourceId};
use super::resolver::StaticRoleResolver;
use crate::config::GuardConfig;

/// 一批待提交的持有者，按角色分组
pub type StagedHolders = HashMap<String, Vec<PermissionHolder>>;

/// 角色注册表
///
/// 作为显式的服务对象构建一次，通过 `Arc` 注入到配置器、解析器和守卫中。
/// 写入按批次在单个写锁内完成，查询永远看不到只提交了一半的批次。
///
/// # 示例
///
/// ```rust
/// use roleguard::rbac::{OperationSet, PermissionHolder, ResourceId, RoleRegistry};
///
/// let registry = RoleRegistry::shared();
/// registry.put("EDITOR", PermissionHolder::new(ResourceId::new("orders"), OperationSet::all()));
///
/// assert_eq!(registry.holders_for("EDITOR").len(), 1);
/// assert!(registry.holders_for("VIEWER").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct RoleRegistry {
    holders: RwLock<HashMap<String, Vec<PermissionHolder>>>,
    config: GuardConfig,
}

impl RoleRegistry {
    /// 使用指定配置创建注册表
    pub fn new(config: GuardConfig) -> Self {
        Self {
            holders: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// 使用默认配置创建共享注册表
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 使用指定配置创建共享注册表
    pub fn shared_with(config: GuardConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// 获取配置
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// 通配角色名称
    pub fn wildcard_role(&self) -> &str {
        &self.config.wildcard_role
    }

    /// 角色优先的配置器
    pub fn role_configurator(self: &Arc<Self>) -> RoleConfigurator {
        RoleConfigurator::new(Arc::clone(self))
    }

    /// 资源优先的配置器
    pub fn resource_configurator(self: &Arc<Self>) -> ResourceConfigurator {
        ResourceConfigurator::new(Arc::clone(self))
    }

    /// 基于此注册表的解析器
    pub fn resolver(self: &Arc<Self>) -> StaticRoleResolver {
        StaticRoleResolver::new(Arc::clone(self))
    }

    /// 为角色添加一个持有者，角色不存在时创建
    pub fn put(&self, role: impl Into<String>, holder: PermissionHolder) {
        let mut holders = self.holders.write();
        let entry = holders.entry(role.into()).or_default();
        self.insert_holder(entry, holder);
    }

    /// 在单个写锁内提交一批持有者
    ///
    /// 返回写入的持有者数量
    pub fn commit(&self, batch: StagedHolders) -> usize {
        if batch.is_empty() {
            return 0;
        }

        let mut count = 0;
        let mut holders = self.holders.write();
        for (role, staged) in batch {
            if staged.is_empty() {
                continue;
            }
            let entry = holders.entry(role).or_default();
            for holder in staged {
                self.insert_holder(entry, holder);
                count += 1;
            }
        }

        tracing::debug!(holders = count, "committed permission batch");
        count
    }

    fn insert_holder(&self, entry: &mut Vec<PermissionHolder>, holder: PermissionHolder) {
        if self.config.merge_duplicate_holders {
            if let Some(existing) = entry.iter_mut().find(|h| h.covers(holder.resource())) {
                *existing = existing.merged_with(&holder);
                return;
            }
        }
        entry.push(holder);
    }

    /// 获取角色的持有者快照（可能为空）
    pub fn holders_for(&self, role: &str) -> Vec<PermissionHolder> {
        self.holders.read().get(role).cloned().unwrap_or_default()
    }

    /// 在读锁内检查角色是否有满足条件的持有者
    pub(crate) fn any_holder<F>(&self, role: &str, predicate: F) -> bool
    where
        F: Fn(&PermissionHolder) -> bool,
    {
        self.holders
            .read()
            .get(role)
            .is_some_and(|holders| holders.iter().any(predicate))
    }

    /// 资源是否被任何角色注册过
    pub fn is_registered(&self, resource: &ResourceId) -> bool {
        self.holders
            .read()
            .values()
            .flatten()
            .any(|holder| holder.covers(resource))
    }

    /// 已注册的角色（有序）
    pub fn roles(&self) -> Vec<String> {
        let holders = self.holders.read();
        let roles: BTreeSet<&String> = holders.keys().collect();
        roles.into_iter().cloned().collect()
    }

    /// 获取角色数量
    pub fn role_count(&self) -> usize {
        self.holders.read().len()
    }

    /// 获取持有者总数
    pub fn holder_count(&self) -> usize {
        self.holders.read().values().map(Vec::len).sum()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.holders.read().is_empty()
    }
}
