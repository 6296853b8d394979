//! 权限定义模块
//!
//! 提供资源标识、操作和权限持有者的定义。

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ResourceId 类型
// ============================================================================

/// 受保护资源的标识
///
/// 标识的是资源**类型**（例如某个页面或视图），而不是具体实例。
/// 所有查询都按标识相等进行匹配。
///
/// ## 示例
///
/// ```rust
/// use roleguard::rbac::ResourceId;
///
/// let orders = ResourceId::new("orders");
/// assert_eq!(orders, ResourceId::from("orders"));
/// assert_eq!(orders.as_str(), "orders");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(Cow<'static, str>);

impl ResourceId {
    /// 创建新的资源标识
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// 以 Rust 类型名作为资源标识
    ///
    /// ```rust
    /// use roleguard::rbac::ResourceId;
    ///
    /// struct OrdersView;
    ///
    /// assert_eq!(ResourceId::of::<OrdersView>(), ResourceId::of::<OrdersView>());
    /// assert!(ResourceId::of::<OrdersView>().as_str().ends_with("OrdersView"));
    /// ```
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// 获取标识字符串
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ResourceId {
    fn from(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 受访问控制保护的资源类型
///
/// 路由层在进入视图前通过此 trait 取得资源标识。
/// 默认实现使用类型名，也可以覆盖为稳定的字符串键。
pub trait ProtectedResource: 'static {
    /// 该资源类型的标识
    fn resource_id() -> ResourceId
    where
        Self: Sized,
    {
        ResourceId::of::<Self>()
    }
}

// ============================================================================
// Operation 类型
// ============================================================================

/// 变更操作
///
/// 读取（访问）不是独立的操作：只要 (角色, 资源) 存在持有者即隐含可访问
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// 创建
    Create,
    /// 更新
    Update,
    /// 删除
    Delete,
}

impl Operation {
    /// 所有操作
    pub const ALL: [Operation; 3] = [Operation::Create, Operation::Update, Operation::Delete];

    /// 获取操作名称
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(format!("unknown operation: {}", other)),
        }
    }
}

// ============================================================================
// OperationSet 类型
// ============================================================================

/// 操作集合
///
/// 可以为空，此时只授予访问权
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationSet {
    operations: BTreeSet<Operation>,
}

impl OperationSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 包含全部三种操作的集合
    pub fn all() -> Self {
        Operation::ALL.into_iter().collect()
    }

    /// 由三个开关构建集合
    pub fn from_flags(create: bool, update: bool, delete: bool) -> Self {
        let mut set = Self::new();
        if create {
            set.insert(Operation::Create);
        }
        if update {
            set.insert(Operation::Update);
        }
        if delete {
            set.insert(Operation::Delete);
        }
        set
    }

    /// 添加操作
    pub fn insert(&mut self, operation: Operation) -> bool {
        self.operations.insert(operation)
    }

    /// 检查是否包含操作
    pub fn contains(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    /// 与另一个集合取并集
    pub fn union(&self, other: &OperationSet) -> OperationSet {
        self.operations
            .union(&other.operations)
            .copied()
            .collect()
    }

    /// 获取操作数量
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// 按固定顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        self.operations.iter().copied()
    }
}

impl FromIterator<Operation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Operation::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

// ============================================================================
// PermissionHolder 类型
// ============================================================================

/// 权限持有者
///
/// 一个资源标识加上允许的变更操作集合。构建后不可变。
///
/// ```rust
/// use roleguard::rbac::{Operation, OperationSet, PermissionHolder, ResourceId};
///
/// let holder = PermissionHolder::new(
///     ResourceId::new("orders"),
///     OperationSet::from_flags(true, false, false),
/// );
/// assert!(holder.allows(Operation::Create));
/// assert!(!holder.allows(Operation::Delete));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionHolder {
    resource: ResourceId,
    operations: OperationSet,
}

impl PermissionHolder {
    /// 创建新的持有者
    pub fn new(resource: ResourceId, operations: OperationSet) -> Self {
        Self {
            resource,
            operations,
        }
    }

    /// 只授予访问权的持有者
    pub fn access_only(resource: ResourceId) -> Self {
        Self::new(resource, OperationSet::new())
    }

    /// 获取资源标识
    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    /// 获取允许的操作
    pub fn operations(&self) -> &OperationSet {
        &self.operations
    }

    /// 是否针对指定资源
    pub fn covers(&self, resource: &ResourceId) -> bool {
        &self.resource == resource
    }

    /// 是否允许指定操作
    pub fn allows(&self, operation: Operation) -> bool {
        self.operations.contains(operation)
    }

    /// 与同一资源的另一个持有者合并（操作取并集）
    pub(crate) fn merged_with(&self, other: &PermissionHolder) -> PermissionHolder {
        debug_assert_eq!(self.resource, other.resource);
        PermissionHolder::new(
            self.resource.clone(),
            self.operations.union(&other.operations),
        )
    }
}

impl fmt::Display for PermissionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OrdersView;
    impl ProtectedResource for OrdersView {}

    struct InvoicesView;
    impl ProtectedResource for InvoicesView {
        fn resource_id() -> ResourceId {
            ResourceId::new("invoices")
        }
    }

    #[test]
    fn test_resource_id_equality() {
        assert_eq!(ResourceId::new("orders"), ResourceId::from("orders"));
        assert_eq!(
            ResourceId::from("orders".to_string()),
            ResourceId::new("orders")
        );
        assert_ne!(ResourceId::new("orders"), ResourceId::new("Orders"));
    }

    #[test]
    fn test_protected_resource_ids() {
        assert_eq!(OrdersView::resource_id(), ResourceId::of::<OrdersView>());
        assert_ne!(OrdersView::resource_id(), ResourceId::of::<InvoicesView>());
        assert_eq!(InvoicesView::resource_id().as_str(), "invoices");
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!("create".parse::<Operation>(), Ok(Operation::Create));
        assert_eq!("UPDATE".parse::<Operation>(), Ok(Operation::Update));
        assert_eq!("Delete".parse::<Operation>(), Ok(Operation::Delete));
        assert!("read".parse::<Operation>().is_err());
        assert_eq!(Operation::Delete.to_string(), "delete");
    }

    #[test]
    fn test_operation_set_flags() {
        let none = OperationSet::from_flags(false, false, false);
        assert!(none.is_empty());

        let some = OperationSet::from_flags(true, false, true);
        assert!(some.contains(Operation::Create));
        assert!(!some.contains(Operation::Update));
        assert!(some.contains(Operation::Delete));
        assert_eq!(some.len(), 2);

        assert_eq!(OperationSet::all(), OperationSet::from_flags(true, true, true));
    }

    #[test]
    fn test_operation_set_union() {
        let create = OperationSet::from_flags(true, false, false);
        let delete = OperationSet::from_flags(false, false, true);
        let both = create.union(&delete);

        assert!(both.contains(Operation::Create));
        assert!(both.contains(Operation::Delete));
        assert!(!both.contains(Operation::Update));
        assert_eq!(both.to_string(), "[create, delete]");
    }

    #[test]
    fn test_permission_holder() {
        let holder = PermissionHolder::access_only(ResourceId::new("orders"));
        assert!(holder.covers(&ResourceId::new("orders")));
        assert!(!holder.covers(&ResourceId::new("invoices")));
        assert!(Operation::ALL.iter().all(|op| !holder.allows(*op)));
    }

    #[test]
    fn test_permission_holder_merge() {
        let a = PermissionHolder::new(
            ResourceId::new("orders"),
            OperationSet::from_flags(true, false, false),
        );
        let b = PermissionHolder::new(
            ResourceId::new("orders"),
            OperationSet::from_flags(false, true, false),
        );

        let merged = a.merged_with(&b);
        assert!(merged.allows(Operation::Create));
        assert!(merged.allows(Operation::Update));
        assert!(!merged.allows(Operation::Delete));
        // 原持有者不变
        assert!(!a.allows(Operation::Update));
    }

    #[test]
    fn test_holder_serialization() {
        let holder = PermissionHolder::new(
            ResourceId::new("orders"),
            OperationSet::from_flags(true, true, false),
        );
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(
            json,
            r#"{"resource":"orders","operations":["create","update"]}"#
        );

        let back: PermissionHolder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, holder);
    }
}
