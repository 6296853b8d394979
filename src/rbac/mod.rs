//! # RBAC (Role-Based Access Control) 模块
//!
//! 提供按角色解析资源权限的功能，包括：
//!
//! - **权限持有者**: 资源标识 + 允许的变更操作
//! - **角色注册表**: 角色到持有者集合的共享映射
//! - **解析器**: 按 (角色, 资源) 回答访问/创建/更新/删除查询
//! - **配置器**: 角色优先和资源优先两种构建 DSL
//!
//! ## 基本概念
//!
//! - **ResourceId（资源标识）**: 受保护资源类型的稳定标识
//! - **Operation（操作）**: 创建、更新、删除；读取由持有者是否存在隐含
//! - **通配角色**: 默认为 `ALL`，为它注册的权限对所有主体生效
//!
//! ## 使用示例
//!
//! ### 角色优先配置
//!
//! ```rust
//! use roleguard::rbac::{ResourceId, RoleRegistry, RoleResolver};
//!
//! let registry = RoleRegistry::shared();
//! let page = ResourceId::new("page-x");
//!
//! registry
//!     .role_configurator()
//!     .for_roles(["EDITOR"])
//!     .allow_access([page.clone()])
//!     .allow_all_operations();
//!
//! let resolver = registry.resolver();
//! assert!(resolver.is_access_allowed("EDITOR", &page));
//! assert!(resolver.is_create_allowed("EDITOR", &page));
//! assert!(!resolver.is_delete_allowed("VIEWER", &page));
//! ```
//!
//! ### 资源优先配置
//!
//! ```rust
//! use roleguard::rbac::{ResourceId, RoleRegistry, RoleResolver};
//!
//! let registry = RoleRegistry::shared();
//! let page = ResourceId::new("page-y");
//!
//! registry
//!     .resource_configurator()
//!     .for_resources([page.clone()])
//!     .allow_access_for_all(false, false, false)
//!     .accept();
//!
//! let resolver = registry.resolver();
//! assert!(resolver.is_access_allowed("ANY", &page));
//! assert!(!resolver.is_update_allowed("ANY", &page));
//! ```

mod configurator;
mod permission;
mod registry;
mod resolver;

pub use configurator::{
    OperationConfigurator, ResourceConfigurator, ResourceOperationConfigurator, RoleConfigurator,
};
pub use permission::{Operation, OperationSet, PermissionHolder, ProtectedResource, ResourceId};
pub use registry::{RoleRegistry, StagedHolders};
pub use resolver::{RoleResolver, StaticRoleResolver};
