//! 集成测试：RBAC (Role-Based Access Control)
//!
//! 测试权限持有者、角色注册表、解析器以及两种配置器的完整流程。

use std::sync::Arc;
use std::thread;

use roleguard::rbac::{
    Operation, OperationSet, PermissionHolder, ProtectedResource, ResourceId, RoleRegistry,
    RoleResolver, StaticRoleResolver,
};
use roleguard::GuardConfig;

struct PageX;
impl ProtectedResource for PageX {}

struct PageY;
impl ProtectedResource for PageY {}

struct PageZ;
impl ProtectedResource for PageZ {}

/// 检查四种查询的结果 (access, create, update, delete)
fn answers(resolver: &impl RoleResolver, role: &str, resource: &ResourceId) -> [bool; 4] {
    [
        resolver.is_access_allowed(role, resource),
        resolver.is_create_allowed(role, resource),
        resolver.is_update_allowed(role, resource),
        resolver.is_delete_allowed(role, resource),
    ]
}

/// 测试场景一：角色优先配置授予全部操作
#[test]
fn test_role_first_scenario() {
    let registry = RoleRegistry::shared();
    registry
        .role_configurator()
        .for_roles(["EDITOR"])
        .allow_access([PageX::resource_id()])
        .allow_all_operations();

    let resolver = registry.resolver();
    let page = PageX::resource_id();

    assert_eq!(answers(&resolver, "EDITOR", &page), [true; 4]);
    assert_eq!(answers(&resolver, "VIEWER", &page), [false; 4]);
}

/// 测试场景二：资源优先配置为所有角色授予只读访问
#[test]
fn test_resource_first_scenario() {
    let registry = RoleRegistry::shared();
    registry
        .resource_configurator()
        .for_resources([PageY::resource_id()])
        .allow_access_for_all(false, false, false)
        .accept();

    let resolver = registry.resolver();
    let page = PageY::resource_id();

    for role in ["EDITOR", "VIEWER", "ALL", "NEVER_REGISTERED"] {
        assert_eq!(answers(&resolver, role, &page), [true, false, false, false]);
    }
}

/// 测试场景三：未配置的资源一律拒绝
#[test]
fn test_unconfigured_resource_scenario() {
    let registry = RoleRegistry::shared();
    let resolver = registry.resolver();

    assert_eq!(answers(&resolver, "ANY", &PageZ::resource_id()), [false; 4]);

    // 其他资源的配置不影响 PageZ
    registry
        .role_configurator()
        .for_all()
        .allow_access([PageX::resource_id(), PageY::resource_id()])
        .allow_all_operations();
    assert_eq!(answers(&resolver, "ANY", &PageZ::resource_id()), [false; 4]);
}

/// 测试没有任何持有者时拒绝
#[test]
fn test_no_holder_denies() {
    let registry = RoleRegistry::shared();
    registry.put("EDITOR", PermissionHolder::access_only(ResourceId::new("orders")));
    let resolver = registry.resolver();

    assert!(!resolver.is_access_allowed("VIEWER", &ResourceId::new("orders")));
    assert!(!resolver.is_access_allowed("EDITOR", &ResourceId::new("invoices")));
}

/// 测试空操作集合仍然授予访问
#[test]
fn test_empty_operation_set_grants_access() {
    let registry = RoleRegistry::shared();
    let orders = ResourceId::new("orders");
    registry.put("VIEWER", PermissionHolder::new(orders.clone(), OperationSet::new()));

    let resolver = registry.resolver();
    assert_eq!(answers(&resolver, "VIEWER", &orders), [true, false, false, false]);
}

/// 测试每种操作只由包含该操作的持有者授予
#[test]
fn test_operation_requires_matching_holder() {
    let registry = RoleRegistry::shared();
    let orders = ResourceId::new("orders");
    registry.put(
        "CLERK",
        PermissionHolder::new(orders.clone(), [Operation::Create].into_iter().collect()),
    );
    registry.put(
        "ALL",
        PermissionHolder::new(orders.clone(), [Operation::Update].into_iter().collect()),
    );

    let resolver = registry.resolver();
    assert_eq!(answers(&resolver, "CLERK", &orders), [true, true, true, false]);
    assert_eq!(answers(&resolver, "GUEST", &orders), [true, false, true, false]);
}

/// 测试通配角色的单调性
#[test]
fn test_wildcard_monotonicity() {
    let registry = RoleRegistry::shared();
    let reports = ResourceId::new("reports");
    registry
        .role_configurator()
        .for_roles(["ANALYST"])
        .allow_access([ResourceId::new("dashboards")])
        .accept();

    let resolver = registry.resolver();
    let roles = ["ANALYST", "EDITOR", "SOMEONE_NEW"];
    for role in roles {
        assert!(!resolver.is_access_allowed(role, &reports));
    }

    registry
        .role_configurator()
        .for_all()
        .allow_access([reports.clone()])
        .accept();

    for role in roles {
        assert!(resolver.is_access_allowed(role, &reports));
    }
    // 原有授权保持不变
    assert!(resolver.is_access_allowed("ANALYST", &ResourceId::new("dashboards")));
}

/// 测试重复注册不改变解析结果
#[test]
fn test_idempotent_registration() {
    let orders = ResourceId::new("orders");
    let operations = OperationSet::from_flags(true, false, true);

    for merge in [true, false] {
        let registry =
            RoleRegistry::shared_with(GuardConfig::new().with_merge_duplicate_holders(merge));
        let resolver = registry.resolver();

        registry.put("EDITOR", PermissionHolder::new(orders.clone(), operations.clone()));
        let first = answers(&resolver, "EDITOR", &orders);

        registry.put("EDITOR", PermissionHolder::new(orders.clone(), operations.clone()));
        assert_eq!(answers(&resolver, "EDITOR", &orders), first);

        let expected_holders = if merge { 1 } else { 2 };
        assert_eq!(registry.holders_for("EDITOR").len(), expected_holders);
    }
}

/// 测试重复注册的操作集合取并集
#[test]
fn test_duplicate_holders_union() {
    let registry = RoleRegistry::shared();
    let orders = ResourceId::new("orders");

    registry
        .role_configurator()
        .for_roles(["EDITOR"])
        .allow_access([orders.clone()])
        .allow_create_operations()
        .accept()
        .for_roles(["EDITOR"])
        .allow_access([orders.clone()])
        .allow_delete_operations()
        .accept();

    let holders = registry.holders_for("EDITOR");
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].operations().len(), 2);

    let resolver = registry.resolver();
    assert_eq!(answers(&resolver, "EDITOR", &orders), [true, true, false, true]);
}

/// 测试两种配置器产生相同的解析结果
#[test]
fn test_configurator_equivalence() {
    let orders = ResourceId::new("orders");

    let by_role = RoleRegistry::shared();
    by_role
        .role_configurator()
        .for_roles(["A"])
        .allow_access([orders.clone()])
        .allow_create_operations()
        .accept();

    let by_resource = RoleRegistry::shared();
    by_resource
        .resource_configurator()
        .for_resources([orders.clone()])
        .allow_access(true, false, false, ["A"])
        .accept();

    let left = by_role.resolver();
    let right = by_resource.resolver();
    for role in ["A", "B", "ALL"] {
        assert_eq!(answers(&left, role, &orders), answers(&right, role, &orders));
    }
    assert!(left.is_create_allowed("A", &orders));
}

/// 测试两种配置器作用于同一注册表时取并集
#[test]
fn test_configurators_share_registry() {
    let registry = RoleRegistry::shared();
    let orders = ResourceId::new("orders");

    let resolver = registry
        .role_configurator()
        .for_roles(["EDITOR"])
        .allow_access([orders.clone()])
        .allow_update_operations()
        .accept()
        .wrap();

    registry
        .resource_configurator()
        .for_resources([orders.clone()])
        .allow_access(false, false, true, ["EDITOR", "AUDITOR"])
        .accept();

    assert_eq!(answers(&resolver, "EDITOR", &orders), [true, false, true, true]);
    assert_eq!(answers(&resolver, "AUDITOR", &orders), [true, false, false, true]);
}

/// 测试资源优先配置的多个阶段在一次提交中生效
#[test]
fn test_resource_first_batch() {
    let registry = RoleRegistry::shared();
    let pages = [PageX::resource_id(), PageY::resource_id()];

    let staged = registry
        .resource_configurator()
        .for_resources(pages.clone())
        .allow_access_for_all(false, false, false)
        .allow_operations(OperationSet::all(), ["ADMIN"]);
    assert_eq!(staged.staged_count(), 4);
    assert!(registry.is_empty());

    let resolver = staged.accept().get();
    for page in &pages {
        assert_eq!(answers(&resolver, "ADMIN", page), [true; 4]);
        assert_eq!(answers(&resolver, "GUEST", page), [true, false, false, false]);
    }
    assert_eq!(registry.roles(), vec!["ADMIN".to_string(), "ALL".to_string()]);
}

/// 测试自定义通配角色与 JSON 配置
#[test]
fn test_custom_wildcard_from_json() {
    let config = GuardConfig::from_json_str(r#"{"wildcard_role": "EVERYONE"}"#).unwrap();
    let registry = RoleRegistry::shared_with(config);
    let orders = ResourceId::new("orders");

    registry
        .role_configurator()
        .for_all()
        .allow_access([orders.clone()])
        .accept();

    let resolver = registry.resolver();
    assert!(resolver.is_access_allowed("ANYONE", &orders));
    assert!(registry.holders_for("ALL").is_empty());
    assert_eq!(registry.holders_for("EVERYONE").len(), 1);
}

/// 测试并发配置与查询
#[test]
fn test_concurrent_configuration_and_queries() {
    let registry = RoleRegistry::shared();
    let resolver: Arc<dyn RoleResolver> = Arc::new(StaticRoleResolver::new(Arc::clone(&registry)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                let resource = ResourceId::new(format!("resource-{i}"));
                let role = format!("ROLE{i}");
                registry
                    .role_configurator()
                    .for_roles([role.clone()])
                    .allow_access([resource.clone()])
                    .allow_delete_operations()
                    .accept();
                assert!(resolver.is_delete_allowed(&role, &resource));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.role_count(), 8);
    assert_eq!(registry.holder_count(), 8);
}
