//! RBAC (角色权限解析) 示例
//!
//! 展示如何使用 RoleGuard 配置权限表、查询角色权限以及在视图入口做访问检查。
//!
//! 运行: RUST_LOG=roleguard=debug cargo run --example rbac_demo

use std::sync::Arc;

use roleguard::{
    CurrentUserGate, EventType, GuardConfig, InMemoryAuditLogger, Operation, OperationSet,
    Principal, ProtectedResource, RoleRegistry, RoleResolver, StaticAuthenticationContext,
};
use tracing_subscriber::EnvFilter;

struct ArticlesView;
impl ProtectedResource for ArticlesView {}

struct UsersView;
impl ProtectedResource for UsersView {}

struct DashboardView;
impl ProtectedResource for DashboardView {}

struct BillingView;
impl ProtectedResource for BillingView {}

/// 构建演示用的权限表
fn build_registry() -> Arc<RoleRegistry> {
    let registry = RoleRegistry::shared_with(GuardConfig::default());

    // 角色优先：先选角色，再选资源和操作
    registry
        .role_configurator()
        .for_roles(["EDITOR"])
        .allow_access([ArticlesView::resource_id()])
        .allow_create_operations()
        .allow_update_operations()
        .accept()
        .for_roles(["ADMIN"])
        .allow_access([ArticlesView::resource_id(), UsersView::resource_id()])
        .allow_all_operations()
        .for_all()
        .allow_access([DashboardView::resource_id()])
        .accept();

    // 资源优先：先选资源，再按角色授权
    registry
        .resource_configurator()
        .for_resources([BillingView::resource_id()])
        .allow_access(false, false, false, ["ACCOUNTANT"])
        .allow_operations(OperationSet::all(), ["ADMIN"])
        .accept();

    registry
}

/// 演示按角色查询
fn demo_resolver(registry: &Arc<RoleRegistry>) {
    println!("📚 角色权限查询演示\n");

    let resolver = registry.resolver();
    let resources = [
        ("articles", ArticlesView::resource_id()),
        ("users", UsersView::resource_id()),
        ("dashboard", DashboardView::resource_id()),
        ("billing", BillingView::resource_id()),
    ];

    for role in ["EDITOR", "ACCOUNTANT", "ADMIN", "GUEST"] {
        println!("   角色: {}", role);
        for (name, resource) in &resources {
            println!(
                "   - {:<10} 访问 {}  创建 {}  更新 {}  删除 {}",
                name,
                bool_emoji(resolver.is_access_allowed(role, resource)),
                bool_emoji(resolver.is_create_allowed(role, resource)),
                bool_emoji(resolver.is_update_allowed(role, resource)),
                bool_emoji(resolver.is_delete_allowed(role, resource)),
            );
        }
        println!();
    }

    println!("   已注册角色: {:?}", registry.roles());
    println!("   持有者总数: {}\n", registry.holder_count());
}

/// 演示当前用户访问守卫
fn demo_gate(registry: &Arc<RoleRegistry>) {
    println!("🛡️  访问守卫演示\n");

    let context = Arc::new(StaticAuthenticationContext::authenticated(
        Principal::new("alice").with_authorities(["ROLE_EDITOR", "SCOPE_profile"]),
    ));
    let audit = InMemoryAuditLogger::new();
    let gate = CurrentUserGate::for_registry(Arc::clone(&context), registry)
        .with_audit_logger(Arc::new(audit.clone()));

    if let Ok(username) = gate.username() {
        println!("   当前用户: {}", username);
    }
    if let Ok(roles) = gate.current_user_roles() {
        println!("   角色: {:?}", roles);
    }

    match gate.before_enter::<ArticlesView>() {
        Ok(()) => println!("   进入 articles: {}", bool_emoji(true)),
        Err(e) => println!("   进入 articles: {} ({})", bool_emoji(false), e),
    }
    match gate.before_enter::<UsersView>() {
        Ok(()) => println!("   进入 users: {}", bool_emoji(true)),
        Err(e) => println!("   进入 users: {} ({})", bool_emoji(false), e),
    }
    if let Err(e) = gate.check_operation(&ArticlesView::resource_id(), Operation::Delete) {
        println!("   删除文章: {} ({})", bool_emoji(false), e);
    }

    gate.logout();
    match gate.before_enter::<DashboardView>() {
        Ok(()) => println!("   登出后进入 dashboard: {}", bool_emoji(true)),
        Err(e) => println!("   登出后进入 dashboard: {} ({})", bool_emoji(false), e),
    }

    println!("\n   审计事件:");
    for event in audit.get_events() {
        println!(
            "   - [{}] {} user={} resource={}",
            event.severity,
            event.event_type,
            event.user_id.as_deref().unwrap_or("-"),
            event.resource.as_deref().unwrap_or("-"),
        );
    }
    println!(
        "   拒绝次数: {}\n",
        audit.get_events_by_type(&EventType::AccessDenied).len()
    );
}

fn bool_emoji(value: bool) -> &'static str {
    if value { "✅" } else { "❌" }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== RoleGuard RBAC 示例 ===\n");

    let registry = build_registry();

    demo_resolver(&registry);
    println!("{}\n", "=".repeat(50));

    demo_gate(&registry);

    println!("=== 示例结束 ===");
}
