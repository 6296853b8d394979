//! 审计日志模块
//!
//! 记录访问守卫做出的安全相关决策，包括：
//!
//! - **安全事件**: 访问放行、访问拒绝、匿名访问、登出
//! - **审计日志 Trait**: 定义日志记录接口
//! - **内存实现**: 用于测试和开发的简单实现
//! - **tracing 实现**: 把事件转发到 `tracing`
//!
//! ## 使用示例
//!
//! ```rust
//! use roleguard::audit::{AuditLogger, EventSeverity, InMemoryAuditLogger, SecurityEvent};
//!
//! let logger = InMemoryAuditLogger::new();
//!
//! logger.log(SecurityEvent::access_granted("alice", "orders", "access"));
//! logger.log(SecurityEvent::access_denied("bob", "orders", "delete"));
//! logger.log(SecurityEvent::anonymous_access_denied("orders"));
//!
//! assert_eq!(logger.event_count(), 3);
//! assert_eq!(logger.get_events_by_user("bob").len(), 1);
//! assert_eq!(logger.get_events_by_severity(EventSeverity::Warning).len(), 2);
//! ```

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// 事件严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EventSeverity {
    /// 调试信息
    Debug,
    /// 一般信息
    #[default]
    Info,
    /// 警告
    Warning,
    /// 错误
    Error,
}

impl std::fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventSeverity::Debug => write!(f, "DEBUG"),
            EventSeverity::Info => write!(f, "INFO"),
            EventSeverity::Warning => write!(f, "WARNING"),
            EventSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// 安全事件类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 访问或操作被放行
    AccessGranted,
    /// 已认证主体的访问或操作被拒绝
    AccessDenied,
    /// 匿名主体的访问被拒绝
    AnonymousAccessDenied,
    /// 登出
    Logout,
    /// 自定义事件
    Custom(String),
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::AccessGranted => write!(f, "access_granted"),
            EventType::AccessDenied => write!(f, "access_denied"),
            EventType::AnonymousAccessDenied => write!(f, "anonymous_access_denied"),
            EventType::Logout => write!(f, "logout"),
            EventType::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

/// 安全事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// 事件 ID
    pub id: String,
    /// 事件类型
    pub event_type: EventType,
    /// 严重程度
    pub severity: EventSeverity,
    /// 用户名（如果适用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// 资源标识（如果适用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// 事件消息/描述
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 额外详情
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
    /// 事件时间
    pub timestamp: DateTime<Utc>,
}

impl SecurityEvent {
    /// 创建新的安全事件
    pub fn new(event_type: EventType, severity: EventSeverity) -> Self {
        Self {
            id: generate_event_id(),
            event_type,
            severity,
            user_id: None,
            resource: None,
            message: None,
            details: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// 创建自定义事件
    pub fn custom(name: impl Into<String>, severity: EventSeverity) -> Self {
        Self::new(EventType::Custom(name.into()), severity)
    }

    // ========================================================================
    // 便捷构造方法
    // ========================================================================

    /// 创建放行事件
    pub fn access_granted(
        user_id: impl Into<String>,
        resource: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::new(EventType::AccessGranted, EventSeverity::Debug)
            .with_user_id(user_id)
            .with_resource(resource)
            .with_detail("operation", operation)
    }

    /// 创建拒绝事件
    pub fn access_denied(
        user_id: impl Into<String>,
        resource: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::new(EventType::AccessDenied, EventSeverity::Warning)
            .with_user_id(user_id)
            .with_resource(resource)
            .with_detail("operation", operation)
            .with_message("Forbidden for the user")
    }

    /// 创建匿名访问拒绝事件
    pub fn anonymous_access_denied(resource: impl Into<String>) -> Self {
        Self::new(EventType::AnonymousAccessDenied, EventSeverity::Warning)
            .with_resource(resource)
            .with_message("Forbidden for anonymous")
    }

    /// 创建登出事件
    pub fn logout(user_id: impl Into<String>) -> Self {
        Self::new(EventType::Logout, EventSeverity::Info)
            .with_user_id(user_id)
            .with_message("User logged out")
    }

    // ========================================================================
    // Builder 方法
    // ========================================================================

    /// 设置用户名
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// 设置资源标识
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// 设置消息
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// 添加详情
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// 设置严重程度
    pub fn with_severity(mut self, severity: EventSeverity) -> Self {
        self.severity = severity;
        self
    }

    // ========================================================================
    // 查询方法
    // ========================================================================

    /// 获取事件类型名称
    pub fn event_name(&self) -> String {
        self.event_type.to_string()
    }

    /// 检查是否是拒绝类事件
    pub fn is_denial(&self) -> bool {
        matches!(
            self.event_type,
            EventType::AccessDenied | EventType::AnonymousAccessDenied
        )
    }
}

/// 生成事件 ID
fn generate_event_id() -> String {
    format!("evt_{:016x}", rand::random::<u64>())
}

// ============================================================================
// AuditLogger Trait
// ============================================================================

/// 审计日志记录器 trait
pub trait AuditLogger: Send + Sync {
    /// 记录安全事件
    fn log(&self, event: SecurityEvent);

    /// 批量记录事件
    fn log_batch(&self, events: Vec<SecurityEvent>) {
        for event in events {
            self.log(event);
        }
    }
}

// ============================================================================
// InMemoryAuditLogger
// ============================================================================

/// 内存审计日志记录器
///
/// 用于测试和开发环境，克隆后共享同一事件列表
#[derive(Debug, Default, Clone)]
pub struct InMemoryAuditLogger {
    events: Arc<RwLock<Vec<SecurityEvent>>>,
    max_events: Option<usize>,
}

impl InMemoryAuditLogger {
    /// 创建新的内存日志记录器
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带有最大事件数限制的日志记录器
    pub fn with_max_events(max: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: Some(max),
        }
    }

    /// 获取所有事件
    pub fn get_events(&self) -> Vec<SecurityEvent> {
        self.events.read().clone()
    }

    /// 获取事件数量
    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    /// 按用户获取事件
    pub fn get_events_by_user(&self, user_id: &str) -> Vec<SecurityEvent> {
        self.filter(|e| e.user_id.as_deref() == Some(user_id))
    }

    /// 按资源获取事件
    pub fn get_events_by_resource(&self, resource: &str) -> Vec<SecurityEvent> {
        self.filter(|e| e.resource.as_deref() == Some(resource))
    }

    /// 按事件类型获取事件
    pub fn get_events_by_type(&self, event_type: &EventType) -> Vec<SecurityEvent> {
        self.filter(|e| &e.event_type == event_type)
    }

    /// 按严重程度获取事件
    pub fn get_events_by_severity(&self, severity: EventSeverity) -> Vec<SecurityEvent> {
        self.filter(|e| e.severity == severity)
    }

    /// 获取最近 N 个事件
    pub fn get_recent_events(&self, count: usize) -> Vec<SecurityEvent> {
        let events = self.events.read();
        events.iter().rev().take(count).cloned().collect()
    }

    /// 清空所有事件
    pub fn clear(&self) {
        self.events.write().clear();
    }

    fn filter<F>(&self, predicate: F) -> Vec<SecurityEvent>
    where
        F: Fn(&SecurityEvent) -> bool,
    {
        self.events
            .read()
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }
}

impl AuditLogger for InMemoryAuditLogger {
    fn log(&self, event: SecurityEvent) {
        let mut events = self.events.write();

        // 超出上限时删除最旧的事件
        if let Some(max) = self.max_events {
            while !events.is_empty() && events.len() >= max {
                events.remove(0);
            }
        }

        events.push(event);
    }
}

// ============================================================================
// TracingAuditLogger
// ============================================================================

/// 把事件以结构化日志形式输出到 `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLogger;

impl TracingAuditLogger {
    /// 创建新的 tracing 日志记录器
    pub fn new() -> Self {
        Self
    }
}

impl AuditLogger for TracingAuditLogger {
    fn log(&self, event: SecurityEvent) {
        let user = event.user_id.as_deref().unwrap_or("-");
        let resource = event.resource.as_deref().unwrap_or("-");
        let message = event.message.as_deref().unwrap_or("");

        match event.severity {
            EventSeverity::Debug => tracing::debug!(
                event_id = %event.id, kind = %event.event_type, user, resource, "{}", message
            ),
            EventSeverity::Info => tracing::info!(
                event_id = %event.id, kind = %event.event_type, user, resource, "{}", message
            ),
            EventSeverity::Warning => tracing::warn!(
                event_id = %event.id, kind = %event.event_type, user, resource, "{}", message
            ),
            EventSeverity::Error => tracing::error!(
                event_id = %event.id, kind = %event.event_type, user, resource, "{}", message
            ),
        }
    }
}

// ============================================================================
// NoOpAuditLogger
// ============================================================================

/// 空操作日志记录器
///
/// 不执行任何操作，用于禁用审计日志
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAuditLogger;

impl NoOpAuditLogger {
    /// 创建新的空操作日志记录器
    pub fn new() -> Self {
        Self
    }
}

impl AuditLogger for NoOpAuditLogger {
    fn log(&self, _event: SecurityEvent) {}
}
