//! 事件系统模块 - SDK 对外的结果通知
//!
//! 同步器本身不产生任何面向用户的文案，变更的成功/回滚通过
//! 事件广播告知展示层（toast、状态条等由宿主应用自行决定）。
//!
//! 功能包括：
//! - 变更确认 / 变更回滚事件
//! - 会话过期（401）事件
//! - 缓存清空事件
//! - 事件广播和订阅机制

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::MutationScope;

/// SDK 事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SDKEvent {
    /// 变更已确认（远端成功，相关缓存已标脏待下次自然刷新）
    MutationConfirmed {
        scope: MutationScope,
        kind: String,
        target_id: String,
        timestamp: u64,
    },
    /// 变更已回滚（远端失败，缓存已恢复变更前状态）
    MutationRolledBack {
        scope: MutationScope,
        kind: String,
        target_id: String,
        /// 失败原因描述；同步器不区分失败类别，仅透传给展示层
        reason: String,
        timestamp: u64,
    },
    /// 会话过期（服务端返回 401，令牌已清除）
    SessionExpired { timestamp: u64 },
    /// 缓存已整体清空（登出）
    CacheCleared { timestamp: u64 },
}

/// 事件管理器 - 基于 broadcast 的多订阅者广播
#[derive(Debug, Clone)]
pub struct EventManager {
    sender: broadcast::Sender<SDKEvent>,
}

impl EventManager {
    /// 创建事件管理器，capacity 为每个订阅者的积压上限
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 订阅事件流
    pub fn subscribe(&self) -> broadcast::Receiver<SDKEvent> {
        self.sender.subscribe()
    }

    /// 广播事件（没有订阅者时静默丢弃）
    pub fn emit(&self, event: SDKEvent) {
        if self.sender.send(event.clone()).is_err() {
            debug!("事件无订阅者，丢弃: {:?}", event);
        }
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new(256)
    }
}

/// 当前 Unix 时间戳（秒）
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
