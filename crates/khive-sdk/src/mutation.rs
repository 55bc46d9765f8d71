//! 乐观变更同步器 - 投票/编辑/删除的零延迟缓存同步
//!
//! 每一次用户发起的变更都走同一套流程：
//! 1. Begin 阶段（严格同步，先于任何网络 I/O）：
//!    取消受影响条目上等待中的后台刷新 → 快照当前状态 → 就地应用投影
//! 2. Resolution 阶段（远端调用落定后）：
//!    失败 → 整批恢复快照（原子，不允许部分恢复）；
//!    成功 → 相关条目标脏但不立即刷新，信任投影直到下一次自然刷新
//!
//! 单个变更的状态机：`Idle → Applied → {Confirmed | RolledBack}`，
//! 终态后不会自动重试。
//!
//! 并发规则：快照在各自的 Begin 阶段独立采集，回滚只写回自己的
//! 快照，不会使用更晚变更的快照。这样一个变更的失败不会抹掉另一
//! 个仍在途变更的乐观写入；代价是被恢复的条目可能暂时偏离服务端
//! 真值，留给下一次刷新收敛。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{QueryCache, QueryKey, QueryKind, SnapshotEntry};
use crate::error::{KHiveSDKError, Result};
use crate::events::{unix_now, EventManager, SDKEvent};
use crate::models::{MutationDelta, MutationScope};

impl MutationScope {
    /// 可能包含该类目标的查询类别
    pub fn query_kinds(&self) -> &'static [QueryKind] {
        match self {
            MutationScope::Post => &[
                QueryKind::Posts,
                QueryKind::PostDetail,
                QueryKind::UserPosts,
                QueryKind::SearchPosts,
            ],
            MutationScope::Comment => &[
                QueryKind::Comments,
                QueryKind::Replies,
                QueryKind::UserComments,
            ],
        }
    }
}

/// 变更目标：类别 + 资源 ID
///
/// 评论既可能出现在"帖子 P 的顶层评论"列表，也可能出现在
/// "评论 C 的回复"列表，因此按类别圈定全部可能的宿主条目，
/// 而不要求调用方指明目标具体在哪个列表里。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTarget {
    pub scope: MutationScope,
    pub id: String,
}

impl MutationTarget {
    /// 针对帖子的变更目标
    pub fn post(id: impl Into<String>) -> Self {
        Self {
            scope: MutationScope::Post,
            id: id.into(),
        }
    }

    /// 针对评论的变更目标
    pub fn comment(id: impl Into<String>) -> Self {
        Self {
            scope: MutationScope::Comment,
            id: id.into(),
        }
    }
}

/// 单个变更实例的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// 尚未应用投影（仅在构造期间短暂存在）
    Idle,
    /// 投影已写入缓存，远端调用未落定
    Applied,
    /// 远端成功，相关条目已标脏（终态）
    Confirmed,
    /// 远端失败，快照已恢复（终态）
    RolledBack,
}

/// 在途变更的凭据
///
/// 持有该变更私有的快照。必须以 `confirm` 或 `roll_back` 消费；
/// 未决议就被丢弃（如调用方在等待途中被取消）时析构回滚，
/// 保证缓存不会停留在未确认的投影上。
#[derive(Debug)]
pub struct MutationGuard {
    cache: Arc<QueryCache>,
    events: EventManager,
    target: MutationTarget,
    kind: &'static str,
    kinds: &'static [QueryKind],
    snapshot: Vec<(QueryKey, SnapshotEntry)>,
    touched: Vec<QueryKey>,
    state: MutationState,
}

impl MutationGuard {
    /// 当前状态
    pub fn state(&self) -> MutationState {
        self.state
    }

    /// 投影实际命中目标的缓存键
    pub fn touched(&self) -> &[QueryKey] {
        &self.touched
    }

    /// 变更目标
    pub fn target(&self) -> &MutationTarget {
        &self.target
    }

    /// Resolution 阶段 - 成功路径
    ///
    /// 将受影响类别下的条目全部标脏，但不发起刷新：当前渲染继续
    /// 信任乐观投影，与服务端真实计数的收敛推迟到下一次自然的
    /// 刷新触发（翻页、窗口聚焦、显式刷新等）。
    pub fn confirm(mut self) {
        self.cache.mark_stale_kinds(self.kinds);
        self.state = MutationState::Confirmed;
        debug!(
            "变更已确认: {} {}({}), 标脏 {:?}",
            self.kind, self.target.id, self.touched.len(), self.kinds
        );
        self.events.emit(SDKEvent::MutationConfirmed {
            scope: self.target.scope,
            kind: self.kind.to_string(),
            target_id: self.target.id.clone(),
            timestamp: unix_now(),
        });
    }

    /// Resolution 阶段 - 失败路径
    ///
    /// 用本变更自己的快照整批覆盖受影响条目，精确恢复变更前状态。
    /// 传输失败、服务端拒绝、响应格式错误都走这里，不做区分。
    pub fn roll_back(mut self, error: &KHiveSDKError) {
        self.restore_snapshot();
        self.state = MutationState::RolledBack;
        warn!(
            "变更已回滚: {} {} ({})",
            self.kind, self.target.id, error
        );
        self.events.emit(SDKEvent::MutationRolledBack {
            scope: self.target.scope,
            kind: self.kind.to_string(),
            target_id: self.target.id.clone(),
            reason: error.to_string(),
            timestamp: unix_now(),
        });
    }

    fn restore_snapshot(&self) {
        // 单写锁内全量覆盖：要么全部恢复要么全不恢复
        self.cache.restore(&self.snapshot);
    }
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        // 只有未决议的变更需要兜底；终态下什么都不做
        if self.state == MutationState::Applied {
            self.restore_snapshot();
            self.state = MutationState::RolledBack;
            warn!("变更未决议即被放弃，已回滚: {} {}", self.kind, self.target.id);
            self.events.emit(SDKEvent::MutationRolledBack {
                scope: self.target.scope,
                kind: self.kind.to_string(),
                target_id: self.target.id.clone(),
                reason: "mutation abandoned before resolution".to_string(),
                timestamp: unix_now(),
            });
        }
    }
}

/// 乐观变更同步器
///
/// 位于 UI 事件与远端 API 之间：让每次投票/编辑/删除在界面上
/// 零延迟生效，同时保证失败时缓存不会永久偏离服务端，成功时
/// 不产生多余的网络请求。
#[derive(Debug, Clone)]
pub struct OptimisticSynchronizer {
    cache: Arc<QueryCache>,
    events: EventManager,
}

impl OptimisticSynchronizer {
    /// 创建同步器（缓存通过注入传入，便于测试替换）
    pub fn new(cache: Arc<QueryCache>, events: EventManager) -> Self {
        Self { cache, events }
    }

    /// Begin 阶段：取消刷新 → 快照 → 应用投影，同步完成后立即返回
    ///
    /// 返回时缓存已反映投影，调用方可以立刻重渲染，再发起远端调用。
    pub fn begin(&self, target: MutationTarget, delta: MutationDelta) -> MutationGuard {
        let kinds = target.scope.query_kinds();
        let kind = delta.kind_str();

        // 取消 + 快照 + 投影在缓存内部的同一写锁内完成
        let (snapshot, touched) = self.cache.stage_mutation(kinds, &target.id, &delta);

        if touched.is_empty() {
            // 目标不在任何缓存条目中也照常走流程：远端调用仍会发出，
            // 只是本地没有可见的投影
            debug!("变更目标不在缓存中: {} {}", kind, target.id);
        } else {
            debug!(
                "乐观投影已应用: {} {} 命中 {} 个条目",
                kind,
                target.id,
                touched.len()
            );
        }

        MutationGuard {
            cache: Arc::clone(&self.cache),
            events: self.events.clone(),
            target,
            kind,
            kinds,
            snapshot,
            touched,
            state: MutationState::Applied,
        }
    }

    /// 完整执行一次变更：Begin → 远端调用 → Resolution
    ///
    /// 唯一的挂起点是远端调用本身；Begin 阶段的缓存写入
    /// happens-before 网络请求发出。
    pub async fn execute<T, F>(
        &self,
        target: MutationTarget,
        delta: MutationDelta,
        call: F,
    ) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        let guard = self.begin(target, delta);
        match call.await {
            Ok(value) => {
                guard.confirm();
                Ok(value)
            }
            Err(error) => {
                guard.roll_back(&error);
                Err(error)
            }
        }
    }

    /// 同步器持有的缓存句柄
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }
}

impl MutationState {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, MutationState::Confirmed | MutationState::RolledBack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachePayload, Freshness};
    use crate::models::{Comment, Page, Pagination, VoteDirection};

    fn comment(id: &str, upvotes: u32) -> Comment {
        Comment {
            comment_id: id.to_string(),
            post_id: "42".to_string(),
            parent_comment_id: None,
            content: format!("评论 {}", id),
            is_edited: false,
            upvotes,
            downvotes: 0,
            my_vote: None,
            author_id: "u1".to_string(),
            created_at: None,
        }
    }

    fn page_with_total(data: Vec<Comment>, total: u64) -> Page<Comment> {
        Page {
            data,
            pagination: Some(Pagination {
                page: 1,
                limit: 20,
                total,
                total_pages: None,
            }),
        }
    }

    fn comments_key() -> QueryKey {
        QueryKey::Comments {
            post_id: "42".to_string(),
            page: 1,
            limit: 20,
        }
    }

    fn replies_key(parent: &str) -> QueryKey {
        QueryKey::Replies {
            comment_id: parent.to_string(),
            page: 1,
            limit: 10,
        }
    }

    fn setup() -> (Arc<QueryCache>, OptimisticSynchronizer, EventManager) {
        let cache = Arc::new(QueryCache::new(CacheConfig::default()));
        let events = EventManager::new(64);
        let sync = OptimisticSynchronizer::new(Arc::clone(&cache), events.clone());
        (cache, sync, events)
    }

    fn read_comments(cache: &QueryCache, key: &QueryKey) -> Page<Comment> {
        match cache.get(key) {
            Some((CachePayload::CommentPage(page), _)) => page,
            other => panic!("unexpected cache content: {:?}", other),
        }
    }

    /// 规格场景：upvotes 3 → 乐观读到 4 → 服务端拒绝 → 回滚读到 3
    #[tokio::test]
    async fn test_vote_optimistic_then_rollback_scenario() {
        let (cache, sync, _) = setup();
        let key = comments_key();
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        let guard = sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Vote {
                direction: VoteDirection::Upvote,
            },
        );

        // 乐观可见性：远端调用尚未落定，缓存已反映投影
        assert_eq!(guard.state(), MutationState::Applied);
        assert_eq!(read_comments(&cache, &key).data[0].upvotes, 4);

        guard.roll_back(&KHiveSDKError::Server {
            status: 429,
            message: "rate limited".to_string(),
        });

        assert_eq!(read_comments(&cache, &key).data[0].upvotes, 3);
    }

    /// 回滚幂等性：恢复后的负载与变更前逐字段相等（所有受影响条目）
    #[tokio::test]
    async fn test_rollback_restores_exact_payloads() {
        let (cache, sync, _) = setup();
        let top_key = comments_key();
        let reply_key = replies_key("c9");

        let top_before = CachePayload::CommentPage(Page::from_data(vec![
            comment("c1", 3),
            comment("c2", 7),
        ]));
        let reply_before =
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)]));
        cache.write_entry(top_key.clone(), top_before.clone());
        cache.write_entry(reply_key.clone(), reply_before.clone());

        let guard = sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Edit {
                content: "改过的内容".to_string(),
            },
        );
        // 两个条目都命中
        assert_eq!(guard.touched().len(), 2);

        guard.roll_back(&KHiveSDKError::Transport("connection reset".to_string()));

        assert_eq!(cache.get(&top_key).unwrap().0, top_before);
        assert_eq!(cache.get(&reply_key).unwrap().0, reply_before);
    }

    /// 成功路径：条目标脏但负载保持投影，不发生任何刷新写入
    #[tokio::test]
    async fn test_success_marks_stale_without_refetch() {
        let (cache, sync, _) = setup();
        let key = comments_key();
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        let guard = sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Vote {
                direction: VoteDirection::Upvote,
            },
        );
        guard.confirm();

        let (payload, freshness) = cache.get(&key).unwrap();
        assert_eq!(freshness, Freshness::Stale);
        match payload {
            CachePayload::CommentPage(page) => {
                // 投影被保留为当前渲染的权威值
                assert_eq!(page.data[0].upvotes, 4);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    /// 删除从所有包含目标的列表移除，并分别将总数减一
    #[tokio::test]
    async fn test_delete_removes_from_every_list() {
        let (cache, sync, _) = setup();
        let top_key = comments_key();
        let reply_key = replies_key("c9");

        cache.write_entry(
            top_key.clone(),
            CachePayload::CommentPage(page_with_total(
                vec![comment("c1", 3), comment("c2", 0)],
                5,
            )),
        );
        cache.write_entry(
            reply_key.clone(),
            CachePayload::CommentPage(page_with_total(vec![comment("c1", 3)], 1)),
        );

        let guard = sync.begin(MutationTarget::comment("c1"), MutationDelta::Delete);
        guard.confirm();

        let top = read_comments(&cache, &top_key);
        assert_eq!(top.data.len(), 1);
        assert_eq!(top.data[0].comment_id, "c2");
        assert_eq!(top.pagination.unwrap().total, 4);

        let replies = read_comments(&cache, &reply_key);
        assert!(replies.data.is_empty());
        assert_eq!(replies.pagination.unwrap().total, 0);
    }

    /// 并发快照独立：后发变更的失败不抹掉先发变更的在途投影
    #[tokio::test]
    async fn test_later_failure_keeps_earlier_optimistic_write() {
        let (cache, sync, _) = setup();
        let key = comments_key();
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        // A：投票（先发，仍在途）
        let guard_a = sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Vote {
                direction: VoteDirection::Upvote,
            },
        );
        // B：编辑（后发），其快照里已包含 A 的投影
        let guard_b = sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Edit {
                content: "新内容".to_string(),
            },
        );

        // B 失败：只写回 B 自己的快照，A 的 +1 保留
        guard_b.roll_back(&KHiveSDKError::Server {
            status: 500,
            message: "internal".to_string(),
        });

        let page = read_comments(&cache, &key);
        assert_eq!(page.data[0].upvotes, 4);
        assert!(!page.data[0].is_edited);

        // A 随后成功
        guard_a.confirm();
        assert_eq!(read_comments(&cache, &key).data[0].upvotes, 4);
    }

    /// 并发隔离（A 投票失败、B 编辑成功）：
    /// A 的回滚恢复到 A 之前的状态（接受的不一致窗口会暂时丢掉
    /// B 的投影），B 成功只标脏；下一次自然刷新带回服务端真值——
    /// 含 B 的编辑、不含 A 的投票。两条路径均不得 panic。
    #[tokio::test]
    async fn test_concurrent_isolation_reconciles_on_refetch() {
        let (cache, sync, _) = setup();
        let key = comments_key();
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        let guard_a = sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Vote {
                direction: VoteDirection::Upvote,
            },
        );
        let guard_b = sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Edit {
                content: "B 的编辑".to_string(),
            },
        );

        // A 失败（先落定），回滚到 A 之前的快照
        guard_a.roll_back(&KHiveSDKError::Transport("timeout".to_string()));
        // B 成功，标脏等待刷新
        guard_b.confirm();

        // 条目已脏，模拟下一次自然刷新：服务端真值应用了 B、拒绝了 A
        let (_, freshness) = cache.get(&key).unwrap();
        assert_eq!(freshness, Freshness::Stale);

        let ticket = cache.begin_fetch(&key);
        let mut server_truth = comment("c1", 3);
        server_truth.content = "B 的编辑".to_string();
        server_truth.is_edited = true;
        assert!(cache.complete_fetch(
            ticket,
            CachePayload::CommentPage(Page::from_data(vec![server_truth])),
        ));

        let page = read_comments(&cache, &key);
        assert_eq!(page.data[0].upvotes, 3);
        assert_eq!(page.data[0].content, "B 的编辑");
        assert!(page.data[0].is_edited);
    }

    /// Begin 阶段必须让更早出发的后台刷新作废
    #[tokio::test]
    async fn test_begin_cancels_pending_refetch() {
        let (cache, sync, _) = setup();
        let key = comments_key();
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        // 刷新先出发（令牌在手），变更随后开始
        let ticket = cache.begin_fetch(&key);
        let guard = sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Vote {
                direction: VoteDirection::Upvote,
            },
        );

        // 过期响应到达：必须被丢弃，不得覆盖乐观写入
        let written = cache.complete_fetch(
            ticket,
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );
        assert!(!written);
        assert_eq!(read_comments(&cache, &key).data[0].upvotes, 4);

        guard.confirm();
    }

    /// execute：成功确认、失败回滚并原样返回错误
    #[tokio::test]
    async fn test_execute_paths() {
        let (cache, sync, _) = setup();
        let key = comments_key();
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        // 失败路径
        let result: Result<()> = sync
            .execute(
                MutationTarget::comment("c1"),
                MutationDelta::Vote {
                    direction: VoteDirection::Upvote,
                },
                async {
                    Err(KHiveSDKError::Server {
                        status: 403,
                        message: "forbidden".to_string(),
                    })
                },
            )
            .await;
        assert!(result.is_err());
        assert_eq!(read_comments(&cache, &key).data[0].upvotes, 3);

        // 成功路径
        let result: Result<u32> = sync
            .execute(
                MutationTarget::comment("c1"),
                MutationDelta::Vote {
                    direction: VoteDirection::Upvote,
                },
                async { Ok(4) },
            )
            .await;
        assert_eq!(result.unwrap(), 4);
        assert_eq!(read_comments(&cache, &key).data[0].upvotes, 4);
    }

    /// 未决议的变更被丢弃时析构回滚
    #[tokio::test]
    async fn test_abandoned_guard_rolls_back() {
        let (cache, sync, events) = setup();
        let mut rx = events.subscribe();
        let key = comments_key();
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        {
            let _guard = sync.begin(
                MutationTarget::comment("c1"),
                MutationDelta::Vote {
                    direction: VoteDirection::Upvote,
                },
            );
            assert_eq!(read_comments(&cache, &key).data[0].upvotes, 4);
            // 调用方放弃等待（组件卸载等），guard 在此析构
        }

        assert_eq!(read_comments(&cache, &key).data[0].upvotes, 3);
        match rx.recv().await.unwrap() {
            SDKEvent::MutationRolledBack { reason, .. } => {
                assert!(reason.contains("abandoned"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    /// 回滚/确认事件通知展示层
    #[tokio::test]
    async fn test_events_emitted_on_resolution() {
        let (cache, sync, events) = setup();
        let mut rx = events.subscribe();
        cache.write_entry(
            comments_key(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        sync.begin(
            MutationTarget::comment("c1"),
            MutationDelta::Delete,
        )
        .confirm();

        match rx.recv().await.unwrap() {
            SDKEvent::MutationConfirmed {
                kind, target_id, ..
            } => {
                assert_eq!(kind, "delete");
                assert_eq!(target_id, "c1");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
