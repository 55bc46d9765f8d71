//! 查询缓存模块 - 客户端内存缓存
//!
//! 本模块提供：
//! - 以复合键（资源类别 + 资源 ID + 分页参数）索引的缓存条目
//! - 新鲜度跟踪（显式标脏 + 按类别的过期时间）
//! - 后台刷新的取消语义（序号令牌，过期响应写入被丢弃）
//! - 供乐观变更同步器使用的原子快照/恢复操作
//!
//! 缓存是进程级共享资源：变更进行期间只有同步器可以写入
//! 投影/回滚状态，后台刷新是唯一的另一个写入方，且在变更的
//! 生命周期内通过序号令牌被排除在外。

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Comment, MutationDelta, Page, Post, User, VoteDirection};

/// 缓存条目的新鲜度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freshness {
    /// 数据在过期时间内，读路径可直接使用
    Fresh,
    /// 数据已过期或被显式标脏，下一次读取应触发刷新
    Stale,
}

/// 查询类别 - 缓存键的家族维度
///
/// 变更的取消/快照/标脏都以家族为单位进行：一条评论可能同时
/// 出现在"帖子的顶层评论"与"父评论的回复"两类条目中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
    /// 帖子列表页
    Posts,
    /// 单个帖子详情
    PostDetail,
    /// 某用户的帖子
    UserPosts,
    /// 帖子搜索结果
    SearchPosts,
    /// 某帖子的顶层评论页
    Comments,
    /// 某评论的回复页
    Replies,
    /// 某用户的评论
    UserComments,
    /// 当前登录用户
    CurrentUser,
}

/// 查询键 - 资源类别 + 资源 ID + 分页参数的复合键
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKey {
    Posts {
        page: u32,
        sort: crate::models::SortKind,
        limit: u32,
    },
    Post {
        post_id: String,
    },
    UserPosts {
        user_id: String,
    },
    SearchPosts {
        query: String,
        page: u32,
    },
    Comments {
        post_id: String,
        page: u32,
        limit: u32,
    },
    Replies {
        comment_id: String,
        page: u32,
        limit: u32,
    },
    UserComments {
        user_id: String,
        page: u32,
        limit: u32,
    },
    CurrentUser,
}

impl QueryKey {
    /// 所属查询类别
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryKey::Posts { .. } => QueryKind::Posts,
            QueryKey::Post { .. } => QueryKind::PostDetail,
            QueryKey::UserPosts { .. } => QueryKind::UserPosts,
            QueryKey::SearchPosts { .. } => QueryKind::SearchPosts,
            QueryKey::Comments { .. } => QueryKind::Comments,
            QueryKey::Replies { .. } => QueryKind::Replies,
            QueryKey::UserComments { .. } => QueryKind::UserComments,
            QueryKey::CurrentUser => QueryKind::CurrentUser,
        }
    }
}

/// 缓存负载 - 某个查询键下最近一次已知的服务端状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachePayload {
    PostPage(Page<Post>),
    PostDetail(Post),
    CommentPage(Page<Comment>),
    UserDetail(User),
}

impl CachePayload {
    /// 就地应用乐观投影，返回是否命中目标
    ///
    /// 投票：目标每一处出现的对应计数 +1；
    /// 编辑：替换内容并置 is_edited；
    /// 删除：从列表移除目标并将已知总数 -1。
    pub fn apply_delta(&mut self, target_id: &str, delta: &MutationDelta) -> bool {
        match delta {
            MutationDelta::Vote { direction } => self.apply_vote(target_id, *direction),
            MutationDelta::Edit { content } => self.apply_edit(target_id, content),
            MutationDelta::Delete => self.apply_delete(target_id),
        }
    }

    fn apply_vote(&mut self, target_id: &str, direction: VoteDirection) -> bool {
        let bump = |up: &mut u32, down: &mut u32| match direction {
            VoteDirection::Upvote => *up = up.saturating_add(1),
            VoteDirection::Downvote => *down = down.saturating_add(1),
        };
        match self {
            CachePayload::PostPage(page) => {
                let mut touched = false;
                for post in page.data.iter_mut().filter(|p| p.post_id == target_id) {
                    bump(&mut post.upvotes, &mut post.downvotes);
                    touched = true;
                }
                touched
            }
            CachePayload::PostDetail(post) => {
                if post.post_id == target_id {
                    bump(&mut post.upvotes, &mut post.downvotes);
                    true
                } else {
                    false
                }
            }
            CachePayload::CommentPage(page) => {
                let mut touched = false;
                for comment in page.data.iter_mut().filter(|c| c.comment_id == target_id) {
                    bump(&mut comment.upvotes, &mut comment.downvotes);
                    touched = true;
                }
                touched
            }
            CachePayload::UserDetail(_) => false,
        }
    }

    fn apply_edit(&mut self, target_id: &str, content: &str) -> bool {
        match self {
            CachePayload::PostPage(page) => {
                let mut touched = false;
                for post in page.data.iter_mut().filter(|p| p.post_id == target_id) {
                    post.content = content.to_string();
                    post.is_edited = true;
                    touched = true;
                }
                touched
            }
            CachePayload::PostDetail(post) => {
                if post.post_id == target_id {
                    post.content = content.to_string();
                    post.is_edited = true;
                    true
                } else {
                    false
                }
            }
            CachePayload::CommentPage(page) => {
                let mut touched = false;
                for comment in page.data.iter_mut().filter(|c| c.comment_id == target_id) {
                    comment.content = content.to_string();
                    comment.is_edited = true;
                    touched = true;
                }
                touched
            }
            CachePayload::UserDetail(_) => false,
        }
    }

    fn apply_delete(&mut self, target_id: &str) -> bool {
        match self {
            CachePayload::PostPage(page) => {
                let before = page.data.len();
                page.data.retain(|p| p.post_id != target_id);
                let removed = before - page.data.len();
                if removed > 0 {
                    if let Some(pagination) = page.pagination.as_mut() {
                        pagination.total = pagination.total.saturating_sub(removed as u64);
                    }
                }
                removed > 0
            }
            CachePayload::CommentPage(page) => {
                let before = page.data.len();
                page.data.retain(|c| c.comment_id != target_id);
                let removed = before - page.data.len();
                if removed > 0 {
                    if let Some(pagination) = page.pagination.as_mut() {
                        pagination.total = pagination.total.saturating_sub(removed as u64);
                    }
                }
                removed > 0
            }
            // 单资源条目不属于"列表"，由服务层决定是否整条移除
            CachePayload::PostDetail(_) | CachePayload::UserDetail(_) => false,
        }
    }
}

/// 缓存条目 - 负载 + 新鲜度 + 刷新序号
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: CachePayload,
    freshness: Freshness,
    updated_at: DateTime<Utc>,
}

/// 快照条目 - 变更开始前某个键的完整状态
///
/// 回滚时整条覆盖写回，保证恢复后的负载与变更前逐字段相等。
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub payload: CachePayload,
    pub freshness: Freshness,
    pub updated_at: DateTime<Utc>,
}

/// 刷新令牌 - begin_fetch 时的序号凭证
///
/// complete_fetch 仅在序号未被 cancel_pending_refetch 推进时写入，
/// 这是"取消等待而非中断传输"的实现方式：过期响应照常到达，
/// 但它对缓存的写入被丢弃。
#[derive(Debug, Clone)]
pub struct FetchTicket {
    key: QueryKey,
    seq: u64,
}

/// 缓存过期配置（秒）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 帖子类查询的新鲜期
    pub posts_stale_secs: i64,
    /// 评论/回复类查询的新鲜期
    pub comments_stale_secs: i64,
    /// 当前用户查询的新鲜期
    pub user_stale_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            posts_stale_secs: 30,
            comments_stale_secs: 120,
            user_stale_secs: 300,
        }
    }
}

impl CacheConfig {
    fn stale_secs(&self, kind: QueryKind) -> i64 {
        match kind {
            QueryKind::Posts
            | QueryKind::PostDetail
            | QueryKind::UserPosts
            | QueryKind::SearchPosts => self.posts_stale_secs,
            QueryKind::Comments | QueryKind::Replies | QueryKind::UserComments => {
                self.comments_stale_secs
            }
            QueryKind::CurrentUser => self.user_stale_secs,
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub stale_count: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<QueryKey, CacheEntry>,
    /// 每个键的刷新序号；cancel_pending_refetch 推进后旧令牌失效
    fetch_seqs: HashMap<QueryKey, u64>,
}

/// 查询缓存
///
/// 所有操作在单个 RwLock 临界区内完成且不跨越 await 点，
/// 因此变更的 Begin 阶段是严格同步的：缓存写入一定先于
/// 其网络请求发出（happens-before）。
#[derive(Debug)]
pub struct QueryCache {
    inner: RwLock<CacheInner>,
    config: CacheConfig,
}

impl QueryCache {
    /// 创建新的查询缓存
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
            config,
        }
    }

    /// 读取单个键的负载与有效新鲜度
    ///
    /// 显式标脏或超过类别新鲜期都视为 Stale。
    pub fn get(&self, key: &QueryKey) -> Option<(CachePayload, Freshness)> {
        let inner = self.inner.read().unwrap();
        let entry = inner.entries.get(key)?;
        let freshness = self.effective_freshness(entry, key.kind());
        Some((entry.payload.clone(), freshness))
    }

    /// 读取指定类别下的所有条目
    pub fn read_entries(&self, kinds: &[QueryKind]) -> Vec<(QueryKey, CachePayload)> {
        let inner = self.inner.read().unwrap();
        inner
            .entries
            .iter()
            .filter(|(key, _)| kinds.contains(&key.kind()))
            .map(|(key, entry)| (key.clone(), entry.payload.clone()))
            .collect()
    }

    /// 写入条目（标记为 Fresh 并更新时间戳）
    ///
    /// 直接写入是权威来源（如更新接口的响应体），同时推进该键的
    /// 刷新序号：更早出发、尚未落定的刷新不得覆盖这次写入。
    pub fn write_entry(&self, key: QueryKey, payload: CachePayload) {
        let mut inner = self.inner.write().unwrap();
        *inner.fetch_seqs.entry(key.clone()).or_insert(0) += 1;
        inner.entries.insert(
            key,
            CacheEntry {
                payload,
                freshness: Freshness::Fresh,
                updated_at: Utc::now(),
            },
        );
    }

    /// 将单个键标脏（不触发刷新）
    pub fn mark_stale(&self, key: &QueryKey) {
        let mut inner = self.inner.write().unwrap();
        if let Some(entry) = inner.entries.get_mut(key) {
            entry.freshness = Freshness::Stale;
        }
    }

    /// 将指定类别的全部条目标脏（不触发刷新）
    pub fn mark_stale_kinds(&self, kinds: &[QueryKind]) {
        let mut inner = self.inner.write().unwrap();
        for (key, entry) in inner.entries.iter_mut() {
            if kinds.contains(&key.kind()) {
                entry.freshness = Freshness::Stale;
            }
        }
    }

    /// 按谓词标脏（如：只标脏某个父评论回复列表的第一页）
    pub fn mark_stale_matching<F>(&self, predicate: F)
    where
        F: Fn(&QueryKey) -> bool,
    {
        let mut inner = self.inner.write().unwrap();
        for (key, entry) in inner.entries.iter_mut() {
            if predicate(key) {
                entry.freshness = Freshness::Stale;
            }
        }
    }

    /// 登记一次后台刷新，取得当前序号令牌
    pub fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        let mut inner = self.inner.write().unwrap();
        let seq = *inner.fetch_seqs.entry(key.clone()).or_insert(0);
        FetchTicket {
            key: key.clone(),
            seq,
        }
    }

    /// 完成一次后台刷新
    ///
    /// 若令牌序号已被推进（期间有变更取消了等待中的刷新），
    /// 写入被丢弃并返回 false。
    pub fn complete_fetch(&self, ticket: FetchTicket, payload: CachePayload) -> bool {
        let mut inner = self.inner.write().unwrap();
        let current = inner.fetch_seqs.get(&ticket.key).copied().unwrap_or(0);
        if current != ticket.seq {
            debug!("丢弃已取消的刷新结果: {:?}", ticket.key);
            return false;
        }
        inner.entries.insert(
            ticket.key,
            CacheEntry {
                payload,
                freshness: Freshness::Fresh,
                updated_at: Utc::now(),
            },
        );
        true
    }

    /// 取消指定类别下所有等待中的刷新（推进序号，使旧令牌失效）
    pub fn cancel_pending_refetch(&self, kinds: &[QueryKind]) {
        let mut inner = self.inner.write().unwrap();
        Self::cancel_pending_locked(&mut inner, kinds);
    }

    fn cancel_pending_locked(inner: &mut CacheInner, kinds: &[QueryKind]) {
        for (key, seq) in inner.fetch_seqs.iter_mut() {
            if kinds.contains(&key.kind()) {
                *seq += 1;
            }
        }
    }

    /// 变更的 Begin 阶段：取消刷新 → 快照 → 应用投影
    ///
    /// 三步在同一写锁内完成，对其他读写方表现为原子操作。
    /// 返回（私有快照，实际命中目标的键）。
    pub fn stage_mutation(
        &self,
        kinds: &[QueryKind],
        target_id: &str,
        delta: &MutationDelta,
    ) -> (Vec<(QueryKey, SnapshotEntry)>, Vec<QueryKey>) {
        let mut inner = self.inner.write().unwrap();

        // 1. 等待中的刷新不得覆盖乐观写入
        Self::cancel_pending_locked(&mut inner, kinds);

        // 2. 逐键记录变更前状态（每个变更独立持有自己的快照）
        let snapshot: Vec<(QueryKey, SnapshotEntry)> = inner
            .entries
            .iter()
            .filter(|(key, _)| kinds.contains(&key.kind()))
            .map(|(key, entry)| {
                (
                    key.clone(),
                    SnapshotEntry {
                        payload: entry.payload.clone(),
                        freshness: entry.freshness,
                        updated_at: entry.updated_at,
                    },
                )
            })
            .collect();

        // 3. 就地应用投影
        let mut touched = Vec::new();
        for (key, entry) in inner.entries.iter_mut() {
            if kinds.contains(&key.kind()) && entry.payload.apply_delta(target_id, delta) {
                touched.push(key.clone());
            }
        }

        (snapshot, touched)
    }

    /// 整批恢复快照（回滚路径，单写锁内全量覆盖，不允许部分恢复）
    pub fn restore(&self, snapshot: &[(QueryKey, SnapshotEntry)]) {
        let mut inner = self.inner.write().unwrap();
        for (key, saved) in snapshot {
            inner.entries.insert(
                key.clone(),
                CacheEntry {
                    payload: saved.payload.clone(),
                    freshness: saved.freshness,
                    updated_at: saved.updated_at,
                },
            );
        }
    }

    /// 移除单个条目（如删除帖子后移除其详情缓存）
    ///
    /// 同样推进刷新序号：在途刷新不得把刚移除的条目写回来。
    pub fn remove(&self, key: &QueryKey) -> Option<CachePayload> {
        let mut inner = self.inner.write().unwrap();
        *inner.fetch_seqs.entry(key.clone()).or_insert(0) += 1;
        inner.entries.remove(key).map(|e| e.payload)
    }

    /// 清空整个缓存（登出时使用）
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.entries.clear();
        inner.fetch_seqs.clear();
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read().unwrap();
        let stale_count = inner
            .entries
            .iter()
            .filter(|(key, entry)| {
                self.effective_freshness(entry, key.kind()) == Freshness::Stale
            })
            .count();
        CacheStats {
            entry_count: inner.entries.len(),
            stale_count,
        }
    }

    fn effective_freshness(&self, entry: &CacheEntry, kind: QueryKind) -> Freshness {
        if entry.freshness == Freshness::Stale {
            return Freshness::Stale;
        }
        let age = Utc::now().signed_duration_since(entry.updated_at);
        if age.num_seconds() >= self.config.stale_secs(kind) {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortKind;

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

    fn comment_page_key(post_id: &str) -> QueryKey {
        QueryKey::Comments {
            post_id: post_id.to_string(),
            page: 1,
            limit: 20,
        }
    }

    #[test]
    fn test_write_and_get() {
        let cache = QueryCache::new(CacheConfig::default());
        let key = comment_page_key("42");
        let payload = CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)]));

        cache.write_entry(key.clone(), payload.clone());

        let (got, freshness) = cache.get(&key).unwrap();
        assert_eq!(got, payload);
        assert_eq!(freshness, Freshness::Fresh);
    }

    #[test]
    fn test_mark_stale_does_not_drop_payload() {
        let cache = QueryCache::new(CacheConfig::default());
        let key = comment_page_key("42");
        let payload = CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)]));
        cache.write_entry(key.clone(), payload.clone());

        cache.mark_stale(&key);

        // 标脏只影响新鲜度，负载原样保留
        let (got, freshness) = cache.get(&key).unwrap();
        assert_eq!(got, payload);
        assert_eq!(freshness, Freshness::Stale);
    }

    #[test]
    fn test_stale_time_expiry() {
        // 新鲜期为 0：写入后立刻过期
        let cache = QueryCache::new(CacheConfig {
            posts_stale_secs: 0,
            comments_stale_secs: 0,
            user_stale_secs: 0,
        });
        let key = comment_page_key("42");
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![])),
        );

        let (_, freshness) = cache.get(&key).unwrap();
        assert_eq!(freshness, Freshness::Stale);
    }

    #[test]
    fn test_cancelled_fetch_is_dropped() {
        let cache = QueryCache::new(CacheConfig::default());
        let key = comment_page_key("42");
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        // 后台刷新已出发，随后一个变更取消了等待
        let ticket = cache.begin_fetch(&key);
        cache.cancel_pending_refetch(&[QueryKind::Comments]);

        let written = cache.complete_fetch(
            ticket,
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 999)])),
        );
        assert!(!written);

        // 缓存仍是变更前（乐观）内容，没有被过期响应覆盖
        let (payload, _) = cache.get(&key).unwrap();
        match payload {
            CachePayload::CommentPage(page) => assert_eq!(page.data[0].upvotes, 3),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_direct_write_invalidates_inflight_fetch() {
        let cache = QueryCache::new(CacheConfig::default());
        let key = comment_page_key("42");

        // 刷新先出发，随后一次权威写入（如更新接口的响应体）落地
        let ticket = cache.begin_fetch(&key);
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 9)])),
        );

        // 更早的刷新这时才落定：必须被丢弃
        let written = cache.complete_fetch(
            ticket,
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 1)])),
        );
        assert!(!written);

        let (payload, _) = cache.get(&key).unwrap();
        match payload {
            CachePayload::CommentPage(page) => assert_eq!(page.data[0].upvotes, 9),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_remove_invalidates_inflight_fetch() {
        let cache = QueryCache::new(CacheConfig::default());
        let key = comment_page_key("42");
        cache.write_entry(
            key.clone(),
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );

        let ticket = cache.begin_fetch(&key);
        cache.remove(&key);

        let written = cache.complete_fetch(
            ticket,
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 3)])),
        );
        assert!(!written);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_fetch_without_cancel_writes() {
        let cache = QueryCache::new(CacheConfig::default());
        let key = comment_page_key("42");

        let ticket = cache.begin_fetch(&key);
        let written = cache.complete_fetch(
            ticket,
            CachePayload::CommentPage(Page::from_data(vec![comment("c1", 7)])),
        );
        assert!(written);
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn test_delete_decrements_total() {
        let mut page = Page::from_data(vec![comment("c1", 3), comment("c2", 0)]);
        page.pagination = Some(crate::models::Pagination {
            page: 1,
            limit: 20,
            total: 2,
            total_pages: Some(1),
        });
        let mut payload = CachePayload::CommentPage(page);

        let touched = payload.apply_delta("c1", &MutationDelta::Delete);
        assert!(touched);

        match payload {
            CachePayload::CommentPage(page) => {
                assert_eq!(page.data.len(), 1);
                assert_eq!(page.data[0].comment_id, "c2");
                assert_eq!(page.pagination.unwrap().total, 1);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_vote_delta_on_post_detail() {
        let mut payload = CachePayload::PostDetail(Post {
            post_id: "p1".to_string(),
            title: "标题".to_string(),
            content: "正文".to_string(),
            author_id: "u1".to_string(),
            upvotes: 10,
            downvotes: 2,
            my_vote: None,
            comment_count: 0,
            is_edited: false,
            media_url: None,
            created_at: None,
        });

        let touched = payload.apply_delta(
            "p1",
            &MutationDelta::Vote {
                direction: VoteDirection::Downvote,
            },
        );
        assert!(touched);
        match payload {
            CachePayload::PostDetail(post) => {
                assert_eq!(post.upvotes, 10);
                assert_eq!(post.downvotes, 3);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_read_entries_filters_by_kind() {
        let cache = QueryCache::new(CacheConfig::default());
        cache.write_entry(
            comment_page_key("42"),
            CachePayload::CommentPage(Page::from_data(vec![])),
        );
        cache.write_entry(
            QueryKey::Posts {
                page: 1,
                sort: SortKind::New,
                limit: 10,
            },
            CachePayload::PostPage(Page::from_data(vec![])),
        );

        let comments = cache.read_entries(&[QueryKind::Comments, QueryKind::Replies]);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].0.kind(), QueryKind::Comments);
    }

    #[test]
    fn test_clear_and_stats() {
        let cache = QueryCache::new(CacheConfig::default());
        cache.write_entry(
            comment_page_key("42"),
            CachePayload::CommentPage(Page::from_data(vec![])),
        );
        cache.mark_stale_kinds(&[QueryKind::Comments]);

        let stats = cache.stats();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.stale_count, 1);

        cache.clear();
        assert_eq!(cache.stats().entry_count, 0);
    }
}
