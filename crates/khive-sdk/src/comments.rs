//! 评论服务 - 缓存优先的查询 + 乐观编辑/删除/投票
//!
//! 一条评论可能同时出现在"帖子的顶层评论"与"父评论的回复"
//! 两类缓存条目中，变更由同步器对两类条目统一投影和回滚。

use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use crate::api::CommentsApi;
use crate::cache::{CachePayload, Freshness, QueryCache, QueryKey};
use crate::error::Result;
use crate::models::{
    Comment, Confirmation, MutationDelta, NewComment, Page, VoteCounts, VoteDirection,
};
use crate::mutation::{MutationTarget, OptimisticSynchronizer};

/// 评论服务
#[derive(Debug, Clone)]
pub struct CommentService {
    api: CommentsApi,
    cache: Arc<QueryCache>,
    sync: OptimisticSynchronizer,
}

impl CommentService {
    pub fn new(api: CommentsApi, cache: Arc<QueryCache>, sync: OptimisticSynchronizer) -> Self {
        Self { api, cache, sync }
    }

    /// 缓存直读 + 过期拉取
    async fn fetch_page<F>(&self, key: QueryKey, fetch: F) -> Result<Page<Comment>>
    where
        F: Future<Output = Result<Page<Comment>>>,
    {
        if let Some((CachePayload::CommentPage(page), Freshness::Fresh)) = self.cache.get(&key) {
            return Ok(page);
        }

        let ticket = self.cache.begin_fetch(&key);
        match fetch.await {
            Ok(page) => {
                self.cache
                    .complete_fetch(ticket, CachePayload::CommentPage(page.clone()));
                Ok(page)
            }
            Err(error) => {
                if let Some((CachePayload::CommentPage(page), _)) = self.cache.get(&key) {
                    warn!("评论刷新失败，退回过期缓存: {}", error);
                    return Ok(page);
                }
                Err(error)
            }
        }
    }

    /// 获取帖子的顶层评论页
    pub async fn comments(&self, post_id: &str, page: u32, limit: u32) -> Result<Page<Comment>> {
        let key = QueryKey::Comments {
            post_id: post_id.to_string(),
            page,
            limit,
        };
        self.fetch_page(key, self.api.get_comments_by_post(post_id, page, limit))
            .await
    }

    /// 获取某评论的回复页
    pub async fn replies(
        &self,
        comment_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>> {
        let key = QueryKey::Replies {
            comment_id: comment_id.to_string(),
            page,
            limit,
        };
        self.fetch_page(key, self.api.get_replies(comment_id, page, limit))
            .await
    }

    /// 获取某用户的评论页
    pub async fn user_comments(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>> {
        let key = QueryKey::UserComments {
            user_id: user_id.to_string(),
            page,
            limit,
        };
        self.fetch_page(key, self.api.get_comments_by_user(user_id, page, limit))
            .await
    }

    /// 发表评论或回复
    ///
    /// 成功后只标脏真正需要刷新的那一页：回复 → 父评论回复列表的
    /// 第一页；顶层评论 → 该帖顶层评论的第一页。帖子列表不受影响。
    pub async fn create_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let created = self.api.create_comment(&new_comment).await?;

        match &new_comment.parent_comment_id {
            Some(parent) => {
                self.cache.mark_stale_matching(|key| {
                    matches!(
                        key,
                        QueryKey::Replies { comment_id, page, .. }
                            if comment_id == parent && *page == 1
                    )
                });
            }
            None => {
                let post_id = &new_comment.post_id;
                self.cache.mark_stale_matching(|key| {
                    matches!(
                        key,
                        QueryKey::Comments { post_id: cached, page, .. }
                            if cached == post_id && *page == 1
                    )
                });
            }
        }

        Ok(created)
    }

    /// 编辑评论（乐观更新：内容立即替换并标记已编辑，失败自动回滚）
    pub async fn update_comment(&self, comment_id: &str, content: &str) -> Result<Confirmation> {
        self.sync
            .execute(
                MutationTarget::comment(comment_id),
                MutationDelta::Edit {
                    content: content.to_string(),
                },
                self.api.update_comment(comment_id, content),
            )
            .await
    }

    /// 删除评论（乐观更新：立即从所有列表移除，失败自动回滚）
    pub async fn delete_comment(&self, comment_id: &str) -> Result<Confirmation> {
        self.sync
            .execute(
                MutationTarget::comment(comment_id),
                MutationDelta::Delete,
                self.api.delete_comment(comment_id),
            )
            .await
    }

    /// 投票（乐观更新：计数立即变化，失败自动回滚）
    pub async fn vote_comment(
        &self,
        comment_id: &str,
        direction: VoteDirection,
    ) -> Result<VoteCounts> {
        self.sync
            .execute(
                MutationTarget::comment(comment_id),
                MutationDelta::Vote { direction },
                self.api.vote_comment(comment_id, direction),
            )
            .await
    }
}
