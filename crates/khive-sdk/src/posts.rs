//! 帖子服务 - 缓存优先的查询 + 乐观投票
//!
//! 查询路径：命中新鲜缓存直接返回；过期则重新拉取，拉取失败时
//! 退回已有的过期缓存（仍可渲染，比空屏好）。
//! 投票走乐观变更同步器；创建/更新/删除走普通的"成功后标脏"。

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api::PostsApi;
use crate::cache::{CachePayload, Freshness, QueryCache, QueryKey, QueryKind};
use crate::error::Result;
use crate::models::{
    Confirmation, MutationDelta, NewPost, Page, Post, PostUpdate, SortKind, VoteCounts,
    VoteDirection,
};
use crate::mutation::{MutationTarget, OptimisticSynchronizer};

/// 帖子列表相关的查询类别（创建/更新/删除后整体标脏）
const POST_LIST_KINDS: &[QueryKind] = &[
    QueryKind::Posts,
    QueryKind::UserPosts,
    QueryKind::SearchPosts,
];

/// 帖子服务
#[derive(Debug, Clone)]
pub struct PostService {
    api: PostsApi,
    cache: Arc<QueryCache>,
    sync: OptimisticSynchronizer,
}

impl PostService {
    pub fn new(api: PostsApi, cache: Arc<QueryCache>, sync: OptimisticSynchronizer) -> Self {
        Self { api, cache, sync }
    }

    /// 缓存直读 + 过期拉取（列表页）
    async fn fetch_page<F>(&self, key: QueryKey, fetch: F) -> Result<Page<Post>>
    where
        F: Future<Output = Result<Page<Post>>>,
    {
        if let Some((CachePayload::PostPage(page), Freshness::Fresh)) = self.cache.get(&key) {
            return Ok(page);
        }

        let ticket = self.cache.begin_fetch(&key);
        match fetch.await {
            Ok(page) => {
                self.cache
                    .complete_fetch(ticket, CachePayload::PostPage(page.clone()));
                Ok(page)
            }
            Err(error) => {
                if let Some((CachePayload::PostPage(page), _)) = self.cache.get(&key) {
                    warn!("帖子刷新失败，退回过期缓存: {}", error);
                    return Ok(page);
                }
                Err(error)
            }
        }
    }

    /// 获取帖子列表
    pub async fn posts(&self, page: u32, sort: SortKind, limit: u32) -> Result<Page<Post>> {
        let key = QueryKey::Posts { page, sort, limit };
        self.fetch_page(key, self.api.get_all_posts(page, sort, limit))
            .await
    }

    /// 获取单个帖子详情
    pub async fn post(&self, post_id: &str) -> Result<Post> {
        let key = QueryKey::Post {
            post_id: post_id.to_string(),
        };
        if let Some((CachePayload::PostDetail(post), Freshness::Fresh)) = self.cache.get(&key) {
            return Ok(post);
        }

        let ticket = self.cache.begin_fetch(&key);
        match self.api.get_post(post_id).await {
            Ok(post) => {
                self.cache
                    .complete_fetch(ticket, CachePayload::PostDetail(post.clone()));
                Ok(post)
            }
            Err(error) => {
                if let Some((CachePayload::PostDetail(post), _)) = self.cache.get(&key) {
                    warn!("帖子详情刷新失败，退回过期缓存: {}", error);
                    return Ok(post);
                }
                Err(error)
            }
        }
    }

    /// 获取某用户的帖子
    pub async fn user_posts(&self, user_id: &str) -> Result<Page<Post>> {
        let key = QueryKey::UserPosts {
            user_id: user_id.to_string(),
        };
        self.fetch_page(key, self.api.get_posts_by_user(user_id))
            .await
    }

    /// 搜索帖子
    pub async fn search(&self, query: &str, page: u32) -> Result<Page<Post>> {
        let key = QueryKey::SearchPosts {
            query: query.to_string(),
            page,
        };
        self.fetch_page(key, self.api.search_posts(query, page))
            .await
    }

    /// 创建帖子；成功后所有帖子列表标脏，等下一次读取刷新
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post> {
        let post = self.api.create_post(&new_post).await?;
        self.cache.mark_stale_kinds(POST_LIST_KINDS);
        info!("📝 帖子已创建: {}", post.post_id);
        Ok(post)
    }

    /// 更新帖子；响应体即最新详情，直接写入缓存
    pub async fn update_post(&self, post_id: &str, update: PostUpdate) -> Result<Post> {
        let post = self.api.update_post(post_id, &update).await?;
        self.cache.mark_stale_kinds(POST_LIST_KINDS);
        self.cache.write_entry(
            QueryKey::Post {
                post_id: post_id.to_string(),
            },
            CachePayload::PostDetail(post.clone()),
        );
        Ok(post)
    }

    /// 删除帖子；列表标脏，详情条目整条移除
    pub async fn delete_post(&self, post_id: &str) -> Result<Confirmation> {
        let confirmation = self.api.delete_post(post_id).await?;
        self.cache.mark_stale_kinds(POST_LIST_KINDS);
        self.cache.remove(&QueryKey::Post {
            post_id: post_id.to_string(),
        });
        Ok(confirmation)
    }

    /// 投票（乐观更新：计数立即变化，失败自动回滚）
    pub async fn vote_post(
        &self,
        post_id: &str,
        direction: VoteDirection,
    ) -> Result<VoteCounts> {
        self.sync
            .execute(
                MutationTarget::post(post_id),
                MutationDelta::Vote { direction },
                self.api.vote_post(post_id, direction),
            )
            .await
    }
}
