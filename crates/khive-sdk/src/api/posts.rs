//! 帖子端点封装（/post）

use std::sync::Arc;

use crate::error::Result;
use crate::http_client::ApiClient;
use crate::models::{Confirmation, NewPost, Page, Post, PostUpdate, SortKind, VoteCounts, VoteDirection};

/// 帖子 API
#[derive(Debug, Clone)]
pub struct PostsApi {
    http: Arc<ApiClient>,
}

impl PostsApi {
    pub fn new(http: Arc<ApiClient>) -> Self {
        Self { http }
    }

    /// 获取帖子列表（GET /post?page&sort&limit）
    pub async fn get_all_posts(&self, page: u32, sort: SortKind, limit: u32) -> Result<Page<Post>> {
        self.http
            .get_json(
                "/post",
                &[
                    ("page", page.to_string()),
                    ("sort", sort.as_str().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    /// 获取单个帖子（GET /post/{id}）
    pub async fn get_post(&self, post_id: &str) -> Result<Post> {
        self.http
            .get_json(&format!("/post/{}", post_id), &[])
            .await
    }

    /// 获取某用户的帖子（GET /post/user/{userId}）
    pub async fn get_posts_by_user(&self, user_id: &str) -> Result<Page<Post>> {
        self.http
            .get_json(&format!("/post/user/{}", user_id), &[])
            .await
    }

    /// 搜索帖子（GET /post/search?q&page）
    pub async fn search_posts(&self, query: &str, page: u32) -> Result<Page<Post>> {
        self.http
            .get_json(
                "/post/search",
                &[("q", query.to_string()), ("page", page.to_string())],
            )
            .await
    }

    /// 创建帖子（POST /post）
    pub async fn create_post(&self, new_post: &NewPost) -> Result<Post> {
        self.http.post_json("/post", new_post).await
    }

    /// 更新帖子（PUT /post/{id}）
    pub async fn update_post(&self, post_id: &str, update: &PostUpdate) -> Result<Post> {
        self.http
            .put_json(&format!("/post/{}", post_id), update)
            .await
    }

    /// 删除帖子（DELETE /post/{id}）
    pub async fn delete_post(&self, post_id: &str) -> Result<Confirmation> {
        self.http
            .delete_json(&format!("/post/{}", post_id))
            .await
    }

    /// 投票（POST /post/{id}/upvote | /post/{id}/downvote）
    pub async fn vote_post(&self, post_id: &str, direction: VoteDirection) -> Result<VoteCounts> {
        self.http
            .post_empty(&format!("/post/{}/{}", post_id, direction.as_str()))
            .await
    }
}
