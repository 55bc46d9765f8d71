//! 评论端点封装（/comment）

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::http_client::ApiClient;
use crate::models::{Comment, Confirmation, NewComment, Page, VoteCounts, VoteDirection};

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

/// 评论 API
#[derive(Debug, Clone)]
pub struct CommentsApi {
    http: Arc<ApiClient>,
}

impl CommentsApi {
    pub fn new(http: Arc<ApiClient>) -> Self {
        Self { http }
    }

    /// 获取帖子的顶层评论（GET /comment/post/{postId}?page&limit）
    pub async fn get_comments_by_post(
        &self,
        post_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>> {
        self.http
            .get_json(
                &format!("/comment/post/{}", post_id),
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// 获取评论的回复（GET /comment/{id}/replies?page&limit）
    pub async fn get_replies(
        &self,
        comment_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>> {
        self.http
            .get_json(
                &format!("/comment/{}/replies", comment_id),
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// 获取某用户的评论（GET /comment/user/{userId}?page&limit）
    pub async fn get_comments_by_user(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>> {
        self.http
            .get_json(
                &format!("/comment/user/{}", user_id),
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// 发表评论或回复（POST /comment）
    pub async fn create_comment(&self, new_comment: &NewComment) -> Result<Comment> {
        self.http.post_json("/comment", new_comment).await
    }

    /// 编辑评论内容（PUT /comment/{id}）
    pub async fn update_comment(&self, comment_id: &str, content: &str) -> Result<Confirmation> {
        self.http
            .put_json(
                &format!("/comment/{}", comment_id),
                &ContentBody { content },
            )
            .await
    }

    /// 删除评论（DELETE /comment/{id}）
    pub async fn delete_comment(&self, comment_id: &str) -> Result<Confirmation> {
        self.http
            .delete_json(&format!("/comment/{}", comment_id))
            .await
    }

    /// 投票（POST /comment/{id}/upvote | /comment/{id}/downvote）
    pub async fn vote_comment(
        &self,
        comment_id: &str,
        direction: VoteDirection,
    ) -> Result<VoteCounts> {
        self.http
            .post_empty(&format!("/comment/{}/{}", comment_id, direction.as_str()))
            .await
    }
}
