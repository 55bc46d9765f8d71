//! 认证端点封装（/auth）
//!
//! OAuth 跳转本身由宿主应用完成（打开浏览器等），
//! 这里只负责登录地址的构造和令牌生效后的用户接口。

use std::sync::Arc;

use crate::error::Result;
use crate::http_client::ApiClient;
use crate::models::{Confirmation, User, UserUpdate};

/// 认证 API
#[derive(Debug, Clone)]
pub struct AuthApi {
    http: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(http: Arc<ApiClient>) -> Self {
        Self { http }
    }

    /// Google OAuth 登录地址（宿主应用负责打开）
    pub fn google_login_url(&self) -> String {
        self.http.url("/auth/google")
    }

    /// 获取当前登录用户（GET /auth/user）
    pub async fn get_current_user(&self) -> Result<User> {
        self.http.get_json("/auth/user", &[]).await
    }

    /// 更新当前用户资料（PUT /auth/user）
    pub async fn update_user(&self, update: &UserUpdate) -> Result<User> {
        self.http.put_json("/auth/user", update).await
    }

    /// 登出（POST /auth/logout）
    pub async fn logout(&self) -> Result<Confirmation> {
        self.http.post_empty("/auth/logout").await
    }
}
