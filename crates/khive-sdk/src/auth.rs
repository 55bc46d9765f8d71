//! 认证管理 - 令牌、当前用户缓存与登出清理
//!
//! OAuth 流程由宿主应用完成：打开 `login_url()`，拿到令牌后
//! 调用 `set_token()`。此后所有请求自动携带 Bearer 令牌。

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::AuthApi;
use crate::cache::{CachePayload, Freshness, QueryCache, QueryKey};
use crate::error::Result;
use crate::events::{unix_now, EventManager, SDKEvent};
use crate::http_client::ApiClient;
use crate::models::{User, UserUpdate};

/// 认证管理器
#[derive(Debug, Clone)]
pub struct AuthManager {
    api: AuthApi,
    http: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    events: EventManager,
}

impl AuthManager {
    pub fn new(
        api: AuthApi,
        http: Arc<ApiClient>,
        cache: Arc<QueryCache>,
        events: EventManager,
    ) -> Self {
        Self {
            api,
            http,
            cache,
            events,
        }
    }

    /// Google OAuth 登录地址（宿主应用负责打开浏览器）
    pub fn login_url(&self) -> String {
        self.api.google_login_url()
    }

    /// 注入访问令牌（OAuth 回调成功后调用）
    pub fn set_token(&self, token: impl Into<String>) {
        self.http.set_token(token);
    }

    /// 当前是否处于登录态（仅表示本地持有令牌）
    pub fn is_logged_in(&self) -> bool {
        self.http.has_token()
    }

    /// 获取当前登录用户（带缓存）
    pub async fn current_user(&self) -> Result<User> {
        let key = QueryKey::CurrentUser;
        if let Some((CachePayload::UserDetail(user), Freshness::Fresh)) = self.cache.get(&key) {
            return Ok(user);
        }

        let ticket = self.cache.begin_fetch(&key);
        let user = self.api.get_current_user().await?;
        self.cache
            .complete_fetch(ticket, CachePayload::UserDetail(user.clone()));
        Ok(user)
    }

    /// 更新当前用户资料；响应体即最新资料，直接写入缓存
    pub async fn update_user(&self, update: UserUpdate) -> Result<User> {
        let user = self.api.update_user(&update).await?;
        self.cache
            .write_entry(QueryKey::CurrentUser, CachePayload::UserDetail(user.clone()));
        Ok(user)
    }

    /// 登出：远端注销 + 本地清理
    ///
    /// 远端登出失败不阻断本地清理（令牌可能本来就已失效）。
    pub async fn logout(&self) -> Result<()> {
        if let Err(error) = self.api.logout().await {
            warn!("远端登出失败，继续本地清理: {}", error);
        }

        self.http.clear_token();
        self.cache.clear();
        self.events.emit(SDKEvent::CacheCleared {
            timestamp: unix_now(),
        });
        info!("👋 已登出，令牌与缓存已清空");
        Ok(())
    }
}
