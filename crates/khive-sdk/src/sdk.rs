//! 统一 SDK 接口 - KHiveSDK 主入口
//!
//! 分层架构设计：
//! ```text
//! KHiveSDK (业务逻辑层)
//!   ├── PostService / CommentService / AuthManager (服务层)
//!   ├── OptimisticSynchronizer (乐观变更层)
//!   ├── QueryCache (查询缓存层)
//!   ├── ApiClient (HTTP 传输层)
//!   └── EventManager (事件系统层)
//! ```
//!
//! 设计原则：
//! - 异步优先：主要 API 使用 async/await
//! - 缓存注入：缓存作为显式依赖传入各层，测试可替换
//! - 事件驱动：变更结果通过事件广播告知展示层

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::info;

use crate::api::{AuthApi, CommentsApi, MediaApi, PostsApi};
use crate::auth::AuthManager;
use crate::cache::{CacheConfig, QueryCache};
use crate::comments::CommentService;
use crate::error::{KHiveSDKError, Result};
use crate::events::{EventManager, SDKEvent};
use crate::http_client::ApiClient;
use crate::mutation::OptimisticSynchronizer;
use crate::posts::PostService;
use crate::version::SDK_VERSION;

/// HTTP 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// 连接超时（秒）
    pub connect_timeout_secs: Option<u64>,
    /// 请求超时（秒）
    pub request_timeout_secs: Option<u64>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: Some(30),
            request_timeout_secs: Some(60),
        }
    }
}

/// K-Hive SDK 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KHiveConfig {
    /// API 基础地址（如 https://forum.example.com/api）
    pub base_url: String,
    /// HTTP 客户端配置
    pub http_client_config: HttpClientConfig,
    /// 缓存过期配置
    pub cache_config: CacheConfig,
    /// 事件广播积压上限
    pub event_capacity: usize,
}

impl Default for KHiveConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            http_client_config: HttpClientConfig::default(),
            cache_config: CacheConfig::default(),
            event_capacity: 256,
        }
    }
}

impl KHiveConfig {
    /// 创建配置构造器
    pub fn builder() -> KHiveConfigBuilder {
        KHiveConfigBuilder::default()
    }
}

/// KHiveConfig 构造器
#[derive(Debug, Default)]
pub struct KHiveConfigBuilder {
    base_url: Option<String>,
    http_client_config: Option<HttpClientConfig>,
    cache_config: Option<CacheConfig>,
    event_capacity: Option<usize>,
}

impl KHiveConfigBuilder {
    /// 设置 API 基础地址
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// 设置 HTTP 客户端配置
    pub fn http_client_config(mut self, config: HttpClientConfig) -> Self {
        self.http_client_config = Some(config);
        self
    }

    /// 设置缓存过期配置
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = Some(config);
        self
    }

    /// 设置事件广播积压上限
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// 构造配置（未设置的字段取默认值）
    pub fn build(self) -> KHiveConfig {
        let defaults = KHiveConfig::default();
        KHiveConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            http_client_config: self
                .http_client_config
                .unwrap_or(defaults.http_client_config),
            cache_config: self.cache_config.unwrap_or(defaults.cache_config),
            event_capacity: self.event_capacity.unwrap_or(defaults.event_capacity),
        }
    }
}

/// K-Hive SDK 主入口
#[derive(Debug)]
pub struct KHiveSDK {
    config: KHiveConfig,
    http: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    events: EventManager,
    posts: PostService,
    comments: CommentService,
    auth: AuthManager,
    media: MediaApi,
}

impl KHiveSDK {
    /// 初始化 SDK
    pub fn initialize(config: KHiveConfig) -> Result<Arc<Self>> {
        if config.base_url.is_empty() {
            return Err(KHiveSDKError::Config("base_url 不能为空".to_string()));
        }

        let events = EventManager::new(config.event_capacity);
        let http = Arc::new(ApiClient::new(
            &config.http_client_config,
            config.base_url.clone(),
            events.clone(),
        )?);
        let cache = Arc::new(QueryCache::new(config.cache_config.clone()));
        let sync = OptimisticSynchronizer::new(Arc::clone(&cache), events.clone());

        let posts = PostService::new(
            PostsApi::new(Arc::clone(&http)),
            Arc::clone(&cache),
            sync.clone(),
        );
        let comments = CommentService::new(
            CommentsApi::new(Arc::clone(&http)),
            Arc::clone(&cache),
            sync,
        );
        let auth = AuthManager::new(
            AuthApi::new(Arc::clone(&http)),
            Arc::clone(&http),
            Arc::clone(&cache),
            events.clone(),
        );
        let media = MediaApi::new(Arc::clone(&http));

        info!(
            "🚀 K-Hive SDK 已初始化 (v{}, base_url: {})",
            SDK_VERSION, config.base_url
        );

        Ok(Arc::new(Self {
            config,
            http,
            cache,
            events,
            posts,
            comments,
            auth,
            media,
        }))
    }

    /// 帖子服务
    pub fn posts(&self) -> &PostService {
        &self.posts
    }

    /// 评论服务
    pub fn comments(&self) -> &CommentService {
        &self.comments
    }

    /// 认证管理
    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    /// 媒体上传
    pub fn media(&self) -> &MediaApi {
        &self.media
    }

    /// 查询缓存句柄
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// 底层 HTTP 客户端句柄
    pub fn http(&self) -> &Arc<ApiClient> {
        &self.http
    }

    /// 订阅 SDK 事件（变更结果、会话过期等）
    pub fn subscribe_events(&self) -> broadcast::Receiver<SDKEvent> {
        self.events.subscribe()
    }

    /// 当前配置
    pub fn config(&self) -> &KHiveConfig {
        &self.config
    }

    /// SDK 版本
    pub fn version(&self) -> &'static str {
        SDK_VERSION
    }
}
