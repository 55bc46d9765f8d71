//! K-Hive SDK - 学生论坛客户端数据层
//!
//! 本 SDK 为 K-Hive 论坛的各类宿主应用（桌面、TUI、移动 FFI）提供
//! 完整的客户端数据能力，包括：
//! - 📄 帖子/评论/回复的类型化 REST 访问
//! - 🗂 进程级查询缓存：复合键索引、新鲜度跟踪、过期拉取
//! - ⚡ 乐观变更同步：投票/编辑/删除零延迟生效，失败自动回滚
//! - 🔐 认证会话：令牌注入、401 会话过期广播、登出清理
//! - 📤 媒体上传：签发地址 + multipart 上传
//! - ⚙️ 事件系统：变更结果统一广播给展示层
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use khive_sdk::{KHiveConfig, KHiveSDK, SortKind, VoteDirection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 配置 SDK
//!     let config = KHiveConfig::builder()
//!         .base_url("https://forum.example.com/api")
//!         .build();
//!
//!     // 初始化 SDK
//!     let sdk = KHiveSDK::initialize(config)?;
//!
//!     // OAuth 回调拿到令牌后注入
//!     sdk.auth().set_token("access-token");
//!
//!     // 浏览帖子（缓存优先）
//!     let page = sdk.posts().posts(1, SortKind::New, 10).await?;
//!     for post in &page.data {
//!         println!("{}: {}", post.post_id, post.title);
//!     }
//!
//!     // 点赞立即生效，失败自动回滚
//!     sdk.posts().vote_post("p1", VoteDirection::Upvote).await?;
//!
//!     Ok(())
//! }
//! ```

// 导出核心模块
pub mod api;
pub mod auth;
pub mod cache;
pub mod comments;
pub mod error;
pub mod events;
pub mod http_client;
pub mod models;
pub mod mutation;
pub mod posts;
pub mod sdk;
pub mod version;

// 重新导出核心类型，方便使用
pub use api::{AuthApi, CommentsApi, MediaApi, MediaUploadResponse, PostsApi, UploadLink};
pub use auth::AuthManager;
pub use cache::{
    CacheConfig, CachePayload, CacheStats, FetchTicket, Freshness, QueryCache, QueryKey,
    QueryKind,
};
pub use comments::CommentService;
pub use error::{KHiveSDKError, Result};
pub use events::{EventManager, SDKEvent};
pub use http_client::ApiClient;
pub use models::{
    Comment, Confirmation, MutationDelta, MutationScope, NewComment, NewPost, Page, Pagination,
    Post, PostUpdate, SortKind, User, UserUpdate, VoteCounts, VoteDirection,
};
pub use mutation::{MutationGuard, MutationState, MutationTarget, OptimisticSynchronizer};
pub use posts::PostService;
pub use sdk::{HttpClientConfig, KHiveConfig, KHiveConfigBuilder, KHiveSDK};
pub use version::SDK_VERSION;
