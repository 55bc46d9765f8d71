//! REST API 封装 - 对服务端各资源端点的类型化访问
//!
//! 每个子模块对应服务端的一组路由，仅做"请求构造 + 响应解析"，
//! 不持有任何状态；缓存与乐观更新由上层服务负责。

pub mod auth;
pub mod comments;
pub mod media;
pub mod posts;

pub use auth::AuthApi;
pub use comments::CommentsApi;
pub use media::{MediaApi, MediaUploadResponse, UploadLink};
pub use posts::PostsApi;
