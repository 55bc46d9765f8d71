//! 数据模型 - 论坛领域实体与请求/响应类型
//!
//! 所有类型与服务端 REST API 的 JSON 结构一一对应（camelCase 字段名）。
//! 缓存层直接持有这些类型的克隆，因此全部派生 `Clone + PartialEq`，
//! 回滚校验依赖结构相等性。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 投票方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// 赞成票
    Upvote,
    /// 反对票
    Downvote,
}

impl VoteDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Upvote => "upvote",
            VoteDirection::Downvote => "downvote",
        }
    }
}

/// 帖子列表排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// 最新发布
    New,
    /// 最高票数
    Top,
    /// 热度（票数 + 时间衰减，由服务端计算）
    Hot,
}

impl SortKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKind::New => "new",
            SortKind::Top => "top",
            SortKind::Hot => "hot",
        }
    }
}

/// 分页信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    /// 该查询下的总条目数
    pub total: u64,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// 一页资源列表（帖子页、评论页等）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// 服务端可能不返回分页信息（如用户主页的全量列表）
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// 构造无分页信息的单页
    pub fn from_data(data: Vec<T>) -> Self {
        Self {
            data,
            pagination: None,
        }
    }
}

/// 帖子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub post_id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    /// 当前用户对该帖的已有投票（服务端视角）
    #[serde(default)]
    pub my_vote: Option<VoteDirection>,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub is_edited: bool,
    /// 帖子附带的媒体地址（图片等）
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 评论
///
/// `parent_comment_id` 为 None 表示顶层评论（挂在帖子下）；
/// 为 Some 表示回复（挂在父评论下）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: String,
    pub post_id: String,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    /// 当前用户对该评论的已有投票（服务端视角）
    #[serde(default)]
    pub my_vote: Option<VoteDirection>,
    pub author_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// 创建帖子请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

/// 更新帖子请求体（仅提交有变化的字段）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

/// 创建评论请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub post_id: String,
    /// Some 表示回复某条评论，None 表示顶层评论
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<String>,
    pub content: String,
}

/// 更新当前用户请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// 投票接口返回的最新计数
///
/// 服务端是计数的权威来源；本地乐观投影在下一次自然刷新时以此为准收敛。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCounts {
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
}

/// 通用确认响应（编辑/删除等接口）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub message: Option<String>,
}

/// 变更作用对象的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationScope {
    Post,
    Comment,
}

/// 乐观变更的投影增量
///
/// 同步器按此描述就地修改缓存中目标的每一处出现，
/// 而不是针对每种变更重复实现快照/恢复逻辑。
#[derive(Debug, Clone, PartialEq)]
pub enum MutationDelta {
    /// 投票：对应计数 +1
    Vote { direction: VoteDirection },
    /// 编辑：替换内容并标记 is_edited
    Edit { content: String },
    /// 删除：从所有包含目标的列表中移除，并将列表总数 -1
    Delete,
}

impl MutationDelta {
    /// 变更种类名（用于事件和日志）
    pub fn kind_str(&self) -> &'static str {
        match self {
            MutationDelta::Vote { .. } => "vote",
            MutationDelta::Edit { .. } => "edit",
            MutationDelta::Delete => "delete",
        }
    }
}
