use thiserror::Error;

#[derive(Debug, Error)]
pub enum KHiveSDKError {
    /// 网络传输错误（请求未到达服务端）
    #[error("Transport error: {0}")]
    Transport(String),
    /// 服务端拒绝（非 2xx 状态码）
    #[error("Server error [{status}]: {message}")]
    Server { status: u16, message: String },
    /// 响应解析失败
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// 认证错误（401 / 令牌失效）
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),
    /// 未初始化错误
    #[error("Not initialized: {0}")]
    NotInitialized(String),
    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for KHiveSDKError {
    fn from(error: serde_json::Error) -> Self {
        KHiveSDKError::Serialization(error.to_string())
    }
}

impl From<reqwest::Error> for KHiveSDKError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            KHiveSDKError::Serialization(error.to_string())
        } else {
            KHiveSDKError::Transport(error.to_string())
        }
    }
}

impl KHiveSDKError {
    /// 判断是否应触发变更回滚
    ///
    /// 传输失败、服务端拒绝、响应格式错误在同步器眼中是同一类结果：
    /// 远端确认没有发生，本地投影必须回滚。
    pub fn is_mutation_failure(&self) -> bool {
        matches!(
            self,
            KHiveSDKError::Transport(_)
                | KHiveSDKError::Server { .. }
                | KHiveSDKError::Serialization(_)
                | KHiveSDKError::Auth(_)
        )
    }

    /// 获取服务端状态码（如果这是一个服务端错误）
    pub fn server_status(&self) -> Option<u16> {
        match self {
            KHiveSDKError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, KHiveSDKError>;
