//! 媒体端点封装（/media）
//!
//! 上传分两步：先取签发的上传地址，再向该地址 POST multipart。
//! 图片压缩/缩放不在 SDK 职责内，由宿主应用在调用前完成。

use std::sync::Arc;

use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{KHiveSDKError, Result};
use crate::http_client::ApiClient;

/// 上传地址响应（GET /media/uploadlink）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadLink {
    pub upload_url: String,
    /// 部分部署会额外签发一次性令牌
    #[serde(default)]
    pub upload_token: Option<String>,
}

/// 媒体上传响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResponse {
    /// 托管后的访问地址（写入帖子的 media_url）
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// 媒体 API
#[derive(Debug, Clone)]
pub struct MediaApi {
    http: Arc<ApiClient>,
}

impl MediaApi {
    pub fn new(http: Arc<ApiClient>) -> Self {
        Self { http }
    }

    /// 获取签发的上传地址（GET /media/uploadlink）
    pub async fn get_upload_link(&self) -> Result<UploadLink> {
        self.http.get_json("/media/uploadlink", &[]).await
    }

    /// 从内存上传文件
    pub async fn upload_bytes(
        &self,
        filename: String,
        mime_type: String,
        data: Vec<u8>,
    ) -> Result<MediaUploadResponse> {
        let size = data.len() as u64;
        let link = self.get_upload_link().await?;

        info!("📤 开始上传媒体: {} ({} bytes)", filename, size);

        let part = multipart::Part::bytes(data)
            .file_name(filename)
            .mime_str(&mime_type)
            .map_err(|e| KHiveSDKError::InvalidInput(format!("无效的 MIME 类型: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let result: MediaUploadResponse = self
            .http
            .post_multipart_abs(&link.upload_url, form, link.upload_token.as_deref())
            .await?;

        info!("✅ 媒体上传成功: {}", result.url);
        Ok(result)
    }
}
