//! HTTP 客户端模块 - REST API 访问
//!
//! 本模块提供 JSON 请求的统一入口，使用 reqwest 作为底层 HTTP 客户端。
//! 支持 Bearer 令牌注入、401 会话过期处理和 multipart 上传。
//!
//! 错误归类（供同步器的回滚路径使用）：
//! - 请求未到达服务端 → `Transport`
//! - 非 2xx 状态码 → `Server`
//! - 响应体解析失败 → `Serialization`

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{multipart, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{KHiveSDKError, Result};
use crate::events::{unix_now, EventManager, SDKEvent};
use crate::sdk::HttpClientConfig;

/// REST API 客户端
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    /// 当前访问令牌；401 时清除
    token: Arc<RwLock<Option<String>>>,
    events: EventManager,
}

impl ApiClient {
    /// 创建新的 API 客户端
    pub fn new(
        config: &HttpClientConfig,
        base_url: impl Into<String>,
        events: EventManager,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent(crate::version::USER_AGENT);

        if let Some(timeout) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(timeout));
        }

        if let Some(timeout) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| KHiveSDKError::Other(format!("创建 HTTP 客户端失败: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("✅ HTTP 客户端已创建 (base_url: {})", base_url);

        Ok(Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
            events,
        })
    }

    /// 设置访问令牌（登录成功后由宿主应用注入）
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    /// 清除访问令牌
    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    /// 当前是否持有令牌
    pub fn has_token(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    /// API 基础地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 拼接完整请求地址
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("{} {}", method, url);

        let response = request
            .send()
            .await
            .map_err(|e| KHiveSDKError::Transport(format!("请求发送失败: {}", e)))?;

        self.check_status(response).await
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // 令牌失效：清除本地令牌并广播会话过期，由宿主应用决定后续动作
            self.clear_token();
            self.events.emit(SDKEvent::SessionExpired {
                timestamp: unix_now(),
            });
            return Err(KHiveSDKError::Auth("会话已过期 (HTTP 401)".to_string()));
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误信息".to_string());
            error!("❌ 请求失败，HTTP 状态码: {}, 错误: {}", status, message);
            return Err(KHiveSDKError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| KHiveSDKError::Serialization(format!("解析响应失败: {}", e)))
    }

    /// GET 请求，响应按 JSON 解析
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        Self::parse_json(response).await
    }

    /// POST JSON 请求体
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        Self::parse_json(response).await
    }

    /// 无请求体的 POST（投票、登出等动作接口）
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::POST, path, &[], None).await?;
        Self::parse_json(response).await
    }

    /// PUT JSON 请求体
    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::PUT, path, &[], Some(body)).await?;
        Self::parse_json(response).await
    }

    /// DELETE 请求
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::DELETE, path, &[], None).await?;
        Self::parse_json(response).await
    }

    /// 向绝对地址上传 multipart 表单（上传地址由服务端签发，不走 base_url）
    pub async fn post_multipart_abs<T: DeserializeOwned>(
        &self,
        upload_url: &str,
        form: multipart::Form,
        upload_token: Option<&str>,
    ) -> Result<T> {
        let mut request = self.client.post(upload_url).multipart(form);
        if let Some(token) = upload_token {
            request = request.header("X-Upload-Token", token);
        }
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| KHiveSDKError::Transport(format!("上传失败: {}", e)))?;
        let response = self.check_status(response).await?;
        Self::parse_json(response).await
    }
}
