//! 后端 REST API 客户端
//!
//! 每个接口由 `eventdesk_shared::protocol` 中的 `ApiRequest` 描述，
//! 这里只有一个泛型 `call`，其余方法是带领域转换的便捷封装。

use crate::web::{HttpClient, HttpError};
use eventdesk_shared::auth::sign_in_error_message;
use eventdesk_shared::protocol::{
    DeleteEventRequest, HEADER_SESSION_TOKEN, ListEventsRequest, ListOperatorsRequest,
    SessionRequest, SignOutRequest, UpdateEventRequest,
};
use eventdesk_shared::{
    ApiErrorBody, ApiRequest, AuthErrorCode, Credentials, Event, EventDocument, HttpMethod,
    Session,
};
use std::fmt;

/// 构建时注入的默认后端地址
const DEFAULT_API_URL: Option<&str> = option_env!("EVENTDESK_API_URL");

pub fn default_api_url() -> String {
    DEFAULT_API_URL.unwrap_or_default().to_string()
}

#[derive(Debug, Clone)]
pub enum ApiError {
    Http(HttpError),
    /// 后端返回的结构化错误
    Api { status: u16, body: ApiErrorBody },
    /// 非 2xx 且无法解析的响应
    Status(u16),
    Decode(String),
    /// 需要会话但尚未登录
    NoSession,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::Status(status) => Some(*status),
            _ => None,
        }
    }

    /// 会话失效，需要重新登录
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::NoSession) || self.status() == Some(401)
    }

    /// 登录页展示的文本
    pub fn sign_in_message(&self) -> String {
        match self {
            ApiError::Api { body, .. } => sign_in_error_message(&body.code, &body.message),
            ApiError::Http(_) => AuthErrorCode::NetworkRequestFailed.message().to_string(),
            other => sign_in_error_message("", &other.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "{}", e),
            ApiError::Api { body, .. } => write!(f, "{}", body.message),
            ApiError::Status(status) => write!(f, "Error del servidor ({})", status),
            ApiError::Decode(msg) => write!(f, "Respuesta inválida: {}", msg),
            ApiError::NoSession => write!(f, "La sesión ha expirado"),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Http(e)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventDeskApi {
    base_url: String,
    token: Option<String>,
}

impl EventDeskApi {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 发送强类型请求并解析响应
    pub async fn call<T: ApiRequest>(&self, req: &T) -> Result<T::Response, ApiError> {
        let mut builder = HttpClient::request(T::METHOD, &self.url(T::PATH));

        if T::AUTHENTICATED {
            let token = self.token.as_deref().ok_or(ApiError::NoSession)?;
            builder = builder.header(HEADER_SESSION_TOKEN, token);
        }

        if T::METHOD != HttpMethod::Get {
            let body = serde_json::to_string(req).map_err(|e| ApiError::Decode(e.to_string()))?;
            builder = builder.json_body(body);
        }

        let res = builder.send().await?;
        let status = res.status();
        let ok = res.ok();
        let text = res.text().await?;

        if !ok {
            return Err(match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => ApiError::Api { status, body },
                Err(_) => ApiError::Status(status),
            });
        }

        parse_body::<T::Response>(&text)
    }

    // =========================================================
    // 便捷方法
    // =========================================================

    /// 加载全部事件并迁移为当前模型
    pub async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let stored = self.call(&ListEventsRequest).await?;
        Ok(stored.into_iter().map(Event::normalize).collect())
    }

    pub async fn create_event(&self, document: EventDocument) -> Result<Event, ApiError> {
        self.call(&document).await.map(Event::normalize)
    }

    pub async fn update_event(&self, id: &str, document: EventDocument) -> Result<Event, ApiError> {
        let req = UpdateEventRequest {
            id: id.to_string(),
            document,
        };
        self.call(&req).await.map(Event::normalize)
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        self.call(&DeleteEventRequest { id: id.to_string() }).await
    }

    pub async fn list_operators(&self) -> Result<Vec<String>, ApiError> {
        self.call(&ListOperatorsRequest).await
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.call(credentials).await
    }

    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.call(&SignOutRequest).await
    }

    pub async fn session(&self) -> Result<Session, ApiError> {
        self.call(&SessionRequest).await
    }
}

/// 空响应体（204）按 JSON `null` 解析，使 `()` 响应可以通过
fn parse_body<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
