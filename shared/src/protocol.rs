use crate::auth::Credentials;
use crate::date::Timestamp;
use crate::document::{EventDocument, StoredEvent};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// 除认证接口外，所有请求都必须携带的会话头
pub const HEADER_SESSION_TOKEN: &str = "X-Session-Token";

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request must carry a session token.
    const AUTHENTICATED: bool = true;
}

// =========================================================
// 公共响应体
// =========================================================

/// 已登录会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub expires_at: Timestamp,
}

/// 非 2xx 响应的 JSON 体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

// =========================================================
// 事件
// =========================================================

/// 全量读取，按开始日期降序
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListEventsRequest;

impl ApiRequest for ListEventsRequest {
    type Response = Vec<StoredEvent>;
    const PATH: &'static str = "/api/events";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// 新建事件：请求体就是文档本身，服务端分配 id 与时间戳
impl ApiRequest for EventDocument {
    type Response = StoredEvent;
    const PATH: &'static str = "/api/events";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 按 id 完整覆盖
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub id: String,
    pub document: EventDocument,
}

impl ApiRequest for UpdateEventRequest {
    type Response = StoredEvent;
    const PATH: &'static str = "/api/events";
    const METHOD: HttpMethod = HttpMethod::Put;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEventRequest {
    pub id: String,
}

impl ApiRequest for DeleteEventRequest {
    type Response = (); // 204 or 404
    const PATH: &'static str = "/api/events";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

// =========================================================
// 操作员
// =========================================================

/// 操作员名称，已排序
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListOperatorsRequest;

impl ApiRequest for ListOperatorsRequest {
    type Response = Vec<String>;
    const PATH: &'static str = "/api/operators";
    const METHOD: HttpMethod = HttpMethod::Get;
}

// =========================================================
// 认证
// =========================================================

impl ApiRequest for Credentials {
    type Response = Session;
    const PATH: &'static str = "/api/auth/sign-in";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignOutRequest;

impl ApiRequest for SignOutRequest {
    type Response = ();
    const PATH: &'static str = "/api/auth/sign-out";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 查询当前会话，未登录或已过期时返回 401
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionRequest;

impl ApiRequest for SessionRequest {
    type Response = Session;
    const PATH: &'static str = "/api/auth/session";
    const METHOD: HttpMethod = HttpMethod::Get;
}
