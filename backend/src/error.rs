use std::fmt;

use eventdesk_shared::ApiErrorBody;
use serde::{Deserialize, Serialize};
use worker::wasm_bindgen::JsValue;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误语义，决定 HTTP 状态码和缺省错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeskErrorStatus {
    /// 500: DocumentStore 读写失败
    Store,
    /// 404: 事件不存在
    NotFound,
    /// 400: 请求内容不合法（如缺少 nombreEvento）
    InvalidInput,
    /// 401: 未登录、会话过期或凭据错误
    Unauthorized,
    /// 400: 请求体不是合法 JSON
    Serialization,
}

impl DeskErrorStatus {
    pub fn status_code(&self) -> u16 {
        match self {
            DeskErrorStatus::InvalidInput | DeskErrorStatus::Serialization => 400,
            DeskErrorStatus::Unauthorized => 401,
            DeskErrorStatus::NotFound => 404,
            DeskErrorStatus::Store => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            DeskErrorStatus::InvalidInput => "INVALID_INPUT",
            DeskErrorStatus::Serialization => "JSON_PARSE_ERROR",
            DeskErrorStatus::Unauthorized => "UNAUTHORIZED",
            DeskErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
            DeskErrorStatus::Store => "INTERNAL_STORE_ERROR",
        }
    }

    /// 从没有结构化错误体的响应状态码反推语义
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => DeskErrorStatus::Unauthorized,
            404 => DeskErrorStatus::NotFound,
            400..=499 => DeskErrorStatus::InvalidInput,
            _ => DeskErrorStatus::Store,
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 错误经过的一层操作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// 如 `events.update`、`store.eventos.put`
    pub operation: String,
    /// 事件 id、会话邮箱等
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 后端统一错误
///
/// `code` 为空时使用 `status` 的缺省错误码；登录失败会覆盖为
/// `auth/invalid-credential` 这类前端可识别的错误码。
#[derive(Debug)]
pub struct DeskError {
    pub status: DeskErrorStatus,
    pub message: String,
    code: Option<String>,
    spans: Vec<ErrorSpan>,
}

impl DeskError {
    pub fn new(status: DeskErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
            spans: Vec::new(),
        }
    }

    // --- 构造 ---

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(DeskErrorStatus::Store, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(DeskErrorStatus::NotFound, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(DeskErrorStatus::InvalidInput, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(DeskErrorStatus::Unauthorized, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(DeskErrorStatus::Serialization, message)
    }

    /// 按 id 查找事件失败；id 只进追踪，不进面向客户端的消息
    pub fn event_not_found(id: &str) -> Self {
        Self::not_found("Event not found").in_op_with("eventos", id)
    }

    // --- 追踪 ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 覆盖面向客户端的错误码
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    // --- 读取 ---

    pub fn status_code(&self) -> u16 {
        self.status.status_code()
    }

    /// 4xx：调用方的问题，不需要记录完整追踪
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// 机器可读的错误码
    pub fn error_code(&self) -> &str {
        self.code
            .as_deref()
            .unwrap_or_else(|| self.status.error_code())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// 公开 API 的响应体；5xx 只给出固定消息
    pub fn to_api_body(&self) -> ApiErrorBody {
        let message = if self.is_client_error() {
            self.message.clone()
        } else {
            "Internal Server Error".to_string()
        };
        ApiErrorBody {
            code: self.error_code().to_string(),
            message,
        }
    }
}

// =========================================================
// Display
// =========================================================

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for DeskError {}

pub type DeskResult<T> = std::result::Result<T, DeskError>;

// =========================================================
// DocumentStore 边界
// =========================================================

/// 带此响应头的失败响应，响应体是 [`StoreFailure`]
pub const STORE_ERROR_HEADER: &str = "X-Store-Error";

/// DocumentStore 返回给 Worker 的失败，Worker 侧还原为 DeskError 并保留追踪
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFailure {
    pub status: DeskErrorStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<ErrorSpan>,
}

impl StoreFailure {
    pub fn status_code(&self) -> u16 {
        self.status.status_code()
    }
}

// =========================================================
// 转换
// =========================================================

impl From<DeskError> for StoreFailure {
    fn from(e: DeskError) -> Self {
        Self {
            status: e.status,
            message: e.message,
            code: e.code,
            spans: e.spans,
        }
    }
}

impl From<StoreFailure> for DeskError {
    fn from(e: StoreFailure) -> Self {
        Self {
            status: e.status,
            message: e.message,
            code: e.code,
            spans: e.spans,
        }
    }
}

impl From<worker::Error> for DeskError {
    fn from(e: worker::Error) -> Self {
        DeskError::store(e.to_string())
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::serialization(e.to_string())
    }
}

impl From<JsValue> for DeskError {
    fn from(e: JsValue) -> Self {
        let msg = e.as_string().unwrap_or_else(|| format!("{:?}", e));
        DeskError::store(msg)
    }
}
