use crate::error::{DeskError, DeskErrorStatus, DeskResult, STORE_ERROR_HEADER, StoreFailure};

use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use worker::{Headers, Method, Request, RequestInit, Response, Stub, wasm_bindgen::JsValue};

/// DocumentStore 内部请求使用的虚拟源，只有路径部分有意义
pub const STORE_ORIGIN: &str = "http://store";

// =========================================================
// 存储指令
// =========================================================

/// 发给 DocumentStore 的一条指令，绑定请求体、响应体与内部路径
pub trait StoreCommand: Serialize + DeserializeOwned {
    type Response: Serialize + DeserializeOwned;
    /// 形如 `/eventos/put`：集合名 + 动作
    const PATH: &'static str;

    /// 错误追踪中使用的操作名，如 `store.eventos.put`
    fn operation() -> String {
        format!("store{}", Self::PATH.replace('/', "."))
    }
}

// =========================================================
// Worker 侧：发送指令
// =========================================================

pub struct StoreClient {
    stub: Stub,
}

impl StoreClient {
    pub fn new(stub: Stub) -> Self {
        Self { stub }
    }

    pub async fn send<T: StoreCommand>(&self, cmd: &T) -> DeskResult<T::Response> {
        let op = T::operation();
        let request = build_request(T::PATH, cmd).map_err(|e| e.in_op(op.clone()))?;

        let mut response = self
            .stub
            .fetch_with_request(request)
            .await
            .map_err(|e| DeskError::from(e).in_op_with(op.clone(), "fetch"))?;

        let status = response.status_code();
        let text = response
            .text()
            .await
            .map_err(|e| DeskError::from(e).in_op_with(op.clone(), "read"))?;

        if status != 200 {
            let tagged = response
                .headers()
                .get(STORE_ERROR_HEADER)
                .ok()
                .flatten()
                .is_some();
            return Err(decode_failure(status, tagged, &text).in_op(op));
        }

        serde_json::from_str::<T::Response>(&text)
            .map_err(|e| DeskError::from(e).in_op_with(op, "decode"))
    }
}

fn build_request<T: Serialize>(path: &str, cmd: &T) -> DeskResult<Request> {
    let body = serde_json::to_string(cmd)?;

    let headers = Headers::new();
    headers.set("Content-Type", "application/json")?;

    let mut init = RequestInit::new();
    init.with_method(Method::Post)
        .with_headers(headers)
        .with_body(Some(JsValue::from_str(&body)));

    Ok(Request::new_with_init(&format!("{STORE_ORIGIN}{path}"), &init)?)
}

/// 还原 DocumentStore 返回的失败
///
/// 带标记头且能解析的响应保留原有的状态、错误码和追踪；
/// 其余按 HTTP 状态码归类，原文放进消息里。
pub(crate) fn decode_failure(status: u16, tagged: bool, body: &str) -> DeskError {
    if tagged {
        if let Ok(failure) = serde_json::from_str::<StoreFailure>(body) {
            return failure.into();
        }
    }
    DeskError::new(
        DeskErrorStatus::from_http_status(status),
        format!("DocumentStore answered {}: {}", status, body.trim()),
    )
}

// =========================================================
// DocumentStore 侧：处理指令
// =========================================================

pub struct StoreHandler;

impl StoreHandler {
    pub async fn handle<T, F, Fut>(mut req: Request, handler: F) -> worker::Result<Response>
    where
        T: StoreCommand,
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = DeskResult<T::Response>>,
    {
        if req.method() != Method::Post {
            return Response::error("Method Not Allowed", 405);
        }

        let text = match req.text().await {
            Ok(t) => t,
            Err(e) => return Response::error(format!("Failed to read body: {}", e), 400),
        };

        let cmd: T = match parse_body(&text) {
            Ok(v) => v,
            Err(e) => return Response::error(format!("Invalid JSON Body: {}", e), 400),
        };

        match handler(cmd).await {
            Ok(result) => Response::from_json(&result),
            Err(e) => encode_failure(e),
        }
    }
}

fn encode_failure(err: DeskError) -> worker::Result<Response> {
    let failure = StoreFailure::from(err);
    let status = failure.status_code();
    match Response::from_json(&failure) {
        Ok(mut resp) => {
            let _ = resp.headers_mut().set(STORE_ERROR_HEADER, "true");
            Ok(resp.with_status(status))
        }
        Err(e) => Response::error(format!("Failed to serialize error: {}", e), 500),
    }
}

/// 空 body 视为 `null`，无字段的指令（如 `ListEventsCmd`）可以不带请求体
pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    if text.trim().is_empty() {
        serde_json::from_str("null")
    } else {
        serde_json::from_str(text)
    }
}
