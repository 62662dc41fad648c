use worker::*;

pub mod accounts;
pub mod config;
pub mod error;
pub mod logic;
pub mod repository;
pub mod store;

pub(crate) mod utils {
    pub mod rpc;
}

use accounts::Accounts;
use config::RuntimeConfig;
use error::{DeskError, DeskResult};
use eventdesk_shared::protocol::{DeleteEventRequest, HEADER_SESSION_TOKEN, UpdateEventRequest};
use eventdesk_shared::{Credentials, EventDocument, Session, Timestamp};
use logic::{AuthLogic, EventLogic};
use repository::DoRepository;
use serde::de::DeserializeOwned;
use store::adapter::WorkerEnv;

// =========================================================
// 宏定义 (包含日志和响应处理)
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info { ($($t:tt)*) => (worker::console_log!($($t)*)) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info { ($($t:tt)*) => (println!($($t)*)) }

#[cfg(target_arch = "wasm32")]
macro_rules! log_error { ($($t:tt)*) => (worker::console_error!($($t)*)) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error { ($($t:tt)*) => (eprintln!($($t)*)) }

// 辅助函数：将 DeskError 映射为 JSON 错误响应
fn map_error_to_response(e: DeskError) -> Result<Response> {
    if !e.is_client_error() {
        log_error!("Internal Error {}", e);
    }

    Ok(Response::from_json(&e.to_api_body())?.with_status(e.status_code()))
}

// 统一响应宏
macro_rules! respond {
    (json, $expr:expr) => {
        match $expr {
            Ok(v) => Response::from_json(&v),
            Err(e) => map_error_to_response(e),
        }
    };
    (empty, $expr:expr) => {
        match $expr {
            Ok(_) => Response::empty().map(|r| r.with_status(204)),
            Err(e) => map_error_to_response(e),
        }
    };
}

// 辅助宏：出错时直接返回错误响应
macro_rules! unwrap_or_resp {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => return map_error_to_response(e),
        }
    };
}

// =========================================================
// 请求上下文
// =========================================================

fn now() -> Timestamp {
    Timestamp::new(Date::now().as_millis() as i64)
}

async fn read_json<T: DeserializeOwned>(req: &mut Request) -> DeskResult<T> {
    let text = req.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| DeskError::invalid_input(format!("Invalid JSON Body: {}", e)))
}

fn session_token(req: &Request) -> String {
    req.headers()
        .get(HEADER_SESSION_TOKEN)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn open_repository(env: &Env, cfg: &RuntimeConfig) -> DeskResult<DoRepository> {
    DoRepository::new(env, &cfg.store_binding).map_err(|e| e.in_op("repository.open"))
}

fn load_accounts(env: &Env, cfg: &RuntimeConfig) -> Accounts {
    let raw = env
        .secret(&cfg.accounts_secret_name)
        .map(|s| s.to_string())
        .unwrap_or_default();
    let accounts = Accounts::parse(&raw);
    if accounts.is_empty() {
        log_error!(
            "Secret {} has no accounts, every sign-in will fail",
            cfg.accounts_secret_name
        );
    }
    accounts
}

/// 受保护的路由在执行前都要通过这里
async fn require_session(
    req: &Request,
    repo: &DoRepository,
    cfg: &RuntimeConfig,
) -> DeskResult<Session> {
    let accounts = Accounts::default();
    AuthLogic::new(repo, &accounts, cfg.session_ttl)
        .current_session(&session_token(req), now())
        .await
}

// =========================================================
// API Controllers (适配层)
// =========================================================

async fn list_events(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let cfg = RuntimeConfig::new(&WorkerEnv(&ctx.env));
    let repo = unwrap_or_resp!(open_repository(&ctx.env, &cfg));
    unwrap_or_resp!(require_session(&req, &repo, &cfg).await);

    let result = EventLogic::new(&repo).list_events().await;
    respond!(json, result)
}

async fn create_event(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let cfg = RuntimeConfig::new(&WorkerEnv(&ctx.env));
    let repo = unwrap_or_resp!(open_repository(&ctx.env, &cfg));
    let session = unwrap_or_resp!(require_session(&req, &repo, &cfg).await);

    let document: EventDocument = unwrap_or_resp!(read_json(&mut req).await);
    let result = EventLogic::new(&repo).create_event(document, now()).await;
    if let Ok(created) = &result {
        log_info!("Event {} created by {}", created.id, session.email);
    }
    respond!(json, result)
}

async fn update_event(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let cfg = RuntimeConfig::new(&WorkerEnv(&ctx.env));
    let repo = unwrap_or_resp!(open_repository(&ctx.env, &cfg));
    let session = unwrap_or_resp!(require_session(&req, &repo, &cfg).await);

    let cmd: UpdateEventRequest = unwrap_or_resp!(read_json(&mut req).await);
    let result = EventLogic::new(&repo).update_event(cmd, now()).await;
    if let Ok(updated) = &result {
        log_info!("Event {} updated by {}", updated.id, session.email);
    }
    respond!(json, result)
}

async fn delete_event(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let cfg = RuntimeConfig::new(&WorkerEnv(&ctx.env));
    let repo = unwrap_or_resp!(open_repository(&ctx.env, &cfg));
    let session = unwrap_or_resp!(require_session(&req, &repo, &cfg).await);

    let target: DeleteEventRequest = unwrap_or_resp!(read_json(&mut req).await);
    match EventLogic::new(&repo).delete_event(&target.id).await {
        Ok(true) => {
            log_info!("Event {} deleted by {}", target.id, session.email);
            Response::empty().map(|r| r.with_status(204))
        }
        Ok(false) => map_error_to_response(DeskError::event_not_found(&target.id)),
        Err(e) => map_error_to_response(e),
    }
}

async fn list_operators(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let cfg = RuntimeConfig::new(&WorkerEnv(&ctx.env));
    let repo = unwrap_or_resp!(open_repository(&ctx.env, &cfg));
    unwrap_or_resp!(require_session(&req, &repo, &cfg).await);

    let result = EventLogic::new(&repo)
        .list_operators(&cfg.operator_seed)
        .await;
    respond!(json, result)
}

async fn sign_in(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let cfg = RuntimeConfig::new(&WorkerEnv(&ctx.env));
    let repo = unwrap_or_resp!(open_repository(&ctx.env, &cfg));
    let accounts = load_accounts(&ctx.env, &cfg);

    let credentials: Credentials = unwrap_or_resp!(read_json(&mut req).await);
    let result = AuthLogic::new(&repo, &accounts, cfg.session_ttl)
        .sign_in(credentials, now())
        .await;
    match &result {
        Ok(session) => log_info!("Signed in: {}", session.email),
        Err(e) => log_info!("Sign-in rejected: {}", e.error_code()),
    }
    respond!(json, result)
}

async fn sign_out(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let cfg = RuntimeConfig::new(&WorkerEnv(&ctx.env));
    let repo = unwrap_or_resp!(open_repository(&ctx.env, &cfg));
    let accounts = Accounts::default();

    let result = AuthLogic::new(&repo, &accounts, cfg.session_ttl)
        .sign_out(&session_token(&req))
        .await;
    respond!(empty, result)
}

async fn current_session(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let cfg = RuntimeConfig::new(&WorkerEnv(&ctx.env));
    let repo = unwrap_or_resp!(open_repository(&ctx.env, &cfg));

    let result = require_session(&req, &repo, &cfg).await;
    respond!(json, result)
}

// =========================================================
// Entry Points
// =========================================================

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let cors = Cors::new()
        .with_origins(vec!["*"])
        .with_methods(vec![
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Options,
        ])
        .with_allowed_headers(vec!["Content-Type", HEADER_SESSION_TOKEN]);

    let router = Router::new();
    router
        .get_async("/api/events", list_events)
        .post_async("/api/events", create_event)
        .put_async("/api/events", update_event)
        .delete_async("/api/events", delete_event)
        .get_async("/api/operators", list_operators)
        .post_async("/api/auth/sign-in", sign_in)
        .post_async("/api/auth/sign-out", sign_out)
        .get_async("/api/auth/session", current_session)
        .options_async("/api/events", |_, _| async { Response::empty() })
        .options_async("/api/operators", |_, _| async { Response::empty() })
        .options_async("/api/auth/sign-in", |_, _| async { Response::empty() })
        .options_async("/api/auth/sign-out", |_, _| async { Response::empty() })
        .options_async("/api/auth/session", |_, _| async { Response::empty() })
        .run(req, env)
        .await?
        .with_cors(&cors)
}
