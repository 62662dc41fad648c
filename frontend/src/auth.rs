//! 认证模块
//!
//! 管理会话状态，与路由系统解耦：路由服务只读取 [`AuthContext::auth_signal`]。

use crate::api::{ApiError, EventDeskApi, default_api_url};
use crate::web::{KEY_API_URL, KEY_SESSION_TOKEN, LocalStorage};
use eventdesk_shared::{Credentials, Session};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// 启动时正在确认已保存的会话
    #[default]
    Checking,
    SignedIn,
    SignedOut,
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub status: AuthStatus,
    pub session: Option<Session>,
    /// 后端 URL（用于 UI 显示和自动填充）
    pub api_url: String,
}

impl AuthState {
    pub fn email(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.email.clone())
            .unwrap_or_default()
    }
}

/// 认证上下文，通过 Context 在组件间共享
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 注入路由服务的信号：`None` 表示仍在检查
    pub fn auth_signal(&self) -> Signal<Option<bool>> {
        let state = self.state;
        Signal::derive(move || match state.get().status {
            AuthStatus::Checking => None,
            AuthStatus::SignedIn => Some(true),
            AuthStatus::SignedOut => Some(false),
        })
    }

    /// 带当前会话 token 的 API 客户端
    pub fn api(&self) -> EventDeskApi {
        self.state.with_untracked(|s| {
            EventDeskApi::new(&s.api_url, s.session.as_ref().map(|x| x.token.clone()))
        })
    }

    /// 后端拒绝会话时调用：清除本地 token，路由会自动回到登录页
    pub fn expire(&self) {
        LocalStorage::delete(KEY_SESSION_TOKEN);
        self.set_state.update(|s| {
            s.session = None;
            s.status = AuthStatus::SignedOut;
        });
    }

    /// 统一处理接口错误：401 使会话失效，返回要展示的文本
    pub fn handle_error(&self, e: &ApiError) -> String {
        if e.is_unauthorized() {
            self.expire();
        }
        e.to_string()
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化：恢复后端地址与已保存的会话
pub fn init_auth(ctx: &AuthContext) {
    let api_url = LocalStorage::get(KEY_API_URL).unwrap_or_else(default_api_url);
    let token = LocalStorage::get(KEY_SESSION_TOKEN);

    ctx.set_state.update(|s| s.api_url = api_url.clone());

    let Some(token) = token.filter(|_| !api_url.is_empty()) else {
        ctx.set_state.update(|s| s.status = AuthStatus::SignedOut);
        return;
    };

    let ctx = *ctx;
    spawn_local(async move {
        let api = EventDeskApi::new(&api_url, Some(token));
        match api.session().await {
            Ok(session) => ctx.set_state.update(|s| {
                s.session = Some(session);
                s.status = AuthStatus::SignedIn;
            }),
            Err(e) => {
                web_sys::console::log_1(&format!("[Auth] Stored session rejected: {}", e).into());
                ctx.expire();
            }
        }
    });
}

/// 登录；失败时返回展示给用户的文本
pub async fn sign_in(ctx: &AuthContext, api_url: String, credentials: Credentials) -> Result<(), String> {
    credentials.validate().map_err(|e| e.to_string())?;
    if api_url.trim().is_empty() {
        return Err("Indique la URL del servidor".to_string());
    }

    let api = EventDeskApi::new(&api_url, None);
    let session = api
        .sign_in(&credentials)
        .await
        .map_err(|e| e.sign_in_message())?;

    LocalStorage::set(KEY_API_URL, api.base_url());
    LocalStorage::set(KEY_SESSION_TOKEN, &session.token);

    let api_url = api.base_url().to_string();
    ctx.set_state.update(|s| {
        s.api_url = api_url;
        s.session = Some(session);
        s.status = AuthStatus::SignedIn;
    });
    Ok(())
}

/// 注销；网络失败时保留会话，由调用方恢复按钮状态
pub async fn sign_out(ctx: &AuthContext) -> Result<(), ApiError> {
    match ctx.api().sign_out().await {
        Ok(()) => {}
        // 会话在服务端已失效，本地照常清理
        Err(e) if e.is_unauthorized() => {}
        Err(e) => return Err(e),
    }
    ctx.expire();
    Ok(())
}
