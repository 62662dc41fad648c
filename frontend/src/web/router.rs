//! 路由服务模块 - 核心引擎
//!
//! 所有对 window.history 的操作都集中在此模块，
//! 导航流程为"监听 -> 验证 -> 处理 -> 加载"。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 用于重定向，不留下历史记录
fn replace_history_state(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

fn log(msg: &str) {
    web_sys::console::log_1(&format!("[Router] {}", msg).into());
}

/// 守卫判定：返回实际应进入的路由
///
/// `auth` 为 `None` 表示会话仍在确认中，此时不做重定向。
fn guard(target: AppRoute, auth: Option<bool>) -> AppRoute {
    match auth {
        Some(false) if target.requires_auth() => AppRoute::auth_failure_redirect(),
        Some(true) if target.should_redirect_when_authenticated() => {
            AppRoute::auth_success_redirect()
        }
        _ => target,
    }
}

/// 路由器服务
///
/// 通过注入的认证信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// `None` 检查中，`Some(true)` 已登录
    auth: Signal<Option<bool>>,
}

impl RouterService {
    fn new(auth: Signal<Option<bool>>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            auth,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, route: AppRoute) {
        let target = guard(route, self.auth.get_untracked());
        if target != route {
            log(&format!("Access to {} denied, redirecting to {}", route, target));
        }
        push_history_state(target.to_path());
        self.set_route.set(target);
    }

    /// 浏览器后退/前进
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let auth = self.auth;

        let closure = Closure::<dyn Fn()>::new(move || {
            let requested = AppRoute::from_path(&current_path());
            let target = guard(requested, auth.get_untracked());
            if target != requested {
                replace_history_state(target.to_path());
            }
            set_route.set(target);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与应用同寿命
        closure.forget();
    }

    /// 会话状态变化时自动重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let auth = self.auth;

        Effect::new(move |_| {
            let state = auth.get();
            let route = current_route.get_untracked();
            let target = guard(route, state);
            if target != route {
                log(&format!("Session changed, redirecting to {}", target));
                replace_history_state(target.to_path());
                set_route.set(target);
            }
        });
    }
}

fn provide_router(auth: Signal<Option<bool>>) -> RouterService {
    let router = RouterService::new(auth);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

#[component]
pub fn Router(
    /// 认证状态信号
    auth: Signal<Option<bool>>,
    children: Children,
) -> impl IntoView {
    provide_router(auth);
    children()
}

/// 根据当前路由渲染对应的组件
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || matcher(router.current_route().get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard() {
        assert_eq!(guard(AppRoute::Events, Some(false)), AppRoute::Login);
        assert_eq!(guard(AppRoute::Login, Some(true)), AppRoute::Menu);
        assert_eq!(guard(AppRoute::Events, Some(true)), AppRoute::Events);
        assert_eq!(guard(AppRoute::Login, Some(false)), AppRoute::Login);
        // 检查中不跳转
        assert_eq!(guard(AppRoute::Events, None), AppRoute::Events);
        assert_eq!(guard(AppRoute::NotFound, Some(false)), AppRoute::NotFound);
    }
}
