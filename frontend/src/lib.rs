//! EventDesk 前端应用
//!
//! - `web::route` / `web::router`: 路由定义与路由服务
//! - `auth`: 会话状态
//! - `api`: 后端 HTTP 客户端
//! - `components`: 页面与 UI 组件

mod api;
mod auth;
mod components {
    pub mod events_console;
    mod icons;
    pub mod login;
    pub mod menu;
    pub mod new_event;
    pub mod notification;
}
pub(crate) mod web;

use crate::auth::{AuthContext, AuthStatus, init_auth};
use crate::components::events_console::EventsConsolePage;
use crate::components::login::LoginPage;
use crate::components::menu::MenuPage;
use crate::components::new_event::NewEventPage;
use crate::components::notification::{NoticeContext, NotificationToast};

use leptos::prelude::*;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Menu => view! { <MenuPage /> }.into_any(),
        AppRoute::NewEvent => view! { <NewEventPage /> }.into_any(),
        AppRoute::Events => view! { <EventsConsolePage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Página no encontrada"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context(NoticeContext::new());

    // 从 LocalStorage 恢复后端 URL 和会话，并向后端确认
    init_auth(&auth_ctx);

    let checking = move || auth_ctx.state.with(|s| s.status == AuthStatus::Checking);

    view! {
        <Router auth=auth_ctx.auth_signal()>
            <Show
                when=move || !checking()
                fallback=|| view! {
                    <div class="flex items-center justify-center min-h-screen bg-base-200">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <RouterOutlet matcher=route_matcher />
            </Show>
        </Router>
        <NotificationToast />
    }
}
