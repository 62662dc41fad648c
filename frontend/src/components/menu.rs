use crate::auth::{sign_out, use_auth};
use crate::components::icons::*;
use crate::components::notification::use_notice;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use eventdesk_shared::menu::{
    COMING_SOON_CLOSE_MS, MenuOption, MenuTarget, NAVIGATION_DELAY_MS, coming_soon_message,
};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

fn option_icon(option: MenuOption) -> AnyView {
    match option {
        MenuOption::NewEvent => view! { <CalendarPlus attr:class="h-8 w-8" /> }.into_any(),
        MenuOption::ModifyEvents => view! { <PencilSquare attr:class="h-8 w-8" /> }.into_any(),
        MenuOption::Reports => view! { <ChartBar attr:class="h-8 w-8" /> }.into_any(),
        MenuOption::Dashboard => view! { <Squares attr:class="h-8 w-8" /> }.into_any(),
    }
}

#[component]
pub fn MenuPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notice = use_notice();

    let (pending, set_pending) = signal(Option::<MenuOption>::None);
    let (coming_soon, set_coming_soon) = signal(Option::<String>::None);
    let (signing_out, set_signing_out) = signal(false);
    let modal_timer = StoredValue::new(None::<TimeoutHandle>);

    let close_modal = move || {
        if let Some(handle) = modal_timer.get_value() {
            handle.clear();
        }
        modal_timer.set_value(None);
        set_coming_soon.set(None);
    };

    let select = move |option: MenuOption| {
        if pending.get_untracked().is_some() {
            return;
        }
        match option.target() {
            MenuTarget::Path(path) => {
                set_pending.set(Some(option));
                set_timeout(
                    move || router.navigate(AppRoute::from_path(path)),
                    Duration::from_millis(NAVIGATION_DELAY_MS),
                );
            }
            MenuTarget::ComingSoon(section) => {
                close_modal();
                set_coming_soon.set(Some(coming_soon_message(section)));
                let handle = set_timeout_with_handle(
                    move || set_coming_soon.set(None),
                    Duration::from_millis(COMING_SOON_CLOSE_MS),
                )
                .ok();
                modal_timer.set_value(handle);
            }
        }
    };

    let do_sign_out = move || {
        if signing_out.get_untracked() {
            return;
        }
        set_signing_out.set(true);
        spawn_local(async move {
            if let Err(e) = sign_out(&auth).await {
                notice.error(format!("No se pudo cerrar la sesión: {}", e));
                set_signing_out.set(false);
            }
        });
    };

    // 数字键 1-4 选择选项，Ctrl+Esc 退出登录
    let keys = window_event_listener(ev::keydown, move |e| {
        if e.ctrl_key() && e.key() == "Escape" {
            e.prevent_default();
            do_sign_out();
            return;
        }
        if e.ctrl_key() || e.alt_key() || e.meta_key() {
            return;
        }
        if let Some(option) = MenuOption::from_key(&e.key()) {
            select(option);
        }
    });
    on_cleanup(move || keys.remove());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-5xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <a class="btn btn-ghost text-xl">"EventDesk"</a>
                        <span class="badge badge-neutral hidden md:inline-flex">
                            {move || auth.state.get().email()}
                        </span>
                    </div>
                    <div class="flex-none">
                        <button
                            class="btn btn-outline btn-error gap-2"
                            disabled=move || signing_out.get()
                            on:click=move |_| do_sign_out()
                        >
                            {move || if signing_out.get() {
                                view! { <span class="loading loading-spinner loading-sm"></span> }.into_any()
                            } else {
                                view! { <LogOut attr:class="h-4 w-4" /> }.into_any()
                            }}
                            "Cerrar sesión"
                        </button>
                    </div>
                </div>

                <div class="grid gap-6 md:grid-cols-2">
                    {MenuOption::ALL
                        .into_iter()
                        .enumerate()
                        .map(|(i, option)| {
                            view! {
                                <button
                                    class="card bg-base-100 shadow-xl text-left hover:shadow-2xl transition"
                                    disabled=move || pending.get().is_some()
                                    on:click=move |_| select(option)
                                >
                                    <div class="card-body flex-row items-center gap-4">
                                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                            {move || if pending.get() == Some(option) {
                                                view! { <span class="loading loading-spinner loading-md"></span> }.into_any()
                                            } else {
                                                option_icon(option)
                                            }}
                                        </div>
                                        <div class="flex-1">
                                            <h2 class="card-title">{option.title()}</h2>
                                            <p class="text-base-content/70 text-sm">{option.description()}</p>
                                        </div>
                                        <kbd class="kbd">{i + 1}</kbd>
                                    </div>
                                </button>
                            }
                        })
                        .collect_view()}
                </div>

                <p class="text-center text-xs text-base-content/50">
                    "Atajos: 1-4 para seleccionar, Ctrl+Esc para cerrar sesión"
                </p>
            </div>

            {move || coming_soon.get().map(|msg| view! {
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">"Próximamente"</h3>
                        <p class="py-4">{msg}</p>
                        <div class="modal-action">
                            <button class="btn" on:click=move |_| close_modal()>"Cerrar"</button>
                        </div>
                    </div>
                </div>
            })}
        </div>
    }
}
