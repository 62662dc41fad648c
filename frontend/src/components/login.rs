use crate::auth::{sign_in, use_auth};
use crate::components::icons::{Eye, EyeOff, LockClosed};
use eventdesk_shared::Credentials;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let api_url = RwSignal::new(auth.state.get_untracked().api_url);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let password_visible = RwSignal::new(false);

    // 登录成功后的跳转由路由服务监听会话状态完成
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        let credentials = Credentials::new(email.get_untracked(), password.get_untracked());
        if let Err(e) = credentials.validate() {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let url = api_url.get_untracked();
        spawn_local(async move {
            if let Err(msg) = sign_in(&auth, url, credentials).await {
                set_error_msg.set(Some(msg));
                password.set(String::new());
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <LockClosed attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"EventDesk"</h1>
                        <p class="text-base-content/70">"Inicie sesión para administrar los eventos"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Correo electrónico"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="username"
                                placeholder="usuario@empresa.com"
                                on:input=move |ev| {
                                    email.set(event_target_value(&ev));
                                    set_error_msg.set(None);
                                }
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Contraseña"</span>
                            </label>
                            <div class="join w-full">
                                <input
                                    id="password"
                                    type=move || password_input_type(password_visible.get())
                                    autocomplete="current-password"
                                    placeholder="••••••••"
                                    on:input=move |ev| {
                                        password.set(event_target_value(&ev));
                                        set_error_msg.set(None);
                                    }
                                    prop:value=password
                                    class="input input-bordered join-item flex-1"
                                />
                                <button
                                    type="button"
                                    class="btn btn-square join-item"
                                    title=move || toggle_label(password_visible.get())
                                    aria-label=move || toggle_label(password_visible.get())
                                    on:click=move |_| password_visible.update(|v| *v = !*v)
                                >
                                    {move || if password_visible.get() {
                                        view! { <EyeOff attr:class="h-5 w-5" /> }.into_any()
                                    } else {
                                        view! { <Eye attr:class="h-5 w-5" /> }.into_any()
                                    }}
                                </button>
                            </div>
                        </div>

                        <details class="collapse collapse-arrow bg-base-200 mt-2">
                            <summary class="collapse-title text-sm">"Servidor"</summary>
                            <div class="collapse-content">
                                <input
                                    id="api-url"
                                    type="url"
                                    placeholder="https://eventdesk.workers.dev"
                                    on:input=move |ev| api_url.set(event_target_value(&ev))
                                    prop:value=api_url
                                    class="input input-bordered input-sm w-full"
                                />
                            </div>
                        </details>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Verificando..." }.into_any()
                                } else {
                                    "Iniciar sesión".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// 密码显示切换
// =========================================================

fn password_input_type(visible: bool) -> &'static str {
    if visible { "text" } else { "password" }
}

fn toggle_label(visible: bool) -> &'static str {
    if visible {
        "Ocultar contraseña"
    } else {
        "Mostrar contraseña"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_visibility_toggle() {
        assert_eq!(password_input_type(false), "password");
        assert_eq!(password_input_type(true), "text");
        assert_eq!(toggle_label(false), "Mostrar contraseña");
        assert_eq!(toggle_label(true), "Ocultar contraseña");
    }
}
