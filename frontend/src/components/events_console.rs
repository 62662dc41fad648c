//! 事件列表与编辑控制台
//!
//! 页面状态集中在一个 `RwSignal<ListingState>` 中，子组件只派发 `ListingAction`。
//! 存储写入成功后才修改本地列表，失败时列表保持不变。

mod edit_modal;
mod event_table;
mod filter_bar;

use crate::auth::use_auth;
use crate::components::icons::{ArrowLeft, RefreshCw};
use crate::components::notification::use_notice;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use edit_modal::EditModal;
use event_table::EventTable;
use eventdesk_shared::editor::{EditorMode, EditorState};
use eventdesk_shared::format::format_currency;
use eventdesk_shared::listing::{ListingAction, ListingState};
use filter_bar::FilterBar;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn EventsConsolePage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notice = use_notice();

    let listing = RwSignal::new(ListingState::new());
    let operators = RwSignal::new(Vec::<String>::new());
    let editing = RwSignal::new(Option::<EditorState>::None);
    let (loading, set_loading) = signal(false);
    let (saving, set_saving) = signal(false);

    let load = move || {
        if loading.get_untracked() {
            return;
        }
        set_loading.set(true);
        spawn_local(async move {
            match auth.api().list_events().await {
                Ok(events) => listing.update(|l| l.apply(ListingAction::Loaded(events))),
                Err(e) => notice.error(format!("Error al cargar los eventos: {}", auth.handle_error(&e))),
            }
            set_loading.set(false);
        });
    };

    load();
    spawn_local(async move {
        match auth.api().list_operators().await {
            Ok(names) => operators.set(names),
            Err(e) => notice.error(format!("No se pudieron cargar los operadores: {}", auth.handle_error(&e))),
        }
    });

    let on_open = Callback::new(move |(id, mode): (String, EditorMode)| {
        match listing.with_untracked(|l| l.find(&id).cloned()) {
            Some(event) => editing.set(Some(EditorState::open(event, mode))),
            None => notice.error("Evento no encontrado"),
        }
    });

    let on_delete = Callback::new(move |id: String| {
        let Some(name) = listing.with_untracked(|l| l.find(&id).map(|e| e.name.clone())) else {
            notice.error("Evento no encontrado");
            return;
        };
        let confirmed = window()
            .confirm_with_message(&format!("¿Eliminar el evento \"{}\"? Esta acción no se puede deshacer.", name))
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match auth.api().delete_event(&id).await {
                Ok(()) => {
                    listing.update(|l| l.apply(ListingAction::EventDeleted(id)));
                    notice.success("Evento eliminado correctamente");
                }
                Err(e) => notice.error(format!("Error al eliminar el evento: {}", auth.handle_error(&e))),
            }
        });
    });

    let on_save = Callback::new(move |_: ()| {
        if saving.get_untracked() {
            return;
        }
        let Some((id, built)) = editing.with_untracked(|e| {
            e.as_ref().map(|st| (st.event_id().to_string(), st.build_update()))
        }) else {
            return;
        };
        let document = match built {
            Ok(doc) => doc,
            Err(e) => {
                notice.warning(e.to_string());
                return;
            }
        };

        set_saving.set(true);
        spawn_local(async move {
            match auth.api().update_event(&id, document).await {
                Ok(event) => {
                    listing.update(|l| l.apply(ListingAction::EventSaved(event)));
                    editing.set(None);
                    notice.success("Evento actualizado correctamente");
                }
                Err(e) => notice.error(format!("Error al guardar los cambios: {}", auth.handle_error(&e))),
            }
            set_saving.set(false);
        });
    });

    let stats = move || listing.with(|l| l.stats());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-7xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <button class="btn btn-ghost btn-circle" on:click=move |_| router.navigate(AppRoute::Menu)>
                            <ArrowLeft attr:class="h-5 w-5" />
                        </button>
                        <a class="btn btn-ghost text-xl">"Modificación de eventos"</a>
                    </div>
                    <div class="flex-none">
                        <button class="btn btn-ghost btn-circle" disabled=move || loading.get() on:click=move |_| load()>
                            <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                    </div>
                </div>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Eventos"</div>
                        <div class="stat-value text-primary">{move || stats().total_events}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Ingresos totales"</div>
                        <div class="stat-value text-success text-2xl">{move || format_currency(stats().total_revenue)}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Sin orden SRE"</div>
                        <div class="stat-value text-warning">{move || stats().pending_orders}</div>
                    </div>
                </div>

                <FilterBar listing=listing operators=operators />

                <EventTable
                    listing=listing
                    loading=loading
                    on_open=on_open
                    on_delete=on_delete
                />
            </div>

            <EditModal
                editing=editing
                operators=operators
                saving=saving
                on_save=on_save
            />
        </div>
    }
}
