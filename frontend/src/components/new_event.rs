//! 新建事件页面
//!
//! 表单规则全部在 `NewEventForm` 中，这里只负责绑定输入、高亮缺失字段和保存后的倒计时。

use crate::auth::use_auth;
use crate::components::icons::{ArrowLeft, CheckCircle};
use crate::components::notification::use_notice;
use crate::web::focus_element;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use eventdesk_shared::creation::{FormField, HIGHLIGHT_MS, NewEventForm, REDIRECT_COUNTDOWN_SECS};
use eventdesk_shared::date::{format_input_date, parse_input_date};
use eventdesk_shared::format::{format_currency, parse_amount};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

#[component]
pub fn NewEventPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notice = use_notice();

    let form = RwSignal::new(NewEventForm::new());
    // 金额输入保留原始文本，避免输入过程中被格式化
    let subtotal_text = RwSignal::new(String::new());
    let tax_text = RwSignal::new(String::new());

    let operators = RwSignal::new(Vec::<String>::new());
    let highlighted = RwSignal::new(Option::<FormField>::None);
    let highlight_timer = StoredValue::new(None::<TimeoutHandle>);
    let (saving, set_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (countdown, set_countdown) = signal(Option::<u32>::None);

    // 操作员下拉选项
    spawn_local(async move {
        match auth.api().list_operators().await {
            Ok(names) => operators.set(names),
            Err(e) => notice.error(format!("No se pudieron cargar los operadores: {}", auth.handle_error(&e))),
        }
    });

    let highlight = move |field: FormField| {
        if let Some(handle) = highlight_timer.get_value() {
            handle.clear();
        }
        highlighted.set(Some(field));
        focus_element(field.key());
        let handle = set_timeout_with_handle(
            move || highlighted.set(None),
            Duration::from_millis(HIGHLIGHT_MS),
        )
        .ok();
        highlight_timer.set_value(handle);
    };

    let input_class = move |field: FormField| {
        move || {
            if highlighted.get() == Some(field) {
                "input input-bordered input-error w-full"
            } else {
                "input input-bordered w-full"
            }
        }
    };

    let start_countdown = move || {
        set_countdown.set(Some(REDIRECT_COUNTDOWN_SECS));
        let interval = StoredValue::new(None::<IntervalHandle>);
        let handle = set_interval_with_handle(
            move || {
                let left = countdown.get_untracked().unwrap_or(0).saturating_sub(1);
                set_countdown.set(Some(left));
                if left == 0 {
                    if let Some(h) = interval.get_value() {
                        h.clear();
                    }
                    router.navigate(AppRoute::Menu);
                }
            },
            Duration::from_secs(1),
        )
        .ok();
        interval.set_value(handle);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }

        let document = match form.with_untracked(|f| f.to_document()) {
            Ok(doc) => doc,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                highlight(e.field);
                return;
            }
        };

        set_error_msg.set(None);
        set_saving.set(true);
        spawn_local(async move {
            match auth.api().create_event(document).await {
                Ok(_) => start_countdown(),
                Err(e) => {
                    let msg = auth.handle_error(&e);
                    set_error_msg.set(Some(format!("Error al guardar el evento: {}", msg)));
                    set_saving.set(false);
                }
            }
        });
    };

    let on_reset = move |_| {
        let confirmed = window()
            .confirm_with_message("¿Desea limpiar todos los campos del formulario?")
            .unwrap_or(false);
        if confirmed {
            form.update(|f| f.reset());
            subtotal_text.set(String::new());
            tax_text.set(String::new());
            set_error_msg.set(None);
            highlighted.set(None);
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-4xl mx-auto space-y-6">
                <div class="flex items-center gap-2">
                    <button class="btn btn-ghost btn-circle" on:click=move |_| router.navigate(AppRoute::Menu)>
                        <ArrowLeft attr:class="h-5 w-5" />
                    </button>
                    <h1 class="text-2xl font-bold">"Captura de nuevo evento"</h1>
                </div>

                <form class="card bg-base-100 shadow-xl" on:submit=on_submit novalidate>
                    <div class="card-body space-y-4">
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2"><span>{msg}</span></div>
                        })}

                        <div class="grid gap-4 md:grid-cols-2">
                            <label class="form-control">
                                <span class="label-text">"Número de evento *"</span>
                                <input
                                    id=FormField::EventNumber.key()
                                    type="text"
                                    class=input_class(FormField::EventNumber)
                                    prop:value=move || form.with(|f| f.event_number.clone())
                                    on:input=move |ev| form.update(|f| f.event_number = event_target_value(&ev))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Nombre del evento *"</span>
                                <input
                                    id=FormField::Name.key()
                                    type="text"
                                    class=input_class(FormField::Name)
                                    prop:value=move || form.with(|f| f.name.clone())
                                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Fecha de inicio *"</span>
                                <input
                                    id=FormField::StartDate.key()
                                    type="date"
                                    class=input_class(FormField::StartDate)
                                    prop:value=move || format_input_date(form.with(|f| f.start_date))
                                    on:change=move |ev| form.update(|f| f.start_date = parse_input_date(&event_target_value(&ev)))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Fecha final"</span>
                                <input
                                    id="fechaFinal"
                                    type="date"
                                    class="input input-bordered w-full"
                                    prop:value=move || format_input_date(form.with(|f| f.end_date))
                                    on:change=move |ev| form.update(|f| f.end_date = parse_input_date(&event_target_value(&ev)))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Zona *"</span>
                                <input
                                    id=FormField::Zone.key()
                                    type="text"
                                    class=input_class(FormField::Zone)
                                    prop:value=move || form.with(|f| f.zone.clone())
                                    on:input=move |ev| form.update(|f| f.zone = event_target_value(&ev))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Ciudad"</span>
                                <input
                                    id="ciudad"
                                    type="text"
                                    class="input input-bordered w-full"
                                    prop:value=move || form.with(|f| f.city.clone())
                                    on:input=move |ev| form.update(|f| f.city = event_target_value(&ev))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Operador *"</span>
                                <select
                                    id=FormField::Operator.key()
                                    class=move || if highlighted.get() == Some(FormField::Operator) {
                                        "select select-bordered select-error w-full"
                                    } else {
                                        "select select-bordered w-full"
                                    }
                                    prop:value=move || form.with(|f| f.operator.clone())
                                    on:change=move |ev| form.update(|f| f.operator = event_target_value(&ev))
                                >
                                    <option value="">"Seleccione un operador"</option>
                                    <For
                                        each=move || operators.get()
                                        key=|name| name.clone()
                                        children=|name| view! { <option value=name.clone()>{name.clone()}</option> }
                                    />
                                </select>
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Número de factura"</span>
                                <input
                                    id="numeroFactura"
                                    type="text"
                                    class="input input-bordered w-full"
                                    prop:value=move || form.with(|f| f.invoice_number.clone())
                                    on:input=move |ev| form.update(|f| f.invoice_number = event_target_value(&ev))
                                />
                            </label>
                        </div>

                        <div class="grid gap-4 md:grid-cols-2 items-end">
                            <label class="label cursor-pointer justify-start gap-3">
                                <input
                                    id="tieneOrdenSRE"
                                    type="checkbox"
                                    class="checkbox checkbox-primary"
                                    prop:checked=move || form.with(|f| f.has_order())
                                    on:change=move |ev| form.update(|f| f.set_has_order(event_target_checked(&ev)))
                                />
                                <span class="label-text">"Tiene orden SRE"</span>
                            </label>
                            <label class="form-control">
                                <span class="label-text">
                                    {move || if form.with(|f| f.folio_required()) { "Folio *" } else { "Folio" }}
                                </span>
                                <input
                                    id=FormField::Folio.key()
                                    type="text"
                                    class=input_class(FormField::Folio)
                                    disabled=move || !form.with(|f| f.folio_required())
                                    prop:value=move || form.with(|f| f.folio().to_string())
                                    on:input=move |ev| form.update(|f| f.set_folio(event_target_value(&ev)))
                                />
                            </label>
                        </div>

                        <div class="grid gap-4 md:grid-cols-3">
                            <label class="form-control">
                                <span class="label-text">"Subtotal"</span>
                                <input
                                    id="subtotal"
                                    type="number"
                                    step="0.01"
                                    min="0"
                                    class="input input-bordered w-full"
                                    prop:value=move || subtotal_text.get()
                                    on:input=move |ev| {
                                        let raw = event_target_value(&ev);
                                        form.update(|f| f.set_subtotal(parse_amount(&raw)));
                                        tax_text.set(format!("{:.2}", form.with_untracked(|f| f.tax())));
                                        subtotal_text.set(raw);
                                    }
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"IVA (16%)"</span>
                                <input
                                    id="iva"
                                    type="number"
                                    step="0.01"
                                    min="0"
                                    class="input input-bordered w-full"
                                    prop:value=move || tax_text.get()
                                    on:input=move |ev| {
                                        let raw = event_target_value(&ev);
                                        form.update(|f| f.set_tax(parse_amount(&raw)));
                                        tax_text.set(raw);
                                    }
                                />
                            </label>
                            <div class="form-control">
                                <span class="label-text">"Total"</span>
                                <div class="input input-bordered w-full flex items-center font-mono font-bold">
                                    {move || format_currency(form.with(|f| f.total()))}
                                </div>
                            </div>
                        </div>

                        <div class="grid gap-4 md:grid-cols-2">
                            <label class="form-control">
                                <span class="label-text">"Carpeta de auditoría"</span>
                                <input
                                    id="carpetaAuditoria"
                                    type="text"
                                    class="input input-bordered w-full"
                                    prop:value=move || form.with(|f| f.audit_folder.clone())
                                    on:input=move |ev| form.update(|f| f.audit_folder = event_target_value(&ev))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Observaciones"</span>
                                <textarea
                                    id="observaciones"
                                    class="textarea textarea-bordered w-full"
                                    prop:value=move || form.with(|f| f.notes.clone())
                                    on:input=move |ev| form.update(|f| f.notes = event_target_value(&ev))
                                ></textarea>
                            </label>
                        </div>

                        <div class="card-actions justify-end">
                            <button type="button" class="btn btn-ghost" disabled=move || saving.get() on:click=on_reset>
                                "Limpiar"
                            </button>
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                {move || if saving.get() {
                                    view! { <span class="loading loading-spinner"></span> "Guardando..." }.into_any()
                                } else {
                                    "Guardar evento".into_any()
                                }}
                            </button>
                        </div>
                    </div>
                </form>
            </div>

            {move || countdown.get().map(|left| view! {
                <div class="fixed inset-0 z-50 flex items-center justify-center bg-base-100/95">
                    <div class="text-center space-y-4">
                        <CheckCircle attr:class="h-16 w-16 text-success mx-auto" />
                        <h2 class="text-3xl font-bold">"Evento guardado"</h2>
                        <p class="text-base-content/70">
                            {format!("Regresando al menú en {} segundos...", left)}
                        </p>
                    </div>
                </div>
            })}
        </div>
    }
}
