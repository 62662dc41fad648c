//! 事件编辑弹窗
//!
//! 弹窗只在打开/关闭时重建；字段和发票行各自订阅 `EditorState` 的一小部分，
//! 输入时不会丢失焦点。

use crate::components::icons::{Plus, Trash2};
use crate::components::notification::use_notice;
use eventdesk_shared::Invoice;
use eventdesk_shared::date::{format_input_date, parse_input_date};
use eventdesk_shared::editor::{DateField, EditField, EditorAction, EditorMode, EditorState};
use eventdesk_shared::format::{format_currency, format_timestamp, parse_amount};
use eventdesk_shared::invoice::{FinancialSummary, InvoiceEdit};
use leptos::prelude::*;

/// 普通文本输入的字段（操作员用下拉框，备注用多行文本）
const TEXT_FIELDS: [EditField; 6] = [
    EditField::Number,
    EditField::Name,
    EditField::Zone,
    EditField::City,
    EditField::Folio,
    EditField::AuditFolder,
];

#[component]
pub fn EditModal(
    editing: RwSignal<Option<EditorState>>,
    operators: RwSignal<Vec<String>>,
    saving: ReadSignal<bool>,
    on_save: Callback<()>,
) -> impl IntoView {
    let notice = use_notice();

    let dispatch = move |action: EditorAction| {
        let mut outcome = Ok(());
        editing.update(|e| {
            if let Some(state) = e.as_mut() {
                outcome = state.apply(action);
            }
        });
        if let Err(err) = outcome {
            notice.warning(err.to_string());
        }
    };

    let read_only = move || {
        editing.with(|e| e.as_ref().map(|s| s.mode().is_read_only()).unwrap_or(true))
    };
    let text_value = move |field: EditField| {
        editing.with(|e| {
            e.as_ref()
                .map(|s| field.value(s.draft()).to_string())
                .unwrap_or_default()
        })
    };
    let date_value = move |field: DateField| {
        editing.with(|e| {
            let draft = e.as_ref().map(|s| s.draft());
            let date = match field {
                DateField::Start => draft.and_then(|d| d.start_date),
                DateField::End => draft.and_then(|d| d.end_date),
            };
            format_input_date(date)
        })
    };
    let summary = move || {
        editing.with(|e| e.as_ref().map(|s| s.summary()).unwrap_or_default())
    };
    let row_seqs = move || {
        editing.with(|e| {
            e.as_ref()
                .map(|s| s.invoices().rows().iter().map(|r| r.seq).collect::<Vec<_>>())
                .unwrap_or_default()
        })
    };

    let close = move |_| editing.set(None);
    let enable_editing = move |_| {
        editing.update(|e| {
            if let Some(state) = e.as_mut() {
                state.set_mode(EditorMode::Editable);
            }
        })
    };

    view! {
        <Show when=move || editing.with(Option::is_some)>
            <div class="modal modal-open">
                <div class="modal-box w-11/12 max-w-5xl space-y-4">
                    <div class="flex items-center justify-between">
                        <h3 class="font-bold text-lg">
                            {move || text_value(EditField::Name)}
                        </h3>
                        <Show when=read_only>
                            <span class="badge badge-outline">"Solo lectura"</span>
                        </Show>
                    </div>
                    <p class="text-xs text-base-content/60">
                        {move || editing.with(|e| {
                            let draft = e.as_ref().map(|s| s.draft());
                            format!(
                                "Creado: {} · Actualizado: {}",
                                format_timestamp(draft.and_then(|d| d.created_at)),
                                format_timestamp(draft.and_then(|d| d.updated_at)),
                            )
                        })}
                    </p>

                    <div class="grid gap-4 md:grid-cols-3">
                        {TEXT_FIELDS
                            .into_iter()
                            .map(move |field| view! {
                                <label class="form-control">
                                    <span class="label-text">{field.label()}</span>
                                    <input
                                        id=format!("edit-{}", field.key())
                                        type="text"
                                        class="input input-bordered input-sm w-full"
                                        disabled=read_only
                                        prop:value=move || text_value(field)
                                        on:input=move |ev| dispatch(EditorAction::SetText(field, event_target_value(&ev)))
                                    />
                                </label>
                            })
                            .collect_view()}
                        <label class="form-control">
                            <span class="label-text">{EditField::Operator.label()}</span>
                            <select
                                id=format!("edit-{}", EditField::Operator.key())
                                class="select select-bordered select-sm w-full"
                                disabled=read_only
                                prop:value=move || text_value(EditField::Operator)
                                on:change=move |ev| dispatch(EditorAction::SetText(EditField::Operator, event_target_value(&ev)))
                            >
                                <option value="">"Seleccione un operador"</option>
                                // 已停用的操作员仍保留在选项中
                                {move || {
                                    let current = text_value(EditField::Operator);
                                    let mut names = operators.get();
                                    if !current.is_empty() && !names.contains(&current) {
                                        names.push(current);
                                    }
                                    names
                                        .into_iter()
                                        .map(|name| view! { <option value=name.clone()>{name.clone()}</option> })
                                        .collect_view()
                                }}
                            </select>
                        </label>
                        {[(DateField::Start, "Fecha de inicio"), (DateField::End, "Fecha final")]
                            .into_iter()
                            .map(move |(field, label)| view! {
                                <label class="form-control">
                                    <span class="label-text">{label}</span>
                                    <input
                                        id=format!("edit-{}", field.key())
                                        type="date"
                                        class="input input-bordered input-sm w-full"
                                        disabled=read_only
                                        prop:value=move || date_value(field)
                                        on:change=move |ev| dispatch(EditorAction::SetDate(field, parse_input_date(&event_target_value(&ev))))
                                    />
                                </label>
                            })
                            .collect_view()}
                        <label class="label cursor-pointer justify-start gap-3">
                            <input
                                type="checkbox"
                                class="checkbox checkbox-primary checkbox-sm"
                                disabled=read_only
                                prop:checked=move || editing.with(|e| e.as_ref().is_some_and(|s| s.draft().has_order))
                                on:change=move |ev| dispatch(EditorAction::SetHasOrder(event_target_checked(&ev)))
                            />
                            <span class="label-text">"Tiene orden SRE"</span>
                        </label>
                    </div>

                    <label class="form-control">
                        <span class="label-text">{EditField::Notes.label()}</span>
                        <textarea
                            class="textarea textarea-bordered textarea-sm w-full"
                            disabled=read_only
                            prop:value=move || text_value(EditField::Notes)
                            on:input=move |ev| dispatch(EditorAction::SetText(EditField::Notes, event_target_value(&ev)))
                        ></textarea>
                    </label>

                    <div class="divider">"Facturas"</div>

                    <div class="overflow-x-auto">
                        <table class="table table-sm">
                            <thead>
                                <tr>
                                    <th>"#"</th>
                                    <th>"Fecha"</th>
                                    <th>"Número"</th>
                                    <th>"Subtotal"</th>
                                    <th>"IVA %"</th>
                                    <th class="text-right">"Total"</th>
                                    <th>"No pagada"</th>
                                    <th>"Pagada"</th>
                                    <th>"Comentario"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=row_seqs
                                    key=|seq| *seq
                                    children=move |seq| view! {
                                        <InvoiceRowView
                                            seq=seq
                                            editing=editing
                                            read_only=Signal::derive(read_only)
                                            dispatch=Callback::new(dispatch)
                                        />
                                    }
                                />
                            </tbody>
                        </table>
                    </div>

                    <Show when=move || !read_only()>
                        <button class="btn btn-outline btn-sm gap-2" on:click=move |_| dispatch(EditorAction::AddInvoice)>
                            <Plus attr:class="h-4 w-4" /> "Agregar factura"
                        </button>
                    </Show>

                    <div class="grid gap-4 md:grid-cols-2">
                        <label class="form-control">
                            <span class="label-text">"Subtotal del evento"</span>
                            <input
                                type="number"
                                step="0.01"
                                class="input input-bordered input-sm w-full"
                                disabled=read_only
                                prop:value=move || editing.with(|e| e.as_ref().map(|s| s.invoices().manual_subtotal()).unwrap_or_default().to_string())
                                on:change=move |ev| dispatch(EditorAction::SetSubtotal(parse_amount(&event_target_value(&ev))))
                            />
                        </label>
                        <label class="form-control">
                            <span class="label-text">"IVA del evento"</span>
                            <input
                                type="number"
                                step="0.01"
                                class="input input-bordered input-sm w-full"
                                disabled=read_only
                                prop:value=move || editing.with(|e| e.as_ref().map(|s| s.invoices().manual_tax()).unwrap_or_default().to_string())
                                on:change=move |ev| dispatch(EditorAction::SetTax(parse_amount(&event_target_value(&ev))))
                            />
                        </label>
                    </div>

                    <SummaryPanel summary=Signal::derive(summary) />

                    <div class="modal-action">
                        <button class="btn btn-ghost" disabled=move || saving.get() on:click=close>"Cerrar"</button>
                        {move || if read_only() {
                            view! { <button class="btn btn-primary" on:click=enable_editing>"Editar"</button> }.into_any()
                        } else {
                            view! {
                                <button class="btn btn-primary" disabled=move || saving.get() on:click=move |_| on_save.run(())>
                                    {move || if saving.get() {
                                        view! { <span class="loading loading-spinner"></span> "Guardando..." }.into_any()
                                    } else {
                                        "Guardar cambios".into_any()
                                    }}
                                </button>
                            }
                            .into_any()
                        }}
                    </div>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn InvoiceRowView(
    seq: u32,
    editing: RwSignal<Option<EditorState>>,
    read_only: Signal<bool>,
    dispatch: Callback<EditorAction>,
) -> impl IntoView {
    let invoice = move || {
        editing.with(|e| {
            e.as_ref()
                .and_then(|s| s.invoices().get(seq).cloned())
                .unwrap_or_default()
        })
    };
    let edit = move |change: InvoiceEdit| dispatch.run(EditorAction::EditInvoice(seq, change));

    view! {
        <tr>
            <td class="font-mono">{seq}</td>
            <td>
                <input
                    type="date"
                    class="input input-bordered input-xs"
                    disabled=read_only
                    prop:value=move || format_input_date(invoice().date)
                    on:change=move |ev| edit(InvoiceEdit::Date(parse_input_date(&event_target_value(&ev))))
                />
            </td>
            <td>
                <input
                    type="text"
                    class="input input-bordered input-xs w-28"
                    disabled=read_only
                    prop:value=move || invoice().number
                    on:input=move |ev| edit(InvoiceEdit::Number(event_target_value(&ev)))
                />
            </td>
            <td>
                <input
                    type="number"
                    step="0.01"
                    class="input input-bordered input-xs w-28"
                    disabled=read_only
                    prop:value=move || invoice().subtotal.to_string()
                    on:change=move |ev| edit(InvoiceEdit::Subtotal(parse_amount(&event_target_value(&ev))))
                />
            </td>
            <td>
                <input
                    type="number"
                    step="0.01"
                    class="input input-bordered input-xs w-20"
                    disabled=read_only
                    prop:value=move || invoice().rate.to_string()
                    on:change=move |ev| edit(InvoiceEdit::Rate(parse_amount(&event_target_value(&ev))))
                />
            </td>
            <td class="text-right font-mono">{move || format_currency(Invoice::total(&invoice()))}</td>
            <td>
                <input
                    type="checkbox"
                    class="checkbox checkbox-warning checkbox-xs"
                    disabled=read_only
                    prop:checked=move || invoice().status.is_unpaid()
                    on:change=move |ev| edit(InvoiceEdit::Unpaid(event_target_checked(&ev)))
                />
            </td>
            <td>
                <input
                    type="checkbox"
                    class="checkbox checkbox-success checkbox-xs"
                    disabled=read_only
                    prop:checked=move || invoice().status.is_paid()
                    on:change=move |ev| edit(InvoiceEdit::Paid(event_target_checked(&ev)))
                />
            </td>
            <td>
                <input
                    type="text"
                    class="input input-bordered input-xs w-40"
                    disabled=read_only
                    prop:value=move || invoice().comment
                    on:input=move |ev| edit(InvoiceEdit::Comment(event_target_value(&ev)))
                />
            </td>
            <td>
                <Show when=move || !read_only.get()>
                    <button
                        class="btn btn-ghost btn-xs btn-square text-error"
                        title="Eliminar factura"
                        on:click=move |_| dispatch.run(EditorAction::RemoveInvoice(seq))
                    >
                        <Trash2 attr:class="h-4 w-4" />
                    </button>
                </Show>
            </td>
        </tr>
    }
}

#[component]
fn SummaryPanel(summary: Signal<FinancialSummary>) -> impl IntoView {
    view! {
        <div class="stats stats-vertical md:stats-horizontal shadow w-full">
            <div class="stat">
                <div class="stat-title">"Pagado"</div>
                <div class="stat-value text-success text-lg">{move || format_currency(summary.get().total_paid)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Facturado no pagado"</div>
                <div class="stat-value text-warning text-lg">{move || format_currency(summary.get().total_unpaid)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Pendiente de facturar"</div>
                <div class="stat-value text-error text-lg">{move || format_currency(summary.get().pending_to_invoice)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Total del evento"</div>
                <div class="stat-value text-lg">{move || format_currency(summary.get().grand_total)}</div>
            </div>
        </div>
    }
}
