use eventdesk_shared::date::{format_input_date, parse_input_date};
use eventdesk_shared::listing::{FilterCriteria, ListingAction, ListingState, PAGE_SIZES};
use leptos::prelude::*;
use std::time::Duration;

/// 文本条件输入停止后多久再重新过滤
const DEBOUNCE_MS: u64 = 300;

fn order_status_value(status: Option<bool>) -> &'static str {
    match status {
        None => "",
        Some(true) => "con",
        Some(false) => "sin",
    }
}

fn parse_order_status(value: &str) -> Option<bool> {
    match value {
        "con" => Some(true),
        "sin" => Some(false),
        _ => None,
    }
}

#[component]
pub fn FilterBar(listing: RwSignal<ListingState>, operators: RwSignal<Vec<String>>) -> impl IntoView {
    let draft = RwSignal::new(listing.with_untracked(|l| l.criteria().clone()));
    let debounce = StoredValue::new(None::<TimeoutHandle>);

    let cancel_pending = move || {
        if let Some(handle) = debounce.get_value() {
            handle.clear();
        }
        debounce.set_value(None);
    };

    let apply_now = move || {
        cancel_pending();
        let criteria = draft.get_untracked();
        listing.update(|l| l.apply(ListingAction::SetFilters(criteria)));
    };

    let apply_later = move || {
        cancel_pending();
        let handle = set_timeout_with_handle(apply_now, Duration::from_millis(DEBOUNCE_MS)).ok();
        debounce.set_value(handle);
    };

    let edit_text = move |update: fn(&mut FilterCriteria, String), value: String| {
        draft.update(|c| update(c, value));
        apply_later();
    };

    let clear = move |_| {
        cancel_pending();
        draft.set(FilterCriteria::default());
        listing.update(|l| l.apply(ListingAction::ClearFilters));
    };

    let match_count = move || listing.with(|l| (l.filtered().len(), l.events().len()));

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body gap-4">
                <div class="grid gap-4 md:grid-cols-3">
                    <input
                        type="search"
                        class="input input-bordered w-full"
                        placeholder="Nombre del evento"
                        prop:value=move || draft.with(|c| c.name.clone())
                        on:input=move |ev| edit_text(|c, v| c.name = v, event_target_value(&ev))
                    />
                    <select
                        class="select select-bordered w-full"
                        prop:value=move || draft.with(|c| c.operator.clone())
                        on:change=move |ev| {
                            draft.update(|c| c.operator = event_target_value(&ev));
                            apply_now();
                        }
                    >
                        <option value="">"Todos los operadores"</option>
                        <For
                            each=move || operators.get()
                            key=|name| name.clone()
                            children=|name| view! { <option value=name.clone()>{name.clone()}</option> }
                        />
                    </select>
                    <input
                        type="search"
                        class="input input-bordered w-full"
                        placeholder="Número de factura"
                        prop:value=move || draft.with(|c| c.invoice_number.clone())
                        on:input=move |ev| edit_text(|c, v| c.invoice_number = v, event_target_value(&ev))
                    />
                </div>

                <div class="grid gap-4 md:grid-cols-4 items-end">
                    <label class="form-control">
                        <span class="label-text">"Desde"</span>
                        <input
                            type="date"
                            class="input input-bordered w-full"
                            prop:value=move || format_input_date(draft.with(|c| c.date_from))
                            on:change=move |ev| {
                                draft.update(|c| c.date_from = parse_input_date(&event_target_value(&ev)));
                                apply_now();
                            }
                        />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"Hasta"</span>
                        <input
                            type="date"
                            class="input input-bordered w-full"
                            prop:value=move || format_input_date(draft.with(|c| c.date_to))
                            on:change=move |ev| {
                                draft.update(|c| c.date_to = parse_input_date(&event_target_value(&ev)));
                                apply_now();
                            }
                        />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"Orden SRE"</span>
                        <select
                            class="select select-bordered w-full"
                            prop:value=move || order_status_value(draft.with(|c| c.order_status))
                            on:change=move |ev| {
                                draft.update(|c| c.order_status = parse_order_status(&event_target_value(&ev)));
                                apply_now();
                            }
                        >
                            <option value="">"Todos"</option>
                            <option value="con">"Con orden"</option>
                            <option value="sin">"Sin orden"</option>
                        </select>
                    </label>
                    <label class="form-control">
                        <span class="label-text">"Por página"</span>
                        <select
                            class="select select-bordered w-full"
                            prop:value=move || listing.with(|l| l.pagination().page_size.to_string())
                            on:change=move |ev| {
                                if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                                    listing.update(|l| l.apply(ListingAction::SetPageSize(size)));
                                }
                            }
                        >
                            {PAGE_SIZES
                                .into_iter()
                                .map(|size| view! { <option value=size.to_string()>{size}</option> })
                                .collect_view()}
                        </select>
                    </label>
                </div>

                <div class="flex items-center justify-between">
                    <span class="text-sm text-base-content/70">
                        {move || {
                            let (shown, total) = match_count();
                            format!("{} de {} eventos", shown, total)
                        }}
                    </span>
                    <button class="btn btn-ghost btn-sm" on:click=clear>"Limpiar filtros"</button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trip() {
        for status in [None, Some(true), Some(false)] {
            assert_eq!(parse_order_status(order_status_value(status)), status);
        }
        assert_eq!(parse_order_status("otro"), None);
    }
}
