use crate::components::icons::{Eye, PencilSquare, Trash2};
use eventdesk_shared::Event;
use eventdesk_shared::editor::EditorMode;
use eventdesk_shared::format::{format_currency, format_date, or_not_available};
use eventdesk_shared::listing::{ListingAction, ListingState, PageItem};
use leptos::prelude::*;

fn date_range(event: &Event) -> String {
    match event.distinct_end_date() {
        Some(end) if event.start_date.is_some() => {
            format!("{} - {}", format_date(event.start_date), format_date(Some(end)))
        }
        Some(end) => format_date(Some(end)),
        None => format_date(event.start_date),
    }
}

#[component]
pub fn EventTable(
    listing: RwSignal<ListingState>,
    loading: ReadSignal<bool>,
    on_open: Callback<(String, EditorMode)>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let go_to = move |page: usize| listing.update(|l| l.apply(ListingAction::GoToPage(page)));

    let rows = move || listing.with(|l| l.page_items().to_vec());
    let is_empty = move || listing.with(|l| l.is_loaded() && l.filtered().is_empty());

    let range_label = move || {
        listing.with(|l| {
            let total = l.filtered().len();
            let range = l.pagination().range(total);
            if total == 0 {
                String::new()
            } else {
                format!("Mostrando {}-{} de {}", range.start + 1, range.end, total)
            }
        })
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Número"</th>
                                <th>"Evento"</th>
                                <th class="hidden md:table-cell">"Operador"</th>
                                <th>"Fechas"</th>
                                <th class="hidden md:table-cell">"Factura"</th>
                                <th class="hidden md:table-cell">"Orden SRE"</th>
                                <th class="text-right">"Total"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || loading.get() && !listing.with(|l| l.is_loaded())>
                                <tr>
                                    <td colspan="8" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " Cargando eventos..."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=is_empty>
                                <tr>
                                    <td colspan="8" class="text-center py-8 text-base-content/50">
                                        "No se encontraron eventos"
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=rows
                                key=|event| (event.id.clone(), event.updated_at)
                                children=move |event| {
                                    let view_id = event.id.clone();
                                    let edit_id = event.id.clone();
                                    let delete_id = event.id.clone();
                                    view! {
                                        <tr>
                                            <td class="font-mono text-sm">{or_not_available(&event.number).to_string()}</td>
                                            <td class="font-bold">{event.name.clone()}</td>
                                            <td class="hidden md:table-cell">{or_not_available(&event.operator).to_string()}</td>
                                            <td class="whitespace-nowrap">{date_range(&event)}</td>
                                            <td class="hidden md:table-cell font-mono text-sm">
                                                {or_not_available(event.primary_invoice_number()).to_string()}
                                            </td>
                                            <td class="hidden md:table-cell">
                                                {if event.has_order {
                                                    view! { <span class="badge badge-success">{event.folio.clone()}</span> }.into_any()
                                                } else {
                                                    view! { <span class="badge badge-ghost">"Sin orden"</span> }.into_any()
                                                }}
                                            </td>
                                            <td class="text-right font-mono">{format_currency(event.display_total())}</td>
                                            <td class="whitespace-nowrap">
                                                <button
                                                    class="btn btn-ghost btn-xs btn-square"
                                                    title="Ver"
                                                    on:click=move |_| on_open.run((view_id.clone(), EditorMode::ReadOnly))
                                                >
                                                    <Eye attr:class="h-4 w-4" />
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-xs btn-square"
                                                    title="Editar"
                                                    on:click=move |_| on_open.run((edit_id.clone(), EditorMode::Editable))
                                                >
                                                    <PencilSquare attr:class="h-4 w-4" />
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-xs btn-square text-error"
                                                    title="Eliminar"
                                                    on:click=move |_| on_delete.run(delete_id.clone())
                                                >
                                                    <Trash2 attr:class="h-4 w-4" />
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>

                <div class="flex flex-col md:flex-row items-center justify-between gap-2 p-4">
                    <span class="text-sm text-base-content/70">{range_label}</span>
                    <div class="join">
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || listing.with(|l| l.pagination().page <= 1)
                            on:click=move |_| go_to(listing.with_untracked(|l| l.pagination().page.saturating_sub(1)))
                        >
                            "«"
                        </button>
                        {move || {
                            let current = listing.with(|l| l.pagination().page);
                            listing
                                .with(|l| l.page_window())
                                .into_iter()
                                .map(|item| match item {
                                    PageItem::Page(page) => view! {
                                        <button
                                            class=if page == current { "join-item btn btn-sm btn-active" } else { "join-item btn btn-sm" }
                                            on:click=move |_| go_to(page)
                                        >
                                            {page}
                                        </button>
                                    }
                                    .into_any(),
                                    PageItem::Ellipsis => view! {
                                        <button class="join-item btn btn-sm btn-disabled">"…"</button>
                                    }
                                    .into_any(),
                                })
                                .collect_view()
                        }}
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || listing.with(|l| l.pagination().page >= l.page_count())
                            on:click=move |_| go_to(listing.with_untracked(|l| l.pagination().page + 1))
                        >
                            "»"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_shared::chrono::NaiveDate;

    #[test]
    fn test_date_range() {
        let mut event = Event {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            ..Default::default()
        };
        assert_eq!(date_range(&event), "15/03/2024");

        event.end_date = NaiveDate::from_ymd_opt(2024, 3, 17);
        assert_eq!(date_range(&event), "15/03/2024 - 17/03/2024");

        event.start_date = None;
        assert_eq!(date_range(&event), "17/03/2024");

        event.end_date = None;
        assert_eq!(date_range(&event), "N/A");
    }
}
