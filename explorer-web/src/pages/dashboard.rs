use crate::api::{gateway, is_current};
use crate::components::preview_modal::PreviewModal;
use crate::download::download_csv;
use crate::models::history_list::{HistoryAction, HistoryList};
use client::export::{ExportTable, PREVIEW_CHARS, image_rows, search_rows, to_csv, truncate};
use i18nrs::yew::use_translation;
use shared::models::{HistoryItem, HistoryKind, ImageHistoryItem, SearchHistoryItem};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_icons::{Icon, IconId};

/// Dashboard page component
#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let (i18n, ..) = use_translation();
    let searches = use_reducer(HistoryList::<SearchHistoryItem>::default);
    let images = use_reducer(HistoryList::<ImageHistoryItem>::default);
    let preview = use_state(|| None::<SearchHistoryItem>);
    let notice = use_state(|| None::<String>);

    {
        let searches = searches.clone();
        let images = images.clone();
        let notice = notice.clone();
        use_effect_with((), move |_| {
            let generation = gateway().session().generation();
            spawn_local(async move {
                let gateway = gateway();
                let (search_result, image_result) =
                    futures::join!(gateway.search_history(), gateway.image_history());
                if !is_current(generation) {
                    return;
                }
                match search_result {
                    Ok(response) => searches.dispatch(HistoryAction::Loaded(response.search_history)),
                    Err(err) => notice.set(Some(err.message())),
                }
                match image_result {
                    Ok(response) => images.dispatch(HistoryAction::Loaded(response.image_history)),
                    Err(err) => notice.set(Some(err.message())),
                }
            });
            || ()
        });
    }

    let on_delete = {
        let searches = searches.clone();
        let images = images.clone();
        let notice = notice.clone();
        Callback::from(move |item: HistoryItem| {
            let searches = searches.clone();
            let images = images.clone();
            let notice = notice.clone();
            let generation = gateway().session().generation();
            spawn_local(async move {
                let gateway = gateway();
                let id = item.id();
                let result = match item.kind() {
                    HistoryKind::Search => gateway.delete_search(id).await,
                    HistoryKind::Image => gateway.delete_image(id).await,
                };
                if !is_current(generation) {
                    return;
                }
                match (result, item.kind()) {
                    (Ok(_), HistoryKind::Search) => searches.dispatch(HistoryAction::Remove(id)),
                    (Ok(_), HistoryKind::Image) => images.dispatch(HistoryAction::Remove(id)),
                    (Err(err), _) => notice.set(Some(err.message())),
                }
            });
        })
    };

    let export = {
        let notice = notice.clone();
        let no_data = i18n.t("dashboard.no_data");
        move |table: ExportTable, kind: HistoryKind| {
            let notice = notice.clone();
            let no_data = no_data.clone();
            Callback::from(move |_: MouseEvent| match to_csv(&table) {
                Some(csv) => {
                    if let Err(err) = download_csv(&csv, kind.export_file_name()) {
                        log::error!("export failed: {err:?}");
                    }
                }
                None => notice.set(Some(no_data.clone())),
            })
        }
    };

    let close_preview = {
        let preview = preview.clone();
        Callback::from(move |()| preview.set(None))
    };

    let delete_button = |item: HistoryItem| {
        let on_delete = on_delete.clone();
        let onclick = Callback::from(move |_: MouseEvent| on_delete.emit(item.clone()));
        html! {
            <button class="btn btn-ghost btn-xs" {onclick} title={i18n.t("dashboard.delete")}>
                <Icon icon_id={IconId::HeroiconsOutlineTrash} class="w-4 h-4" />
            </button>
        }
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{ i18n.t("dashboard.title") }</h1>
            if let Some(message) = &*notice {
                <div class="alert alert-warning"><span>{message.clone()}</span></div>
            }

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <div class="card bg-base-200 shadow-xl">
                    <div class="card-body">
                        <div class="flex justify-between items-center">
                            <h2 class="card-title">{ i18n.t("dashboard.search_history") }</h2>
                            <button
                                class="btn btn-sm btn-outline"
                                onclick={export(search_rows(&searches.items), HistoryKind::Search)}
                            >
                                <Icon icon_id={IconId::HeroiconsOutlineArrowDownTray} class="w-4 h-4" />
                                { i18n.t("dashboard.export") }
                            </button>
                        </div>
                        if searches.items.is_empty() {
                            <p class="text-base-content/60">{ i18n.t("dashboard.empty") }</p>
                        }
                        <ul class="space-y-2">
                            { for searches.items.iter().map(|item| {
                                let summary = truncate(&HistoryItem::from(item.clone()).summary(), PREVIEW_CHARS);
                                let on_view = {
                                    let preview = preview.clone();
                                    let item = item.clone();
                                    Callback::from(move |_: MouseEvent| preview.set(Some(item.clone())))
                                };
                                html! {
                                    <li key={item.id} class="flex justify-between gap-2 bg-base-100 p-2 rounded">
                                        <div>
                                            <div class="font-medium">{&item.query}</div>
                                            <div class="text-xs text-base-content/60">{summary}</div>
                                        </div>
                                        <div class="flex items-start">
                                            <button class="btn btn-ghost btn-xs" onclick={on_view} title={i18n.t("dashboard.view")}>
                                                <Icon icon_id={IconId::HeroiconsOutlineEye} class="w-4 h-4" />
                                            </button>
                                            {delete_button(item.clone().into())}
                                        </div>
                                    </li>
                                }
                            }) }
                        </ul>
                    </div>
                </div>

                <div class="card bg-base-200 shadow-xl">
                    <div class="card-body">
                        <div class="flex justify-between items-center">
                            <h2 class="card-title">{ i18n.t("dashboard.image_history") }</h2>
                            <button
                                class="btn btn-sm btn-outline"
                                onclick={export(image_rows(&images.items), HistoryKind::Image)}
                            >
                                <Icon icon_id={IconId::HeroiconsOutlineArrowDownTray} class="w-4 h-4" />
                                { i18n.t("dashboard.export") }
                            </button>
                        </div>
                        if images.items.is_empty() {
                            <p class="text-base-content/60">{ i18n.t("dashboard.empty") }</p>
                        }
                        <div class="grid grid-cols-2 gap-3">
                            { for images.items.iter().map(|item| {
                                let summary = HistoryItem::from(item.clone()).summary();
                                html! {
                                    <div key={item.id} class="bg-base-100 p-2 rounded">
                                        if let Some(src) = item.source() {
                                            <img src={src.to_string()} alt={summary.clone()} class="rounded" />
                                        }
                                        <div class="flex justify-between items-center mt-1">
                                            <span class="text-xs">{truncate(&summary, PREVIEW_CHARS)}</span>
                                            {delete_button(item.clone().into())}
                                        </div>
                                    </div>
                                }
                            }) }
                        </div>
                    </div>
                </div>
            </div>

            if let Some(item) = &*preview {
                <PreviewModal item={item.clone()} on_close={close_preview} />
            }
        </div>
    }
}
