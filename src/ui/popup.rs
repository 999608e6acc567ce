/// Popup UI for Tingly Deepwiki

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::chrome::{self, ActiveTab, ChromeStorage};
use crate::classify::{classify, UrlCategory};
use crate::config::HostConfig;
use crate::message::{dispatch, Request, Response};
use crate::saved_item::{SaveRequest, SavedItem};
use crate::storage::SavedItemStore;
use crate::ui::components::{SavedItemRow, ScannedUrlRow};

const URL_PREVIEW_CHARS: usize = 50;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Error(String),
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Pane {
    Switch,
    Scan,
    Saved,
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading("Reading current tab...".to_string()));
    let notice = use_state(|| None::<String>);
    let active_pane = use_state(|| Pane::Saved);
    let tab = use_state(|| None::<ActiveTab>);
    let category = use_state(|| None::<UrlCategory>);
    let scanned_urls = use_state(Vec::<String>::new);
    let saved_items = use_state(Vec::<SavedItem>::new);

    // Inspect the active tab and load saved items on mount
    {
        let state = state.clone();
        let active_pane = active_pane.clone();
        let tab = tab.clone();
        let category = category.clone();
        let saved_items = saved_items.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match chrome::active_tab().await {
                    Ok(current) => {
                        let current_category = classify(&current.url, &HostConfig::default());
                        active_pane.set(default_pane(&current_category));
                        category.set(Some(current_category));
                        tab.set(Some(current));
                    }
                    Err(e) => log::warn!("{}", e),
                }

                match load_saved().await {
                    Ok(items) => {
                        saved_items.set(items);
                        state.set(AppState::Idle);
                    }
                    Err(e) => state.set(AppState::Error(format!("Failed to load saved items: {}", e))),
                }
            });
            || ()
        });
    }

    // Open the current page's wiki target
    let on_switch = {
        let state = state.clone();
        let tab = tab.clone();

        Callback::from(move |_: MouseEvent| {
            let Some(current) = (*tab).clone() else {
                return;
            };
            let state = state.clone();

            spawn_local(async move {
                match navigate(current.url).await {
                    Ok(_) => close_popup(),
                    Err(e) => state.set(AppState::Error(e)),
                }
            });
        })
    };

    // Save the current repository or wiki page
    let on_save_current = {
        let state = state.clone();
        let notice = notice.clone();
        let tab = tab.clone();
        let category = category.clone();
        let saved_items = saved_items.clone();

        Callback::from(move |_: MouseEvent| {
            let (Some(current), Some(current_category)) = ((*tab).clone(), (*category).clone()) else {
                return;
            };
            let state = state.clone();
            let notice = notice.clone();
            let saved_items = saved_items.clone();

            state.set(AppState::Loading("Saving...".to_string()));

            spawn_local(async move {
                let hosts = HostConfig::default();
                let description = chrome::page_info(current.id).await.description(&hosts);

                let request = if current_category.is_repository() {
                    SaveRequest::repository_page(&current.url, description, &hosts)
                } else {
                    Some(SaveRequest::wiki_page(&current.url, &current.url, description))
                };
                let Some(request) = request else {
                    state.set(AppState::Error("This page cannot be saved".to_string()));
                    return;
                };

                match save(request).await {
                    Ok(items) => {
                        saved_items.set(items);
                        notice.set(Some(if current_category.is_repository() {
                            "GitHub repo saved to Deepwiki!".to_string()
                        } else {
                            "Deepwiki page saved!".to_string()
                        }));
                        state.set(AppState::Idle);
                    }
                    Err(e) => state.set(AppState::Error(format!("Save failed: {}", e))),
                }
            });
        })
    };

    // Scan the current page for repository links
    let on_scan = {
        let state = state.clone();
        let tab = tab.clone();
        let scanned_urls = scanned_urls.clone();

        Callback::from(move |_: MouseEvent| {
            let Some(current) = (*tab).clone() else {
                return;
            };
            let state = state.clone();
            let scanned_urls = scanned_urls.clone();

            state.set(AppState::Loading("Scanning...".to_string()));

            spawn_local(async move {
                match scan(current.id).await {
                    Ok(urls) => {
                        scanned_urls.set(urls);
                        state.set(AppState::Idle);
                    }
                    Err(e) => state.set(AppState::Error(e)),
                }
            });
        })
    };

    // Open a scanned repository's wiki page
    let on_open_scanned = {
        let state = state.clone();

        Callback::from(move |url: String| {
            let state = state.clone();
            spawn_local(async move {
                match navigate(url).await {
                    Ok(_) => close_popup(),
                    Err(e) => state.set(AppState::Error(e)),
                }
            });
        })
    };

    // Save a scanned repository
    let on_save_scanned = {
        let state = state.clone();
        let notice = notice.clone();
        let saved_items = saved_items.clone();

        Callback::from(move |url: String| {
            let state = state.clone();
            let notice = notice.clone();
            let saved_items = saved_items.clone();

            state.set(AppState::Loading("Saving...".to_string()));

            spawn_local(async move {
                match save(SaveRequest::scan_result(&url)).await {
                    Ok(items) => {
                        saved_items.set(items);
                        notice.set(Some("GitHub repo saved to Deepwiki!".to_string()));
                        state.set(AppState::Idle);
                    }
                    Err(e) => state.set(AppState::Error(format!("Save failed: {}", e))),
                }
            });
        })
    };

    // Delete a saved item
    let on_delete = {
        let state = state.clone();
        let notice = notice.clone();
        let saved_items = saved_items.clone();

        Callback::from(move |id: String| {
            let state = state.clone();
            let notice = notice.clone();
            let saved_items = saved_items.clone();

            state.set(AppState::Loading("Deleting...".to_string()));

            spawn_local(async move {
                match delete(id).await {
                    Ok(items) => {
                        saved_items.set(items);
                        notice.set(Some("Deleted successfully".to_string()));
                        state.set(AppState::Idle);
                    }
                    Err(e) => state.set(AppState::Error(format!("Delete failed: {}", e))),
                }
            });
        })
    };

    let is_busy = is_busy(&state);

    let on_pane_click = {
        let active_pane = active_pane.clone();
        let notice = notice.clone();
        move |pane: Pane| {
            let active_pane = active_pane.clone();
            let notice = notice.clone();
            Callback::from(move |_: MouseEvent| {
                notice.set(None);
                active_pane.set(pane);
            })
        }
    };

    let pane_class = |pane: Pane| {
        if *active_pane == pane { "pf-v5-c-tabs__item pf-m-current" } else { "pf-v5-c-tabs__item" }
    };

    let current_url = (*tab).as_ref().map(|t| t.url.clone()).unwrap_or_default();
    let can_save = (*category)
        .as_ref()
        .map(|c| c.is_repository() || c.is_wiki())
        .unwrap_or(false);
    let save_label = match &*category {
        Some(c) if c.is_repository() => "Save to Deepwiki",
        _ => "Save This Deepwiki",
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tingly Deepwiki"}</h1>

            // Pane navigation
            <div class="pf-v5-c-tabs tabs-nav">
                <ul class="pf-v5-c-tabs__list">
                    <li class={pane_class(Pane::Switch)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_pane_click(Pane::Switch)}>
                            <span class="pf-v5-c-tabs__item-text">{"Switch"}</span>
                        </button>
                    </li>
                    <li class={pane_class(Pane::Scan)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_pane_click(Pane::Scan)}>
                            <span class="pf-v5-c-tabs__item-text">{"Scan"}</span>
                        </button>
                    </li>
                    <li class={pane_class(Pane::Saved)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_pane_click(Pane::Saved)}>
                            <span class="pf-v5-c-tabs__item-text">{"Saved"}</span>
                        </button>
                    </li>
                </ul>
            </div>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            if let Some(message) = (*notice).clone() {
                <Alert r#type={AlertType::Success} title={message} inline={true}>
                </Alert>
            }

            // Pane content
            <div class="tab-pane-content">
                {match *active_pane {
                    Pane::Switch => html! {
                        <div class="flex-column-gap">
                            <p class="current-url">{truncate_url(&current_url, URL_PREVIEW_CHARS)}</p>
                            <Button onclick={on_switch} disabled={is_busy || current_url.is_empty()} variant={ButtonVariant::Primary} block={true}>
                                {"Open in Deepwiki"}
                            </Button>
                            if can_save {
                                <Button onclick={on_save_current} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                                    {save_label}
                                </Button>
                            }
                        </div>
                    },
                    Pane::Scan => html! {
                        <div class="flex-column-gap">
                            <Button onclick={on_scan} disabled={is_busy || tab.is_none()} variant={ButtonVariant::Primary} block={true}>
                                {"Scan Current Page"}
                            </Button>
                            if !scanned_urls.is_empty() {
                                <h3>{format!("Found URLs ({})", scanned_urls.len())}</h3>
                                <ul class="url-list">
                                    {for scanned_urls.iter().map(|url| html! {
                                        <ScannedUrlRow
                                            key={url.clone()}
                                            url={url.clone()}
                                            on_open={on_open_scanned.clone()}
                                            on_save={on_save_scanned.clone()}
                                            disabled={is_busy}
                                        />
                                    })}
                                </ul>
                            }
                        </div>
                    },
                    Pane::Saved => html! {
                        <div class="flex-column-gap">
                            <h3>{format!("Saved Deepwikis ({})", saved_items.len())}</h3>
                            if saved_items.is_empty() {
                                <p class="empty-state">{"No saved deepwikis yet"}</p>
                            } else {
                                <ul class="saved-list">
                                    {for saved_items.iter().map(|item| html! {
                                        <SavedItemRow
                                            key={item.id.clone()}
                                            item={item.clone()}
                                            on_delete={on_delete.clone()}
                                            disabled={is_busy}
                                        />
                                    })}
                                </ul>
                            }
                        </div>
                    },
                }}
            </div>

            <p class="footer-popup">
                {"Tingly Deepwiki v0.1.0"}
            </p>
        </div>
    }
}

/// Store round-trips in flight; actions stay disabled so writes never overlap
fn is_busy(state: &AppState) -> bool {
    matches!(state, AppState::Loading(_))
}

/// Pane to show first for the page the popup was opened on
fn default_pane(category: &UrlCategory) -> Pane {
    match category {
        UrlCategory::DerivedWiki(_) => Pane::Switch,
        UrlCategory::RepositoryOrigin { exact_repo_page: true, .. } => Pane::Switch,
        UrlCategory::RepositoryOrigin { .. } => Pane::Scan,
        UrlCategory::Other(_) => Pane::Saved,
    }
}

fn truncate_url(url: &str, max_chars: usize) -> String {
    if url.chars().count() > max_chars {
        format!("{}...", url.chars().take(max_chars).collect::<String>())
    } else {
        url.to_string()
    }
}

fn close_popup() {
    if let Some(window) = web_sys::window() {
        let _ = window.close();
    }
}

// Helper functions

fn store() -> SavedItemStore<ChromeStorage> {
    SavedItemStore::new(ChromeStorage)
}

async fn send(request: Request) -> Result<Response, String> {
    match dispatch(&store(), request).await {
        Response::Failure { message } => Err(message),
        response => Ok(response),
    }
}

async fn load_saved() -> Result<Vec<SavedItem>, String> {
    match send(Request::List).await? {
        Response::Items { items } => Ok(items),
        other => Err(format!("Unexpected response: {:?}", other)),
    }
}

async fn navigate(url: String) -> Result<(), String> {
    match send(Request::Switch { url }).await? {
        Response::Navigate { url } => chrome::open_tab(&url).await,
        other => Err(format!("Unexpected response: {:?}", other)),
    }
}

async fn scan(tab_id: i32) -> Result<Vec<String>, String> {
    let links = chrome::page_links(tab_id).await?;
    match send(Request::Scan { links }).await? {
        Response::Urls { urls } => Ok(urls),
        other => Err(format!("Unexpected response: {:?}", other)),
    }
}

async fn save(request: SaveRequest) -> Result<Vec<SavedItem>, String> {
    send(Request::Save(request)).await?;
    load_saved().await
}

async fn delete(id: String) -> Result<Vec<SavedItem>, String> {
    send(Request::Delete { id }).await?;
    load_saved().await
}
