/// Reusable UI components

use crate::saved_item::SavedItem;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ScannedUrlRowProps {
    pub url: String,
    pub on_open: Callback<String>,
    pub on_save: Callback<String>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(ScannedUrlRow)]
pub fn scanned_url_row(props: &ScannedUrlRowProps) -> Html {
    let on_open = {
        let url = props.url.clone();
        let on_open = props.on_open.clone();
        Callback::from(move |_: MouseEvent| on_open.emit(url.clone()))
    };
    let on_save = {
        let url = props.url.clone();
        let on_save = props.on_save.clone();
        Callback::from(move |_: MouseEvent| on_save.emit(url.clone()))
    };

    html! {
        <li class="url-row">
            <span class="url-text">{&props.url}</span>
            <div class="saved-actions">
                <Button onclick={on_open} disabled={props.disabled} variant={ButtonVariant::Link}>
                    {"Open"}
                </Button>
                <Button onclick={on_save} disabled={props.disabled} variant={ButtonVariant::Secondary}>
                    {"Save"}
                </Button>
            </div>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct SavedItemRowProps {
    pub item: SavedItem,
    pub on_delete: Callback<String>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(SavedItemRow)]
pub fn saved_item_row(props: &SavedItemRowProps) -> Html {
    let item = &props.item;

    let on_delete = {
        let id = item.id.clone();
        let on_delete = props.on_delete.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(id.clone()))
    };

    html! {
        <li class="saved-row">
            <div class="saved-item">
                <span class="saved-title" title={item.display_url.clone()}>{&item.title}</span>
                if let Some(description) = &item.description {
                    <span class="saved-description">{description}</span>
                }
                <span class="saved-date">{item.saved_at.format("%Y-%m-%d").to_string()}</span>
            </div>
            <div class="saved-actions">
                <a href={item.url.clone()} target="_blank" rel="noopener noreferrer">{"Open"}</a>
                <Button onclick={on_delete} disabled={props.disabled} variant={ButtonVariant::Danger}>
                    {"Delete"}
                </Button>
            </div>
        </li>
    }
}
