//! ファイル選択コンポーネント

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement};

#[component]
pub fn UploadArea<F>(on_file_selected: F) -> impl IntoView
where
    F: Fn(File) + 'static + Clone + Send,
{
    let on_change = move |ev: Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };

        // 先頭の1ファイルのみ扱う
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_file_selected(file);
        }
    };

    view! {
        <input
            type="file"
            accept="image/*"
            class="file-input"
            on:change=on_change
        />
    }
}
