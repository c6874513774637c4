//! 画像プレビュー

use leptos::prelude::*;
use palm_leaf_ocr_common::UploadState;

#[component]
pub fn ImagePreview(state: ReadSignal<UploadState>) -> impl IntoView {
    let preview = move || state.with(|s| s.preview.clone());

    view! {
        <Show when=move || preview().is_some()>
            <img
                src=move || preview().unwrap_or_default()
                alt="Uploaded"
                class="uploaded-image"
            />
        </Show>
    }
}
