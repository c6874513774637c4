//! 処理中インジケータ

use leptos::prelude::*;
use palm_leaf_ocr_common::{UploadState, PROCESSING_TEXT};

#[component]
pub fn ProcessingIndicator(state: ReadSignal<UploadState>) -> impl IntoView {
    view! {
        <Show when=move || state.with(|s| s.is_processing)>
            <p class="loading-text">{PROCESSING_TEXT}</p>
        </Show>
    }
}
