//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <h1 class="title">"Palm-leaf Manuscript OCR"</h1>
    }
}
