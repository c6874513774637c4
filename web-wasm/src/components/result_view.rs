//! 認識結果の表示
//!
//! ハイライトされたセグメントは赤・太字で表示する。

use leptos::prelude::*;
use palm_leaf_ocr_common::{UploadState, HIGHLIGHT_STYLE};

#[component]
pub fn ResultView(state: ReadSignal<UploadState>) -> impl IntoView {
    let segments = move || {
        state
            .with(|s| s.display_segments())
            .into_iter()
            .map(|seg| {
                if seg.highlighted {
                    view! { <span style=HIGHLIGHT_STYLE>{seg.text}</span> }.into_any()
                } else {
                    view! { <span>{seg.text}</span> }.into_any()
                }
            })
            .collect_view()
    };

    view! {
        <div class="result-container">
            <h2 class="result-title">"Extracted Text:"</h2>
            <p class="result-text">{segments}</p>
        </div>
    }
}
