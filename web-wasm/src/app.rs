//! メインアプリケーションコンポーネント

use crate::components::{
    header::Header,
    image_preview::ImagePreview,
    processing_indicator::ProcessingIndicator,
    result_view::ResultView,
    upload_area::UploadArea,
};
use crate::ocr::{SelectedFile, TesseractJs};
use gloo::console;
use leptos::prelude::*;
use palm_leaf_ocr_common::{Controller, UploadState};
use std::rc::Rc;
use web_sys::{File, Url};

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // コントローラの状態をシグナルに反映
    let (state, set_state) = signal(UploadState::new());
    let controller = StoredValue::new_local(Rc::new(
        Controller::new(TesseractJs).with_observer(move |s: &UploadState| set_state.set(s.clone())),
    ));
    let last_object_url = StoredValue::new_local(None::<String>);

    // 画像選択ハンドラ
    let on_file_selected = move |file: File| {
        let selected = match SelectedFile::new(file) {
            Ok(selected) => selected,
            Err(e) => {
                console::error!("failed to create object URL", e);
                return;
            }
        };

        if let Some(old) = last_object_url.get_value() {
            let _ = Url::revoke_object_url(&old);
        }
        last_object_url.set_value(Some(selected.object_url().to_string()));

        let controller = controller.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            controller.select_image(&selected).await;
        });
    };

    view! {
        <div class="container">
            <Header />
            <UploadArea on_file_selected=on_file_selected />
            <ImagePreview state=state />
            <ProcessingIndicator state=state />
            <ResultView state=state />
        </div>
    }
}
