//! Tesseract.js連携
//!
//! index.htmlで読み込んだグローバルの `Tesseract.recognize` を呼び出す。
//! 進捗メッセージはブラウザのコンソールに出力する（開発者向け）。

use gloo::console;
use palm_leaf_ocr_common::{ImageSource, LanguageHints, Recognition, RecognizeError, Recognizer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, Url};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Tesseract, js_name = recognize, catch)]
    fn tesseract_recognize(
        image: &JsValue,
        langs: &str,
        options: &JsValue,
    ) -> Result<js_sys::Promise, JsValue>;
}

/// ユーザーが選択した画像とそのobject URL
pub struct SelectedFile {
    file: File,
    object_url: String,
}

impl SelectedFile {
    pub fn new(file: File) -> Result<Self, JsValue> {
        let object_url = Url::create_object_url_with_blob(&file)?;
        Ok(Self { file, object_url })
    }

    pub fn object_url(&self) -> &str {
        &self.object_url
    }
}

impl ImageSource for SelectedFile {
    fn preview_reference(&self) -> String {
        self.object_url.clone()
    }

    fn display_name(&self) -> String {
        self.file.name()
    }
}

#[derive(Default)]
pub struct TesseractJs;

impl Recognizer for TesseractJs {
    type Image = SelectedFile;

    async fn recognize(
        &self,
        image: &SelectedFile,
        hints: &LanguageHints,
    ) -> Result<Recognition, RecognizeError> {
        let logger = Closure::wrap(Box::new(move |message: JsValue| {
            console::log!(message);
        }) as Box<dyn FnMut(JsValue)>);

        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &JsValue::from_str("logger"), logger.as_ref())
            .map_err(js_error)?;

        let promise = tesseract_recognize(image.file.as_ref(), &hints.to_string(), &options)
            .map_err(js_error)?;
        let result = JsFuture::from(promise).await.map_err(js_error);

        // 認識が終わるまでloggerを生かしておく
        drop(logger);

        recognition_text(&result?)
    }
}

/// `{ data: { text } }` からテキストを取り出す
pub fn recognition_text(result: &JsValue) -> Result<Recognition, RecognizeError> {
    let data = js_sys::Reflect::get(result, &JsValue::from_str("data")).map_err(js_error)?;
    let text = js_sys::Reflect::get(&data, &JsValue::from_str("text"))
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| RecognizeError::Engine("result has no text".into()))?;
    Ok(Recognition { text })
}

fn js_error(value: JsValue) -> RecognizeError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value));
    RecognizeError::Engine(message)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn object(pairs: &[(&str, JsValue)]) -> JsValue {
        let obj = js_sys::Object::new();
        for (key, value) in pairs {
            js_sys::Reflect::set(&obj, &JsValue::from_str(key), value).unwrap();
        }
        obj.into()
    }

    #[wasm_bindgen_test]
    fn test_recognition_text() {
        let data = object(&[("text", JsValue::from_str("Ta ශ"))]);
        let result = object(&[("data", data)]);
        let recognition = recognition_text(&result).unwrap();
        assert_eq!(recognition.text, "Ta ශ");
    }

    #[wasm_bindgen_test]
    fn test_recognition_text_missing() {
        let data = object(&[("confidence", JsValue::from_f64(90.0))]);
        let result = object(&[("data", data)]);
        assert!(matches!(recognition_text(&result), Err(RecognizeError::Engine(_))));
    }

    #[wasm_bindgen_test]
    fn test_js_error_message() {
        let err = js_sys::Error::new("Error attempting to read image.");
        let converted = js_error(err.into());
        assert_eq!(converted, RecognizeError::Engine("Error attempting to read image.".into()));
    }
}
