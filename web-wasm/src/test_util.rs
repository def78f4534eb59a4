//! wasm テスト用のDOMヘルパー

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DataTransfer, File, FilePropertyBag};

/// 文書に追加しない要素を作る
pub fn create<T: JsCast>(tag: &str) -> T {
    gloo::utils::document()
        .create_element(tag)
        .unwrap()
        .dyn_into()
        .unwrap()
}

/// 指定のMIMEタイプを持つファイル
pub fn file(name: &str, mime: &str) -> File {
    let parts = js_sys::Array::of1(&JsValue::from_str("bytes"));
    let options = FilePropertyBag::new();
    options.set_type(mime);
    File::new_with_str_sequence_and_options(&parts, name, &options).unwrap()
}

/// ファイルを1つ入れた DataTransfer（ドロップの再現用）
pub fn transfer_with(file: &File) -> DataTransfer {
    let transfer = DataTransfer::new().unwrap();
    transfer.items().add_with_file(file).unwrap();
    transfer
}
