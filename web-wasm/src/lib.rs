//! OCR Upload Page (WASM)
//!
//! サーバーが描画したページに対してイベントを結線する。

mod controller;
mod dom;
mod overlay;
mod search;
mod theme;
mod upload_area;

#[cfg(all(target_arch = "wasm32", test))]
mod test_util;

pub use controller::PageController;
pub use dom::PageError;

use gloo::console::warn;
use gloo::events::EventListener;
use ocr_page_common::PageConfig;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

/// 設定JSONを置く `<script type="application/json">` のID
const CONFIG_ELEMENT_ID: &str = "ocr-page-config";

thread_local! {
    static CONTROLLER: RefCell<Option<PageController>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let document = gloo::utils::document();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| mount()).forget();
    } else {
        mount();
    }
}

fn mount() {
    let controller = PageController::mount(load_config());
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
}

/// ページ埋め込みの設定を読む（なければデフォルト）
fn load_config() -> PageConfig {
    let Some(element) = gloo::utils::document().get_element_by_id(CONFIG_ELEMENT_ID) else {
        return PageConfig::default();
    };
    let json = element.text_content().unwrap_or_default();
    match PageConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            warn!(format!("設定を読み込めないのでデフォルトを使用: {}", e));
            PageConfig::default()
        }
    }
}
