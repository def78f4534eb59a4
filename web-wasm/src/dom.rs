//! DOM取得・操作ヘルパー

use gloo::console::debug;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

/// ページ操作エラー
#[derive(Error, Debug)]
pub enum PageError {
    #[error("要素が見つかりません: {0}")]
    MissingElement(String),

    #[error("要素の型が違います: {0}")]
    WrongType(String),

    #[error("JSエラー: {0}")]
    Js(String),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub type Result<T> = std::result::Result<T, PageError>;

/// IDで必須要素を取得
pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| PageError::MissingElement(format!("#{}", id)))?;
    element
        .dyn_into::<T>()
        .map_err(|_| PageError::WrongType(format!("#{}", id)))
}

/// IDで任意要素を取得（なければ None）
pub fn optional_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// セレクタで任意要素を取得
pub fn query<T: JsCast>(document: &Document, selector: &str) -> Option<T> {
    document
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<T>()
        .ok()
}

pub fn set_display(element: &HtmlElement, value: &str) {
    if let Err(e) = element.style().set_property("display", value) {
        debug!(format!("display を設定できません ({}): {}", value, PageError::from(e)));
    }
}

/// クラスの付け外し（空文字や空白を含むクラス名はログだけ出して無視）
pub fn set_class(element: &Element, class: &str, enabled: bool) {
    let list = element.class_list();
    let result = if enabled {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
    if let Err(e) = result {
        debug!(format!("クラス {:?} を変更できません: {}", class, PageError::from(e)));
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_by_id_reports_missing_and_wrong_type() {
        let document = gloo::utils::document();
        let div = document.create_element("div").unwrap();
        div.set_id("dom-test-div");
        gloo::utils::body().append_child(&div).unwrap();

        let missing = by_id::<HtmlElement>(&document, "dom-test-missing");
        assert!(matches!(missing, Err(PageError::MissingElement(_))));

        let wrong = by_id::<web_sys::HtmlInputElement>(&document, "dom-test-div");
        assert!(matches!(wrong, Err(PageError::WrongType(_))));

        assert!(optional_by_id::<HtmlElement>(&document, "dom-test-div").is_some());
        div.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_set_class_toggles() {
        let element = gloo::utils::document().create_element("div").unwrap();
        set_class(&element, "drag-over", true);
        assert!(element.class_list().contains("drag-over"));
        set_class(&element, "drag-over", false);
        assert!(!element.class_list().contains("drag-over"));
    }

    #[wasm_bindgen_test]
    fn wasm_invalid_class_name_is_ignored() {
        let element = gloo::utils::document().create_element("div").unwrap();
        element.set_class_name("active");

        set_class(&element, "", true);
        set_class(&element, "drag over", true);
        set_class(&element, "drag over", false);
        assert_eq!(element.class_name(), "active");
    }

    #[wasm_bindgen_test]
    fn wasm_set_display() {
        let element: HtmlElement = gloo::utils::document()
            .create_element("div")
            .unwrap()
            .dyn_into()
            .unwrap();
        set_display(&element, "flex");
        assert_eq!(
            element.style().get_property_value("display").unwrap(),
            "flex"
        );
        set_display(&element, "none");
        assert_eq!(
            element.style().get_property_value("display").unwrap(),
            "none"
        );
    }
}
