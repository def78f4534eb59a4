//! テーマ切り替え
//!
//! localStorage に保存したテーマを読み込み時に適用し、
//! トグル操作のたびに保存し直す。

use crate::dom::{query, set_class};
use gloo::console::warn;
use gloo::events::EventListener;
use ocr_page_common::{PageConfig, PreferenceStore, Theme, ThemePreference};
use std::rc::Rc;
use web_sys::{HtmlInputElement, Storage};

/// localStorage（使えない環境では読み書きとも無視）
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            storage: gloo::utils::window().local_storage().ok().flatten(),
        }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                warn!(format!("テーマを保存できません: {}={}", key, value));
            }
        }
    }
}

/// テーマをページに反映
pub fn apply_theme(theme: Theme, dark_class: &str, toggle: Option<&HtmlInputElement>) {
    if let Some(root) = gloo::utils::document().document_element() {
        set_class(&root, dark_class, theme.is_dark());
    }
    if let Some(toggle) = toggle {
        toggle.set_checked(theme.is_dark());
    }
}

/// テーマトグル
pub struct ThemeSwitch {
    theme: Theme,
    _listener: Option<EventListener>,
}

impl ThemeSwitch {
    /// 保存済みテーマを適用し、トグルがあれば変更を監視する
    pub fn bind(config: &PageConfig) -> Self {
        let preference = Rc::new(ThemePreference::new(
            LocalStore::new(),
            config.storage_key.clone(),
        ));
        let toggle: Option<HtmlInputElement> =
            query(&gloo::utils::document(), &config.theme_switch_selector);

        let listener = toggle.as_ref().map(|toggle| {
            let preference = preference.clone();
            let dark_class = config.dark_class.clone();
            let target = toggle.clone();
            EventListener::new(toggle, "change", move |_| {
                let theme = Theme::from_checked(target.checked());
                preference.store(theme);
                apply_theme(theme, &dark_class, Some(&target));
            })
        });

        let theme = preference.load();
        apply_theme(theme, &config.dark_class, toggle.as_ref());

        Self {
            theme,
            _listener: listener,
        }
    }

    /// 読み込み時に適用したテーマ
    pub fn initial_theme(&self) -> Theme {
        self.theme
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_local_store_round_trip() {
        let store = LocalStore::new();
        store.set("ocr-page-test-theme", "dark");
        assert_eq!(store.get("ocr-page-test-theme").as_deref(), Some("dark"));

        let preference = ThemePreference::new(LocalStore::new(), "ocr-page-test-theme");
        assert_eq!(preference.load(), Theme::Dark);
        preference.store(Theme::Light);
        assert_eq!(preference.load(), Theme::Light);
    }

    #[wasm_bindgen_test]
    fn wasm_apply_theme_sets_root_class_and_toggle() {
        let document = gloo::utils::document();
        let toggle: HtmlInputElement = document
            .create_element("input")
            .unwrap()
            .dyn_into()
            .unwrap();
        toggle.set_type("checkbox");

        apply_theme(Theme::Dark, "dark-mode", Some(&toggle));
        let root = document.document_element().unwrap();
        assert!(root.class_list().contains("dark-mode"));
        assert!(toggle.checked());

        apply_theme(Theme::Light, "dark-mode", Some(&toggle));
        assert!(!root.class_list().contains("dark-mode"));
        assert!(!toggle.checked());
    }
}
