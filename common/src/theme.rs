//! テーマ設定（ライト / ダーク）
//!
//! 保存値は `"light"` / `"dark"` の生文字列。`"dark"` 以外はすべてライト扱い。

use std::cell::RefCell;
use std::collections::HashMap;

/// テーマ保存キーのデフォルト
pub const THEME_STORAGE_KEY: &str = "theme";

/// 表示テーマ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// 保存値から復元（未保存・不明値はライト）
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// トグルのチェック状態から決定
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

/// キー・バリュー形式の設定保存先
///
/// ブラウザでは localStorage、テストではメモリ上のマップを使う。
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// メモリ上の保存先
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// 保存先に対するテーマの読み書き
pub struct ThemePreference<S: PreferenceStore> {
    store: S,
    key: String,
}

impl<S: PreferenceStore> ThemePreference<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// 保存済みテーマを読み込む（デフォルト: ライト）
    pub fn load(&self) -> Theme {
        Theme::from_stored(self.store.get(&self.key).as_deref())
    }

    pub fn store(&self, theme: Theme) {
        self.store.set(&self.key, theme.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored_defaults_to_light() {
        assert_eq!(Theme::from_stored(None), Theme::Light);
        assert_eq!(Theme::from_stored(Some("light")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("Dark")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
    }

    #[test]
    fn test_from_checked() {
        assert_eq!(Theme::from_checked(true), Theme::Dark);
        assert_eq!(Theme::from_checked(false), Theme::Light);
    }

    #[test]
    fn test_load_without_saved_value() {
        let pref = ThemePreference::new(MemoryStore::default(), THEME_STORAGE_KEY);
        assert_eq!(pref.load(), Theme::Light);
    }

    #[test]
    fn test_store_then_load() {
        let pref = ThemePreference::new(MemoryStore::default(), THEME_STORAGE_KEY);
        pref.store(Theme::Dark);
        assert_eq!(pref.load(), Theme::Dark);
        pref.store(Theme::Light);
        assert_eq!(pref.load(), Theme::Light);
    }

    #[test]
    fn test_memory_store_keeps_raw_string() {
        let store = MemoryStore::default();
        store.set(THEME_STORAGE_KEY, Theme::Dark.as_str());
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }
}
