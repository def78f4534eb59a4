//! ページ操作の流れテスト
//!
//! テーマ保存・ファイル受付・検索ハイライトをブラウザなしで検証

use ocr_page_common::{
    FileIntake, Highlighter, IntakeView, MemoryStore, PageConfig, PreferenceStore, SearchMode,
    Segment, Selection, Theme, ThemePreference,
};
use std::rc::Rc;

/// 再読み込みをまたいで共有される localStorage の代わり
#[derive(Clone, Default)]
struct SharedStore(Rc<MemoryStore>);

impl PreferenceStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.0.set(key, value)
    }
}

/// ハイライトを元のテキストから描き直した結果（区間を連結）
///
/// DOM上の描き直し・リセットは `web-wasm` の `upload_area` / `search` の
/// wasm テスト（`wasm_reset_restores_initial_state` など）で検証する。
fn rendered(original: &str, term: &str) -> (usize, String) {
    let highlight = Highlighter::new(term, SearchMode::Literal).highlight(original);
    let text = highlight.segments().iter().map(|s| s.text()).collect();
    (highlight.match_count(), text)
}

/// テーマを切り替えて再読み込みすると同じテーマになる
#[test]
fn test_theme_survives_reload() {
    let store = SharedStore::default();
    let config = PageConfig::default();

    let page = ThemePreference::new(store.clone(), config.storage_key.clone());
    assert_eq!(page.load(), Theme::Light);
    page.store(Theme::from_checked(true));

    let reloaded = ThemePreference::new(store.clone(), config.storage_key.clone());
    assert_eq!(reloaded.load(), Theme::Dark);

    reloaded.store(Theme::from_checked(!reloaded.load().is_dark()));
    let reloaded_again = ThemePreference::new(store, config.storage_key);
    assert_eq!(reloaded_again.load(), Theme::Light);
}

/// 画像以外を選ぶと未選択と同じ状態になる
#[test]
fn test_non_image_selection_matches_initial_state() {
    let mut intake = FileIntake::default();
    let initial_view = intake.view();

    assert_eq!(intake.select("notes.txt", "text/plain"), Selection::Rejected);
    assert_eq!(intake.file_name(), None);
    assert_eq!(intake.preview(), None);
    assert_eq!(intake.view(), initial_view);
}

/// 画像を選んでプレビュー表示後にリセットすると初期状態に戻る
#[test]
fn test_select_then_reset_restores_intake() {
    let mut intake = FileIntake::new(PageConfig::default().intake_policy());

    let Selection::Accepted(ticket) = intake.select("page.jpg", "image/jpeg") else {
        panic!("jpeg should be accepted");
    };
    assert!(intake.complete(ticket, "data:image/jpeg;base64,AA==".into()));
    assert_eq!(intake.view(), IntakeView::Preview);

    intake.reset();

    assert_eq!(intake.file_name(), None);
    assert_eq!(intake.preview(), None);
    assert_eq!(intake.view(), IntakeView::Prompt);
}

/// "cat" は大文字小文字を問わず1回だけ囲まれる
#[test]
fn test_search_cat_wraps_exactly_once() {
    for text in ["The cat sat", "The Cat sat", "The CAT sat"] {
        let highlight = Highlighter::new("cat", SearchMode::Literal).highlight(text);
        assert_eq!(highlight.match_count(), 1);
        assert_eq!(highlight.segments()[1], Segment::Match(&text[4..7]));

        let html = highlight.to_html(&PageConfig::default().highlight_class);
        assert_eq!(html.matches(r#"<span class="highlight">"#).count(), 1);
    }
}

/// 検索欄を空にすると元のテキストに戻る
#[test]
fn test_clearing_search_restores_original() {
    let original = "The cat sat";
    assert_eq!(rendered(original, "cat").0, 1);

    let cleared = Highlighter::new("  ", SearchMode::Literal).highlight(original);
    assert_eq!(cleared.match_count(), 0);
    assert_eq!(cleared.to_html("highlight"), original);
}

/// 検索を繰り返しても前回のハイライトが残らない
#[test]
fn test_repeated_searches_do_not_compound() {
    let original = "The cat sat with a dog";

    for term in ["cat", "dog", "cat", ""] {
        let (count, text) = rendered(original, term);
        assert_eq!(count, usize::from(!term.is_empty()));
        assert_eq!(text, original);
    }

    // 前回の出力ではなく元テキストから作るので、マークアップ自体には一致しない
    assert_eq!(rendered(original, "span").0, 0);
    assert_eq!(rendered(original, "highlight").0, 0);
}

/// リセット後に完了した古い読み込みはプレビューを復活させない
#[test]
fn test_read_completing_after_reset_is_ignored() {
    let mut intake = FileIntake::default();
    let Selection::Accepted(ticket) = intake.select("slow.png", "image/png") else {
        panic!("png should be accepted");
    };
    intake.reset();

    assert!(!intake.complete(ticket, "data:image/png;base64,AA==".into()));
    assert_eq!(intake.view(), IntakeView::Prompt);
}

/// 設定の拡張子制限はサーバーの許可リストと同じ振る舞い
#[test]
fn test_extension_allow_list_from_config() {
    let config = PageConfig::from_json(r#"{"allowedExtensions": ["png", "jpg", "jpeg", "bmp"]}"#)
        .unwrap();
    let mut intake = FileIntake::new(config.intake_policy());

    assert!(matches!(intake.select("scan.bmp", "image/bmp"), Selection::Accepted(_)));
    assert_eq!(intake.select("anim.gif", "image/gif"), Selection::Rejected);
    assert_eq!(intake.file_name(), None);
}
