//! OCRテキストの検索ハイライト
//!
//! 読み込み時のテキストを保持し、入力のたびにそこから描画し直す。
//! 一致部分以外もエスケープしたHTMLを差し込むので、OCRテキストが
//! HTMLとして解釈されることはない。

use gloo::console::debug;
use gloo::events::EventListener;
use ocr_page_common::{Highlighter, SearchMode};
use std::rc::Rc;
use web_sys::{HtmlElement, HtmlInputElement};

#[derive(Clone)]
pub struct SearchBox {
    input: Option<HtmlInputElement>,
    text_block: Option<HtmlElement>,
    original: Rc<str>,
    mode: SearchMode,
    highlight_class: Rc<str>,
}

impl SearchBox {
    /// テキストブロックの現在の内容を元テキストとして保持する
    pub fn new(
        input: Option<HtmlInputElement>,
        text_block: Option<HtmlElement>,
        mode: SearchMode,
        highlight_class: &str,
    ) -> Self {
        let original = text_block
            .as_ref()
            .and_then(|block| block.text_content())
            .unwrap_or_default();
        Self {
            input,
            text_block,
            original: original.into(),
            mode,
            highlight_class: highlight_class.into(),
        }
    }

    /// 検索欄とテキストブロックがそろっていれば入力を監視する
    pub fn bind(&self) -> Option<EventListener> {
        let input = self.input.as_ref()?;
        self.text_block.as_ref()?;

        let this = self.clone();
        Some(EventListener::new(input, "input", move |_| {
            let term = this.input.as_ref().map(|i| i.value()).unwrap_or_default();
            this.render(&term);
        }))
    }

    /// 検索語で描画し直す
    pub fn render(&self, term: &str) {
        let Some(block) = &self.text_block else {
            return;
        };

        let highlighter = match Highlighter::try_new(term, self.mode) {
            Ok(h) => h,
            Err(e) => {
                debug!(format!("検索パターンが不正なのでリテラル検索します: {}", e));
                Highlighter::new(term, SearchMode::Literal)
            }
        };

        if !highlighter.is_active() {
            block.set_text_content(Some(&*self.original));
            return;
        }

        let highlight = highlighter.highlight(&self.original);
        debug!(format!("検索 {:?}: {}件", term.trim(), highlight.match_count()));
        block.set_inner_html(&highlight.to_html(&self.highlight_class));
    }

    /// 検索欄を空にし、テキストを元に戻す
    pub fn restore(&self) {
        if let Some(input) = &self.input {
            input.set_value("");
        }
        if let Some(block) = &self.text_block {
            block.set_text_content(Some(&*self.original));
        }
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn search_box(text: &str) -> (SearchBox, HtmlInputElement, HtmlElement) {
        let document = gloo::utils::document();
        let input: HtmlInputElement = document
            .create_element("input")
            .unwrap()
            .dyn_into()
            .unwrap();
        let block: HtmlElement = document
            .create_element("pre")
            .unwrap()
            .dyn_into()
            .unwrap();
        block.set_text_content(Some(text));
        let search = SearchBox::new(
            Some(input.clone()),
            Some(block.clone()),
            SearchMode::Literal,
            "highlight",
        );
        (search, input, block)
    }

    #[wasm_bindgen_test]
    fn wasm_render_wraps_matches() {
        let (search, _, block) = search_box("The cat sat");
        search.render("CAT");
        assert_eq!(
            block.inner_html(),
            r#"The <span class="highlight">cat</span> sat"#
        );
        assert_eq!(block.text_content().as_deref(), Some("The cat sat"));
    }

    #[wasm_bindgen_test]
    fn wasm_repeated_searches_start_from_original() {
        let (search, _, block) = search_box("The cat sat with a dog");
        search.render("cat");
        search.render("dog");
        assert_eq!(block.query_selector_all("span").unwrap().length(), 1);

        search.render("");
        assert_eq!(block.inner_html(), "The cat sat with a dog");
    }

    #[wasm_bindgen_test]
    fn wasm_markup_in_text_is_not_interpreted() {
        let (search, _, block) = search_box("<b>bold</b>");
        search.render("bold");
        assert_eq!(block.query_selector_all("b").unwrap().length(), 0);
        assert_eq!(block.text_content().as_deref(), Some("<b>bold</b>"));
    }

    #[wasm_bindgen_test]
    fn wasm_restore_clears_field() {
        let (search, input, block) = search_box("The cat sat");
        input.set_value("cat");
        search.render("cat");
        search.restore();
        assert_eq!(input.value(), "");
        assert_eq!(block.inner_html(), "The cat sat");
    }
}
