//! アップロードエリア
//!
//! ファイル選択ダイアログ・ドロップ・リセットを扱う。
//! ドロップしたファイルは input 要素に自動で入らないので、
//! DataTransfer 経由で input の files に入れ直してフォーム送信に載せる。

use crate::dom::{query, set_class, set_display, Result};
use crate::search::SearchBox;
use gloo::console::{debug, error, warn};
use gloo::events::{EventListener, EventListenerOptions};
use ocr_page_common::{preview, FileIntake, IntakeView, PageConfig, ReadTicket, Selection};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DataTransfer, DragEvent, Element, File, HtmlElement, HtmlImageElement, HtmlInputElement};

/// アップロードエリアを構成する要素
pub struct UploadElements {
    pub file_input: HtmlInputElement,
    pub file_name: HtmlElement,
    pub preview: HtmlImageElement,
    pub drop_zone: HtmlElement,
}

#[derive(Clone)]
pub struct UploadArea {
    elements: Rc<UploadElements>,
    state: Rc<RefCell<FileIntake>>,
    search: SearchBox,
    config: Rc<PageConfig>,
}

impl UploadArea {
    pub fn new(elements: UploadElements, search: SearchBox, config: Rc<PageConfig>) -> Self {
        let state = FileIntake::new(config.intake_policy());
        Self {
            elements: Rc::new(elements),
            state: Rc::new(RefCell::new(state)),
            search,
            config,
        }
    }

    pub fn has_file(&self) -> bool {
        self.elements
            .file_input
            .files()
            .map(|files| files.length() > 0)
            .unwrap_or(false)
    }

    /// 選択・ドロップされたファイルを受け付ける
    pub fn handle_file(&self, file: File) {
        let name = file.name();
        let mime = file.type_();
        let selection = self.state.borrow_mut().select(&name, &mime);

        match selection {
            Selection::Rejected => {
                debug!(format!("画像ではないファイルを無視: {} ({})", name, mime));
                self.reset_view();
            }
            Selection::Accepted(ticket) => {
                self.clear_results();
                self.reset_view();
                if let Err(e) = self.sync_input(&file) {
                    warn!(format!("input要素へのファイル設定に失敗: {}", e));
                }
                self.start_read(file, ticket);
            }
        }
    }

    /// 初期状態に戻す
    pub fn reset(&self) {
        self.state.borrow_mut().reset();
        self.reset_view();
    }

    /// input・検索欄を空にして、受付状態を表示し直す
    fn reset_view(&self) {
        self.elements.file_input.set_value("");
        self.search.restore();
        self.apply_view();
    }

    /// ファイル名・プレビュー・案内の表示を受付状態に合わせる
    fn apply_view(&self) {
        let state = self.state.borrow();
        let elements = &self.elements;
        elements
            .file_name
            .set_text_content(Some(state.file_name().unwrap_or("")));

        match (state.view(), state.preview()) {
            (IntakeView::Preview, Some(url)) => {
                elements.preview.set_src(url);
                set_display(&elements.preview, "block");
                set_display(&elements.drop_zone, "none");
            }
            _ => {
                // src="#" だとページ自体を読みに行くので属性ごと外す
                if let Err(e) = elements.preview.remove_attribute("src") {
                    debug!(format!("プレビューの src を外せません: {:?}", e));
                }
                set_display(&elements.preview, "none");
                set_display(&elements.drop_zone, "flex");
            }
        }
    }

    /// 前回の解析結果を消す
    fn clear_results(&self) {
        let document = gloo::utils::document();
        if let Some(divider) = query::<Element>(&document, &self.config.divider_selector) {
            divider.remove();
        }
        if let Some(results) = query::<Element>(&document, &self.config.results_selector) {
            results.set_inner_html("");
        }
    }

    fn sync_input(&self, file: &File) -> Result<()> {
        let transfer = DataTransfer::new()?;
        transfer.items().add_with_file(file)?;
        self.elements.file_input.set_files(transfer.files().as_ref());
        Ok(())
    }

    fn start_read(&self, file: File, ticket: ReadTicket) {
        let this = self.clone();
        let mime = file.type_();
        let file = gloo::file::File::from(file);
        spawn_local(async move {
            match gloo::file::futures::read_as_bytes(&file).await {
                Ok(bytes) => this.show_preview(ticket, preview::data_url(&mime, &bytes)),
                Err(e) => error!(format!("ファイル読み込み失敗: {}: {:?}", file.name(), e)),
            }
        });
    }

    fn show_preview(&self, ticket: ReadTicket, data_url: String) {
        let current = self.state.borrow_mut().complete(ticket, data_url);
        if !current {
            debug!("古い読み込み結果を破棄");
            return;
        }
        self.apply_view();
    }

    /// 各イベントを登録
    pub fn bind(&self) -> Vec<EventListener> {
        let mut listeners = Vec::new();

        let this = self.clone();
        listeners.push(EventListener::new(
            &self.elements.file_input,
            "change",
            move |_| {
                let file = this.elements.file_input.files().and_then(|files| files.get(0));
                match file {
                    Some(file) => this.handle_file(file),
                    None => this.reset(),
                }
            },
        ));

        listeners.extend(self.bind_drop_target(&self.elements.drop_zone));
        listeners.extend(self.bind_drop_target(&self.elements.preview));

        // プレビュークリックでファイル選択を開き直す
        let input = self.elements.file_input.clone();
        listeners.push(EventListener::new(&self.elements.preview, "click", move |_| {
            input.click();
        }));

        listeners
    }

    fn bind_drop_target(&self, target: &HtmlElement) -> [EventListener; 3] {
        let options = EventListenerOptions::enable_prevent_default();
        let drag_over_class = self.config.drag_over_class.clone();

        let dragover = {
            let element = target.clone();
            let class = drag_over_class.clone();
            EventListener::new_with_options(target, "dragover", options, move |event| {
                event.prevent_default();
                set_class(&element, &class, true);
            })
        };

        let dragleave = {
            let element = target.clone();
            let class = drag_over_class.clone();
            EventListener::new(target, "dragleave", move |_| {
                set_class(&element, &class, false);
            })
        };

        let drop = {
            let element = target.clone();
            let this = self.clone();
            EventListener::new_with_options(target, "drop", options, move |event| {
                event.prevent_default();
                set_class(&element, &drag_over_class, false);
                let file = event
                    .dyn_ref::<DragEvent>()
                    .and_then(|e| e.data_transfer())
                    .and_then(|dt| dt.files())
                    .and_then(|files| files.get(0));
                if let Some(file) = file {
                    this.handle_file(file);
                }
            })
        };

        [dragover, dragleave, drop]
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use crate::test_util::{create, file, transfer_with};
    use gloo::timers::future::TimeoutFuture;
    use ocr_page_common::SearchMode;
    use std::cell::Cell;
    use wasm_bindgen_test::*;
    use web_sys::{DragEventInit, Event};

    wasm_bindgen_test_configure!(run_in_browser);

    fn upload_area(text: &str) -> (UploadArea, Rc<UploadElements>, HtmlInputElement, HtmlElement) {
        let file_input: HtmlInputElement = create("input");
        file_input.set_type("file");
        let search_input: HtmlInputElement = create("input");
        let block: HtmlElement = create("pre");
        block.set_text_content(Some(text));

        let elements = UploadElements {
            file_input,
            file_name: create("span"),
            preview: create("img"),
            drop_zone: create("label"),
        };
        let search = SearchBox::new(
            Some(search_input.clone()),
            Some(block.clone()),
            SearchMode::Literal,
            "highlight",
        );
        let area = UploadArea::new(elements, search, Rc::new(PageConfig::default()));
        let elements = area.elements.clone();
        (area, elements, search_input, block)
    }

    /// ドラッグイベントを送り、既定動作が止められたかを返す
    fn drag(target: &HtmlElement, kind: &str, transfer: Option<&DataTransfer>) -> bool {
        let init = DragEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_data_transfer(transfer);
        let event = DragEvent::new_with_event_init_dict(kind, &init).unwrap();
        target.dispatch_event(&event).unwrap();
        event.default_prevented()
    }

    fn display(element: &HtmlElement) -> String {
        element.style().get_property_value("display").unwrap()
    }

    #[wasm_bindgen_test]
    fn wasm_non_image_resets() {
        let (area, elements, _, _) = upload_area("The cat sat");
        area.handle_file(file("notes.txt", "text/plain"));

        assert!(!area.has_file());
        assert_eq!(elements.file_name.text_content().as_deref(), Some(""));
        assert!(elements.preview.get_attribute("src").is_none());
        assert_eq!(display(&elements.drop_zone), "flex");
    }

    #[wasm_bindgen_test]
    fn wasm_image_is_copied_into_input() {
        let (area, elements, _, _) = upload_area("The cat sat");
        area.handle_file(file("page.png", "image/png"));

        assert!(area.has_file());
        assert_eq!(elements.file_name.text_content().as_deref(), Some("page.png"));
    }

    /// DOM上のリセット: ファイル名・プレビュー・検索欄が空になり、テキストは元のまま
    #[wasm_bindgen_test]
    fn wasm_reset_restores_initial_state() {
        let (area, elements, search_input, block) = upload_area("The cat sat");
        area.handle_file(file("page.png", "image/png"));
        search_input.set_value("cat");
        area.search.render("cat");
        assert_ne!(block.inner_html(), "The cat sat");

        area.reset();

        assert!(!area.has_file());
        assert_eq!(elements.file_name.text_content().as_deref(), Some(""));
        assert!(elements.preview.get_attribute("src").is_none());
        assert_eq!(display(&elements.preview), "none");
        assert_eq!(display(&elements.drop_zone), "flex");
        assert_eq!(search_input.value(), "");
        assert_eq!(block.inner_html(), "The cat sat");
    }

    #[wasm_bindgen_test]
    fn wasm_change_without_files_resets() {
        let (area, elements, _, _) = upload_area("The cat sat");
        let _listeners = area.bind();
        elements.file_name.set_text_content(Some("stale.png"));

        let change = Event::new("change").unwrap();
        elements.file_input.dispatch_event(&change).unwrap();

        assert_eq!(elements.file_name.text_content().as_deref(), Some(""));
        assert_eq!(display(&elements.drop_zone), "flex");
    }

    #[wasm_bindgen_test]
    fn wasm_dragover_and_dragleave_toggle_class_on_both_targets() {
        let (area, elements, _, _) = upload_area("The cat sat");
        let _listeners = area.bind();
        let preview: &HtmlElement = elements.preview.as_ref();

        for target in [&elements.drop_zone, preview] {
            assert!(drag(target, "dragover", None));
            assert!(target.class_list().contains("drag-over"));

            assert!(!drag(target, "dragleave", None));
            assert!(!target.class_list().contains("drag-over"));
        }
    }

    #[wasm_bindgen_test]
    fn wasm_drop_on_preview_takes_file() {
        let (area, elements, _, _) = upload_area("The cat sat");
        let _listeners = area.bind();
        let preview: &HtmlElement = elements.preview.as_ref();
        let transfer = transfer_with(&file("dropped.png", "image/png"));

        drag(preview, "dragover", None);
        assert!(drag(preview, "drop", Some(&transfer)));

        assert!(!preview.class_list().contains("drag-over"));
        assert!(area.has_file());
        assert_eq!(elements.file_name.text_content().as_deref(), Some("dropped.png"));
    }

    #[wasm_bindgen_test]
    fn wasm_drop_non_image_on_drop_zone_is_ignored() {
        let (area, elements, _, _) = upload_area("The cat sat");
        let _listeners = area.bind();
        let transfer = transfer_with(&file("notes.txt", "text/plain"));

        drag(&elements.drop_zone, "dragover", None);
        assert!(drag(&elements.drop_zone, "drop", Some(&transfer)));

        assert!(!elements.drop_zone.class_list().contains("drag-over"));
        assert!(!area.has_file());
        assert_eq!(elements.file_name.text_content().as_deref(), Some(""));
    }

    #[wasm_bindgen_test]
    async fn wasm_dropped_image_is_previewed() {
        let (area, elements, _, _) = upload_area("The cat sat");
        let _listeners = area.bind();
        let transfer = transfer_with(&file("dropped.png", "image/png"));
        drag(&elements.drop_zone, "drop", Some(&transfer));

        for _ in 0..50 {
            if elements.preview.get_attribute("src").is_some() {
                break;
            }
            TimeoutFuture::new(10).await;
        }

        let src = elements.preview.get_attribute("src").unwrap();
        assert!(src.starts_with("data:image/png;base64,"));
        let preview: &HtmlElement = elements.preview.as_ref();
        assert_eq!(display(preview), "block");
        assert_eq!(display(&elements.drop_zone), "none");
    }

    #[wasm_bindgen_test]
    fn wasm_preview_click_opens_picker() {
        let (area, elements, _, _) = upload_area("The cat sat");
        let _listeners = area.bind();

        let opened = Rc::new(Cell::new(false));
        let flag = opened.clone();
        let _picker = EventListener::new(&elements.file_input, "click", move |_| flag.set(true));

        elements.preview.click();
        assert!(opened.get());
    }
}
