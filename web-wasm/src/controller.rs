//! ページコントローラ
//!
//! 読み込み時に一度だけ作り、ページが閉じるまで保持する。
//! 元テキスト・読み込み世代・タイマー・イベントリスナーはすべてここが所有する。

use crate::dom::{by_id, optional_by_id, Result};
use crate::overlay::LoadingOverlay;
use crate::search::SearchBox;
use crate::theme::ThemeSwitch;
use crate::upload_area::{UploadArea, UploadElements};
use gloo::console::{debug, warn};
use gloo::events::{EventListener, EventListenerOptions};
use ocr_page_common::PageConfig;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{Document, HtmlElement, HtmlFormElement, HtmlInputElement};

pub struct PageController {
    _theme: ThemeSwitch,
    upload: Option<UploadPage>,
}

impl PageController {
    /// テーマを適用し、アップロードフォームがあればページ全体を結線する
    pub fn mount(config: PageConfig) -> Self {
        let theme = ThemeSwitch::bind(&config);
        let document = gloo::utils::document();

        if document.get_element_by_id(&config.form_id).is_none() {
            debug!("アップロードフォームなし: テーマのみ有効");
            return Self {
                _theme: theme,
                upload: None,
            };
        }

        let upload = match UploadPage::mount(&document, Rc::new(config)) {
            Ok(page) => Some(page),
            Err(e) => {
                warn!(format!("アップロード機能を無効化: {}", e));
                None
            }
        };

        debug!(format!(
            "ページ初期化完了 (theme: {}, upload: {})",
            theme.initial_theme().as_str(),
            upload.is_some()
        ));
        Self {
            _theme: theme,
            upload,
        }
    }

    pub fn is_upload_enabled(&self) -> bool {
        self.upload.is_some()
    }

    pub fn is_search_enabled(&self) -> bool {
        self.upload
            .as_ref()
            .map(|page| page.search_enabled)
            .unwrap_or(false)
    }
}

/// アップロードフォームのあるページの状態
struct UploadPage {
    _overlay: Rc<RefCell<LoadingOverlay>>,
    _upload: UploadArea,
    search_enabled: bool,
    _listeners: Vec<EventListener>,
}

impl UploadPage {
    fn mount(document: &Document, config: Rc<PageConfig>) -> Result<Self> {
        let form: HtmlFormElement = by_id(document, &config.form_id)?;
        let elements = UploadElements {
            file_input: by_id(document, &config.file_input_id)?,
            file_name: by_id(document, &config.file_name_id)?,
            preview: by_id(document, &config.preview_id)?,
            drop_zone: by_id(document, &config.drop_zone_id)?,
        };
        let overlay = LoadingOverlay::new(
            by_id(document, &config.overlay_id)?,
            by_id(document, &config.timer_id)?,
            config.active_class.clone(),
        );
        let overlay = Rc::new(RefCell::new(overlay));

        // 元テキストはここで一度だけ取得する
        let search = SearchBox::new(
            optional_by_id::<HtmlInputElement>(document, &config.search_input_id),
            optional_by_id::<HtmlElement>(document, &config.text_block_id),
            config.search_mode,
            &config.highlight_class,
        );

        // 再読み込み時に前回のオーバーレイが残らないようにする
        overlay.borrow_mut().hide();

        let upload = UploadArea::new(elements, search.clone(), config.clone());
        if !upload.has_file() {
            upload.reset();
        }

        let mut listeners = upload.bind();
        listeners.push(bind_submit(
            &form,
            upload.clone(),
            overlay.clone(),
            &config,
            gloo::dialogs::alert,
        ));
        let search_listener = search.bind();
        let search_enabled = search_listener.is_some();
        listeners.extend(search_listener);

        Ok(Self {
            _overlay: overlay,
            _upload: upload,
            search_enabled,
            _listeners: listeners,
        })
    }
}

/// 送信時: ファイルがなければ中止して警告、あれば処理中表示を開始
///
/// `alert` はブラウザでは `gloo::dialogs::alert`。
fn bind_submit(
    form: &HtmlFormElement,
    upload: UploadArea,
    overlay: Rc<RefCell<LoadingOverlay>>,
    config: &PageConfig,
    alert: impl Fn(&str) + 'static,
) -> EventListener {
    let message = config.missing_file_message.clone();
    EventListener::new_with_options(
        form,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            if upload.has_file() {
                overlay.borrow_mut().show();
            } else {
                event.prevent_default();
                alert(&message);
            }
        },
    )
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use crate::test_util::file;
    use wasm_bindgen_test::*;
    use web_sys::{Event, EventInit};

    wasm_bindgen_test_configure!(run_in_browser);

    const UPLOAD_PAGE: &str = r#"
        <form id="t-form">
            <input type="file" id="t-input">
            <span id="t-name"></span>
            <img id="t-preview">
            <label id="t-drop"></label>
        </form>
        <div id="t-overlay" class="active"><span id="t-timer">3 seconds</span></div>
        <input id="t-search">
        <pre id="t-text">The cat sat</pre>
    "#;

    fn test_config() -> PageConfig {
        PageConfig {
            form_id: "t-form".into(),
            file_input_id: "t-input".into(),
            file_name_id: "t-name".into(),
            preview_id: "t-preview".into(),
            drop_zone_id: "t-drop".into(),
            overlay_id: "t-overlay".into(),
            timer_id: "t-timer".into(),
            search_input_id: "t-search".into(),
            text_block_id: "t-text".into(),
            storage_key: "ocr-page-test-controller".into(),
            ..PageConfig::default()
        }
    }

    /// 送信イベントを送り、送信が止められたかを返す
    fn submit(form: &HtmlFormElement) -> bool {
        let init = EventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        let event = Event::new_with_event_init_dict("submit", &init).unwrap();
        form.dispatch_event(&event).unwrap();
        event.default_prevented()
    }

    #[wasm_bindgen_test]
    fn wasm_submit_without_file_alerts_and_keeps_overlay_hidden() {
        let container = gloo::utils::document().create_element("div").unwrap();
        container.set_inner_html(UPLOAD_PAGE);
        gloo::utils::body().append_child(&container).unwrap();

        let document = gloo::utils::document();
        let config = Rc::new(test_config());
        let form: HtmlFormElement = by_id(&document, &config.form_id).unwrap();
        let elements = UploadElements {
            file_input: by_id(&document, &config.file_input_id).unwrap(),
            file_name: by_id(&document, &config.file_name_id).unwrap(),
            preview: by_id(&document, &config.preview_id).unwrap(),
            drop_zone: by_id(&document, &config.drop_zone_id).unwrap(),
        };
        let search = SearchBox::new(None, None, config.search_mode, &config.highlight_class);
        let upload = UploadArea::new(elements, search, config.clone());
        let overlay = Rc::new(RefCell::new(LoadingOverlay::new(
            by_id(&document, &config.overlay_id).unwrap(),
            by_id(&document, &config.timer_id).unwrap(),
            config.active_class.clone(),
        )));
        overlay.borrow_mut().hide();

        let alerts = Rc::new(RefCell::new(Vec::<String>::new()));
        let recorded = alerts.clone();
        let _submit = bind_submit(&form, upload.clone(), overlay.clone(), &config, move |message| {
            recorded.borrow_mut().push(message.to_string())
        });

        let overlay_el = document.get_element_by_id(&config.overlay_id).unwrap();
        let timer = document.get_element_by_id(&config.timer_id).unwrap();

        for _ in 0..2 {
            assert!(submit(&form));
            assert!(!overlay_el.class_list().contains("active"));
            assert_eq!(timer.text_content().as_deref(), Some(""));
        }
        assert_eq!(
            *alerts.borrow(),
            vec!["Please select an image to upload!".to_string(); 2]
        );

        upload.handle_file(file("page.png", "image/png"));
        assert!(!submit(&form));
        assert!(overlay_el.class_list().contains("active"));
        assert_eq!(timer.text_content().as_deref(), Some("0 seconds"));
        assert_eq!(alerts.borrow().len(), 2);

        overlay.borrow_mut().hide();
        container.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_mount_without_form_only_applies_theme() {
        let config = PageConfig {
            form_id: "no-such-form".into(),
            ..test_config()
        };
        let controller = PageController::mount(config);
        assert!(!controller.is_upload_enabled());
        assert!(!controller.is_search_enabled());
    }

    #[wasm_bindgen_test]
    fn wasm_mount_hides_stale_overlay_and_binds_search() {
        let container = gloo::utils::document().create_element("div").unwrap();
        container.set_inner_html(UPLOAD_PAGE);
        gloo::utils::body().append_child(&container).unwrap();

        let controller = PageController::mount(test_config());
        assert!(controller.is_upload_enabled());
        assert!(controller.is_search_enabled());

        let document = gloo::utils::document();
        let overlay = document.get_element_by_id("t-overlay").unwrap();
        assert!(!overlay.class_list().contains("active"));
        let timer = document.get_element_by_id("t-timer").unwrap();
        assert_eq!(timer.text_content().as_deref(), Some(""));

        drop(controller);
        container.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_mount_with_missing_required_element_disables_upload() {
        let container = gloo::utils::document().create_element("div").unwrap();
        container.set_inner_html(r#"<form id="t-partial-form"></form>"#);
        gloo::utils::body().append_child(&container).unwrap();

        let controller = PageController::mount(PageConfig {
            form_id: "t-partial-form".into(),
            ..test_config()
        });
        assert!(!controller.is_upload_enabled());

        container.remove();
    }
}
