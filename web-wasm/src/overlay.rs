//! 処理中オーバーレイと経過時間表示

use crate::dom::set_class;
use gloo::timers::callback::Interval;
use ocr_page_common::{ElapsedClock, TICK_INTERVAL_MS};
use web_sys::HtmlElement;

pub struct LoadingOverlay {
    overlay: HtmlElement,
    timer_label: HtmlElement,
    active_class: String,
    interval: Option<Interval>,
}

impl LoadingOverlay {
    pub fn new(overlay: HtmlElement, timer_label: HtmlElement, active_class: impl Into<String>) -> Self {
        Self {
            overlay,
            timer_label,
            active_class: active_class.into(),
            interval: None,
        }
    }

    /// 表示して経過時間の更新を始める
    pub fn show(&mut self) {
        set_class(&self.overlay, &self.active_class, true);

        let now = js_sys::Date::now();
        let clock = ElapsedClock::start(now);
        self.timer_label.set_text_content(Some(&clock.label(now)));

        let label = self.timer_label.clone();
        // 前回の Interval は置き換え時に drop されて止まる
        self.interval = Some(Interval::new(TICK_INTERVAL_MS, move || {
            label.set_text_content(Some(&clock.label(js_sys::Date::now())));
        }));
    }

    pub fn hide(&mut self) {
        set_class(&self.overlay, &self.active_class, false);
        if let Some(interval) = self.interval.take() {
            interval.cancel();
        }
        self.timer_label.set_text_content(Some(""));
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn div() -> HtmlElement {
        gloo::utils::document()
            .create_element("div")
            .unwrap()
            .dyn_into()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn wasm_show_then_hide() {
        let overlay_el = div();
        let label = div();
        let mut overlay = LoadingOverlay::new(overlay_el.clone(), label.clone(), "active");

        overlay.show();
        assert!(overlay_el.class_list().contains("active"));
        assert!(overlay.interval.is_some());
        assert_eq!(label.text_content().as_deref(), Some("0 seconds"));

        overlay.hide();
        assert!(!overlay_el.class_list().contains("active"));
        assert!(overlay.interval.is_none());
        assert_eq!(label.text_content().as_deref(), Some(""));
    }
}
