//! ページ設定
//!
//! 要素ID・セレクタ・CSSクラス名などのDOM契約。
//! デフォルト値はサーバー側テンプレートのマークアップに合わせてある。

use crate::error::{Error, Result};
use crate::highlight::SearchMode;
use crate::intake::IntakePolicy;
use crate::theme::THEME_STORAGE_KEY;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub form_id: String,
    pub file_input_id: String,
    pub file_name_id: String,
    pub preview_id: String,
    pub drop_zone_id: String,
    pub overlay_id: String,
    pub timer_id: String,
    pub search_input_id: String,
    pub text_block_id: String,
    pub results_selector: String,
    pub divider_selector: String,
    pub theme_switch_selector: String,

    pub dark_class: String,
    pub active_class: String,
    pub drag_over_class: String,
    pub highlight_class: String,

    pub storage_key: String,
    pub missing_file_message: String,
    pub search_mode: SearchMode,
    /// 空なら画像であれば拡張子を問わない（サーバー側は png/jpg/jpeg/bmp）
    pub allowed_extensions: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            form_id: "uploadForm".into(),
            file_input_id: "file-input".into(),
            file_name_id: "selectedFileName".into(),
            preview_id: "imagePreview".into(),
            drop_zone_id: "customFileUpload".into(),
            overlay_id: "loadingOverlay".into(),
            timer_id: "processingTimer".into(),
            search_input_id: "textSearchInput".into(),
            text_block_id: "ocrTextContent".into(),
            results_selector: ".results".into(),
            divider_selector: ".results-divider".into(),
            theme_switch_selector: ".theme-switch__checkbox".into(),
            dark_class: "dark-mode".into(),
            active_class: "active".into(),
            drag_over_class: "drag-over".into(),
            highlight_class: "highlight".into(),
            storage_key: THEME_STORAGE_KEY.into(),
            missing_file_message: "Please select an image to upload!".into(),
            search_mode: SearchMode::Literal,
            allowed_extensions: Vec::new(),
        }
    }
}

impl PageConfig {
    /// JSONから読み込む（省略したキーはデフォルト値）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 必須の識別子が空でないか確認
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("formId", &self.form_id),
            ("fileInputId", &self.file_input_id),
            ("fileNameId", &self.file_name_id),
            ("previewId", &self.preview_id),
            ("dropZoneId", &self.drop_zone_id),
            ("overlayId", &self.overlay_id),
            ("timerId", &self.timer_id),
            ("storageKey", &self.storage_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{}が空です", name)));
            }
        }
        Ok(())
    }

    pub fn intake_policy(&self) -> IntakePolicy {
        IntakePolicy::new(self.allowed_extensions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_page_markup() {
        let config = PageConfig::default();
        assert_eq!(config.form_id, "uploadForm");
        assert_eq!(config.file_input_id, "file-input");
        assert_eq!(config.storage_key, "theme");
        assert_eq!(config.search_mode, SearchMode::Literal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = PageConfig::from_json(
            r#"{"searchMode": "pattern", "allowedExtensions": ["png", "BMP"], "highlightClass": "mark"}"#,
        )
        .unwrap();
        assert_eq!(config.search_mode, SearchMode::Pattern);
        assert_eq!(config.highlight_class, "mark");
        assert_eq!(config.form_id, "uploadForm");
        assert_eq!(config.intake_policy().allowed_extensions, vec!["png", "bmp"]);
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = PageConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        let err = PageConfig::from_json(r#"{"searchMode": "fuzzy"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_json_rejects_empty_required_id() {
        let err = PageConfig::from_json(r#"{"formId": " "}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("formId"));
    }
}
