//! OCR Page Common Library
//!
//! OCRアップロードページのブラウザ非依存ロジック。
//! DOM操作は web-wasm 側で行い、ここでは状態と計算だけを扱う。

pub mod config;
pub mod elapsed;
pub mod error;
pub mod highlight;
pub mod intake;
pub mod preview;
pub mod theme;

pub use config::PageConfig;
pub use elapsed::{ElapsedClock, TICK_INTERVAL_MS};
pub use error::{Error, Result};
pub use highlight::{Highlight, Highlighter, SearchMode, Segment};
pub use intake::{is_image_type, FileIntake, IntakePolicy, IntakeView, ReadTicket, Selection};
pub use theme::{MemoryStore, PreferenceStore, Theme, ThemePreference, THEME_STORAGE_KEY};
