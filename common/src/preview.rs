//! プレビュー用 Data URL

use base64::{engine::general_purpose::STANDARD, Engine};

/// MIMEタイプとバイト列から Data URL を作る
///
/// 例: `data:image/png;base64,iVBORw0...`
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_data_url_empty() {
        assert_eq!(data_url("image/gif", &[]), "data:image/gif;base64,");
    }
}
