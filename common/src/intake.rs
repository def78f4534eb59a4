//! 画像ファイル受付の状態管理
//!
//! ファイル選択・ドロップ・リセットごとに世代番号を進める。
//! 非同期読み込みの完了時に世代が古ければ結果を捨てるので、
//! リセット後に古い読み込みがプレビューを復活させることはない。

/// 受付可能なMIMEタイプか（`image/` で始まるもの）
pub fn is_image_type(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// 受付条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakePolicy {
    /// 許可する拡張子（小文字、ドットなし）。空ならすべての画像を許可
    pub allowed_extensions: Vec<String>,
}

impl IntakePolicy {
    pub fn new(allowed_extensions: Vec<String>) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn accepts(&self, file_name: &str, mime: &str) -> bool {
        if !is_image_type(mime) {
            return false;
        }
        if self.allowed_extensions.is_empty() {
            return true;
        }
        match file_name.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            }
            None => false,
        }
    }
}

/// 非同期読み込みに付ける世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket(u64);

/// ファイル選択の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 受付済み。読み込み完了時にこのチケットを返す
    Accepted(ReadTicket),
    /// 画像以外などで拒否（状態はリセット済み）
    Rejected,
}

/// 表示中のコントロール
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeView {
    /// アップロード案内
    Prompt,
    /// 画像プレビュー
    Preview,
}

/// ファイル受付の状態
#[derive(Debug, Clone, Default)]
pub struct FileIntake {
    policy: IntakePolicy,
    generation: u64,
    file_name: Option<String>,
    preview: Option<String>,
}

impl FileIntake {
    pub fn new(policy: IntakePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// ファイルを選択する
    ///
    /// 受付・拒否どちらの場合も直前の選択は破棄される。
    pub fn select(&mut self, file_name: &str, mime: &str) -> Selection {
        self.reset();
        if !self.policy.accepts(file_name, mime) {
            return Selection::Rejected;
        }
        self.file_name = Some(file_name.to_string());
        Selection::Accepted(ReadTicket(self.generation))
    }

    /// 初期状態に戻す（進行中の読み込みは無効になる）
    pub fn reset(&mut self) {
        self.generation += 1;
        self.file_name = None;
        self.preview = None;
    }

    pub fn is_current(&self, ticket: ReadTicket) -> bool {
        ticket.0 == self.generation && self.file_name.is_some()
    }

    /// 読み込み完了。古いチケットなら `false` を返して何もしない
    pub fn complete(&mut self, ticket: ReadTicket, data_url: String) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.preview = Some(data_url);
        true
    }

    pub fn view(&self) -> IntakeView {
        if self.preview.is_some() {
            IntakeView::Preview
        } else {
            IntakeView::Prompt
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_type() {
        assert!(is_image_type("image/png"));
        assert!(is_image_type("image/jpeg"));
        assert!(!is_image_type("application/pdf"));
        assert!(!is_image_type(""));
        assert!(!is_image_type("text/image/png"));
    }

    #[test]
    fn test_policy_without_extensions_accepts_any_image() {
        let policy = IntakePolicy::default();
        assert!(policy.accepts("scan.gif", "image/gif"));
        assert!(policy.accepts("noext", "image/png"));
        assert!(!policy.accepts("notes.txt", "text/plain"));
    }

    #[test]
    fn test_policy_with_extensions() {
        let policy = IntakePolicy::new(vec![".PNG".into(), "jpg".into(), "".into()]);
        assert_eq!(policy.allowed_extensions, vec!["png", "jpg"]);
        assert!(policy.accepts("page.png", "image/png"));
        assert!(policy.accepts("page.JPG", "image/jpeg"));
        assert!(!policy.accepts("page.gif", "image/gif"));
        assert!(!policy.accepts("page", "image/png"));
        // 拡張子が合っていてもMIMEタイプが画像でなければ拒否
        assert!(!policy.accepts("page.png", "text/plain"));
    }

    #[test]
    fn test_select_and_complete() {
        let mut intake = FileIntake::default();
        assert_eq!(intake.view(), IntakeView::Prompt);

        let Selection::Accepted(ticket) = intake.select("page.png", "image/png") else {
            panic!("image should be accepted");
        };
        assert_eq!(intake.file_name(), Some("page.png"));
        assert_eq!(intake.view(), IntakeView::Prompt);

        assert!(intake.complete(ticket, "data:image/png;base64,AA==".into()));
        assert_eq!(intake.view(), IntakeView::Preview);
        assert_eq!(intake.preview(), Some("data:image/png;base64,AA=="));
    }

    #[test]
    fn test_reject_clears_previous_selection() {
        let mut intake = FileIntake::default();
        intake.select("page.png", "image/png");

        assert_eq!(intake.select("doc.pdf", "application/pdf"), Selection::Rejected);
        assert_eq!(intake.file_name(), None);
        assert_eq!(intake.preview(), None);
        assert_eq!(intake.view(), IntakeView::Prompt);
    }

    #[test]
    fn test_stale_read_after_reset_is_discarded() {
        let mut intake = FileIntake::default();
        let Selection::Accepted(ticket) = intake.select("page.png", "image/png") else {
            panic!("image should be accepted");
        };
        intake.reset();

        assert!(!intake.is_current(ticket));
        assert!(!intake.complete(ticket, "data:image/png;base64,AA==".into()));
        assert_eq!(intake.view(), IntakeView::Prompt);
    }

    #[test]
    fn test_stale_read_after_new_selection_is_discarded() {
        let mut intake = FileIntake::default();
        let Selection::Accepted(first) = intake.select("a.png", "image/png") else {
            panic!("image should be accepted");
        };
        let Selection::Accepted(second) = intake.select("b.png", "image/png") else {
            panic!("image should be accepted");
        };
        assert_ne!(first, second);

        assert!(intake.complete(second, "data:second".into()));
        assert!(!intake.complete(first, "data:first".into()));
        assert_eq!(intake.preview(), Some("data:second"));
        assert_eq!(intake.file_name(), Some("b.png"));
    }
}
