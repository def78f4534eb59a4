//! OCRテキスト内の検索ハイライト
//!
//! ハイライトは常に元のOCRテキストから作り直す。表示中の（ハイライト済み）
//! テキストを再加工しないので、検索を繰り返してもマークアップが入れ子にならない。

use crate::error::Result;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// 検索語の解釈方法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// 検索語をそのままの文字列として扱う（特殊文字はエスケープ）
    #[default]
    Literal,
    /// 検索語を正規表現として扱う
    Pattern,
}

/// ハイライト結果の区間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(s) | Segment::Match(s) => s,
        }
    }
}

/// ハイライト結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Highlight<'a> {
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    pub fn match_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Match(_)))
            .count()
    }

    /// HTML文字列として出力
    ///
    /// 通常部分・一致部分ともにエスケープし、一致部分を
    /// `<span class="{class}">` で囲む。
    pub fn to_html(&self, class: &str) -> String {
        let mut html = String::new();
        for segment in self.segments() {
            match segment {
                Segment::Plain(s) => html.push_str(&html_escape(s)),
                Segment::Match(s) => {
                    html.push_str(&format!(
                        r#"<span class="{}">{}</span>"#,
                        html_escape(class),
                        html_escape(s)
                    ));
                }
            }
        }
        html
    }
}

/// 検索語から作るハイライタ
#[derive(Debug, Clone)]
pub struct Highlighter {
    regex: Option<Regex>,
}

impl Highlighter {
    /// 検索語（前後の空白は除去）からハイライタを作る
    ///
    /// `Pattern` モードで正規表現が不正な場合はリテラル検索にフォールバックする。
    pub fn new(term: &str, mode: SearchMode) -> Self {
        match Self::try_new(term, mode) {
            Ok(h) => h,
            Err(_) => Self::try_new(term, SearchMode::Literal).unwrap_or(Self { regex: None }),
        }
    }

    /// 不正な正規表現をエラーとして返す版
    pub fn try_new(term: &str, mode: SearchMode) -> Result<Self> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Self { regex: None });
        }

        let source = match mode {
            SearchMode::Literal => regex::escape(term),
            SearchMode::Pattern => term.to_string(),
        };
        let regex = RegexBuilder::new(&source).case_insensitive(true).build()?;
        Ok(Self { regex: Some(regex) })
    }

    /// 検索語が空でないか
    pub fn is_active(&self) -> bool {
        self.regex.is_some()
    }

    /// テキストを区間に分割する
    ///
    /// 長さ0の一致（`Pattern` モードの `a*` など）は無視する。
    pub fn highlight<'a>(&self, text: &'a str) -> Highlight<'a> {
        let mut segments = Vec::new();
        let Some(regex) = &self.regex else {
            if !text.is_empty() {
                segments.push(Segment::Plain(text));
            }
            return Highlight { segments };
        };

        let mut last = 0;
        for m in regex.find_iter(text) {
            if m.start() == m.end() {
                continue;
            }
            if m.start() > last {
                segments.push(Segment::Plain(&text[last..m.start()]));
            }
            segments.push(Segment::Match(m.as_str()));
            last = m.end();
        }
        if last < text.len() {
            segments.push(Segment::Plain(&text[last..]));
        }

        Highlight { segments }
    }
}

/// HTML特殊文字をエスケープ
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
