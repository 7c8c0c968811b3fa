//! FormatSection Module
//!
//! Excel Number Format Stringのセクション定義を提供します。

use super::tokens::FormatToken;

/// 書式コードに含まれるセクションの最大数
pub(crate) const MAX_SECTIONS: usize = 4;

/// セクションの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionKind {
    /// 正数
    Positive,
    /// 負数
    Negative,
    /// ゼロ
    Zero,
    /// テキスト
    Text,
}

impl SectionKind {
    /// セクション番号（0始まり）から種類を取得
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SectionKind::Positive),
            1 => Some(SectionKind::Negative),
            2 => Some(SectionKind::Zero),
            3 => Some(SectionKind::Text),
            _ => None,
        }
    }
}

/// フォーマットのセクション（正数、負数、ゼロ、テキスト）
///
/// Excel Number Format Stringは最大4つのセクションに分割されます:
/// 1. 正数
/// 2. 負数
/// 3. ゼロ
/// 4. テキスト
#[derive(Debug, Clone)]
pub(crate) struct FormatSection {
    /// セクションの種類
    pub kind: SectionKind,

    /// フォーマットトークン
    pub tokens: Vec<FormatToken>,
}

impl FormatSection {
    /// 新しいセクションを生成
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            tokens: Vec::new(),
        }
    }

    /// セクションが日付・時刻書式かどうかを判定
    pub fn is_datetime(&self) -> bool {
        self.tokens.iter().any(|t| t.is_datetime())
    }

    /// セクションが数字プレースホルダーを含むかどうかを判定
    pub fn has_digits(&self) -> bool {
        self.tokens.iter().any(|t| t.is_digit())
    }

    /// セクションが"General"キーワードを含むかどうかを判定
    pub fn is_general(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, FormatToken::General))
    }

    /// セクションが分数表記（`# ?/?`など）かどうかを判定
    ///
    /// 引用符やエスケープの外にある`/`が数字プレースホルダーに挟まれている場合のみ分数とみなします。
    pub fn is_fraction(&self) -> bool {
        self.tokens.iter().enumerate().any(|(idx, token)| {
            matches!(token, FormatToken::Slash)
                && self.tokens[..idx].iter().any(|t| t.is_digit())
                && self.tokens[idx + 1..].iter().any(|t| t.is_digit())
        })
    }
}

/// 書式コードをセクションに分割
///
/// `;`で最大4つのセクションに分割します。
/// ただし、`[`と`]`で囲まれた部分、引用符で囲まれた部分、および`\`でエスケープされた`;`は
/// 区切りとして扱いません。
/// 5つ目以降のセクションは無視します。
pub(crate) fn split_sections(pattern: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    let mut in_quotes = false;
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if !in_quotes => {
                current.push(ch);
                current.extend(chars.next());
            }
            '"' if !in_brackets => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '[' if !in_quotes => {
                in_brackets = true;
                current.push(ch);
            }
            ']' if !in_quotes => {
                in_brackets = false;
                current.push(ch);
            }
            ';' if !in_brackets && !in_quotes => {
                sections.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    sections.push(current);

    sections.truncate(MAX_SECTIONS);
    sections
}
