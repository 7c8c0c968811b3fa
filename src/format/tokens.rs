//! FormatToken Module
//!
//! Excel Number Format Stringのトークン定義を提供します。

/// 数字プレースホルダーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placeholder {
    /// `0`: 桁がなければ0で埋める
    Zero,

    /// `#`: 桁がなければ何も出力しない
    Hash,

    /// `?`: 桁がなければ空白で埋める
    Space,
}

/// フォーマットトークン
///
/// 引用符の除去とフィラー指定の除去を行った後のセクション文字列を解析して生成されます。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FormatToken {
    /// 年（例: "yyyy" -> 4, "yy" -> 2）
    Year(usize),

    /// 月（例: "mm" -> 2, "mmm" -> 3）
    Month(usize),

    /// 日（例: "dd" -> 2, "dddd" -> 4）
    Day(usize),

    /// 時（例: "hh" -> 2, "h" -> 1）
    Hour(usize),

    /// 分（例: "mm" -> 2, "m" -> 1）
    /// 注意: 時の直後、または秒の直前にある"m"のみが分になる
    Minute(usize),

    /// 秒（例: "ss" -> 2, "s" -> 1）
    Second(usize),

    /// 経過時間（時）: `[h]`
    ElapsedHours,

    /// 経過時間（分）: `[mm]`
    ElapsedMinutes,

    /// 経過時間（秒）: `[ss]`
    ElapsedSeconds,

    /// 午前・午後（`true`: "AM/PM", `false`: "A/P"）
    AmPm(bool),

    /// 数字プレースホルダー
    Digit(Placeholder),

    /// 小数点
    DecimalPoint,

    /// 千の位区切り
    ThousandSeparator,

    /// 引用符・エスケープの外にある`/`（分数の区切り、または日付の区切り文字）
    Slash,

    /// パーセント記号
    Percent,

    /// 指数表記（`true`: "E+", `false`: "E-"）。大文字・小文字は元の書式を保持
    Exponent { plus: bool, upper: bool },

    /// "General"キーワード
    General,

    /// リテラル文字列（例: "$", "-", " "）
    Literal(String),

    /// 色指定（例: "[Red]", "[Blue]"）
    /// 色指定は出力に影響しません
    Color(String),

    /// テキストプレースホルダー（例: "@"）
    TextPlaceholder,
}

impl FormatToken {
    /// トークンが日付・時刻関連かどうかを判定
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            FormatToken::Year(_)
                | FormatToken::Month(_)
                | FormatToken::Day(_)
                | FormatToken::Hour(_)
                | FormatToken::Minute(_)
                | FormatToken::Second(_)
                | FormatToken::ElapsedHours
                | FormatToken::ElapsedMinutes
                | FormatToken::ElapsedSeconds
                | FormatToken::AmPm(_)
        )
    }

    /// トークンが数字プレースホルダーかどうかを判定
    pub fn is_digit(&self) -> bool {
        matches!(self, FormatToken::Digit(_))
    }
}
