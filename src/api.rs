//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 書式セクションが不足している場合の扱い
///
/// 書式コードが値の符号に対応するセクションを持たない場合の動作を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SectionPolicy {
    /// スプレッドシートと同じ規則で補完（デフォルト）
    ///
    /// - 負数セクションがない場合: 正数セクションを使い、先頭に`-`を付ける
    /// - ゼロセクションがない場合: 正数セクションを使う
    ///
    /// # 出力例
    ///
    /// 書式`0.00`で`-1.5`をフォーマットすると`-1.50`になります。
    #[default]
    ExcelFallback,

    /// セクションが不足していればエラー
    ///
    /// `XlsxTableError::FormatSection`を返します。
    Strict,
}

/// データ行の出力順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum RowOrder {
    /// 入力された順序のまま出力（デフォルト）
    ///
    /// 呼び出し側が行番号の昇順で行を渡すことを前提とします。
    #[default]
    Source,

    /// 行番号の昇順に並べ替えて出力
    ///
    /// 同じ行番号の行は入力順を保持します（安定ソート）。
    Ascending,
}

/// 出力フォーマット
///
/// 抽出したテーブルを出力する際の形式を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Markdown形式（デフォルト）
    ///
    /// 1行目に列名、2行目に区切り行を出力します。
    ///
    /// # 出力例
    ///
    /// ```markdown
    /// | Name  | Age |
    /// |-------|-----|
    /// | Alice | 30  |
    /// ```
    #[default]
    Markdown,

    /// JSON形式
    ///
    /// テーブル名、列名、各行（列名をキーとするオブジェクト）を出力します。
    ///
    /// # 出力例
    ///
    /// ```json
    /// {
    ///   "name": "People",
    ///   "columns": ["Name", "Age"],
    ///   "rows": [
    ///     {"Name": "Alice", "Age": "30"}
    ///   ]
    /// }
    /// ```
    Json,

    /// CSV形式
    ///
    /// 1行目に列名を出力します。
    ///
    /// # 出力例
    ///
    /// ```csv
    /// Name,Age
    /// Alice,30
    /// ```
    Csv,
}
