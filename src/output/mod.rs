//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use std::io::Write;

use crate::api::OutputFormat;
use crate::error::XlsxTableError;
use crate::table::OutputTable;

pub(crate) use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（Markdown, JSON, CSV）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormatter {
    Markdown,
    Json,
    Csv,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => OutputFormatter::Markdown,
            OutputFormat::Json => OutputFormatter::Json,
            OutputFormat::Csv => OutputFormatter::Csv,
        }
    }

    /// テーブルを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `table` - 出力するテーブル
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(XlsxTableError)` - エラーが発生した場合
    pub fn render<W: Write>(
        &self,
        table: &OutputTable,
        writer: &mut W,
    ) -> Result<(), XlsxTableError> {
        match self {
            OutputFormatter::Markdown => MarkdownFormatter.render(table, writer),
            OutputFormatter::Json => JsonFormatter.render(table, writer),
            OutputFormatter::Csv => CsvFormatter.render(table, writer),
        }
    }
}
