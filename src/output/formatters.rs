//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use std::io::Write;

use crate::error::XlsxTableError;
use crate::table::OutputTable;

/// Markdown形式のフォーマッター
pub(crate) struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn render<W: Write>(
        &self,
        table: &OutputTable,
        writer: &mut W,
    ) -> Result<(), XlsxTableError> {
        table.render_markdown(writer)
    }
}

/// JSON形式のフォーマッター
pub(crate) struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(
        &self,
        table: &OutputTable,
        writer: &mut W,
    ) -> Result<(), XlsxTableError> {
        serde_json::to_writer_pretty(&mut *writer, table)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// CSV形式のフォーマッター
pub(crate) struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(
        &self,
        table: &OutputTable,
        writer: &mut W,
    ) -> Result<(), XlsxTableError> {
        if table.columns().is_empty() {
            return Ok(());
        }

        // 1行目は列名
        Self::write_record(writer, table.columns())?;

        for row in table.rows() {
            Self::write_record(writer, row)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_record<W: Write>(writer: &mut W, fields: &[String]) -> Result<(), XlsxTableError> {
        let line = fields
            .iter()
            .map(|field| escape_csv(field))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line)?;
        Ok(())
    }
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape_csv(""), "");
    }
}
