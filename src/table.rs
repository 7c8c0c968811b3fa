//! Table Module
//!
//! 疎な生セルデータから、名前付き列を持つ出力テーブルへの変換を提供するモジュール。

use std::collections::HashMap;
use std::io::Write;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use unicode_width::UnicodeWidthStr;

use crate::api::RowOrder;
use crate::error::XlsxTableError;
use crate::formatter::NumberFormatInterpreter;
use crate::lookup::WorkbookLookups;
use crate::types::{SourceRow, TableBounds};

/// 抽出されたテーブル
///
/// 列はヘッダーの宣言順、行は入力された行の順序（または行番号の昇順）で保持します。
/// 同名の列が複数ある場合、名前による参照では最も右の列が優先されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    /// テーブル名
    name: String,

    /// 列名（ヘッダーの宣言順）
    columns: Vec<String>,

    /// データ行（各行は列数と同じ長さ）
    rows: Vec<Vec<String>>,
}

impl OutputTable {
    /// 生の行データからテーブルを構築
    ///
    /// # 引数
    ///
    /// * `name` - テーブル名
    /// * `headers` - 列名（出力列の順序）
    /// * `bounds` - テーブル範囲（先頭行はヘッダー行として除外）
    /// * `rows` - 生の行データ（疎、順不同）
    /// * `lookups` - ワークブックの参照テーブル
    /// * `interpreter` - 数値書式インタープリター
    /// * `row_order` - データ行の出力順序
    ///
    /// # 戻り値
    ///
    /// * `Ok(OutputTable)` - 構築に成功した場合
    /// * `Err(XlsxTableError)` - 範囲内のセルの解決に失敗した場合
    pub(crate) fn build(
        name: &str,
        headers: &[String],
        bounds: &TableBounds,
        rows: &[SourceRow],
        lookups: &WorkbookLookups,
        interpreter: &NumberFormatInterpreter,
        row_order: RowOrder,
    ) -> Result<Self, XlsxTableError> {
        let width = headers.len();

        // 1. 範囲内のデータ行を抽出（ヘッダー行は除外）
        let mut data_rows: Vec<&SourceRow> = rows
            .iter()
            .filter(|row| bounds.contains_data_row(row.row_index))
            .collect();

        if row_order == RowOrder::Ascending {
            data_rows.sort_by_key(|row| row.row_index);
        }

        // 2. 各セルを出力列に配置
        let mut table_rows = Vec::with_capacity(data_rows.len());
        for row in data_rows {
            let mut values = vec![String::new(); width];

            for cell in &row.cells {
                match bounds.column_offset(cell.address.column_index()) {
                    Some(offset) if offset < width => {
                        values[offset] = lookups.resolve_cell(cell, interpreter)?;
                    }
                    Some(_) => {
                        log::trace!(
                            "Table '{}': cell {} has no header column, skipped",
                            name,
                            cell.address
                        );
                    }
                    None => {
                        log::trace!(
                            "Table '{}': cell {} is outside {}, skipped",
                            name,
                            cell.address,
                            bounds
                        );
                    }
                }
            }

            table_rows.push(values);
        }

        log::debug!(
            "Extracted table '{}' from {}: {} columns, {} rows",
            name,
            bounds,
            width,
            table_rows.len()
        );

        Ok(Self {
            name: name.to_string(),
            columns: headers.to_vec(),
            rows: table_rows,
        })
    }

    /// テーブル名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 列名（ヘッダーの宣言順）
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// データ行（位置による値）
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// データ行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// データ行がないかどうか
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 行番号（0始まり）と列名で値を取得
    ///
    /// 同名の列が複数ある場合は最も右の列の値を返します。
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col_idx = self.columns.iter().rposition(|c| c == column)?;
        self.rows
            .get(row)
            .and_then(|values| values.get(col_idx))
            .map(String::as_str)
    }

    /// 行を列名 → 値のマップとして取得
    ///
    /// 同名の列が複数ある場合は最も右の列の値になります。
    pub fn row_map(&self, row: usize) -> Option<HashMap<&str, &str>> {
        let values = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .zip(values)
                .map(|(column, value)| (column.as_str(), value.as_str()))
                .collect(),
        )
    }

    /// 名前による参照で隠れない列のインデックス
    fn visible_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&idx| {
                self.columns
                    .iter()
                    .rposition(|c| *c == self.columns[idx])
                    == Some(idx)
            })
            .collect()
    }

    /// Markdownテーブルとして出力
    ///
    /// 1行目に列名、2行目に区切り行、以降にデータ行を出力します。
    /// 列が1つもない場合は何も出力しません。
    pub(crate) fn render_markdown<W: Write>(&self, writer: &mut W) -> Result<(), XlsxTableError> {
        if self.columns.is_empty() {
            return Ok(());
        }

        let header: Vec<String> = self.columns.iter().map(|c| escape_markdown(c)).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| escape_markdown(v)).collect())
            .collect();

        // 1. 列幅の計算
        let col_widths = Self::calculate_column_widths(&header, &body);

        // 2. ヘッダー行と区切り行
        Self::write_markdown_row(writer, &header, &col_widths)?;
        writeln!(writer, "{}", Self::generate_separator(&col_widths))?;

        // 3. データ行
        for row in &body {
            Self::write_markdown_row(writer, row, &col_widths)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_markdown_row<W: Write>(
        writer: &mut W,
        cells: &[String],
        col_widths: &[usize],
    ) -> Result<(), XlsxTableError> {
        write!(writer, "|")?;
        for (content, &width) in cells.iter().zip(col_widths) {
            // 表示幅を計算（全角文字は2、半角文字は1）
            let content_width = content.width();
            write!(writer, " {}", content)?;
            if content_width < width {
                write!(writer, "{}", " ".repeat(width - content_width))?;
            }
            write!(writer, " |")?;
        }
        writeln!(writer)?;
        Ok(())
    }

    /// 列幅を計算（内部ヘルパー）
    ///
    /// 各列の最大表示幅を返します。最小幅は3文字（区切り行の最小幅）です。
    fn calculate_column_widths(header: &[String], body: &[Vec<String>]) -> Vec<usize> {
        let mut widths: Vec<usize> = header.iter().map(|h| h.width().max(3)).collect();

        for row in body {
            for (col_idx, content) in row.iter().enumerate() {
                widths[col_idx] = widths[col_idx].max(content.width());
            }
        }

        widths
    }

    /// ヘッダー区切り行を生成（内部ヘルパー）
    fn generate_separator(col_widths: &[usize]) -> String {
        let mut parts = vec!["|".to_string()];

        for &width in col_widths {
            // セルの前後のスペース（各1文字）+ セル幅分のハイフン
            parts.push("-".repeat(width + 2));
            parts.push("|".to_string());
        }

        parts.join("")
    }
}

/// Markdown特殊文字をエスケープし、前後の空白を除去
fn escape_markdown(s: &str) -> String {
    s.trim()
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', "<br>")
}

impl Serialize for OutputTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visible = self.visible_columns();
        let rows: Vec<RowView<'_>> = self
            .rows
            .iter()
            .map(|values| RowView {
                columns: &self.columns,
                values,
                visible: &visible,
            })
            .collect();

        let mut state = serializer.serialize_struct("OutputTable", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

/// 1行分を列名 → 値のオブジェクトとしてシリアライズするためのビュー
struct RowView<'a> {
    columns: &'a [String],
    values: &'a [String],
    visible: &'a [usize],
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.visible.len()))?;
        for &idx in self.visible {
            map.serialize_entry(&self.columns[idx], &self.values[idx])?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellDataKind, RawCellRecord};

    fn text(address: &str, value: &str) -> RawCellRecord {
        RawCellRecord::parse(address, CellDataKind::Text, value).unwrap()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn build(headers: &[String], range: &str, rows: &[SourceRow], order: RowOrder) -> OutputTable {
        OutputTable::build(
            "People",
            headers,
            &TableBounds::parse(range).unwrap(),
            rows,
            &WorkbookLookups::new(),
            &NumberFormatInterpreter::default(),
            order,
        )
        .unwrap()
    }

    fn people_rows() -> Vec<SourceRow> {
        vec![
            SourceRow::new(1, vec![text("A1", "Name"), text("B1", "Age")]),
            SourceRow::new(
                2,
                vec![text("A2", "Alice"), text("B2", "30"), text("C2", "ignored")],
            ),
            SourceRow::new(3, vec![text("A3", "Bob")]),
        ]
    }

    #[test]
    fn test_build_basic_table() {
        let table = build(&headers(&["Name", "Age"]), "A1:B3", &people_rows(), RowOrder::Source);

        assert_eq!(table.name(), "People");
        assert_eq!(table.columns(), &["Name".to_string(), "Age".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], vec!["Alice", "30"]);
        // B3は存在しないため空文字列
        assert_eq!(table.rows()[1], vec!["Bob", ""]);
    }

    #[test]
    fn test_build_excludes_rows_outside_bounds() {
        let mut rows = people_rows();
        rows.push(SourceRow::new(4, vec![text("A4", "Carol")]));
        let table = build(&headers(&["Name", "Age"]), "A1:B3", &rows, RowOrder::Source);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_build_column_offset() {
        let rows = vec![SourceRow::new(
            6,
            vec![text("C6", "x"), text("D6", "y"), text("B6", "outside")],
        )];
        let table = build(&headers(&["First", "Second"]), "C5:D6", &rows, RowOrder::Source);
        assert_eq!(table.rows()[0], vec!["x", "y"]);
    }

    #[test]
    fn test_build_drops_cells_beyond_headers() {
        let rows = vec![SourceRow::new(2, vec![text("A2", "a"), text("B2", "b")])];
        let table = build(&headers(&["Only"]), "A1:B2", &rows, RowOrder::Source);
        assert_eq!(table.rows()[0], vec!["a"]);
    }

    #[test]
    fn test_build_row_order() {
        let rows = vec![
            SourceRow::new(3, vec![text("A3", "third")]),
            SourceRow::new(2, vec![text("A2", "second")]),
        ];
        let columns = headers(&["Value"]);

        let table = build(&columns, "A1:A3", &rows, RowOrder::Source);
        assert_eq!(table.value(0, "Value"), Some("third"));

        let table = build(&columns, "A1:A3", &rows, RowOrder::Ascending);
        assert_eq!(table.value(0, "Value"), Some("second"));
        assert_eq!(table.value(1, "Value"), Some("third"));
    }

    #[test]
    fn test_build_propagates_lookup_errors() {
        let rows = vec![SourceRow::new(
            2,
            vec![RawCellRecord::parse("A2", CellDataKind::SharedStringRef, "0").unwrap()],
        )];
        let result = OutputTable::build(
            "T",
            &headers(&["A"]),
            &TableBounds::parse("A1:A2").unwrap(),
            &rows,
            &WorkbookLookups::new(),
            &NumberFormatInterpreter::default(),
            RowOrder::Source,
        );
        assert!(matches!(result, Err(XlsxTableError::LookupMiss { .. })));
    }

    #[test]
    fn test_duplicate_columns_rightmost_wins() {
        let rows = vec![SourceRow::new(2, vec![text("A2", "left"), text("B2", "right")])];
        let table = build(&headers(&["Key", "Key"]), "A1:B2", &rows, RowOrder::Source);

        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.value(0, "Key"), Some("right"));
        assert_eq!(table.row_map(0).unwrap().get("Key"), Some(&"right"));
        assert_eq!(table.visible_columns(), vec![1]);
    }

    #[test]
    fn test_value_and_row_map_missing() {
        let table = build(&headers(&["Name", "Age"]), "A1:B3", &people_rows(), RowOrder::Source);
        assert_eq!(table.value(5, "Name"), None);
        assert_eq!(table.value(0, "Unknown"), None);
        assert!(table.row_map(5).is_none());
    }

    #[test]
    fn test_empty_table() {
        let table = build(&headers(&["Name"]), "A1:A1", &people_rows(), RowOrder::Source);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_render_markdown() {
        let table = build(&headers(&["Name", "Age"]), "A1:B3", &people_rows(), RowOrder::Source);
        let mut output = Vec::new();
        table.render_markdown(&mut output).unwrap();

        let expected = "| Name  | Age |\n\
                        |-------|-----|\n\
                        | Alice | 30  |\n\
                        | Bob   |     |\n";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_render_markdown_escapes_and_widths() {
        let rows = vec![SourceRow::new(
            2,
            vec![text("A2", "a|b"), text("B2", "札幌店")],
        )];
        let table = build(&headers(&["Code", "店舗名"]), "A1:B2", &rows, RowOrder::Source);
        let mut output = Vec::new();
        table.render_markdown(&mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "| Code | 店舗名 |");
        assert_eq!(lines[1], "|------|--------|");
        assert_eq!(lines[2], "| a\\|b | 札幌店 |");
    }

    #[test]
    fn test_render_markdown_no_columns() {
        let table = build(&[], "A1:B3", &people_rows(), RowOrder::Source);
        let mut output = Vec::new();
        table.render_markdown(&mut output).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_serialize_json() {
        let table = build(&headers(&["Name", "Age"]), "A1:B3", &people_rows(), RowOrder::Source);
        let value = serde_json::to_value(&table).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "name": "People",
                "columns": ["Name", "Age"],
                "rows": [
                    {"Name": "Alice", "Age": "30"},
                    {"Name": "Bob", "Age": ""}
                ]
            })
        );
    }

    #[test]
    fn test_serialize_keeps_header_order() {
        let table = build(&headers(&["Name", "Age"]), "A1:B3", &people_rows(), RowOrder::Source);
        let json = serde_json::to_string(&table).unwrap();
        let name_pos = json.find("\"Name\":\"Alice\"").unwrap();
        let age_pos = json.find("\"Age\":\"30\"").unwrap();
        assert!(name_pos < age_pos);
    }
}
