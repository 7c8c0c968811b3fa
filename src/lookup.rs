//! Lookup Module
//!
//! ワークブック単位で一度だけ構築される参照テーブル（共有文字列、数値書式、セルスタイル）と、
//! それらを使ったセル値の解決を提供するモジュール。

use std::collections::HashMap;

use crate::error::{LookupKind, XlsxTableError};
use crate::format::builtin_format_code;
use crate::formatter::NumberFormatInterpreter;
use crate::types::{CellDataKind, RawCellRecord};

/// ワークブックの参照テーブル
///
/// 構築後は読み取り専用で、複数スレッドから参照で共有されます。
///
/// # 使用例
///
/// ```rust
/// use xlsxtable::WorkbookLookups;
///
/// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
/// let lookups = WorkbookLookups::new()
///     .with_shared_strings(["Alice", "Bob"])
///     .with_custom_format(164, "yyyy-mm-dd")
///     .with_cell_formats([0, 164]);
///
/// assert_eq!(lookups.shared_string(1)?, "Bob");
/// assert_eq!(lookups.format_code(164)?, "yyyy-mm-dd");
/// assert_eq!(lookups.format_code(2)?, "0.00");
/// assert_eq!(lookups.style_format_id(1)?, 164);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WorkbookLookups {
    /// 共有文字列テーブル（インデックス → 文字列）
    shared_strings: Vec<String>,

    /// ドキュメント固有の数値書式（書式ID → 書式コード）
    custom_formats: HashMap<u32, String>,

    /// セルスタイル（スタイルインデックス → 書式ID）
    cell_formats: Vec<u32>,
}

impl WorkbookLookups {
    /// 空の参照テーブルを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 共有文字列テーブルを設定
    pub fn with_shared_strings<I, S>(mut self, strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared_strings = strings.into_iter().map(Into::into).collect();
        self
    }

    /// ドキュメント固有の数値書式を追加
    ///
    /// 同じIDが既に登録されている場合は上書きします。
    pub fn with_custom_format(mut self, format_id: u32, code: impl Into<String>) -> Self {
        self.custom_formats.insert(format_id, code.into());
        self
    }

    /// セルスタイルテーブルを設定
    ///
    /// `n`番目の要素がスタイルインデックス`n`の書式IDになります。
    pub fn with_cell_formats<I>(mut self, format_ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.cell_formats = format_ids.into_iter().collect();
        self
    }

    /// 共有文字列を取得
    pub fn shared_string(&self, index: usize) -> Result<&str, XlsxTableError> {
        self.shared_strings
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| XlsxTableError::LookupMiss {
                kind: LookupKind::SharedString,
                key: index.to_string(),
            })
    }

    /// 書式IDに対応する書式コードを取得
    ///
    /// ドキュメント固有の書式を優先し、なければ組み込み書式を参照します。
    pub fn format_code(&self, format_id: u32) -> Result<&str, XlsxTableError> {
        if let Some(code) = self.custom_formats.get(&format_id) {
            return Ok(code);
        }

        builtin_format_code(format_id).ok_or_else(|| XlsxTableError::LookupMiss {
            kind: LookupKind::NumberFormat,
            key: format_id.to_string(),
        })
    }

    /// スタイルインデックスに対応する書式IDを取得
    pub fn style_format_id(&self, style_index: u32) -> Result<u32, XlsxTableError> {
        self.cell_formats
            .get(style_index as usize)
            .copied()
            .ok_or_else(|| XlsxTableError::LookupMiss {
                kind: LookupKind::CellStyle,
                key: style_index.to_string(),
            })
    }

    /// セルの表示文字列を解決
    ///
    /// # 解決規則
    ///
    /// - `Text`, `PlainNumberOrText`: 生のテキストをそのまま返す
    /// - `SharedStringRef`: 生のテキストを共有文字列のインデックスとして参照
    /// - `Styled`: スタイル → 書式ID → 書式コードを解決し、インタープリターで変換
    pub fn resolve_cell(
        &self,
        cell: &RawCellRecord,
        interpreter: &NumberFormatInterpreter,
    ) -> Result<String, XlsxTableError> {
        match cell.kind {
            CellDataKind::Text | CellDataKind::PlainNumberOrText => Ok(cell.raw_text.clone()),

            CellDataKind::SharedStringRef => {
                let index = cell.raw_text.trim().parse::<usize>().map_err(|_| {
                    XlsxTableError::LookupMiss {
                        kind: LookupKind::SharedString,
                        key: cell.raw_text.clone(),
                    }
                })?;
                self.shared_string(index).map(str::to_string)
            }

            CellDataKind::Styled => {
                let style_index = cell.style_index.ok_or_else(|| XlsxTableError::LookupMiss {
                    kind: LookupKind::CellStyle,
                    key: format!("<none> at {}", cell.address),
                })?;
                let format_id = self.style_format_id(style_index)?;
                let pattern = self.format_code(format_id)?;
                interpreter.render(&cell.raw_text, format_id, pattern)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookups() -> WorkbookLookups {
        WorkbookLookups::new()
            .with_shared_strings(["Alice", "Bob"])
            .with_custom_format(164, "yyyy-mm-dd")
            .with_custom_format(165, "0.0")
            .with_cell_formats([0, 164, 2, 165, 30])
    }

    fn record(kind: CellDataKind, raw: &str) -> RawCellRecord {
        RawCellRecord::parse("A2", kind, raw).unwrap()
    }

    #[test]
    fn test_shared_string() {
        let lookups = lookups();
        assert_eq!(lookups.shared_string(0).unwrap(), "Alice");
        assert!(matches!(
            lookups.shared_string(2),
            Err(XlsxTableError::LookupMiss {
                kind: LookupKind::SharedString,
                ..
            })
        ));
    }

    #[test]
    fn test_format_code_prefers_custom() {
        let lookups = WorkbookLookups::new().with_custom_format(2, "0.000");
        assert_eq!(lookups.format_code(2).unwrap(), "0.000");
        assert_eq!(lookups.format_code(3).unwrap(), "#,##0");
    }

    #[test]
    fn test_format_code_miss() {
        let binding = lookups();
        let result = binding.format_code(30);
        match result {
            Err(XlsxTableError::LookupMiss { kind, key }) => {
                assert_eq!(kind, LookupKind::NumberFormat);
                assert_eq!(key, "30");
            }
            _ => panic!("Expected LookupMiss error"),
        }
    }

    #[test]
    fn test_style_format_id() {
        let lookups = lookups();
        assert_eq!(lookups.style_format_id(1).unwrap(), 164);
        assert!(lookups.style_format_id(5).is_err());
    }

    #[test]
    fn test_resolve_text_passthrough() {
        let interpreter = NumberFormatInterpreter::default();
        let lookups = lookups();
        let cell = record(CellDataKind::Text, "hello");
        assert_eq!(lookups.resolve_cell(&cell, &interpreter).unwrap(), "hello");
        let cell = record(CellDataKind::PlainNumberOrText, "30");
        assert_eq!(lookups.resolve_cell(&cell, &interpreter).unwrap(), "30");
    }

    #[test]
    fn test_resolve_shared_string() {
        let interpreter = NumberFormatInterpreter::default();
        let lookups = lookups();
        let cell = record(CellDataKind::SharedStringRef, "1");
        assert_eq!(lookups.resolve_cell(&cell, &interpreter).unwrap(), "Bob");

        let cell = record(CellDataKind::SharedStringRef, "x");
        assert!(lookups.resolve_cell(&cell, &interpreter).is_err());
        let cell = record(CellDataKind::SharedStringRef, "9");
        assert!(lookups.resolve_cell(&cell, &interpreter).is_err());
    }

    #[test]
    fn test_resolve_styled() {
        let interpreter = NumberFormatInterpreter::default();
        let lookups = lookups();

        let cell = record(CellDataKind::Styled, "45658").with_style(1);
        assert_eq!(
            lookups.resolve_cell(&cell, &interpreter).unwrap(),
            "2025-01-01"
        );

        let cell = record(CellDataKind::Styled, "3.14159").with_style(2);
        assert_eq!(lookups.resolve_cell(&cell, &interpreter).unwrap(), "3.14");

        // カスタム書式（ID 165）は日付に分類されるが、日付トークンがないため数値として出力
        let cell = record(CellDataKind::Styled, "2.25").with_style(3);
        assert_eq!(lookups.resolve_cell(&cell, &interpreter).unwrap(), "2.3");
    }

    #[test]
    fn test_resolve_styled_misses() {
        let interpreter = NumberFormatInterpreter::default();
        let lookups = lookups();

        // スタイルインデックスなし
        let cell = record(CellDataKind::Styled, "1");
        assert!(matches!(
            lookups.resolve_cell(&cell, &interpreter),
            Err(XlsxTableError::LookupMiss {
                kind: LookupKind::CellStyle,
                ..
            })
        ));

        // 未定義の書式ID（30）
        let cell = record(CellDataKind::Styled, "1").with_style(4);
        assert!(matches!(
            lookups.resolve_cell(&cell, &interpreter),
            Err(XlsxTableError::LookupMiss {
                kind: LookupKind::NumberFormat,
                ..
            })
        ));
    }
}
