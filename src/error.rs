//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::fmt;

use thiserror::Error;

/// 参照テーブルの種類
///
/// `XlsxTableError::LookupMiss`で、どのテーブルの参照に失敗したかを示します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// 共有文字列テーブル（インデックス → 文字列）
    SharedString,

    /// 数値書式テーブル（書式ID → 書式コード）
    NumberFormat,

    /// セルスタイルテーブル（スタイルインデックス → 書式ID）
    CellStyle,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupKind::SharedString => "shared string",
            LookupKind::NumberFormat => "number format",
            LookupKind::CellStyle => "cell style",
        };
        f.write_str(name)
    }
}

/// xlsxtableクレート全体で使用するエラー型
///
/// セル参照の解析、テーブル範囲の解析、数値書式の適用、参照テーブルの解決など、
/// すべての処理で発生するエラーを統一的に扱うために使用されます。
///
/// すべてのエラーは検出された時点で同期的に返され、クレート内部でのリトライや
/// 回復処理は行いません。行やテーブルをスキップするかどうかは呼び出し側が判断します。
///
/// # 使用例
///
/// ```rust
/// use xlsxtable::{CellAddress, XlsxTableError};
///
/// let result: Result<CellAddress, XlsxTableError> = "1A".parse();
/// assert!(matches!(result, Err(XlsxTableError::AddressFormat(_))));
/// ```
#[derive(Error, Debug)]
pub enum XlsxTableError {
    /// A1形式のセル参照が不正
    ///
    /// 英大文字の列名と数字の行番号の組（例: `B12`）になっていない場合に発生します。
    #[error("Expected reference of form \"A1\", got '{0}'")]
    AddressFormat(String),

    /// `A1:B2`形式の範囲参照が不正
    ///
    /// 区切り文字`:`がちょうど1つでない場合、またはどちらかのセル参照が不正な場合に発生します。
    #[error("Expected reference of form \"A1:B2\", got '{0}'")]
    RangeFormat(String),

    /// 列・行インデックスが範囲外（1未満）
    #[error("{name} should be greater than zero, got {value}")]
    OutOfRange {
        /// インデックスの名前（"Column index" / "Row index"）
        name: &'static str,
        /// 指定された値
        value: u32,
    },

    /// 符号に対応するセクションが書式コードに存在しない
    ///
    /// `SectionPolicy::Strict`の場合のみ発生します。
    #[error("Format '{pattern}' has no section {section} (only {available} present)")]
    FormatSection {
        /// 書式コード
        pattern: String,
        /// 選択されたセクション番号（0始まり）
        section: usize,
        /// 書式コードに含まれるセクション数
        available: usize,
    },

    /// 参照テーブルの解決に失敗
    ///
    /// 共有文字列インデックス、書式ID、スタイルインデックスが見つからない場合に発生します。
    /// 推測による代替値は使用しません。
    #[error("Unresolved {kind} lookup: '{key}'")]
    LookupMiss {
        /// 参照テーブルの種類
        kind: LookupKind,
        /// 解決できなかったキー
        key: String,
    },

    /// シリアル日付値が暦の表現範囲外
    #[error("Serial date {0} is outside the representable calendar range")]
    SerialDate(f64),

    /// 設定の検証に失敗したエラー
    ///
    /// `strict_bounds`や`reject_duplicate_headers`を有効にした抽出で、範囲やヘッダーが不正な場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON出力時のシリアライズエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_address_format_display() {
        let error = XlsxTableError::AddressFormat("1A".to_string());
        let msg = error.to_string();
        assert!(msg.contains("\"A1\""));
        assert!(msg.contains("'1A'"));
    }

    #[test]
    fn test_range_format_display() {
        let error = XlsxTableError::RangeFormat("A1:B2:C3".to_string());
        let msg = error.to_string();
        assert!(msg.contains("\"A1:B2\""));
        assert!(msg.contains("A1:B2:C3"));
    }

    #[test]
    fn test_out_of_range_display() {
        let error = XlsxTableError::OutOfRange {
            name: "Row index",
            value: 0,
        };
        assert_eq!(error.to_string(), "Row index should be greater than zero, got 0");
    }

    #[test]
    fn test_format_section_display() {
        let error = XlsxTableError::FormatSection {
            pattern: "0.00".to_string(),
            section: 1,
            available: 1,
        };
        let msg = error.to_string();
        assert!(msg.contains("'0.00'"));
        assert!(msg.contains("section 1"));
    }

    #[test]
    fn test_lookup_miss_display() {
        let error = XlsxTableError::LookupMiss {
            kind: LookupKind::SharedString,
            key: "42".to_string(),
        };
        assert_eq!(error.to_string(), "Unresolved shared string lookup: '42'");

        let error = XlsxTableError::LookupMiss {
            kind: LookupKind::CellStyle,
            key: "7".to_string(),
        };
        assert!(error.to_string().contains("cell style"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let error: XlsxTableError = io_err.into();

        match error {
            XlsxTableError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            _ => panic!("Expected Io error"),
        }
    }

    // エラー変換のテスト（?演算子の動作確認）
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn json_operation() -> Result<serde_json::Value, XlsxTableError> {
            Ok(serde_json::from_str("{not json")?)
        }

        match json_operation() {
            Err(XlsxTableError::Json(_)) => {}
            _ => panic!("Expected Json error from ? operator"),
        }
    }

    #[test]
    fn test_config_error_display() {
        let error = XlsxTableError::Config("duplicate header 'Name'".to_string());
        assert!(error.to_string().starts_with("Configuration error"));
    }
}
