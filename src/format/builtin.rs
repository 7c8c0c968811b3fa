//! Builtin Format Module
//!
//! 定義済み（組み込み）数値書式IDと書式コードの対応表を提供します。
//! ID 0〜163が予約されていますが、言語依存のID（23〜36, 50〜163）は定義しません。

/// カスタム書式IDの開始値（これ未満は組み込み書式として予約）
pub const FIRST_CUSTOM_FORMAT_ID: u32 = 164;

/// 組み込み書式IDに対応する書式コードを取得
///
/// 未定義のIDの場合は`None`を返します。
///
/// # 使用例
///
/// ```rust
/// use xlsxtable::builtin_format_code;
///
/// assert_eq!(builtin_format_code(0), Some("General"));
/// assert_eq!(builtin_format_code(14), Some("mm-dd-yy"));
/// assert_eq!(builtin_format_code(30), None);
/// ```
pub fn builtin_format_code(format_id: u32) -> Option<&'static str> {
    let code = match format_id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        5 => "\"$\"#,##0_);(\"$\"#,##0)",
        6 => "\"$\"#,##0_);[Red](\"$\"#,##0)",
        7 => "\"$\"#,##0.00_);(\"$\"#,##0.00)",
        8 => "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        41 => "_(* #,##0_);_(* \\(#,##0\\);_(* \"-\"_);_(@_)",
        42 => "_(\"$\"* #,##0_);_(\"$\"* \\(#,##0\\);_(\"$\"* \"-\"_);_(@_)",
        43 => "_(* #,##0.00_);_(* \\(#,##0.00\\);_(* \"-\"??_);_(@_)",
        44 => "_(\"$\"* #,##0.00_);_(\"$\"* \\(#,##0.00\\);_(\"$\"* \"-\"??_);_(@_)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}
