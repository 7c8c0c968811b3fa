//! Formatter Module
//!
//! 生のセル値を数値書式に従って表示文字列に変換するモジュール。

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::api::SectionPolicy;
use crate::error::XlsxTableError;
use crate::format::{FormatParser, FIRST_CUSTOM_FORMAT_ID, SECONDS_PER_DAY};

/// 数値書式インタープリター
///
/// 生のテキストと書式ID・書式コードから表示文字列を生成します。
/// 状態を持たないため、複数スレッドから共有して使用できます。
///
/// # 使用例
///
/// ```rust
/// use xlsxtable::{NumberFormatInterpreter, SectionPolicy};
///
/// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
/// let interpreter = NumberFormatInterpreter::new(SectionPolicy::ExcelFallback);
/// assert_eq!(interpreter.render("5", 164, "0.00;(0.00);\"zero\"")?, "5.00");
/// assert_eq!(interpreter.render("-5", 164, "0.00;(0.00);\"zero\"")?, "(5.00)");
/// assert_eq!(interpreter.render("45658", 14, "mm-dd-yy")?, "01-01-25");
/// assert_eq!(interpreter.render("N/A", 2, "0.00")?, "N/A");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberFormatInterpreter {
    /// 書式セクションが不足している場合の扱い
    policy: SectionPolicy,
}

impl NumberFormatInterpreter {
    /// 新しいインタープリターを生成
    pub fn new(policy: SectionPolicy) -> Self {
        Self { policy }
    }

    /// セクション不足時の扱いを取得
    pub fn policy(&self) -> SectionPolicy {
        self.policy
    }

    /// 書式IDが日付・時刻書式に分類されるかどうかを判定
    ///
    /// ID 14〜22（組み込みの日付・時刻書式）と、カスタム書式（164以上）を日付として扱います。
    /// カスタム書式の判定はヒューリスティックです。
    pub fn is_date_format(format_id: u32) -> bool {
        (14..=22).contains(&format_id) || format_id >= FIRST_CUSTOM_FORMAT_ID
    }

    /// 生のテキストを書式に従って表示文字列に変換
    ///
    /// # 引数
    ///
    /// * `raw_text` - セルの生のテキスト
    /// * `format_id` - 数値書式ID
    /// * `pattern` - 書式コード（最大4セクション）
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 表示文字列。有限の数値として解釈できないテキストはそのまま返す
    /// * `Err(XlsxTableError::FormatSection)` - `SectionPolicy::Strict`でセクションが不足している場合
    /// * `Err(XlsxTableError::SerialDate)` - 日付として表現できないシリアル値の場合
    pub fn render(
        &self,
        raw_text: &str,
        format_id: u32,
        pattern: &str,
    ) -> Result<String, XlsxTableError> {
        // 1. 数値でなければそのまま返す
        let value = match raw_text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => return Ok(raw_text.to_string()),
        };

        // 2. 書式コードを解析し、符号に応じたセクションを選択
        let parser = FormatParser::parse(pattern);
        let (section, negative_sign) = parser.select_section(value, self.policy)?;

        // 3. 日付に分類されるIDで、日付・時刻トークンを含むセクションは日付として出力
        let date_format = Self::is_date_format(format_id);
        if date_format && section.is_datetime() {
            let datetime = DateFormatter::to_datetime(value)?;
            return Ok(parser.format_datetime(section, datetime, value));
        }

        if date_format != section.is_datetime() {
            log::debug!(
                "Format {} ('{}') does not match its date classification, rendering {} as a number",
                format_id,
                pattern,
                value
            );
        }

        // 4. 数値として出力
        Ok(parser.format_numeric(value, section, negative_sign))
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を日時に変換します。
///
/// # エポックシステム
///
/// 1900年システムのみを扱います。
/// シリアル値0 = 1899年12月30日とすることで、シリアル値61以降（1900年3月1日以降）は
/// Excelの1900年うるう年バグの影響を受けずに正しい日付になります。
#[derive(Debug)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// 表現可能な最大シリアル値（10000年1月1日）
    const MAX_SERIAL: f64 = 2_958_466.0;

    /// 表現可能な最小シリアル値（0100年1月1日）
    const MIN_SERIAL: f64 = -657_434.0;

    /// シリアル値を日時に変換
    ///
    /// 小数部は時刻として扱い、秒単位に四捨五入します。
    pub fn to_datetime(serial: f64) -> Result<NaiveDateTime, XlsxTableError> {
        if !(Self::MIN_SERIAL..Self::MAX_SERIAL).contains(&serial) {
            return Err(XlsxTableError::SerialDate(serial));
        }

        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| XlsxTableError::Config("Invalid epoch date".to_string()))?;

        let seconds = (serial * SECONDS_PER_DAY).round() as i64;
        epoch
            .checked_add_signed(Duration::seconds(seconds))
            .ok_or(XlsxTableError::SerialDate(serial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn render(raw: &str, format_id: u32, pattern: &str) -> String {
        NumberFormatInterpreter::default()
            .render(raw, format_id, pattern)
            .unwrap()
    }

    #[test]
    fn test_is_date_format() {
        assert!(NumberFormatInterpreter::is_date_format(14));
        assert!(NumberFormatInterpreter::is_date_format(22));
        assert!(NumberFormatInterpreter::is_date_format(200));
        assert!(NumberFormatInterpreter::is_date_format(FIRST_CUSTOM_FORMAT_ID));
        assert!(!NumberFormatInterpreter::is_date_format(1));
        assert!(!NumberFormatInterpreter::is_date_format(13));
        assert!(!NumberFormatInterpreter::is_date_format(23));
        assert!(!NumberFormatInterpreter::is_date_format(163));
    }

    #[test]
    fn test_render_non_numeric_passthrough() {
        assert_eq!(render("Alice", 2, "0.00"), "Alice");
        assert_eq!(render("", 2, "0.00"), "");
        assert_eq!(render("NaN", 2, "0.00"), "NaN");
        assert_eq!(render("inf", 14, "mm-dd-yy"), "inf");
    }

    #[test]
    fn test_render_section_selection() {
        let pattern = "0.00;(0.00);\"zero\"";
        assert_eq!(render("5", 164, pattern), "5.00");
        assert_eq!(render("-5", 164, pattern), "(5.00)");
        assert_eq!(render("0", 164, pattern), "zero");
    }

    #[test]
    fn test_render_strict_missing_section() {
        let interpreter = NumberFormatInterpreter::new(SectionPolicy::Strict);
        let result = interpreter.render("-5", 2, "0.00");
        assert!(matches!(
            result,
            Err(XlsxTableError::FormatSection { section: 1, .. })
        ));
        assert_eq!(interpreter.render("5", 2, "0.00").unwrap(), "5.00");
    }

    #[test]
    fn test_render_builtin_numeric() {
        assert_eq!(render("30", 0, "General"), "30");
        assert_eq!(render("1234.5678", 4, "#,##0.00"), "1,234.57");
        assert_eq!(render("0.256", 9, "0%"), "26%");
    }

    #[test]
    fn test_render_dates() {
        assert_eq!(render("45658", 14, "mm-dd-yy"), "01-01-25");
        assert_eq!(render("45658", 164, "yyyy-mm-dd"), "2025-01-01");
        assert_eq!(render("45658.75", 22, "m/d/yy h:mm"), "1/1/25 18:00");
    }

    #[test]
    fn test_render_elapsed_time() {
        assert_eq!(render("1.25", 164, "[h]:mm:ss"), "30:00:00");
    }

    #[test]
    fn test_render_date_pattern_with_numeric_id() {
        // 日付に分類されないIDは、日付書式でも数値として出力
        assert_eq!(render("45658", 1, "yyyy-mm-dd"), "45658");
        assert_eq!(render("1.25", 46, "[h]:mm:ss"), "1.25");
        assert_eq!(render("-2.5", 1, "yyyy-mm-dd"), "-2.5");
    }

    #[test]
    fn test_render_quoted_slash_keeps_numeric_layout() {
        assert_eq!(render("3.5", 165, "0.00\" m/s\""), "3.50 m/s");
        assert_eq!(render("1234", 165, "#,##0\"/month\""), "1,234/month");
        assert_eq!(render("1.5", 165, "# ?/?"), "1.5");
    }

    #[test]
    fn test_render_escaped_quote_is_dropped() {
        assert_eq!(render("5", 2, "\\\"0"), "5");
    }

    #[test]
    fn test_render_rounds_decimal_halves_up() {
        assert_eq!(render("1.005", 2, "0.00"), "1.01");
        assert_eq!(render("0.285", 2, "0.00"), "0.29");
        assert_eq!(render("-1.005", 2, "0.00"), "-1.01");
        assert_eq!(render("2.675", 4, "#,##0.00"), "2.68");
    }

    #[test]
    fn test_render_date_id_without_date_tokens() {
        // 日付に分類されるIDでも、日付トークンがなければ数値として出力
        assert_eq!(render("3.14159", 170, "0.000"), "3.142");
    }

    #[test]
    fn test_render_filler_pattern() {
        assert_eq!(render("5", 164, "_* 0.00_* "), " 5.00 ");
    }

    #[test]
    fn test_render_serial_out_of_range() {
        let result = NumberFormatInterpreter::default().render("3000000", 14, "mm-dd-yy");
        assert!(matches!(result, Err(XlsxTableError::SerialDate(_))));
    }

    #[test]
    fn test_to_datetime_epoch() {
        let datetime = DateFormatter::to_datetime(0.0).unwrap();
        assert_eq!(datetime.year(), 1899);
        assert_eq!(datetime.month(), 12);
        assert_eq!(datetime.day(), 30);

        let datetime = DateFormatter::to_datetime(61.0).unwrap();
        assert_eq!((datetime.year(), datetime.month(), datetime.day()), (1900, 3, 1));
    }

    #[test]
    fn test_to_datetime_rounds_to_second() {
        // 12:00:00.4 -> 12:00:00
        let datetime = DateFormatter::to_datetime(0.5 + 0.4 / SECONDS_PER_DAY).unwrap();
        assert_eq!((datetime.hour(), datetime.minute(), datetime.second()), (12, 0, 0));

        // 23:59:59.6 -> 翌日 00:00:00
        let datetime = DateFormatter::to_datetime(1.0 - 0.4 / SECONDS_PER_DAY).unwrap();
        assert_eq!(datetime.day(), 31);
        assert_eq!(datetime.hour(), 0);
    }
}
