//! Builder Module
//!
//! Fluent Builder APIを提供し、`TableExtractor`インスタンスを段階的に構築する。

use std::collections::HashSet;
use std::io::Write;

use rayon::prelude::*;

use crate::api::{OutputFormat, RowOrder, SectionPolicy};
use crate::error::XlsxTableError;
use crate::formatter::NumberFormatInterpreter;
use crate::lookup::WorkbookLookups;
use crate::output::OutputFormatter;
use crate::table::OutputTable;
use crate::types::{SheetData, SourceRow, TableBounds, TableDeclaration};

/// 抽出処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ExtractionConfig {
    /// データ行の出力順序
    pub row_order: RowOrder,

    /// 書式セクションが不足している場合の扱い
    pub section_policy: SectionPolicy,

    /// 開始位置が終了位置より後ろの範囲をエラーにするか
    pub strict_bounds: bool,

    /// 重複したヘッダー名をエラーにするか
    pub reject_duplicate_headers: bool,

    /// 出力フォーマット
    pub output_format: OutputFormat,
}

/// Fluent Builder APIを提供する構造体
///
/// `TableExtractor`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use xlsxtable::{ExtractorBuilder, OutputFormat, RowOrder};
///
/// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
/// let extractor = ExtractorBuilder::new()
///     .with_row_order(RowOrder::Ascending)
///     .with_output_format(OutputFormat::Json)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    /// 内部設定（構築中）
    config: ExtractionConfig,
}

impl ExtractorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 行の順序: 入力順
    /// - セクション不足: スプレッドシートと同じ規則で補完
    /// - 範囲の検証: しない
    /// - 重複ヘッダー: 許可（最も右の列が優先）
    /// - 出力フォーマット: Markdown
    pub fn new() -> Self {
        Self::default()
    }

    /// データ行の出力順序を指定する
    ///
    /// # 引数
    ///
    /// * `order: RowOrder`: 行の順序
    pub fn with_row_order(mut self, order: RowOrder) -> Self {
        self.config.row_order = order;
        self
    }

    /// 書式セクションが不足している場合の扱いを指定する
    ///
    /// # 引数
    ///
    /// * `policy: SectionPolicy`: セクション不足時の扱い
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxtable::{ExtractorBuilder, SectionPolicy};
    ///
    /// let builder = ExtractorBuilder::new()
    ///     .with_section_policy(SectionPolicy::Strict);
    /// ```
    pub fn with_section_policy(mut self, policy: SectionPolicy) -> Self {
        self.config.section_policy = policy;
        self
    }

    /// 開始位置が終了位置より後ろの範囲をエラーにするかを指定する
    ///
    /// # 引数
    ///
    /// * `strict: bool`:
    ///   * `true`: `XlsxTableError::Config`を返す
    ///   * `false`: そのまま受け入れる（デフォルト）。データ行は抽出されない
    pub fn strict_bounds(mut self, strict: bool) -> Self {
        self.config.strict_bounds = strict;
        self
    }

    /// 重複したヘッダー名をエラーにするかを指定する
    ///
    /// # 引数
    ///
    /// * `reject: bool`:
    ///   * `true`: `XlsxTableError::Config`を返す
    ///   * `false`: 許可する（デフォルト）。名前による参照では最も右の列が優先される
    pub fn reject_duplicate_headers(mut self, reject: bool) -> Self {
        self.config.reject_duplicate_headers = reject;
        self
    }

    /// 出力フォーマットを指定する
    ///
    /// # 引数
    ///
    /// * `format: OutputFormat`: 出力フォーマット（Markdown, JSON, CSV）
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxtable::{ExtractorBuilder, OutputFormat};
    ///
    /// let builder = ExtractorBuilder::new()
    ///     .with_output_format(OutputFormat::Csv);
    /// ```
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// `TableExtractor`インスタンスを生成する
    ///
    /// 現在の設定項目はどの組み合わせも有効なため、常に`Ok`を返します。
    /// 範囲やヘッダーの検証は抽出時に行います。
    ///
    /// # 戻り値
    ///
    /// * `Ok(TableExtractor)`: 構築されたインスタンス
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxtable::ExtractorBuilder;
    ///
    /// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
    /// let extractor = ExtractorBuilder::new().strict_bounds(true).build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<TableExtractor, XlsxTableError> {
        Ok(TableExtractor::new(self.config))
    }
}

/// テーブル抽出処理のファサード
///
/// 宣言されたテーブル範囲とヘッダーに従って、生の行データから`OutputTable`を生成します。
/// `ExtractorBuilder`を使用して構築された設定に基づいて処理を実行します。
///
/// # 使用例
///
/// ```rust
/// use xlsxtable::{
///     CellDataKind, ExtractorBuilder, RawCellRecord, SourceRow, TableBounds, WorkbookLookups,
/// };
///
/// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
/// let extractor = ExtractorBuilder::new().build()?;
/// let lookups = WorkbookLookups::new();
/// let rows = vec![SourceRow::new(
///     2,
///     vec![
///         RawCellRecord::parse("A2", CellDataKind::Text, "Alice")?,
///         RawCellRecord::parse("B2", CellDataKind::PlainNumberOrText, "30")?,
///     ],
/// )];
///
/// let headers = vec!["Name".to_string(), "Age".to_string()];
/// let bounds = TableBounds::parse("A1:B3")?;
/// let table = extractor.extract(&lookups, "People", &headers, &bounds, &rows)?;
///
/// assert_eq!(table.value(0, "Name"), Some("Alice"));
/// assert_eq!(table.value(0, "Age"), Some("30"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TableExtractor {
    /// 抽出設定
    config: ExtractionConfig,

    /// 数値書式インタープリター
    interpreter: NumberFormatInterpreter,
}

impl TableExtractor {
    pub(crate) fn new(config: ExtractionConfig) -> Self {
        Self {
            interpreter: NumberFormatInterpreter::new(config.section_policy),
            config,
        }
    }

    /// 数値書式インタープリターを取得
    pub fn interpreter(&self) -> &NumberFormatInterpreter {
        &self.interpreter
    }

    /// 1つのテーブルを抽出
    ///
    /// # 引数
    ///
    /// * `lookups` - ワークブックの参照テーブル
    /// * `table_name` - テーブル名
    /// * `headers` - 列名（出力列の順序）
    /// * `bounds` - テーブル範囲（先頭行はヘッダー行）
    /// * `rows` - 生の行データ（疎、順不同）
    ///
    /// # 戻り値
    ///
    /// * `Ok(OutputTable)` - 抽出に成功した場合
    /// * `Err(XlsxTableError)` - 設定による検証、またはセルの解決に失敗した場合
    ///
    /// # 処理フロー
    ///
    /// 1. 範囲とヘッダーの検証（設定で有効な場合）
    /// 2. ヘッダー行より下で、範囲内の行を抽出
    /// 3. 範囲内の各セルを解決し、`列インデックス - 開始列`の位置に配置
    pub fn extract(
        &self,
        lookups: &WorkbookLookups,
        table_name: &str,
        headers: &[String],
        bounds: &TableBounds,
        rows: &[SourceRow],
    ) -> Result<OutputTable, XlsxTableError> {
        if self.config.strict_bounds {
            bounds.validate()?;
        }

        if self.config.reject_duplicate_headers {
            Self::check_duplicate_headers(table_name, headers)?;
        }

        OutputTable::build(
            table_name,
            headers,
            bounds,
            rows,
            lookups,
            &self.interpreter,
            self.config.row_order,
        )
    }

    /// 宣言されたテーブルを抽出
    ///
    /// 宣言の範囲文字列（`A1:C10`形式）を解析してから抽出します。
    pub fn extract_declared(
        &self,
        lookups: &WorkbookLookups,
        declaration: &TableDeclaration,
        rows: &[SourceRow],
    ) -> Result<OutputTable, XlsxTableError> {
        let bounds = TableBounds::parse(&declaration.range)?;
        self.extract(
            lookups,
            &declaration.name,
            &declaration.headers,
            &bounds,
            rows,
        )
    }

    /// ワークブック内のすべての宣言済みテーブルを抽出
    ///
    /// テーブルごとに並列に処理します。結果はシートの順序、シート内のテーブル宣言の順序で返します。
    /// いずれかのテーブルでエラーが発生した場合は、そのエラーを返します。
    pub fn extract_workbook(
        &self,
        lookups: &WorkbookLookups,
        sheets: &[SheetData],
    ) -> Result<Vec<OutputTable>, XlsxTableError> {
        let jobs: Vec<(&TableDeclaration, &[SourceRow])> = sheets
            .iter()
            .flat_map(|sheet| {
                sheet
                    .tables
                    .iter()
                    .map(move |declaration| (declaration, sheet.rows.as_slice()))
            })
            .collect();

        log::debug!(
            "Extracting {} tables from {} sheets",
            jobs.len(),
            sheets.len()
        );

        // 並列イテレータのcollectは元の順序を保持する
        jobs.par_iter()
            .map(|(declaration, rows)| self.extract_declared(lookups, declaration, rows))
            .collect()
    }

    /// テーブルを設定された出力フォーマットで書き出す
    ///
    /// # 引数
    ///
    /// * `table` - 出力するテーブル
    /// * `output` - 出力先のライター（Writeトレイトを実装）
    pub fn render<W: Write>(&self, table: &OutputTable, mut output: W) -> Result<(), XlsxTableError> {
        let formatter = OutputFormatter::from_format(self.config.output_format);
        formatter.render(table, &mut output)
    }

    /// テーブルを設定された出力フォーマットの文字列に変換
    pub fn render_to_string(&self, table: &OutputTable) -> Result<String, XlsxTableError> {
        let mut buffer = Vec::new();
        self.render(table, &mut buffer)?;

        let result = String::from_utf8(buffer).map_err(|e| {
            XlsxTableError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(result)
    }

    fn check_duplicate_headers(table_name: &str, headers: &[String]) -> Result<(), XlsxTableError> {
        let mut seen = HashSet::new();
        for header in headers {
            if !seen.insert(header.as_str()) {
                return Err(XlsxTableError::Config(format!(
                    "Duplicate header '{}' in table '{}'",
                    header, table_name
                )));
            }
        }
        Ok(())
    }
}
