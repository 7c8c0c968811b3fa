//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! セル参照（A1形式）、テーブル範囲、外部から受け取る生のセルレコードを扱います。

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::XlsxTableError;

/// アルファベットの文字数（列名の基数）
const ALPHABET_COUNT: u32 = 26;

/// 列名を列インデックスに変換（"A" -> 1, "Z" -> 26, "AA" -> 27）
///
/// 0に相当する桁を持たない全単射26進数として解釈します。
/// 英大文字以外を含む場合、空文字列の場合、`u32`に収まらない場合は`None`を返します。
pub fn column_index_of(column_name: &str) -> Option<u32> {
    if column_name.is_empty() {
        return None;
    }

    let mut index: u32 = 0;
    for ch in column_name.bytes() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        let digit = u32::from(ch - b'A') + 1;
        index = index.checked_mul(ALPHABET_COUNT)?.checked_add(digit)?;
    }
    Some(index)
}

/// 列インデックスを列名に変換（1 -> "A", 26 -> "Z", 27 -> "AA"）
///
/// `column_index_of`の逆変換です。0の場合は空文字列を返します。
pub fn column_name_of(column_index: u32) -> String {
    let mut letters = Vec::new();
    let mut div = column_index;

    while div > 0 {
        let rem = (div - 1) % ALPHABET_COUNT;
        letters.push(b'A' + rem as u8);
        div = (div - rem) / ALPHABET_COUNT;
    }

    letters.iter().rev().map(|&b| b as char).collect()
}

/// A1形式のセル参照（列・行とも1始まり）
///
/// 構築後は不変です。列インデックスは構築時に列名から一度だけ算出されます。
///
/// 順序は行優先です。まず行番号で比較し、同じ行の場合に列番号で比較します。
/// そのため`B1 < A2`となります。
///
/// # 使用例
///
/// ```rust
/// use xlsxtable::CellAddress;
///
/// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
/// let address = CellAddress::parse("AB12")?;
/// assert_eq!(address.column_index(), 28);
/// assert_eq!(address.row_index(), 12);
/// assert_eq!(CellAddress::create(28, 12)?.to_string(), "AB12");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CellAddress {
    /// 列名（英大文字のみ）
    column_name: String,

    /// 列インデックス（1始まり、列名から算出）
    column_index: u32,

    /// 行番号（1始まり）
    row_index: u32,
}

impl CellAddress {
    /// A1形式の文字列をパース
    ///
    /// 先頭の英大文字の連続を列名、それに続く数字の連続を行番号として取り出します。
    /// それ以外の文字が含まれる場合はエラーになります。
    ///
    /// # 戻り値
    ///
    /// * `Ok(CellAddress)` - パース成功
    /// * `Err(XlsxTableError::AddressFormat)` - 形式が不正な場合
    /// * `Err(XlsxTableError::OutOfRange)` - 行番号が0の場合
    pub fn parse(text: &str) -> Result<Self, XlsxTableError> {
        let letters = text.bytes().take_while(u8::is_ascii_uppercase).count();
        let (column_name, digits) = text.split_at(letters);

        if column_name.is_empty()
            || digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(XlsxTableError::AddressFormat(text.to_string()));
        }

        let row_index = digits
            .parse::<u32>()
            .map_err(|_| XlsxTableError::AddressFormat(text.to_string()))?;
        let column_index = column_index_of(column_name)
            .ok_or_else(|| XlsxTableError::AddressFormat(text.to_string()))?;

        Self::validated(column_name.to_string(), column_index, row_index)
    }

    /// 列インデックスと行番号から生成
    ///
    /// # 戻り値
    ///
    /// * `Ok(CellAddress)` - 生成成功
    /// * `Err(XlsxTableError::OutOfRange)` - 列インデックスまたは行番号が0の場合
    pub fn create(column_index: u32, row_index: u32) -> Result<Self, XlsxTableError> {
        if column_index == 0 {
            return Err(XlsxTableError::OutOfRange {
                name: "Column index",
                value: column_index,
            });
        }

        Self::validated(column_name_of(column_index), column_index, row_index)
    }

    fn validated(
        column_name: String,
        column_index: u32,
        row_index: u32,
    ) -> Result<Self, XlsxTableError> {
        if row_index == 0 {
            return Err(XlsxTableError::OutOfRange {
                name: "Row index",
                value: row_index,
            });
        }

        Ok(Self {
            column_name,
            column_index,
            row_index,
        })
    }

    /// 列名
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// 列インデックス（1始まり）
    pub fn column_index(&self) -> u32 {
        self.column_index
    }

    /// 行番号（1始まり）
    pub fn row_index(&self) -> u32 {
        self.row_index
    }
}

impl PartialEq for CellAddress {
    fn eq(&self, other: &Self) -> bool {
        self.row_index == other.row_index && self.column_index == other.column_index
    }
}

impl Eq for CellAddress {}

impl Hash for CellAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row_index.hash(state);
        self.column_index.hash(state);
    }
}

impl Ord for CellAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row_index
            .cmp(&other.row_index)
            .then(self.column_index.cmp(&other.column_index))
    }
}

impl PartialOrd for CellAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_name, self.row_index)
    }
}

impl FromStr for CellAddress {
    type Err = XlsxTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// テーブル範囲（`A1:C10`形式、両端を含む矩形）
///
/// 開始セルの行はヘッダー行、その次の行から終了セルの行までがデータ行です。
/// 開始セルが終了セルより前にあることは構築時に検証しません
/// （検証が必要な場合は`validate()`または`ExtractorBuilder::strict_bounds`を使用します）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBounds {
    start: CellAddress,
    end: CellAddress,
}

impl TableBounds {
    /// 開始セルと終了セルから生成
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// `A1:B2`形式の文字列をパース
    ///
    /// # 戻り値
    ///
    /// * `Ok(TableBounds)` - パース成功
    /// * `Err(XlsxTableError::RangeFormat)` - 区切り文字`:`がちょうど1つでない場合、
    ///   またはどちらかのセル参照が不正な場合
    pub fn parse(text: &str) -> Result<Self, XlsxTableError> {
        let mut parts = text.split(':');
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(XlsxTableError::RangeFormat(text.to_string()));
        };

        let start = CellAddress::parse(start)
            .map_err(|e| XlsxTableError::RangeFormat(format!("{} ({})", text, e)))?;
        let end = CellAddress::parse(end)
            .map_err(|e| XlsxTableError::RangeFormat(format!("{} ({})", text, e)))?;

        Ok(Self::new(start, end))
    }

    /// 開始セル（ヘッダー行の左端）
    pub fn start(&self) -> &CellAddress {
        &self.start
    }

    /// 終了セル（最終データ行の右端）
    pub fn end(&self) -> &CellAddress {
        &self.end
    }

    /// 最初のデータ行（ヘッダー行の直下）
    pub fn first_data_row(&self) -> u32 {
        self.start.row_index.saturating_add(1)
    }

    /// 最後のデータ行（両端を含む）
    pub fn last_data_row(&self) -> u32 {
        self.end.row_index
    }

    /// 開始列インデックス（両端を含む）
    pub fn start_column(&self) -> u32 {
        self.start.column_index
    }

    /// 終了列インデックス（両端を含む）
    pub fn end_column(&self) -> u32 {
        self.end.column_index
    }

    /// 指定された行がデータ行の範囲内にあるかを判定
    pub fn contains_data_row(&self, row_index: u32) -> bool {
        row_index >= self.first_data_row() && row_index <= self.last_data_row()
    }

    /// 指定された列が列範囲内にあるかを判定
    pub fn contains_column(&self, column_index: u32) -> bool {
        column_index >= self.start_column() && column_index <= self.end_column()
    }

    /// 列範囲内の列について、出力列の位置（0始まり）を返す
    pub fn column_offset(&self, column_index: u32) -> Option<usize> {
        if self.contains_column(column_index) {
            Some((column_index - self.start_column()) as usize)
        } else {
            None
        }
    }

    /// 範囲の列数（開始列が終了列より後ろの場合は0）
    pub fn width(&self) -> usize {
        if self.end_column() < self.start_column() {
            0
        } else {
            (self.end_column() - self.start_column() + 1) as usize
        }
    }

    /// 開始セルが行・列とも終了セル以前にあることを検証
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 範囲が正しい向きの場合
    /// * `Err(XlsxTableError::Config)` - 開始が終了より後ろの場合
    pub fn validate(&self) -> Result<(), XlsxTableError> {
        if self.start.row_index > self.end.row_index {
            return Err(XlsxTableError::Config(format!(
                "Invalid range {}: start row ({}) > end row ({})",
                self, self.start.row_index, self.end.row_index
            )));
        }

        if self.start.column_index > self.end.column_index {
            return Err(XlsxTableError::Config(format!(
                "Invalid range {}: start col ({}) > end col ({})",
                self, self.start.column_index, self.end.column_index
            )));
        }

        Ok(())
    }
}

impl fmt::Display for TableBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for TableBounds {
    type Err = XlsxTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// セルデータの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellDataKind {
    /// インライン文字列（そのまま出力）
    Text,

    /// 共有文字列テーブルへの参照（生テキストはインデックス）
    SharedStringRef,

    /// スタイル付きの値（数値書式を適用）
    Styled,

    /// スタイルなしの数値または文字列（そのまま出力）
    PlainNumberOrText,
}

/// セルレコードの供給元から受け取る生のセルデータ
#[derive(Debug, Clone, PartialEq)]
pub struct RawCellRecord {
    /// セル参照
    pub address: CellAddress,

    /// データの種類
    pub kind: CellDataKind,

    /// 生のテキスト
    pub raw_text: String,

    /// スタイルインデックス（`CellDataKind::Styled`の場合に使用）
    pub style_index: Option<u32>,
}

impl RawCellRecord {
    /// 新しいレコードを生成（スタイルなし）
    pub fn new(address: CellAddress, kind: CellDataKind, raw_text: impl Into<String>) -> Self {
        Self {
            address,
            kind,
            raw_text: raw_text.into(),
            style_index: None,
        }
    }

    /// A1形式のセル参照文字列からレコードを生成
    pub fn parse(
        address: &str,
        kind: CellDataKind,
        raw_text: impl Into<String>,
    ) -> Result<Self, XlsxTableError> {
        Ok(Self::new(CellAddress::parse(address)?, kind, raw_text))
    }

    /// スタイルインデックスを設定
    pub fn with_style(mut self, style_index: u32) -> Self {
        self.style_index = Some(style_index);
        self
    }
}

/// シートの1行分の生データ
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceRow {
    /// 行番号（1始まり）
    pub row_index: u32,

    /// 行に含まれるセル（疎、順不同）
    pub cells: Vec<RawCellRecord>,
}

impl SourceRow {
    /// 新しい行を生成
    pub fn new(row_index: u32, cells: Vec<RawCellRecord>) -> Self {
        Self { row_index, cells }
    }
}

/// シート上で宣言されたテーブル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDeclaration {
    /// テーブル名
    pub name: String,

    /// ヘッダー名（出力列の順序）
    pub headers: Vec<String>,

    /// 宣言された範囲（`A1:C10`形式）
    pub range: String,
}

impl TableDeclaration {
    /// 新しいテーブル宣言を生成
    pub fn new<S: Into<String>>(name: S, headers: Vec<String>, range: S) -> Self {
        Self {
            name: name.into(),
            headers,
            range: range.into(),
        }
    }
}

/// 1シート分の入力（テーブル宣言と生の行データ）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetData {
    /// シート名
    pub name: String,

    /// シート上のテーブル宣言
    pub tables: Vec<TableDeclaration>,

    /// シートの生の行データ
    pub rows: Vec<SourceRow>,
}
