//! xlsxtable - Table extraction and number-format rendering for spreadsheet cell grids
//!
//! This crate turns the sparse raw cell records of a spreadsheet sheet into named,
//! ordered tables, and renders raw cell values according to spreadsheet number
//! format codes (sign-dependent sections, dates and times, thousands separators,
//! percentages, scientific notation).
//!
//! Reading the spreadsheet container itself is left to the caller: the crate
//! consumes already-decoded raw records and the workbook's lookup tables.
//!
//! # Quick Start
//!
//! ```rust
//! use xlsxtable::{
//!     CellDataKind, ExtractorBuilder, RawCellRecord, SourceRow, TableBounds, WorkbookLookups,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Lookup tables are built once per workbook
//!     let lookups = WorkbookLookups::new()
//!         .with_shared_strings(["Alice", "Bob"])
//!         .with_cell_formats([0, 14]);
//!
//!     let rows = vec![
//!         SourceRow::new(2, vec![
//!             RawCellRecord::parse("A2", CellDataKind::SharedStringRef, "0")?,
//!             RawCellRecord::parse("B2", CellDataKind::Styled, "45658")?.with_style(1),
//!         ]),
//!         SourceRow::new(3, vec![
//!             RawCellRecord::parse("A3", CellDataKind::SharedStringRef, "1")?,
//!         ]),
//!     ];
//!
//!     let extractor = ExtractorBuilder::new().build()?;
//!     let headers = vec!["Name".to_string(), "Joined".to_string()];
//!     let bounds = TableBounds::parse("A1:B3")?;
//!     let table = extractor.extract(&lookups, "Members", &headers, &bounds, &rows)?;
//!
//!     assert_eq!(table.value(0, "Joined"), Some("01-01-25"));
//!     assert_eq!(table.value(1, "Joined"), Some(""));
//!
//!     // Render as a Markdown table
//!     println!("{}", extractor.render_to_string(&table)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Number Formats
//!
//! ```rust
//! use xlsxtable::NumberFormatInterpreter;
//!
//! # fn main() -> Result<(), xlsxtable::XlsxTableError> {
//! let interpreter = NumberFormatInterpreter::default();
//! assert_eq!(interpreter.render("1234.5", 4, "#,##0.00")?, "1,234.50");
//! assert_eq!(interpreter.render("0", 164, "0.00;(0.00);\"zero\"")?, "zero");
//! # Ok(())
//! # }
//! ```
//!
//! # Whole Workbooks
//!
//! ```rust
//! use xlsxtable::{ExtractorBuilder, OutputFormat, SheetData, TableDeclaration, WorkbookLookups};
//!
//! # fn main() -> Result<(), xlsxtable::XlsxTableError> {
//! let sheets = vec![SheetData {
//!     name: "Sheet1".to_string(),
//!     tables: vec![TableDeclaration::new("Empty", vec!["A".to_string()], "A1:A5")],
//!     rows: Vec::new(),
//! }];
//!
//! // Tables are extracted in parallel and returned in declaration order
//! let extractor = ExtractorBuilder::new()
//!     .with_output_format(OutputFormat::Json)
//!     .build()?;
//! let tables = extractor.extract_workbook(&WorkbookLookups::new(), &sheets)?;
//! assert_eq!(tables[0].name(), "Empty");
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod format;
mod formatter;
mod lookup;
mod output;
mod table;
mod types;

// 公開API
pub use api::{OutputFormat, RowOrder, SectionPolicy};
pub use builder::{ExtractorBuilder, TableExtractor};
pub use error::{LookupKind, XlsxTableError};
pub use format::{builtin_format_code, FIRST_CUSTOM_FORMAT_ID};
pub use formatter::NumberFormatInterpreter;
pub use lookup::WorkbookLookups;
pub use table::OutputTable;
pub use types::{
    column_index_of, column_name_of, CellAddress, CellDataKind, RawCellRecord, SheetData,
    SourceRow, TableBounds, TableDeclaration,
};
