//! Format Module
//!
//! Excel Number Format Stringの構文解析と適用を提供します。

mod builtin;
mod parser;
mod sections;
mod tokens;

pub use builtin::{builtin_format_code, FIRST_CUSTOM_FORMAT_ID};
pub(crate) use parser::{FormatParser, SECONDS_PER_DAY};
