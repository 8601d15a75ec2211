//! Parser Module
//!
//! 入力ファイルの解析を担当するモジュール。
//! Excelはcalamineで`RawSheet`に、WordテンプレートはZIP + quick-xmlで読み込みます。

mod paragraph;
mod template;
mod workbook;

pub use template::DocxTemplate;
pub(crate) use workbook::WorkbookParser;
