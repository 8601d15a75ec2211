//! xlsxdocgen - Batch-generate Word documents from Excel rows
//!
//! This crate reads one sheet of an Excel workbook, turns its rows into records and renders
//! one Word (`.docx`) document per record by substituting `{{placeholder}}` markers in a template.
//! It targets Vietnamese public-procurement paperwork (bid-package lists from a
//! contractor-selection plan, "KHLCNT"), but also supports any simple table whose header row
//! matches the template's placeholder names.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxdocgen::GeneratorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Procurement-plan mode with the default sheet "Bảng 3"
//!     let generator = GeneratorBuilder::new().build()?;
//!
//!     let report = generator.generate(
//!         Path::new("KHLCNT.xlsx"),
//!         Path::new("template.docx"),
//!         Path::new("output"),
//!     )?;
//!
//!     // output/001.docx, output/002.docx, ...
//!     println!("Generated {} document(s)", report.count());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Header-Matched Tables
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxdocgen::{DocType, GeneratorBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = GeneratorBuilder::new()
//!         .with_doc_type(DocType::HeaderTable)
//!         .with_sheet_name("Danh sách")
//!         .replace(false) // fail instead of overwriting existing files
//!         .build()?;
//!
//!     let records = generator.extract_records(Path::new("data.xlsx"), Path::new("letter.docx"))?;
//!     for record in &records {
//!         println!("{:?}", record);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod error;
mod extract;
mod formatter;
mod output;
mod parser;
mod security;
mod speller;
mod types;

// 公開API
pub use api::{DocType, DEFAULT_PROCUREMENT_SHEET};
pub use builder::{list_sheet_names, GenerationReport, Generator, GeneratorBuilder};
pub use error::DocGenError;
pub use extract::{
    extract_header_table, extract_procurement_plan, fields, END_SENTINEL, START_SENTINEL,
};
pub use formatter::{format_cell, parse_money, MoneyValue};
pub use output::{output_file_name, pad_width, render_documents};
pub use parser::DocxTemplate;
pub use speller::{spell_currency, NumberSpeller, VietnameseSpeller, CURRENCY_WORD};
pub use types::{CellValue, RawSheet, Record, TemplateKeySet};
