//! Extraction Module
//!
//! `RawSheet`から`Record`の列を取り出す2つの戦略を提供するモジュール。
//!
//! - [`extract_header_table`]: ヘッダー行のラベルをテンプレートの名前と照合する汎用方式
//! - [`extract_procurement_plan`]: 区切りラベルで表の範囲を決める調達計画の固定レイアウト方式
//!
//! どちらも行順を保ち、空行を除外し、結果が空の場合は`DocGenError::Extraction`を返します。

mod header_table;
mod procurement;

pub use header_table::extract_header_table;
pub use procurement::{extract_procurement_plan, fields, END_SENTINEL, START_SENTINEL};
