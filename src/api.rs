//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;
use std::str::FromStr;

use crate::error::DocGenError;

/// 調達計画（KHLCNT）モードの既定シート名
pub const DEFAULT_PROCUREMENT_SHEET: &str = "Bảng 3";

/// 生成する文書の種類（レコード抽出戦略）
///
/// Excelの構造に応じて、どの抽出戦略を使用するかを指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocType {
    /// 調達計画（KHLCNT）の固定レイアウト
    ///
    /// 1列目の `"STT"` と `"Tổng giá gói thầu"` で区切られた表から
    /// 入札パッケージ（gói thầu）ごとのレコードを抽出します。
    ProcurementPlan,

    /// ヘッダー行がテンプレートのプレースホルダー名と一致する単純な表
    ///
    /// 列の順序は任意で、ヘッダーのラベルで列を特定します。
    HeaderTable,
}

impl DocType {
    /// このモードで使用する既定のシート名（`None`は最初のシート）
    pub fn default_sheet(&self) -> Option<&'static str> {
        match self {
            DocType::ProcurementPlan => Some(DEFAULT_PROCUREMENT_SHEET),
            DocType::HeaderTable => None,
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocType::ProcurementPlan => write!(f, "procurement-plan"),
            DocType::HeaderTable => write!(f, "header-table"),
        }
    }
}

impl FromStr for DocType {
    type Err = DocGenError;

    /// 文書タイプ名を解析する
    ///
    /// 旧来の名前（`goi_thau_khlcnt`, `header_table`）も受け付けます。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "procurement-plan" | "goi_thau_khlcnt" => Ok(DocType::ProcurementPlan),
            "header-table" | "header_table" => Ok(DocType::HeaderTable),
            other => Err(DocGenError::Configuration(format!(
                "Unsupported doc type: '{}' (expected 'procurement-plan' or 'header-table')",
                other
            ))),
        }
    }
}
