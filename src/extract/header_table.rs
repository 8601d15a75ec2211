//! Header Table Extraction
//!
//! ヘッダー行のラベルがテンプレートのプレースホルダー名と一致する、単純な表からの抽出。
//! 列の順序はテンプレートと無関係で、ヘッダーのラベルで列を特定します。

use std::collections::BTreeMap;

use log::debug;

use crate::error::DocGenError;
use crate::formatter::format_cell;
use crate::types::{CellValue, RawSheet, Record, TemplateKeySet};

/// ヘッダー行の探索結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeaderMatch {
    /// すべての名前が列に対応した最初の行
    Found {
        row: usize,
        /// プレースホルダー名 → 列インデックス
        columns: BTreeMap<String, usize>,
    },
    /// 条件を満たす行がない
    NotFound,
}

/// ヘッダーセルの正規化（BOMを除去し、前後の空白を除去）
fn clean_header_cell(value: &CellValue) -> String {
    format_cell(value).replace('\u{feff}', "").trim().to_string()
}

/// 上から順に走査し、すべての名前が列に対応する最初の行を探す
///
/// 同じ名前が1行に複数回現れる場合は最も左の列を採用します。
/// 1つでも名前が見つからない行はその時点で打ち切ります。
pub(crate) fn find_header_row(sheet: &RawSheet, keys: &TemplateKeySet) -> HeaderMatch {
    'rows: for row in 0..sheet.row_count() {
        let labels: Vec<String> = sheet.row(row).iter().map(clean_header_cell).collect();

        let mut columns = BTreeMap::new();
        for key in keys {
            match labels.iter().position(|label| label == key) {
                Some(col) => {
                    columns.insert(key.clone(), col);
                }
                None => continue 'rows,
            }
        }

        return HeaderMatch::Found { row, columns };
    }

    HeaderMatch::NotFound
}

/// ヘッダー一致方式でレコードを抽出する
///
/// # 戻り値
///
/// * `Ok(Vec<Record>)` - ヘッダー行より下の非空行（各レコードのキーはテンプレートの名前と一致）
/// * `Err(DocGenError::Configuration)` - 名前の集合が空の場合
/// * `Err(DocGenError::Extraction)` - ヘッダー行が見つからない、またはレコードが空の場合
pub fn extract_header_table(
    sheet: &RawSheet,
    keys: &TemplateKeySet,
) -> Result<Vec<Record>, DocGenError> {
    if keys.is_empty() {
        return Err(DocGenError::Configuration(
            "Template key set is empty".to_string(),
        ));
    }

    let (header_row, columns) = match find_header_row(sheet, keys) {
        HeaderMatch::Found { row, columns } => (row, columns),
        HeaderMatch::NotFound => {
            return Err(DocGenError::Extraction(format!(
                "No matching header row in sheet '{}'; required placeholders: {:?}",
                sheet.name(),
                keys.sorted()
            )))
        }
    };
    debug!(
        "Header row found at row {} of sheet '{}'",
        header_row + 1,
        sheet.name()
    );

    let records: Vec<Record> = (header_row + 1..sheet.row_count())
        .map(|row| {
            columns
                .iter()
                .map(|(key, &col)| (key.as_str(), format_cell(sheet.cell(row, col))))
                .collect::<Record>()
        })
        .filter(|record| !record.is_blank())
        .collect();

    if records.is_empty() {
        return Err(DocGenError::Extraction(format!(
            "No records below the header row in sheet '{}'",
            sheet.name()
        )));
    }

    Ok(records)
}
