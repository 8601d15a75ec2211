//! Workbook Parser Module
//!
//! calamineを使用してExcelファイルを読み込み、シートを`RawSheet`に変換します。
//! XLSX以外（XLS, XLSB, ODS）もcalamineの自動判定で読み込めます。

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;

use crate::error::DocGenError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, RawSheet};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// ワークブックパーサー
///
/// calamineのラッパーとして、シート名の取得とシートの読み込みを提供します。
pub(crate) struct WorkbookParser {
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `path` - Excelファイルのパス
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(DocGenError::SecurityViolation)` - ファイルサイズが上限を超える場合
    /// * `Err(DocGenError::Parse)` - calamineが解析できない場合
    pub fn open(path: &Path) -> Result<Self, DocGenError> {
        let security_config = SecurityConfig::default();

        // セキュリティチェック: 入力ファイルサイズの上限
        let size = std::fs::metadata(path)?.len();
        if size > security_config.max_input_file_size {
            return Err(DocGenError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                size, security_config.max_input_file_size
            )));
        }

        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シートを読み込む
    ///
    /// # 引数
    ///
    /// * `sheet_name` - シート名（`None`の場合は最初のシート）
    ///
    /// # 戻り値
    ///
    /// * `Ok(RawSheet)` - A1を原点とするセルグリッド
    /// * `Err(DocGenError::Configuration)` - シートが見つからない場合
    pub fn read_sheet(&mut self, sheet_name: Option<&str>) -> Result<RawSheet, DocGenError> {
        let all_sheet_names = self.sheet_names();

        let name = match sheet_name {
            Some(name) => {
                if !all_sheet_names.iter().any(|n| n == name) {
                    return Err(DocGenError::Configuration(format!(
                        "Sheet '{}' not found (available: {})",
                        name,
                        all_sheet_names.join(", ")
                    )));
                }
                name.to_string()
            }
            None => all_sheet_names.first().cloned().ok_or_else(|| {
                DocGenError::Configuration("Workbook contains no sheets".to_string())
            })?,
        };

        let range = self.workbook.worksheet_range(&name)?;
        let sheet = sheet_from_range(&name, &range);
        debug!("Read sheet '{}': {} rows", name, sheet.row_count());
        Ok(sheet)
    }
}

/// calamineの範囲をA1原点のグリッドに変換
///
/// calamineの`Range`は最初の非空セルから始まるため、開始位置までを空セルで埋めます。
pub(crate) fn sheet_from_range(name: &str, range: &Range<Data>) -> RawSheet {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); first_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; first_col as usize];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }

    RawSheet::new(name, rows)
}

/// calamineのセル値を`CellValue`に変換
pub(crate) fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTime(dt) => convert_excel_datetime(dt),
        Data::DateTimeIso(s) => parse_iso_datetime(s),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        #[allow(unreachable_patterns)]
        _ => CellValue::Empty,
    }
}

fn convert_excel_datetime(dt: &ExcelDateTime) -> CellValue {
    let serial = dt.as_f64();

    if dt.is_duration() {
        return duration_value(serial);
    }

    match dt.as_datetime() {
        Some(datetime) => classify_serial(serial, datetime),
        None => CellValue::Float(serial),
    }
}

/// シリアル値の形から日付・時刻・日時を判定
///
/// * 小数部がゼロ → 日付のみ
/// * 1日未満 → 時刻のみ
/// * それ以外 → 日時
fn classify_serial(serial: f64, datetime: NaiveDateTime) -> CellValue {
    if serial.fract() == 0.0 {
        CellValue::Date(datetime.date())
    } else if (0.0..1.0).contains(&serial) {
        CellValue::Time(datetime.time())
    } else {
        CellValue::DateTime(datetime)
    }
}

/// 1日未満の経過時間は時刻として扱う
fn duration_value(days: f64) -> CellValue {
    if (0.0..1.0).contains(&days) {
        let seconds = (days * SECONDS_PER_DAY).round() as u32 % 86_400;
        if let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0) {
            return CellValue::Time(time);
        }
    }
    CellValue::Float(days)
}

/// ISO 8601形式の日時文字列（ODSなど）を解析
fn parse_iso_datetime(s: &str) -> CellValue {
    let raw = s.trim().trim_end_matches('Z');

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return CellValue::Date(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return if datetime.time() == NaiveTime::MIN {
            CellValue::Date(datetime.date())
        } else {
            CellValue::DateTime(datetime)
        };
    }
    if let Ok(time) = NaiveTime::parse_from_str(raw, "%H:%M:%S%.f") {
        return CellValue::Time(time);
    }

    CellValue::Text(s.to_string())
}
