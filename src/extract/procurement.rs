//! Procurement Plan Extraction
//!
//! 調達計画（KHLCNT, kế hoạch lựa chọn nhà thầu）の固定レイアウトから
//! 入札パッケージ（gói thầu）ごとのレコードを抽出する。
//!
//! シートの1行目はタイトル行として扱い、2行目以降を「フレーム」と呼びます。
//! フレーム内の座標は次のとおりです。
//!
//! | フレーム行 | 列A の内容 |
//! | --- | --- |
//! | 0 | 計画の名称 |
//! | 1 | `Tên dự án: ...` |
//! | 2 | `...: (Quyết định ...)` |
//! | `STT`の行 + 2 〜 `Tổng giá gói thầu`の直前 | データ行 |

use std::ops::Range;

use log::debug;

use crate::error::DocGenError;
use crate::formatter::{
    after_colon, before_semicolon, format_cell, parse_money, single_line, split_number_and_name,
    strip_parens, MoneyValue,
};
use crate::speller::{spell_currency, NumberSpeller};
use crate::types::{CellValue, RawSheet, Record, TemplateKeySet};

/// 表の開始位置を示すラベル（この行の2行下からデータ）
pub const START_SENTINEL: &str = "STT";
/// 表の終了位置を示すラベル（この行は含まない）
pub const END_SENTINEL: &str = "Tổng giá gói thầu";

/// フレームの先頭で読み飛ばすシート行数
const FRAME_OFFSET: usize = 1;

/// 補助列（A, B, F）を除いた後のデータ列（シート上の列インデックス）
const DATA_COLUMNS: [usize; 12] = [2, 3, 4, 6, 7, 8, 9, 10, 11, 12, 13, 14];
/// 投資主体（列B）
const OWNER_COLUMN: usize = 1;
/// 資金源（列F）
const FUNDING_COLUMN: usize = 5;

/// レコードのフィールド名
pub mod fields {
    pub const TEN_DU_AN: &str = "ten_du_an";
    pub const KE_HOACH_LUA_CHON_NHA_THAU: &str = "ke_hoach_lua_chon_nha_thau";
    pub const TEN_CHU_DAU_TU: &str = "ten_chu_dau_tu";
    pub const NGHI_QUYET_DU_AN: &str = "nghi_quyet_du_an";
    pub const NGUON_VON: &str = "nguon_von";
    pub const SO_GOI_THAU: &str = "so_goi_thau";
    pub const TEN_GOI_THAU: &str = "ten_goi_thau";
    pub const TOM_TAT_CONG_VIEC: &str = "tom_tat_cong_viec";
    pub const GIA_GOI_THAU: &str = "gia_goi_thau";
    pub const GIA_GOI_THAU_BANG_CHU: &str = "gia_goi_thau_bang_chu";
    pub const HINH_THUC_LUA_CHON_NHA_THAU: &str = "hinh_thuc_lua_chon_nha_thau";
    pub const PHUONG_THUC_LUA_CHON_NHA_THAU: &str = "phuong_thuc_lua_chon_nha_thau";
    pub const THOI_GIAN_TO_CHUC_LUA_CHON_NHA_THAU: &str = "thoi_gian_to_chuc_lua_chon_nha_thau";
    pub const THOI_GIAN_BAT_DAU_TO_CHUC_LUA_CHON_NHA_THAU: &str =
        "thoi_gian_bat_dau_to_chuc_lua_chon_nha_thau";
    pub const LOAI_HOP_DONG: &str = "loai_hop_dong";
    pub const THOI_GIAN_THUC_HIEN_GOI_THAU: &str = "thoi_gian_thuc_hien_goi_thau";
    pub const TUY_CHON_MUA_THEM: &str = "tuy_chon_mua_them";
    pub const GIAM_SAT_HOAT_DONG_DAU_THAU: &str = "giam_sat_hoat_dong_dau_thau";
    pub const NHA_THAU_TRUNG_THAU: &str = "nha_thau_trung_thau";
}

use fields::*;

/// フレーム座標でセルを読む
fn frame_cell(sheet: &RawSheet, row: usize, col: usize) -> &CellValue {
    sheet.cell(row + FRAME_OFFSET, col)
}

fn cell_text(value: &CellValue) -> String {
    format_cell(value).trim().to_string()
}

/// 列Aのラベルから表のデータ行の範囲（フレーム座標、終端を含まない）を求める
///
/// どちらのラベルも最後に現れた行が採用されます。
pub(crate) fn locate_table_region<'a, I>(first_column: I) -> Result<Range<usize>, DocGenError>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut start = None;
    let mut end = None;

    for (row, value) in first_column.into_iter().enumerate() {
        match cell_text(value).as_str() {
            START_SENTINEL => start = Some(row + 2),
            END_SENTINEL => end = Some(row),
            _ => {}
        }
    }

    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(start..end),
        _ => Err(DocGenError::Extraction(format!(
            "Table delimiters not found: '{}' ... '{}' (start: {:?}, end: {:?})",
            START_SENTINEL, END_SENTINEL, start, end
        ))),
    }
}

/// 文書全体で共通のフィールド
#[derive(Debug, Clone, Default)]
struct PlanHeader {
    ten_du_an: String,
    nghi_quyet_du_an: String,
    ke_hoach_lua_chon_nha_thau: String,
    ten_chu_dau_tu: String,
    nguon_von: String,
}

impl PlanHeader {
    fn read(sheet: &RawSheet, first_data_row: usize) -> Self {
        let label = |row: usize| format_cell(frame_cell(sheet, row, 0));

        Self {
            ke_hoach_lua_chon_nha_thau: label(0).trim().to_string(),
            ten_du_an: after_colon(&label(1)).to_string(),
            nghi_quyet_du_an: strip_parens(after_colon(&label(2))),
            ten_chu_dau_tu: cell_text(frame_cell(sheet, first_data_row, OWNER_COLUMN)),
            nguon_von: cell_text(frame_cell(sheet, first_data_row, FUNDING_COLUMN)),
        }
    }

    fn fill(&self, record: &mut Record) {
        record.insert(TEN_DU_AN, self.ten_du_an.as_str());
        record.insert(KE_HOACH_LUA_CHON_NHA_THAU, self.ke_hoach_lua_chon_nha_thau.as_str());
        record.insert(TEN_CHU_DAU_TU, self.ten_chu_dau_tu.as_str());
        record.insert(NGHI_QUYET_DU_AN, self.nghi_quyet_du_an.as_str());
        record.insert(NGUON_VON, self.nguon_von.as_str());
    }
}

/// 補助列を除いたデータ行のビュー
struct PackageRow<'a> {
    sheet: &'a RawSheet,
    row: usize,
}

impl<'a> PackageRow<'a> {
    /// 補助列を除いた後の列番号でセルを読む（存在しない列は空）
    fn cell(&self, col: usize) -> &'a CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        match DATA_COLUMNS.get(col) {
            Some(&sheet_col) => frame_cell(self.sheet, self.row, sheet_col),
            None => &EMPTY,
        }
    }

    fn text(&self, col: usize) -> String {
        cell_text(self.cell(col))
    }

    /// 対応するすべてのセルが空（書式化後）かどうか
    fn is_blank(&self) -> bool {
        (0..DATA_COLUMNS.len()).all(|col| self.text(col).is_empty())
    }

    fn to_record(&self, header: &PlanHeader, speller: &dyn NumberSpeller) -> Record {
        let mut record = Record::new();
        header.fill(&mut record);

        let (so_goi_thau, ten_goi_thau) = split_number_and_name(&format_cell(self.cell(0)));
        record.insert(SO_GOI_THAU, so_goi_thau);
        record.insert(TEN_GOI_THAU, ten_goi_thau);
        record.insert(TOM_TAT_CONG_VIEC, self.text(1).replace("None", ""));

        let money = parse_money(self.cell(2));
        let in_words = match &money {
            MoneyValue::Parsed(amount) => spell_currency(speller, *amount),
            MoneyValue::Unparsed(_) => String::new(),
        };
        record.insert(GIA_GOI_THAU, money.display());
        record.insert(GIA_GOI_THAU_BANG_CHU, in_words);

        record.insert(HINH_THUC_LUA_CHON_NHA_THAU, single_line(&format_cell(self.cell(3))));
        record.insert(PHUONG_THUC_LUA_CHON_NHA_THAU, single_line(&format_cell(self.cell(4))));
        record.insert(THOI_GIAN_TO_CHUC_LUA_CHON_NHA_THAU, format_cell(self.cell(5)));
        record.insert(THOI_GIAN_BAT_DAU_TO_CHUC_LUA_CHON_NHA_THAU, format_cell(self.cell(6)));
        record.insert(LOAI_HOP_DONG, self.text(7));
        record.insert(
            THOI_GIAN_THUC_HIEN_GOI_THAU,
            before_semicolon(&format_cell(self.cell(8))),
        );
        record.insert(TUY_CHON_MUA_THEM, self.text(9));
        record.insert(GIAM_SAT_HOAT_DONG_DAU_THAU, self.text(10));
        record.insert(NHA_THAU_TRUNG_THAU, self.text(11));

        record
    }
}

/// 調達計画シートから入札パッケージのレコードを抽出する
///
/// 一部のフィールドだけが入力された行もそのまま受け付けます（必須項目の検証は行いません）。
/// 各レコードにはテンプレートが参照するフィールドだけが残ります。
/// 空行の判定は残すフィールドに関係なく、データ列全体で行います。
///
/// # 引数
///
/// * `sheet` - 調達計画のシート（既定では「Bảng 3」）
/// * `keys` - テンプレートの名前の集合
/// * `speller` - 金額を文字で書き表すための読み上げ機能
///
/// # 戻り値
///
/// * `Ok(Vec<Record>)` - 行順のレコード（すべて空の行は除外）
/// * `Err(DocGenError::Extraction)` - 区切りラベルが見つからない、またはレコードが空の場合
pub fn extract_procurement_plan(
    sheet: &RawSheet,
    keys: &TemplateKeySet,
    speller: &dyn NumberSpeller,
) -> Result<Vec<Record>, DocGenError> {
    let frame_rows = sheet.row_count().saturating_sub(FRAME_OFFSET);
    let first_column: Vec<&CellValue> = (0..frame_rows).map(|r| frame_cell(sheet, r, 0)).collect();
    let region = locate_table_region(first_column)?;
    debug!(
        "Bid package table in sheet '{}': frame rows {}..{}",
        sheet.name(),
        region.start,
        region.end
    );

    let header = PlanHeader::read(sheet, region.start);

    let records: Vec<Record> = region
        .map(|row| PackageRow { sheet, row })
        .filter(|row| !row.is_blank())
        .map(|row| {
            let mut record = row.to_record(&header, speller);
            record.retain_keys(keys);
            record
        })
        .collect();

    if records.is_empty() {
        return Err(DocGenError::Extraction(format!(
            "No bid packages extracted from sheet '{}'",
            sheet.name()
        )));
    }

    Ok(records)
}
