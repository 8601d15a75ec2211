//! Formatter Module
//!
//! セル値を表示用文字列に変換する処理と、金額セルの解析を提供するモジュール。
//! どちらの抽出戦略からも同じ関数が使われます。

use crate::types::CellValue;

/// セル値を表示用文字列に変換
///
/// すべての入力に対して文字列を返す全域関数です。
///
/// | 値 | 出力 |
/// | --- | --- |
/// | 空セル | `""` |
/// | 日付と時刻 | `YYYY-MM-DD HH:MM` |
/// | 時刻のみ | `HH:MM` |
/// | 日付のみ | `YYYY-MM-DD` |
/// | 整数値の数値（`5.0`を含む） | `5` |
/// | その他 | 自然な文字列表現 |
pub fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        CellValue::Time(t) => t.format("%H:%M").to_string(),
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        CellValue::Int(i) => i.to_string(),
        CellValue::Float(f) => format_float(*f),
        CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        CellValue::Error(e) => e.clone(),
        CellValue::Text(s) => s.clone(),
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        if f == 0.0 {
            // -0.0も"0"
            return "0".to_string();
        }
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}

/// 金額セルの解析結果
///
/// 解析できなかった場合もエラーにはせず、元の値をそのまま保持します。
#[derive(Debug, Clone, PartialEq)]
pub enum MoneyValue {
    /// 整数の金額として解析できた
    Parsed(u64),
    /// 解析できなかった（元の値）
    Unparsed(CellValue),
}

impl MoneyValue {
    /// 表示用文字列
    pub fn display(&self) -> String {
        match self {
            MoneyValue::Parsed(n) => n.to_string(),
            MoneyValue::Unparsed(v) => format_cell(v),
        }
    }
}

/// 金額セルを解析
///
/// * 整数値はそのまま受け付ける
/// * 浮動小数点数は小数部がゼロの場合のみ受け付ける（切り捨てはしない）
/// * 文字列は桁区切り（`.` `,` 空白）を除去し、残りがすべて数字の場合のみ受け付ける
///
/// それ以外は`MoneyValue::Unparsed`として元の値を返します。
pub fn parse_money(value: &CellValue) -> MoneyValue {
    let parsed = match value {
        CellValue::Int(i) => u64::try_from(*i).ok(),
        CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && *f >= 0.0 => {
            // u64::MAXを超える値は範囲外として扱う
            if *f < 18_446_744_073_709_551_616.0 {
                Some(*f as u64)
            } else {
                None
            }
        }
        CellValue::Text(s) => parse_money_text(s),
        _ => None,
    };

    match parsed {
        Some(n) => MoneyValue::Parsed(n),
        None => MoneyValue::Unparsed(value.clone()),
    }
}

fn parse_money_text(s: &str) -> Option<u64> {
    let digits: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | ',') && !c.is_whitespace())
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// 最初のコロン以降の文字列（前後の空白を除去）
///
/// `"Tên dự án: Trường học"` → `"Trường học"`。コロンがなければ全体を返します。
pub(crate) fn after_colon(s: &str) -> &str {
    let s = s.trim();
    match s.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => s,
    }
}

/// 丸括弧をすべて除去
pub(crate) fn strip_parens(s: &str) -> String {
    s.replace(['(', ')'], "").trim().to_string()
}

/// `"Gói thầu số 01: Xây lắp"` を `("Gói thầu số 01", "Xây lắp")` に分割
///
/// コロンがない場合、番号は空で全体が名称になります。
pub(crate) fn split_number_and_name(s: &str) -> (String, String) {
    let s = s.trim();
    match s.split_once(':') {
        Some((left, right)) => (left.trim().to_string(), right.trim().to_string()),
        None => (String::new(), s.to_string()),
    }
}

/// 最初の`;`より前の部分
pub(crate) fn before_semicolon(s: &str) -> &str {
    let s = s.trim();
    match s.split_once(';') {
        Some((head, _)) => head.trim(),
        None => s,
    }
}

/// 改行を空白に置換して前後の空白を除去
pub(crate) fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace('\n', " ").trim().to_string()
}
