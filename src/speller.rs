//! Number Speller Module
//!
//! 金額を文字で書き表す機能（ベトナム語の数詞読み）を提供するモジュール。
//! `Generator`には`NumberSpeller`として注入され、差し替えが可能です。

use std::fmt::Debug;

/// 通貨単位（ベトナム・ドン）
pub const CURRENCY_WORD: &str = "đồng";

const UNITS: [&str; 10] = [
    "không", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín",
];

/// 桁区切りの単位（1000^1, 1000^2, 1000^3）
const SCALES: [(u64, &str); 3] = [
    (1_000_000_000, "tỷ"),
    (1_000_000, "triệu"),
    (1_000, "nghìn"),
];

/// 非負整数を文字列に読み上げる機能
pub trait NumberSpeller: Debug + Send + Sync {
    /// `n`の読みを返す（先頭は小文字）
    fn spell(&self, n: u64) -> String;
}

/// ベトナム語の数詞読み
///
/// ```rust
/// use xlsxdocgen::{NumberSpeller, VietnameseSpeller};
///
/// assert_eq!(VietnameseSpeller.spell(21), "hai mươi mốt");
/// assert_eq!(VietnameseSpeller.spell(105), "một trăm lẻ năm");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VietnameseSpeller;

impl NumberSpeller for VietnameseSpeller {
    fn spell(&self, n: u64) -> String {
        spell_vietnamese(n)
    }
}

fn spell_vietnamese(n: u64) -> String {
    if n < 1000 {
        return spell_hundreds(n);
    }

    // 1000^4以上は「tỷ」を繰り返す（例: hai nghìn tỷ）
    let (scale, word) = SCALES
        .iter()
        .copied()
        .find(|(scale, _)| n >= *scale)
        .unwrap_or((1_000, "nghìn"));

    let head = n / scale;
    let rest = n % scale;

    let mut words = format!("{} {}", spell_vietnamese(head), word);
    if rest > 0 {
        if rest <= 99 {
            words.push_str(" lẻ");
        }
        words.push(' ');
        words.push_str(&spell_vietnamese(rest));
    }
    words
}

/// 0〜999の読み
fn spell_hundreds(n: u64) -> String {
    debug_assert!(n < 1000);
    let hundreds = n / 100;
    let rest = n % 100;

    if hundreds == 0 {
        return spell_tens(rest);
    }

    let mut words = format!("{} trăm", UNITS[hundreds as usize]);
    match rest {
        0 => {}
        1..=9 => {
            words.push_str(" lẻ ");
            words.push_str(UNITS[rest as usize]);
        }
        _ => {
            words.push(' ');
            words.push_str(&spell_tens(rest));
        }
    }
    words
}

/// 0〜99の読み
fn spell_tens(n: u64) -> String {
    debug_assert!(n < 100);
    let tens = n / 10;
    let unit = n % 10;

    match (tens, unit) {
        (0, u) => UNITS[u as usize].to_string(),
        (1, 0) => "mười".to_string(),
        (1, 5) => "mười lăm".to_string(),
        (1, u) => format!("mười {}", UNITS[u as usize]),
        (t, 0) => format!("{} mươi", UNITS[t as usize]),
        (t, 1) => format!("{} mươi mốt", UNITS[t as usize]),
        (t, 5) => format!("{} mươi lăm", UNITS[t as usize]),
        (t, u) => format!("{} mươi {}", UNITS[t as usize], UNITS[u as usize]),
    }
}

/// 金額の読みを文書用に整形
///
/// 先頭文字を大文字にし、通貨単位を付加します。
///
/// ```rust
/// use xlsxdocgen::{spell_currency, VietnameseSpeller};
///
/// assert_eq!(
///     spell_currency(&VietnameseSpeller, 1_500_000),
///     "Một triệu năm trăm nghìn đồng"
/// );
/// ```
pub fn spell_currency(speller: &dyn NumberSpeller, amount: u64) -> String {
    let words = speller.spell(amount);
    let mut chars = words.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{} {}", capitalized, CURRENCY_WORD)
}
