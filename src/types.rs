//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::collections::{btree_map, btree_set, BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// セルの値を表す列挙型
///
/// calamineから読み込んだ値は、取り込み時にこの閉じた列挙型へ変換されます。
/// 以降の処理は実行時の型判定を行わず、この列挙型に対するパターンマッチのみで動作します。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 空セル
    Empty,

    /// 文字列
    Text(String),

    /// 整数
    Int(i64),

    /// 浮動小数点数
    Float(f64),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 日付のみ
    Date(NaiveDate),

    /// 時刻のみ
    Time(NaiveTime),

    /// 日付と時刻
    DateTime(NaiveDateTime),
}

/// シート1枚分のセル値グリッド
///
/// 使用範囲の開始位置に関係なく、常にA1セルを原点(0, 0)とします。
/// 範囲外の座標を読むと`CellValue::Empty`が返ります。
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl RawSheet {
    /// 行データからシートを生成
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// シート名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 指定行のセル（行が存在しない場合は空スライス）
    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 指定座標のセル（範囲外は`Empty`）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.row(row).get(col).unwrap_or(&EMPTY_CELL)
    }
}

/// テンプレートが宣言するプレースホルダー名の集合
///
/// 名前順に整列された集合で、読み込み後は変更されません。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateKeySet(BTreeSet<String>);

impl TemplateKeySet {
    /// 集合が空かどうか
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 要素数
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 名前が含まれるか
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// 名前順のイテレーター
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    /// 名前順のリスト（エラーメッセージ用）
    pub fn sorted(&self) -> Vec<&str> {
        self.0.iter().map(String::as_str).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for TemplateKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a TemplateKeySet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// 1つの出力文書に対応するレコード（プレースホルダー名 → 表示文字列）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    /// 空のレコードを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// フィールドを設定
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// フィールドの値
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// フィールド名のイテレーター
    pub fn keys(&self) -> btree_map::Keys<'_, String, String> {
        self.0.keys()
    }

    /// フィールド数
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// フィールドが1つもないか
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// テンプレートの名前にないフィールドを取り除く
    pub fn retain_keys(&mut self, keys: &TemplateKeySet) {
        self.0.retain(|key, _| keys.contains(key));
    }

    /// すべての値が空文字列か（空行の判定に使用）
    pub fn is_blank(&self) -> bool {
        self.0.values().all(String::is_empty)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
