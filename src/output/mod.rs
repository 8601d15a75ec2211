//! Output Module
//!
//! レコードごとにテンプレートを描画し、連番のWord文書として書き出すモジュール。

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::DocGenError;
use crate::parser::DocxTemplate;
use crate::types::{Record, TemplateKeySet};

/// 出力ファイル名の最小桁数
const MIN_PAD_WIDTH: usize = 3;

/// 出力ファイル名の桁数（`max(3, レコード数の桁数)`）
pub fn pad_width(total: usize) -> usize {
    total.to_string().len().max(MIN_PAD_WIDTH)
}

/// `n`番目（1始まり）の出力ファイル名
///
/// ```rust
/// use xlsxdocgen::output_file_name;
///
/// assert_eq!(output_file_name(7, 12), "007.docx");
/// assert_eq!(output_file_name(7, 1000), "0007.docx");
/// ```
pub fn output_file_name(n: usize, total: usize) -> String {
    format!("{:0width$}.docx", n, width = pad_width(total))
}

/// テンプレートの名前すべてを持つ描画用コンテキストを組み立てる
///
/// レコードにない名前は空文字列になります。
fn build_context(keys: &TemplateKeySet, record: &Record) -> Record {
    keys.iter()
        .map(|key| (key.as_str(), record.get(key).unwrap_or_default()))
        .collect()
}

/// すべてのレコードを描画して出力ディレクトリに書き出す
///
/// ファイルはインデックス順に書き出され、途中で失敗しても書き出し済みのファイルは残ります。
/// 各文書はメモリ上で描画してから書き出すため、描画に失敗した文書のファイルは作られません。
///
/// # 引数
///
/// * `template` - 読み込み済みのテンプレート（描画ごとに元の状態から組み立てられる）
/// * `keys` - テンプレートの名前の集合
/// * `records` - 抽出済みのレコード
/// * `output_dir` - 出力先（存在しなければ親ディレクトリも含めて作成）
/// * `replace` - `false`の場合、既存のファイルがあれば描画前にエラーとする
///
/// # 戻り値
///
/// * `Ok(Vec<PathBuf>)` - 書き出したファイルのパス（インデックス順）
/// * `Err(DocGenError::Extraction)` - レコードが空の場合
/// * `Err(DocGenError::FileExists)` - 上書きが無効で出力先が既に存在する場合
pub fn render_documents(
    template: &DocxTemplate,
    keys: &TemplateKeySet,
    records: &[Record],
    output_dir: &Path,
    replace: bool,
) -> Result<Vec<PathBuf>, DocGenError> {
    if records.is_empty() {
        return Err(DocGenError::Extraction("No records to render".to_string()));
    }

    fs::create_dir_all(output_dir)?;

    let total = records.len();
    let mut written = Vec::with_capacity(total);

    for (index, record) in records.iter().enumerate() {
        let path = output_dir.join(output_file_name(index + 1, total));
        if !replace && path.exists() {
            return Err(DocGenError::FileExists(path));
        }

        // 描画に失敗した場合は出力ファイルを作らない
        let document = template.render(&build_context(keys, record))?;
        fs::write(&path, document)?;

        info!("Generated {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_width() {
        assert_eq!(pad_width(1), 3);
        assert_eq!(pad_width(7), 3);
        assert_eq!(pad_width(999), 3);
        assert_eq!(pad_width(1000), 4);
        assert_eq!(pad_width(12345), 5);
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(1, 7), "001.docx");
        assert_eq!(output_file_name(42, 100), "042.docx");
        assert_eq!(output_file_name(1000, 1000), "1000.docx");
        assert_eq!(output_file_name(1, 1000), "0001.docx");
    }

    #[test]
    fn test_context_covers_every_key() {
        let keys: TemplateKeySet = ["a", "b", "c"].into_iter().collect();
        let record: Record = [("a", "1"), ("z", "ignored")].into_iter().collect();

        let context = build_context(&keys, &record);
        assert_eq!(context.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(context.get("a"), Some("1"));
        assert_eq!(context.get("b"), Some(""));
        assert_eq!(context.get("z"), None);
    }

    #[test]
    fn test_failed_render_leaves_no_file() {
        use std::io::{Cursor, Write};
        use zip::write::FileOptions;
        use zip::ZipWriter;

        // 終了タグが対応しない文書は描画時にXMLエラーになる
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", FileOptions::default()).unwrap();
        zip.write_all(b"<w:document><w:body><w:p><w:r><w:t>{{a}}</w:t></w:r></w:x></w:body></w:document>")
            .unwrap();
        let docx = zip.finish().unwrap().into_inner();
        let template = DocxTemplate::from_reader(Cursor::new(docx)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let keys: TemplateKeySet = ["a"].into_iter().collect();
        let records = vec![[("a", "1")].into_iter().collect::<Record>()];

        let result = render_documents(&template, &keys, &records, dir.path(), true);
        assert!(matches!(result, Err(DocGenError::Xml(_))));
        assert!(!dir.path().join("001.docx").exists());
    }
}
