//! Security Tests
//!
//! テンプレート（.docx）読み込み時のセキュリティ対策を検証します。
//! ZIP bomb攻撃、パストラバーサル攻撃への対策が対象です。

use std::io::{Cursor, Write};
use xlsxdocgen::{DocGenError, DocxTemplate};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

const DOCUMENT: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{{ten}}</w:t></w:r></w:p></w:body></w:document>"#;

/// `word/document.xml`に加えて`extra`のエントリを持つアーカイブ
fn archive_with(extra: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip_data = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_data));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(DOCUMENT).unwrap();
        for (name, data) in extra {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }

        zip.finish().unwrap();
    }
    zip_data
}

/// ZIP bomb攻撃のテスト: 大量のファイルを含むZIPアーカイブ
#[test]
fn test_zip_bomb_too_many_files() {
    // 10,001個のファイルを含むZIPアーカイブを作成（上限: 10,000）
    let names: Vec<String> = (0..10_000).map(|i| format!("word/media/file{}.bin", i)).collect();
    let extra: Vec<(&str, &[u8])> = names.iter().map(|n| (n.as_str(), &b"x"[..])).collect();

    let result = DocxTemplate::from_reader(Cursor::new(archive_with(&extra)));

    match result {
        Err(DocGenError::SecurityViolation(msg)) => assert!(msg.contains("too many files")),
        other => panic!("Expected SecurityViolation error, got {:?}", other.map(|_| ())),
    }
}

/// ZIP bomb攻撃のテスト: 単一エントリの展開後サイズが大きすぎる
#[test]
#[ignore] // 大きなデータを作成するため、通常のテストではスキップ
fn test_zip_bomb_large_entry() {
    // 100MB + 1バイト
    let large_data = vec![0u8; 104_857_601];
    let result =
        DocxTemplate::from_reader(Cursor::new(archive_with(&[("word/media/big.bin", large_data.as_slice())])));

    match result {
        Err(DocGenError::SecurityViolation(msg)) => assert!(msg.contains("exceeds maximum size")),
        other => panic!("Expected SecurityViolation error, got {:?}", other.map(|_| ())),
    }
}

/// パストラバーサル攻撃のテスト: `..`を含むパス
#[test]
fn test_path_traversal_dotdot() {
    let result = DocxTemplate::from_reader(Cursor::new(archive_with(&[("../etc/passwd", &b"x"[..])])));

    match result {
        Err(DocGenError::SecurityViolation(msg)) => assert!(msg.contains("Invalid ZIP path")),
        other => panic!("Expected SecurityViolation error, got {:?}", other.map(|_| ())),
    }
}

/// パストラバーサル攻撃のテスト: 絶対パス
#[test]
fn test_path_traversal_absolute_path() {
    let result = DocxTemplate::from_reader(Cursor::new(archive_with(&[("/etc/passwd", &b"x"[..])])));
    assert!(matches!(result, Err(DocGenError::SecurityViolation(_))));
}

/// 正常なテンプレートの読み込みが成功することを確認
#[test]
fn test_valid_template() {
    let template = DocxTemplate::from_reader(Cursor::new(archive_with(&[(
        "word/styles.xml",
        &b"<w:styles/>"[..],
    )])))
    .unwrap();

    assert_eq!(template.discover_keys().unwrap().sorted(), vec!["ten"]);
}
