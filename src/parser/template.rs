//! Template Parser Module
//!
//! Wordテンプレート（.docx = ZIPアーカイブ）を読み込み、プレースホルダーの検出と
//! レコードを埋め込んだ文書の生成を行うモジュール。

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use log::debug;
use regex::Regex;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DocGenError;
use crate::parser::paragraph::{rewrite_paragraphs, Replacement};
use crate::security::{validate_zip_path, SecurityConfig};
use crate::types::{Record, TemplateKeySet};

/// `{{ name }}` 形式のプレースホルダー
const PLACEHOLDER_PATTERN: &str = r"\{\{\s*(\w+)\s*\}\}";

/// ZIPアーカイブ内の1エントリ
#[derive(Debug, Clone)]
struct ArchiveEntry {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// メモリ上に展開したWordテンプレート
///
/// 読み込み後は変更されず、`render`は毎回この元データから新しい文書を組み立てます。
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    entries: Vec<ArchiveEntry>,
    placeholder: Regex,
}

impl DocxTemplate {
    /// ファイルからテンプレートを読み込む
    pub fn open(path: &Path) -> Result<Self, DocGenError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// リーダーからテンプレートを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(DocxTemplate)` - 読み込みに成功した場合
    /// * `Err(DocGenError::Zip)` - ZIPアーカイブとして読めない場合
    /// * `Err(DocGenError::SecurityViolation)` - エントリ数・サイズ・パスが制限に違反する場合
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, DocGenError> {
        let security_config = SecurityConfig::default();
        let mut archive = ZipArchive::new(reader)?;
        security_config.check_entry_count(archive.len())?;

        let mut total_decompressed_size = 0u64;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            validate_zip_path(&name).map_err(|e| {
                DocGenError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;
            security_config.check_entry_size(&name, file.size(), &mut total_decompressed_size)?;

            let mut data = Vec::with_capacity(file.size() as usize);
            if !file.is_dir() {
                file.read_to_end(&mut data)?;
            }
            entries.push(ArchiveEntry {
                name,
                data,
                is_dir: file.is_dir(),
            });
        }

        if !entries.iter().any(|e| e.name == "word/document.xml") {
            return Err(DocGenError::Zip(
                "Template is missing word/document.xml".to_string(),
            ));
        }

        let placeholder = Regex::new(PLACEHOLDER_PATTERN)
            .map_err(|e| DocGenError::Configuration(format!("Invalid placeholder pattern: {}", e)))?;

        Ok(Self {
            entries,
            placeholder,
        })
    }

    /// テンプレートが参照するプレースホルダー名を収集する
    ///
    /// 本文・ヘッダー・フッター・脚注・文末脚注が対象です。
    ///
    /// # 戻り値
    ///
    /// * `Ok(TemplateKeySet)` - 1つ以上のプレースホルダーが見つかった場合
    /// * `Err(DocGenError::Configuration)` - プレースホルダーが1つもない場合
    pub fn discover_keys(&self) -> Result<TemplateKeySet, DocGenError> {
        let mut names = BTreeSet::new();

        for entry in self.entries.iter().filter(|e| is_template_part(&e.name)) {
            rewrite_paragraphs(&entry.data, |text| {
                for caps in self.placeholder.captures_iter(text) {
                    names.insert(caps[1].to_string());
                }
                Vec::new()
            })?;
        }

        if names.is_empty() {
            return Err(DocGenError::Configuration(
                "Template has no placeholders ({{...}})".to_string(),
            ));
        }

        debug!("Discovered {} placeholder(s): {:?}", names.len(), names);
        Ok(names.into_iter().collect())
    }

    /// コンテキストを埋め込んだ文書をバイト列として生成する
    ///
    /// コンテキストにない名前は空文字列として出力されます。
    pub fn render(&self, context: &Record) -> Result<Vec<u8>, DocGenError> {
        let mut output = Cursor::new(Vec::new());
        self.render_to(context, &mut output)?;
        Ok(output.into_inner())
    }

    /// コンテキストを埋め込んだ文書をライターに書き出す
    pub fn render_to<W: Write + Seek>(&self, context: &Record, writer: W) -> Result<(), DocGenError> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)?;
                continue;
            }

            zip.start_file(entry.name.as_str(), options)?;
            if is_template_part(&entry.name) {
                let rendered = self.render_part(&entry.data, context)?;
                zip.write_all(&rendered)?;
            } else {
                zip.write_all(&entry.data)?;
            }
        }

        let mut writer = zip.finish()?;
        writer.flush()?;
        Ok(())
    }

    fn render_part(&self, xml: &[u8], context: &Record) -> Result<Vec<u8>, DocGenError> {
        rewrite_paragraphs(xml, |text| {
            self.placeholder
                .captures_iter(text)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let value = context.get(&caps[1]).unwrap_or_default();
                    Some(Replacement {
                        range: whole.range(),
                        value: value.to_string(),
                    })
                })
                .collect()
        })
    }
}

/// プレースホルダーを含み得るパートかどうか
fn is_template_part(name: &str) -> bool {
    if name == "word/document.xml"
        || name == "word/footnotes.xml"
        || name == "word/endnotes.xml"
    {
        return true;
    }

    match name.strip_prefix("word/") {
        Some(rest) => {
            !rest.contains('/')
                && rest.ends_with(".xml")
                && (rest.starts_with("header") || rest.starts_with("footer"))
        }
        None => false,
    }
}
