//! Builder Module
//!
//! Fluent Builder APIを提供し、`Generator`インスタンスを段階的に構築する。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::api::DocType;
use crate::error::DocGenError;
use crate::extract::{extract_header_table, extract_procurement_plan};
use crate::output::render_documents;
use crate::parser::{DocxTemplate, WorkbookParser};
use crate::speller::{NumberSpeller, VietnameseSpeller};
use crate::types::{Record, TemplateKeySet};

/// 生成処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct GenerationConfig {
    /// 文書タイプ（抽出戦略）
    pub doc_type: DocType,

    /// 読み込むシート名（`None`の場合は文書タイプの既定）
    pub sheet_name: Option<String>,

    /// 既存の出力ファイルを上書きするか
    pub replace: bool,

    /// 金額の読み上げ機能
    pub speller: Option<Arc<dyn NumberSpeller>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            doc_type: DocType::ProcurementPlan,
            sheet_name: None,
            replace: true,
            speller: Some(Arc::new(VietnameseSpeller)),
        }
    }
}

impl GenerationConfig {
    /// 実際に読み込むシート名（`None`は最初のシート）
    fn effective_sheet(&self) -> Option<&str> {
        self.sheet_name
            .as_deref()
            .or_else(|| self.doc_type.default_sheet())
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxdocgen::{DocType, GeneratorBuilder};
///
/// # fn main() -> Result<(), xlsxdocgen::DocGenError> {
/// let generator = GeneratorBuilder::new()
///     .with_doc_type(DocType::HeaderTable)
///     .with_sheet_name("Sheet1")
///     .replace(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GeneratorBuilder {
    /// 内部設定（構築中）
    config: GenerationConfig,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 文書タイプ: 調達計画（`DocType::ProcurementPlan`）
    /// - シート: 文書タイプの既定（調達計画は「Bảng 3」）
    /// - 上書き: 有効
    /// - 読み上げ: `VietnameseSpeller`
    pub fn new() -> Self {
        Self {
            config: GenerationConfig::default(),
        }
    }

    /// 文書タイプ（抽出戦略）を指定する
    pub fn with_doc_type(mut self, doc_type: DocType) -> Self {
        self.config.doc_type = doc_type;
        self
    }

    /// 読み込むシートを名前で指定する
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.sheet_name = Some(name.into());
        self
    }

    /// 既存の出力ファイルを上書きするかを指定する
    ///
    /// `false`の場合、出力先に同名のファイルがあると`DocGenError::FileExists`になります。
    pub fn replace(mut self, replace: bool) -> Self {
        self.config.replace = replace;
        self
    }

    /// 金額の読み上げ機能を差し替える
    pub fn with_speller(mut self, speller: Arc<dyn NumberSpeller>) -> Self {
        self.config.speller = Some(speller);
        self
    }

    /// 金額の読み上げ機能を外す
    ///
    /// 調達計画モードでは生成時に`DocGenError::Dependency`になります。
    pub fn without_speller(mut self) -> Self {
        self.config.speller = None;
        self
    }

    /// 設定を検証して`Generator`を構築する
    ///
    /// # エラー
    ///
    /// * `DocGenError::Configuration` - シート名が空文字列の場合
    pub fn build(self) -> Result<Generator, DocGenError> {
        if let Some(name) = &self.config.sheet_name {
            if name.trim().is_empty() {
                return Err(DocGenError::Configuration(
                    "Sheet name must not be empty".to_string(),
                ));
            }
        }

        Ok(Generator::new(self.config))
    }
}

/// 生成結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// 書き出したファイル（インデックス順）
    pub written: Vec<PathBuf>,
}

impl GenerationReport {
    /// 生成した文書の数
    pub fn count(&self) -> usize {
        self.written.len()
    }
}

/// 文書生成処理のファサード
///
/// テンプレートの名前の収集、レコードの抽出、文書の描画を順に実行します。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::path::Path;
/// use xlsxdocgen::GeneratorBuilder;
///
/// # fn main() -> Result<(), xlsxdocgen::DocGenError> {
/// let generator = GeneratorBuilder::new().build()?;
/// let report = generator.generate(
///     Path::new("KHLCNT.xlsx"),
///     Path::new("template.docx"),
///     Path::new("output"),
/// )?;
/// println!("Generated {} document(s)", report.count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Generator {
    /// 生成設定
    config: GenerationConfig,
}

impl Generator {
    pub(crate) fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// 文書タイプ
    pub fn doc_type(&self) -> DocType {
        self.config.doc_type
    }

    /// Excelとテンプレートから文書を一括生成する
    ///
    /// # 処理フロー
    ///
    /// 1. 入力パスの解決と存在確認
    /// 2. 読み上げ機能の確認（調達計画モード）
    /// 3. テンプレートの読み込みと名前の収集
    /// 4. シートの読み込みとレコード抽出
    /// 5. レコードごとの描画と書き出し
    ///
    /// # エラー
    ///
    /// * `DocGenError::InputNotFound` - 入力ファイルが存在しない場合
    /// * `DocGenError::Dependency` - 調達計画モードで読み上げ機能がない場合
    /// * `DocGenError::Configuration` - テンプレートに名前がない、またはシートが存在しない場合
    /// * `DocGenError::Extraction` - レコードを抽出できない場合
    /// * `DocGenError::FileExists` - 上書きが無効で出力先が存在する場合
    pub fn generate(
        &self,
        excel_path: &Path,
        template_path: &Path,
        output_dir: &Path,
    ) -> Result<GenerationReport, DocGenError> {
        let excel_path = resolve_input("Excel file", excel_path)?;
        let template_path = resolve_input("Template file", template_path)?;
        let speller = self.required_speller()?;

        let template = DocxTemplate::open(&template_path)?;
        let keys = template.discover_keys()?;
        info!("Template placeholders: {:?}", keys.sorted());

        let records = self.extract_with(&excel_path, &keys, speller)?;
        info!(
            "Extracted {} record(s) from {}",
            records.len(),
            excel_path.display()
        );

        let written = render_documents(
            &template,
            &keys,
            &records,
            output_dir,
            self.config.replace,
        )?;

        Ok(GenerationReport { written })
    }

    /// 文書を書き出さずにレコードだけを抽出する
    pub fn extract_records(
        &self,
        excel_path: &Path,
        template_path: &Path,
    ) -> Result<Vec<Record>, DocGenError> {
        let excel_path = resolve_input("Excel file", excel_path)?;
        let template_path = resolve_input("Template file", template_path)?;
        let speller = self.required_speller()?;

        let keys = DocxTemplate::open(&template_path)?.discover_keys()?;
        self.extract_with(&excel_path, &keys, speller)
    }

    /// テンプレートが参照する名前を収集する
    pub fn discover_keys(&self, template_path: &Path) -> Result<TemplateKeySet, DocGenError> {
        let template_path = resolve_input("Template file", template_path)?;
        DocxTemplate::open(&template_path)?.discover_keys()
    }

    /// 調達計画モードで必要な読み上げ機能を取得する
    fn required_speller(&self) -> Result<Option<&dyn NumberSpeller>, DocGenError> {
        match (self.config.doc_type, &self.config.speller) {
            (DocType::ProcurementPlan, None) => Err(missing_speller()),
            (_, speller) => Ok(speller.as_deref()),
        }
    }

    fn extract_with(
        &self,
        excel_path: &Path,
        keys: &TemplateKeySet,
        speller: Option<&dyn NumberSpeller>,
    ) -> Result<Vec<Record>, DocGenError> {
        let mut workbook = WorkbookParser::open(excel_path)?;
        let sheet = workbook.read_sheet(self.config.effective_sheet())?;
        debug!(
            "Read sheet '{}' ({} rows) as {}",
            sheet.name(),
            sheet.row_count(),
            self.config.doc_type
        );

        match (self.config.doc_type, speller) {
            (DocType::ProcurementPlan, Some(speller)) => {
                extract_procurement_plan(&sheet, keys, speller)
            }
            (DocType::ProcurementPlan, None) => Err(missing_speller()),
            (DocType::HeaderTable, _) => extract_header_table(&sheet, keys),
        }
    }
}

fn missing_speller() -> DocGenError {
    DocGenError::Dependency("Number-to-words speller is required for procurement plans".to_string())
}

/// ワークブックのシート名を一覧する
pub fn list_sheet_names(excel_path: &Path) -> Result<Vec<String>, DocGenError> {
    let excel_path = resolve_input("Excel file", excel_path)?;
    Ok(WorkbookParser::open(&excel_path)?.sheet_names())
}

/// 入力パスの存在を確認し、絶対パスに解決する
fn resolve_input(kind: &'static str, path: &Path) -> Result<PathBuf, DocGenError> {
    if !path.is_file() {
        return Err(DocGenError::InputNotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(path.canonicalize()?)
}
