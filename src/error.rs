//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;
use thiserror::Error;

/// xlsxdocgenクレート全体で使用するエラー型
///
/// テンプレートの読み込み、Excelからのレコード抽出、Word文書の生成中に発生する
/// すべてのエラーを統一的に扱うために使用されます。すべてのエラーは致命的で、
/// 発生した時点で処理全体が中断されます（リトライや部分的な成功はありません）。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxdocgen::DocGenError;
/// use std::fs::File;
///
/// fn open_template(path: &str) -> Result<(), DocGenError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum DocGenError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// ZIPアーカイブ（.docx）の読み書きエラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// テンプレートXMLの解析・書き出しエラー
    #[error("XML error: {0}")]
    Xml(String),

    /// 設定または利用方法の誤り
    ///
    /// テンプレートにプレースホルダーが1つもない場合、サポートされていない
    /// 文書タイプが指定された場合、指定シートが存在しない場合などに発生します。
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 入力ファイルが存在しない
    #[error("{kind} not found: {}", path.display())]
    InputNotFound {
        /// 入力の種類（"Excel file" / "Template file"）
        kind: &'static str,
        /// 解決済みのパス
        path: PathBuf,
    },

    /// レコード抽出の失敗
    ///
    /// ヘッダー行や表領域が見つからない場合、フィルタ後のレコードが空の場合に発生します。
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// 上書きが無効で、出力先ファイルが既に存在する
    #[error("Output file already exists: {}", .0.display())]
    FileExists(PathBuf),

    /// 金額の読み上げ（数値→文字列変換）機能が利用できない
    #[error("Missing dependency: {0}")]
    Dependency(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb攻撃、パストラバーサル攻撃などが疑われるテンプレートを
    /// 読み込もうとした場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl From<zip::result::ZipError> for DocGenError {
    fn from(e: zip::result::ZipError) -> Self {
        DocGenError::Zip(e.to_string())
    }
}

impl From<quick_xml::Error> for DocGenError {
    fn from(e: quick_xml::Error) -> Self {
        DocGenError::Xml(e.to_string())
    }
}
