//! Shared fixtures for integration tests
//!
//! Workbooks are generated with rust_xlsxwriter, templates are assembled as minimal
//! WordprocessingML packages with the zip crate.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Wrap paragraph XML into a `word/document.xml` body
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    )
}

/// One paragraph with one run per text fragment
pub fn paragraph(runs: &[&str]) -> String {
    let runs: String = runs
        .iter()
        .map(|t| format!("<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>", t))
        .collect();
    format!("<w:p>{}</w:p>", runs)
}

/// Build a .docx package from a document body (paragraph XML)
pub fn docx_bytes(body: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(ROOT_RELS.as_bytes()).unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document_xml(body).as_bytes()).unwrap();

    zip.finish().unwrap().into_inner()
}

pub fn write_docx(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, docx_bytes(body)).unwrap();
    path
}

/// Read `word/document.xml` from a generated file
pub fn read_document_xml(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

/// Concatenated `<w:t>` text of a generated document
pub fn document_text(path: &Path) -> String {
    let xml = read_document_xml(path);
    let mut text = String::new();
    let mut rest = xml.as_str();
    while let Some(start) = rest.find("<w:t") {
        rest = &rest[start..];
        let Some(open_end) = rest.find('>') else { break };
        if rest[..open_end].ends_with('/') {
            rest = &rest[open_end + 1..];
            continue;
        }
        rest = &rest[open_end + 1..];
        let Some(close) = rest.find("</w:t>") else { break };
        text.push_str(&rest[..close]);
        rest = &rest[close..];
    }
    text
}

/// Header-table workbook: a title row, the header row, then data rows
///
/// The first data row carries a date cell formatted as a date.
pub fn header_table_workbook(path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Danh sách")?;
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    worksheet.write_string(0, 0, "Danh sách khách mời")?;

    worksheet.write_string(1, 0, "ghi_chu")?;
    worksheet.write_string(1, 1, "ten")?;
    worksheet.write_string(1, 2, "ngay")?;
    worksheet.write_string(1, 3, "so_luong")?;

    worksheet.write_string(2, 1, "Nguyễn Văn An")?;
    // 2024-03-15
    worksheet.write_number_with_format(2, 2, 45366.0, &date_format)?;
    worksheet.write_number(2, 3, 5.0)?;

    worksheet.write_string(4, 1, "Trần Thị Bình")?;
    worksheet.write_string(4, 2, "tháng 4")?;
    worksheet.write_number(4, 3, 2.5)?;

    workbook.save(path)?;
    Ok(())
}

/// Procurement-plan workbook laid out like a "Bảng 3" sheet
pub fn procurement_workbook(path: &Path, sheet_name: &str) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();

    let cover = workbook.add_worksheet();
    cover.set_name("Bìa")?;
    cover.write_string(0, 0, "Trang bìa")?;

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    worksheet.write_string(0, 0, "BẢNG 3")?;
    worksheet.write_string(1, 0, "KẾ HOẠCH LỰA CHỌN NHÀ THẦU")?;
    worksheet.write_string(2, 0, "Tên dự án: Trường mầm non Sao Mai")?;
    worksheet.write_string(3, 0, "Căn cứ: (Nghị quyết số 05/NQ-HĐND)")?;

    worksheet.write_string(4, 0, "STT")?;
    worksheet.write_string(4, 1, "Chủ đầu tư")?;
    worksheet.write_string(4, 2, "Tên gói thầu")?;
    for col in 0..15u16 {
        worksheet.write_string(5, col, &format!("({})", col + 1))?;
    }

    let packages: [(&str, &str, f64); 2] = [
        ("Gói thầu số 01: Thi công xây dựng", "Xây dựng khối phòng học", 2_000_000_000.0),
        ("Gói thầu số 02: Tư vấn giám sát", "Giám sát thi công", 45_500_000.0),
    ];
    for (i, (name, summary, amount)) in packages.iter().enumerate() {
        let row = 6 + i as u32;
        worksheet.write_number(row, 0, (i + 1) as f64)?;
        worksheet.write_string(row, 1, "UBND huyện Đông Anh")?;
        worksheet.write_string(row, 2, *name)?;
        worksheet.write_string(row, 3, *summary)?;
        worksheet.write_number(row, 4, *amount)?;
        worksheet.write_string(row, 5, "Ngân sách huyện")?;
        worksheet.write_string(row, 6, "Đấu thầu\nrộng rãi")?;
        worksheet.write_string(row, 7, "Một giai đoạn một túi hồ sơ")?;
        worksheet.write_string(row, 8, "Quý III/2024")?;
        worksheet.write_string(row, 9, "Tháng 7/2024")?;
        worksheet.write_string(row, 10, "Trọn gói")?;
        worksheet.write_string(row, 11, "365 ngày; bao gồm cả ngày nghỉ")?;
        worksheet.write_string(row, 12, "Không")?;
        worksheet.write_string(row, 13, "Không")?;
    }

    worksheet.write_string(8, 0, "Tổng giá gói thầu")?;

    workbook.save(path)?;
    Ok(())
}

/// Template body used for procurement-plan runs
pub fn procurement_template_body() -> String {
    [
        paragraph(&["Dự án: {{ten_du_an}}"]),
        paragraph(&["Chủ đầu tư: {{ten_chu_dau_tu}}"]),
        // split across runs the way Word stores edited text
        paragraph(&["{{so_goi", "_thau}}", ": {{ten_goi_thau}}"]),
        paragraph(&["Giá: {{gia_goi_thau}} ({{gia_goi_thau_bang_chu}})"]),
        paragraph(&["Thời gian: {{thoi_gian_thuc_hien_goi_thau}}"]),
        paragraph(&["Hình thức: {{hinh_thuc_lua_chon_nha_thau}}"]),
    ]
    .concat()
}
