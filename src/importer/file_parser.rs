// ==========================================
// 热处理炉装炉排产系统 - 文件解析器实现
// ==========================================
// 职责: 文件 → 原始行（表头 → 单元格文本）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// RawRow - 原始行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 源文件中的行号（从 1 开始,含表头行）
    pub row_number: usize,
    pub fields: HashMap<String, String>,
}

// ==========================================
// Trait: FileParser
// ==========================================
pub trait FileParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn build_row(headers: &[String], values: impl Iterator<Item = String>, row_number: usize) -> Option<RawRow> {
    let mut fields = HashMap::new();
    for (header, value) in headers.iter().zip(values) {
        if header.is_empty() {
            continue;
        }
        fields.insert(header.clone(), value.trim().to_string());
    }

    // 跳过完全空白的行
    if fields.values().all(|v| v.is_empty()) {
        return None;
    }
    Some(RawRow { row_number, fields })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;
        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // 表头占第 1 行
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            if let Some(row) = build_row(&headers, record.iter().map(str::to_string), row_number) {
                rows.push(row);
            }
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================

/// Excel 读取选项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExcelOptions {
    /// 工作表名（None → 第一个工作表）
    pub sheet_name: Option<String>,
    /// 表头所在行（从 0 开始）
    pub header_row: usize,
    /// 表头之后跳过的行数（如单位行）
    pub skip_rows_after_header: usize,
}

impl ExcelOptions {
    /// 现场工作簿布局: 前两行为标题,第 3 行为表头,第 4 行为单位行
    pub fn shop_workbook(sheet_name: Option<String>) -> Self {
        Self {
            sheet_name,
            header_row: 2,
            skip_rows_after_header: 1,
        }
    }
}

pub struct ExcelParser {
    options: ExcelOptions,
}

impl ExcelParser {
    pub fn new(options: ExcelOptions) -> Self {
        Self { options }
    }
}

impl FileParser for ExcelParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;
        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();
        let sheet_name = match &self.options.sheet_name {
            Some(name) if sheet_names.contains(name) => name.clone(),
            Some(name) => {
                return Err(ImportError::SheetNotFound {
                    sheet: name.clone(),
                    available: sheet_names,
                })
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // Range 从首个非空单元格开始,行号需换算为工作表绝对行
        let origin_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
        if self.options.header_row < origin_row {
            return Err(ImportError::HeaderRowMissing(self.options.header_row + 1));
        }
        let header_offset = self.options.header_row - origin_row;

        let mut rows = range.rows().enumerate().skip(header_offset);
        let (_, header_cells) = rows
            .next()
            .ok_or(ImportError::HeaderRowMissing(self.options.header_row + 1))?;
        let headers: Vec<String> = header_cells
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (relative_idx, cells) in rows.skip(self.options.skip_rows_after_header) {
            let row_number = origin_row + relative_idx + 1;
            let values = cells.iter().map(|cell| cell.to_string());
            if let Some(row) = build_row(&headers, values, row_number) {
                records.push(row);
            }
        }

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Default)]
pub struct UniversalFileParser {
    excel_options: ExcelOptions,
}

impl UniversalFileParser {
    pub fn new(excel_options: ExcelOptions) -> Self {
        Self { excel_options }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_rows(path),
            "xlsx" | "xls" => ExcelParser::new(self.excel_options.clone()).parse_rows(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
