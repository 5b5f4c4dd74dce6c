// ==========================================
// 酒店营收报表系统 - 文件解析器实现
// ==========================================
// 阶段 0: 字节流 → 工作簿
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls/.ods) / CSV
// 识别: 按文件头魔数判断，不依赖扩展名
// ==========================================

use crate::domain::report::{CellValue, Row, Sheet, Workbook};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_resolver::normalize_header;
use crate::importer::report_importer_trait::WorkbookParser;
use crate::importer::value_coercer::parse_date_text;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

/// 表头探测范围（前 N 行内寻找表头，跳过标题行）
pub const HEADER_SCAN_ROWS: usize = 10;

// Office Open XML / ODS（zip 容器）
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
// 旧版 .xls（OLE 复合文档）
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// CSV 默认工作表名
pub const DEFAULT_CSV_SHEET: &str = "Sheet1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Spreadsheet,
    Csv,
}

/// 识别字节流格式
pub fn detect_format(bytes: &[u8]) -> ImportResult<WorkbookFormat> {
    if bytes.is_empty() {
        return Err(ImportError::UnreadableWorkbook("文件内容为空".to_string()));
    }

    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        return Ok(WorkbookFormat::Spreadsheet);
    }

    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(_) => Ok(WorkbookFormat::Csv),
        Err(e) => Err(ImportError::UnreadableWorkbook(format!(
            "不是 Excel 工作簿，按 CSV 读取时编码不是 UTF-8（第 {} 字节起无效，请另存为 UTF-8 后重试）",
            e.valid_up_to()
        ))),
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl WorkbookParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Workbook> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name)?;

            let grid: Vec<Vec<CellValue>> = range
                .rows()
                .map(|row| row.iter().map(excel_cell_value).collect())
                .collect();

            sheets.push(assemble_sheet(&name, grid));
        }

        tracing::debug!(sheet_count = sheets.len(), "Excel 工作簿解析完成");
        Ok(Workbook { sheets })
    }
}

/// calamine 单元格 → CellValue
fn excel_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        // as_datetime 按工作簿的 1900/1904 日期系统换算
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| CellValue::Date(d.date()))
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_date_text(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::from(s.as_str())),
        Data::DurationIso(s) => CellValue::from(s.as_str()),
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 单表工作簿；单元格一律为文本，由值转换器统一解释
pub struct CsvParser {
    sheet_name: String,
}

impl CsvParser {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
        }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(DEFAULT_CSV_SHEET)
    }
}

impl WorkbookParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Workbook> {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .delimiter(sniff_delimiter(body))
            .from_reader(body);

        let mut grid = Vec::new();
        for result in reader.records() {
            let record = result?;
            grid.push(record.iter().map(CellValue::from).collect());
        }

        Ok(Workbook {
            sheets: vec![assemble_sheet(&self.sheet_name, grid)],
        })
    }
}

/// 根据首行推断分隔符（逗号 / 分号 / 制表符）
fn sniff_delimiter(body: &[u8]) -> u8 {
    let first_line = body.split(|b| *b == b'\n').next().unwrap_or(body);
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|d| first_line.iter().filter(|b| *b == d).count())
        .filter(|d| first_line.contains(d))
        .unwrap_or(b',')
}

// ==========================================
// 通用文件解析器（按魔数自动选择）
// ==========================================
pub struct UniversalFileParser;

impl WorkbookParser for UniversalFileParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Workbook> {
        match detect_format(bytes)? {
            WorkbookFormat::Spreadsheet => ExcelParser.parse_bytes(bytes),
            WorkbookFormat::Csv => CsvParser::default().parse_bytes(bytes),
        }
    }
}

impl UniversalFileParser {
    /// 从磁盘读取并解析（CSV 以文件名作为工作表名）
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Workbook> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        match detect_format(&bytes)? {
            WorkbookFormat::Spreadsheet => ExcelParser.parse_bytes(&bytes),
            WorkbookFormat::Csv => {
                let sheet_name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(DEFAULT_CSV_SHEET);
                CsvParser::new(sheet_name).parse_bytes(&bytes)
            }
        }
    }
}

// ==========================================
// 网格 → Sheet
// ==========================================

/// 将二维网格整理为 Sheet
///
/// 1. 表头 = 前 HEADER_SCAN_ROWS 行中第一个至少含两个非空单元格的行
///    （找不到时退化为第一个非空行）
/// 2. 空表头列丢弃；归一化后重名的列只保留第一列
/// 3. 全空数据行丢弃；源行号以表头为第 1 行
fn assemble_sheet(name: &str, grid: Vec<Vec<CellValue>>) -> Sheet {
    let non_empty = |row: &Vec<CellValue>| row.iter().filter(|c| !c.is_empty()).count();

    let header_index = grid
        .iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| non_empty(row) >= 2)
        .or_else(|| grid.iter().position(|row| non_empty(row) > 0));

    let Some(header_index) = header_index else {
        return Sheet::new(name, Vec::new(), Vec::new());
    };

    let mut seen = HashSet::new();
    let columns: Vec<Option<String>> = grid[header_index]
        .iter()
        .map(|cell| {
            let header = cell.to_text();
            if header.is_empty() || !seen.insert(normalize_header(&header)) {
                None
            } else {
                Some(header)
            }
        })
        .collect();

    let headers: Vec<String> = columns.iter().flatten().cloned().collect();

    let mut rows = Vec::new();
    let mut row_lines = Vec::new();
    for (offset, cells) in grid.into_iter().enumerate().skip(header_index + 1) {
        let row: Row = columns
            .iter()
            .zip(cells)
            .filter_map(|(column, cell)| column.as_ref().map(|h| (h.clone(), cell)))
            .collect();

        // 跳过完全空白的行
        if row.values().all(|v| v.is_empty()) {
            continue;
        }

        rows.push(row);
        row_lines.push(offset - header_index + 1);
    }

    Sheet {
        name: name.to_string(),
        headers,
        rows,
        row_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;

    #[test]
    fn test_detect_format() {
        assert!(matches!(
            detect_format(b""),
            Err(ImportError::UnreadableWorkbook(_))
        ));
        assert_eq!(detect_format(b"PK\x03\x04rest").unwrap(), WorkbookFormat::Spreadsheet);
        assert_eq!(detect_format(b"Date,Revenue\n").unwrap(), WorkbookFormat::Csv);
        assert!(detect_format(&[0xFF, 0xFE, 0x00, 0x9F]).is_err());
    }

    #[test]
    fn test_csv_parse_with_bom_and_blank_rows() {
        let csv = "\u{feff}Date,Target,Revenue\n01/08/2025,1000,900\n,,\n02/08/2025,1000,1100\n";
        let workbook = CsvParser::new("Daily").parse_bytes(csv.as_bytes()).unwrap();

        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.name, "Daily");
        assert_eq!(sheet.headers, vec!["Date", "Target", "Revenue"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.line_number(0), 2);
        assert_eq!(sheet.line_number(1), 4);
        assert_eq!(
            sheet.rows[1].get("Revenue"),
            Some(&CellValue::Text("1100".to_string()))
        );
    }

    #[test]
    fn test_title_row_is_skipped() {
        let csv = "August Daily Report,,\nDate,Target,Revenue\n01/08/2025,1000,900\n";
        let workbook = CsvParser::default().parse_bytes(csv.as_bytes()).unwrap();

        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.headers, vec!["Date", "Target", "Revenue"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.line_number(0), 2);
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let csv = "Date,,Revenue,revenue \n01/08/2025,x,900,5\n";
        let workbook = CsvParser::default().parse_bytes(csv.as_bytes()).unwrap();

        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.headers, vec!["Date", "Revenue"]);
        assert_eq!(sheet.rows[0].len(), 2);
        assert_eq!(
            sheet.rows[0].get("Revenue"),
            Some(&CellValue::Text("900".to_string()))
        );
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "Year;Revenue\n2024;1000000\n";
        let workbook = CsvParser::default().parse_bytes(csv.as_bytes()).unwrap();
        assert_eq!(workbook.sheets[0].headers, vec!["Year", "Revenue"]);
    }

    #[test]
    fn test_excel_cell_value() {
        assert_eq!(excel_cell_value(&Data::Int(5)), CellValue::Number(5.0));
        assert_eq!(excel_cell_value(&Data::String("  ".to_string())), CellValue::Empty);
        assert_eq!(
            excel_cell_value(&Data::DateTimeIso("2025-08-21".to_string())),
            CellValue::Date(NaiveDate::from_ymd_opt(2025, 8, 21).unwrap())
        );
    }

    #[test]
    fn test_native_dates_follow_workbook_date_system() {
        let expected = CellValue::Date(NaiveDate::from_ymd_opt(2025, 8, 21).unwrap());

        let serial_1900 = ExcelDateTime::new(45890.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(excel_cell_value(&Data::DateTime(serial_1900)), expected);

        // 1904 日期系统的序列号比 1900 系统少 1462 天
        let serial_1904 = ExcelDateTime::new(44428.0, ExcelDateTimeType::DateTime, true);
        assert_eq!(excel_cell_value(&Data::DateTime(serial_1904)), expected);
    }

    #[test]
    fn test_non_utf8_text_names_the_encoding() {
        // Windows-1252 编码的 "Café"
        let bytes = b"Date,Caf\xe9\n01/08/2025,1\n";
        match detect_format(bytes) {
            Err(ImportError::UnreadableWorkbook(msg)) => {
                assert!(msg.contains("UTF-8"));
                assert!(msg.contains("第 8 字节"));
            }
            other => panic!("Expected UnreadableWorkbook, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let result = UniversalFileParser.parse_bytes(b"PK\x03\x04not really a zip");
        assert!(matches!(result, Err(ImportError::UnreadableWorkbook(_))));
    }

    #[test]
    fn test_parse_missing_file() {
        let result = UniversalFileParser.parse_file("/nonexistent/report.xlsx");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
