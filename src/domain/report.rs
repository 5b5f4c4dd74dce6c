// ==========================================
// 酒店营收报表系统 - 报表领域模型
// ==========================================
// 职责: 工作簿/工作表/单元格的内存表示 + 导入结果汇总
// 说明: 行 = 列名 → 单元格值，单元格为显式标签联合
// ==========================================

use crate::domain::types::{SheetKind, SkipReason};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    /// 空单元格或纯空白文本
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => !n.is_finite(),
            CellValue::Date(_) => false,
        }
    }

    /// 文本表示（用于日志与诊断）
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// 数据行: 表头 → 单元格值
pub type Row = HashMap<String, CellValue>;

// ==========================================
// Sheet / Workbook
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,  // 表头（保持原始顺序）
    pub rows: Vec<Row>,        // 数据行（不含表头，已去除全空行）
    pub row_lines: Vec<usize>, // 数据行对应的源行号（表头为第 1 行）
}

impl Sheet {
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows,
            row_lines: Vec::new(),
        }
    }

    /// 第 index 条数据行在源表中的行号
    ///
    /// 未记录源行号时按紧随表头连续排列计算
    pub fn line_number(&self, index: usize) -> usize {
        self.row_lines.get(index).copied().unwrap_or(index + 2)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

// ==========================================
// ReportPeriod - 报表所属月份（导入上下文）
// ==========================================
// 约束: year ∈ [2000, 2100], month ∈ [1, 12]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReportPeriod {
    pub const MIN_YEAR: i32 = 2000;
    pub const MAX_YEAR: i32 = 2100;

    /// 校验并构造报表月份（越界返回 None）
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// 当月第一天
    pub fn month_start(&self) -> NaiveDate {
        // 构造时已校验，日期恒有效
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// 当月最后一天
    pub fn month_end(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or_default()
    }

    /// 当月第 day 天（日期不存在时返回 None，如 6 月 31 日）
    pub fn date_for_day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.month_start() && date <= self.month_end()
    }
}

// ==========================================
// RowSkip - 被跳过的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSkip {
    pub row: usize,
    pub reason: SkipReason,
}

// ==========================================
// SheetImportStats - 单表导入统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetImportStats {
    pub upserts: usize,
    pub skipped_rows: usize,
    pub skips: Vec<RowSkip>, // 抽样（上限由配置决定）
}

impl SheetImportStats {
    pub fn with_sample_limit(sample_limit: usize) -> SkipRecorder {
        SkipRecorder {
            sample_limit,
            stats: SheetImportStats::default(),
        }
    }
}

/// 跳过原因记录器（计数全量，明细取行号最小的 sample_limit 条）
///
/// DUPLICATE_KEY 在逐行扫描之后才记录，因此先全部收集，结束时再按行号截取
#[derive(Debug)]
pub struct SkipRecorder {
    sample_limit: usize,
    stats: SheetImportStats,
}

impl SkipRecorder {
    pub fn record(&mut self, row: usize, reason: SkipReason) {
        self.stats.skipped_rows += 1;
        self.stats.skips.push(RowSkip { row, reason });
    }

    pub fn finish(mut self, upserts: usize) -> SheetImportStats {
        self.stats.skips.sort_by_key(|s| s.row);
        self.stats.skips.truncate(self.sample_limit);
        self.stats.upserts = upserts;
        self.stats
    }
}

// ==========================================
// SheetSummary - 单表汇总（对外 JSON）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    pub sheet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<SheetKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skips: Vec<RowSkip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SheetSummary {
    fn bare(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            kind: None,
            upserts: None,
            skipped: None,
            reason: None,
            skipped_rows: None,
            skips: Vec::new(),
            error: None,
        }
    }

    /// 无数据行
    pub fn empty(sheet: &str) -> Self {
        Self {
            skipped: Some(true),
            reason: Some("empty".to_string()),
            ..Self::bare(sheet)
        }
    }

    /// 无法识别形态
    pub fn unrecognized(sheet: &str) -> Self {
        Self {
            skipped: Some(true),
            reason: Some("unrecognized".to_string()),
            ..Self::bare(sheet)
        }
    }

    /// 导入成功
    pub fn imported(sheet: &str, kind: SheetKind, stats: SheetImportStats) -> Self {
        Self {
            kind: Some(kind),
            upserts: Some(stats.upserts),
            skipped_rows: Some(stats.skipped_rows),
            skips: stats.skips,
            ..Self::bare(sheet)
        }
    }

    /// 表级失败（缺少必需列、落库失败等）
    pub fn failed(sheet: &str, kind: SheetKind, error: String) -> Self {
        Self {
            kind: Some(kind),
            error: Some(error),
            ..Self::bare(sheet)
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

// ==========================================
// ImportOutcome - 整个工作簿的导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub ok: bool,
    pub batch_id: String,
    pub summaries: Vec<SheetSummary>,
}

impl ImportOutcome {
    pub fn total_upserts(&self) -> usize {
        self.summaries.iter().filter_map(|s| s.upserts).sum()
    }
}
