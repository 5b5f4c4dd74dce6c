// ==========================================
// 酒店营收报表系统 - 值转换器
// ==========================================
// 职责: 单元格 → 数值 / 百分比 / 日期 / 年份
// 约定: 转换失败一律返回缺失，不抛错；是否跳过整行由导入器决定
// ==========================================

use crate::domain::report::{CellValue, ReportPeriod};
use crate::domain::types::SkipReason;
use chrono::{Datelike, DateTime, Duration, NaiveDate, Utc};

/// 百分比小数判定阈值（绝对值不超过该值视为 0-1 小数）
pub const PERCENT_FRACTION_THRESHOLD: f64 = 1.5;

/// 有效 Excel 日期序列号下限（1901-01-01）
///
/// 更小的整数只可能是日号或噪声，不按序列号解释
pub const MIN_EXCEL_SERIAL: f64 = 367.0;

/// 有效 Excel 日期序列号上限（9999-12-31）
pub const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

// 纯日期文本格式（按优先级）
const NUMERIC_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y"];

// 自然语言日期格式（%b/%B 解析时同时接受缩写与全称）
const NATURAL_DATE_FORMATS: &[&str] = &[
    "%d %b %Y",
    "%d %b, %Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%b %d %Y",
];

const WEEKDAY_PREFIXES: &[&str] = &["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

// ==========================================
// 数值
// ==========================================

/// 从文本中提取数值
///
/// 规则: 仅保留数字、小数点，以及位于最前面的负号（货币符号、千分位逗号、空格等全部丢弃）
pub fn parse_numeric_text(raw: &str) -> Option<f64> {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_ascii_digit() || ch == '.' {
            cleaned.push(ch);
        } else if ch == '-' && cleaned.is_empty() {
            cleaned.push(ch);
        }
    }

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 单元格 → 数值（失败返回 None）
pub fn coerce_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => parse_numeric_text(s),
        _ => None,
    }
}

/// 单元格 → 数值，缺失或无法解析时使用默认值
pub fn coerce_number_or(cell: Option<&CellValue>, default: f64) -> f64 {
    cell.and_then(coerce_number).unwrap_or(default)
}

// ==========================================
// 百分比
// ==========================================

/// 百分比归一化
///
/// 1. |v| ≤ 1.5 视为小数，乘以 100
/// 2. 保留 1 位小数
/// 3. clamp=true 时截断到 [0, 100]
pub fn normalize_percent(value: f64, clamp: bool) -> f64 {
    let scaled = if value.abs() <= PERCENT_FRACTION_THRESHOLD {
        value * 100.0
    } else {
        value
    };

    let rounded = (scaled * 10.0).round() / 10.0;

    if clamp {
        rounded.clamp(0.0, 100.0)
    } else {
        rounded
    }
}

/// 单元格 → 百分比（0-100 刻度）
pub fn coerce_percent(cell: &CellValue, clamp: bool) -> Option<f64> {
    coerce_number(cell).map(|v| normalize_percent(v, clamp))
}

// ==========================================
// 日期
// ==========================================

/// Excel 日期序列号 → 日历日
///
/// 纪元: 1899-12-30；小数部分（时间）丢弃
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// 日期文本解析
///
/// 支持: DD/MM/YYYY、ISO（可带时间）、自然语言（可带星期前缀，如 "Fri, 22 Aug 2025"）
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    // 去掉时间部分: "2025-08-21T10:00:00" / "21/08/2025 00:00"
    let head = text
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(text);

    for candidate in [text, head] {
        for fmt in NUMERIC_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, fmt) {
                return Some(date);
            }
        }
    }

    let natural = strip_weekday_prefix(text);
    NATURAL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(natural, fmt).ok())
}

fn strip_weekday_prefix(text: &str) -> &str {
    let first_len = text
        .find(|c: char| c == ',' || c.is_whitespace())
        .unwrap_or(text.len());
    let first = &text[..first_len];

    let is_weekday = first.chars().all(|c| c.is_ascii_alphabetic())
        && first.len() >= 3
        && WEEKDAY_PREFIXES.contains(&first[..3].to_ascii_lowercase().as_str());

    if is_weekday {
        text[first_len..].trim_start_matches(|c: char| c == ',' || c.is_whitespace())
    } else {
        text
    }
}

/// 单元格 → 日期（带失败原因）
///
/// # 参数
/// - cell: 日期/日号列的单元格
/// - period: 报表月份；提供时 1..=31 的整数按当月日号解释
///
/// # 返回
/// - Err(InvalidDay): 数值既不是合法日号也不是合法序列号
/// - Err(InvalidDate): 日号合法但当月不存在该日
/// - Err(NoDate): 无法解析
pub fn resolve_date(cell: &CellValue, period: Option<&ReportPeriod>) -> Result<NaiveDate, SkipReason> {
    match cell {
        CellValue::Date(date) => Ok(*date),
        CellValue::Number(n) => resolve_numeric_date(*n, period),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<f64>() {
                Ok(n) => resolve_numeric_date(n, period),
                Err(_) => parse_date_text(trimmed).ok_or(SkipReason::NoDate),
            }
        }
        CellValue::Empty => Err(SkipReason::NoDate),
    }
}

fn resolve_numeric_date(n: f64, period: Option<&ReportPeriod>) -> Result<NaiveDate, SkipReason> {
    if !n.is_finite() {
        return Err(SkipReason::NoDate);
    }

    if n >= MIN_EXCEL_SERIAL {
        return excel_serial_to_date(n).ok_or(SkipReason::InvalidDay);
    }

    if n.fract() != 0.0 || !(1.0..=31.0).contains(&n) {
        return Err(SkipReason::InvalidDay);
    }

    match period {
        Some(period) => period.date_for_day(n as u32).ok_or(SkipReason::InvalidDate),
        None => Err(SkipReason::NoDate),
    }
}

/// 单元格 → 日期（失败返回 None）
pub fn coerce_date(cell: &CellValue, period: Option<&ReportPeriod>) -> Option<NaiveDate> {
    resolve_date(cell, period).ok()
}

/// 日历日 → UTC 零点
pub fn to_utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

// ==========================================
// 年份
// ==========================================

/// 单元格 → 年份（仅接受 2000..=2100）
pub fn coerce_year(cell: &CellValue) -> Option<i32> {
    let year = match cell {
        CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
        CellValue::Text(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            // 超长数字串不可能是年份
            if digits.is_empty() || digits.len() > 4 {
                None
            } else {
                digits.parse::<i64>().ok()
            }
        }
        CellValue::Date(d) => Some(d.year() as i64),
        _ => None,
    }?;

    let range = ReportPeriod::MIN_YEAR as i64..=ReportPeriod::MAX_YEAR as i64;
    if range.contains(&year) {
        Some(year as i32)
    } else {
        None
    }
}
