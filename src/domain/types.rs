// ==========================================
// 酒店营收报表系统 - 领域类型定义
// ==========================================
// 职责: 报表形态、跳过原因等枚举
// 序列化格式: 与对外 JSON 约定一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报表形态 (Sheet Kind)
// ==========================================
// 三种已知形态 + 未识别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    Daily,     // 每日经营表
    RoomTypes, // 房型快照表
    Yearly,    // 年度汇总表
    Unknown,   // 无法识别
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetKind::Daily => write!(f, "daily"),
            SheetKind::RoomTypes => write!(f, "roomtypes"),
            SheetKind::Yearly => write!(f, "yearly"),
            SheetKind::Unknown => write!(f, "unknown"),
        }
    }
}

// ==========================================
// 行跳过原因 (Skip Reason)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE（诊断标签）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    NoDate,       // 无可解析日期
    InvalidDay,   // 日号不在 1..=31 或非整数
    InvalidDate,  // 日号合法但日期不存在（如 6 月 31 日）
    OutOfMonth,   // 日期不在报表月份内
    EmptyRow,     // 指标全部为零或空
    NoType,       // 房型为空
    InvalidYear,  // 年份不在 2000..=2100
    DuplicateKey, // 同表内自然键重复（以后出现者为准）
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoDate => write!(f, "NO_DATE"),
            SkipReason::InvalidDay => write!(f, "INVALID_DAY"),
            SkipReason::InvalidDate => write!(f, "INVALID_DATE"),
            SkipReason::OutOfMonth => write!(f, "OUT_OF_MONTH"),
            SkipReason::EmptyRow => write!(f, "EMPTY_ROW"),
            SkipReason::NoType => write!(f, "NO_TYPE"),
            SkipReason::InvalidYear => write!(f, "INVALID_YEAR"),
            SkipReason::DuplicateKey => write!(f, "DUPLICATE_KEY"),
        }
    }
}
