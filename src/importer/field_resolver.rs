// ==========================================
// 酒店营收报表系统 - 字段解析器
// ==========================================
// 职责: 逻辑字段 → 源列名（同义词表）的统一匹配
// 规则: 忽略大小写、去除首尾空白、按优先级精确匹配，不做模糊匹配
// ==========================================

use crate::domain::report::{CellValue, Row};

// ==========================================
// 同义词表（三类导入器共用，唯一来源）
// ==========================================
pub mod synonyms {
    pub const DATE: &[&str] = &["date", "day", "d", "reportdate", "report date", "business date"];

    pub const TARGET: &[&str] = &[
        "target",
        "daily target",
        "target revenue",
        "revenue target",
        "target(r)",
        "budget",
    ];

    pub const REVENUE: &[&str] = &[
        "revenue",
        "rev",
        "daily revenue",
        "revenue(r)",
        "actualrevenue",
        "actual revenue",
        "room revenue",
        "total revenue",
    ];

    pub const OCCUPANCY: &[&str] = &[
        "occupancy",
        "occ",
        "occ%",
        "occ %",
        "occupancy %",
        "occupancy%",
        "occupancy(%)",
        "occupancy rate",
    ];

    pub const RATE: &[&str] = &[
        "arr",
        "rate",
        "average daily rate",
        "average room rate",
        "adr",
        "avg rate",
        "arr(r)",
    ];

    pub const ROOM_TYPE: &[&str] = &["type", "room type", "roomtype", "room_type", "category", "room category"];

    pub const ROOMS: &[&str] = &["rooms", "total rooms", "no. of rooms", "room count"];

    pub const AVAILABLE: &[&str] = &[
        "available",
        "available rooms",
        "rooms available",
        "room nights available",
        "avail",
    ];

    pub const SOLD: &[&str] = &["sold", "rooms sold", "room nights sold", "sold rooms"];

    pub const YEAR: &[&str] = &["year", "yr", "fiscal year"];

    pub const ROOMS_SOLD: &[&str] = &["rooms sold", "roomssold", "room nights sold", "room nights", "sold"];
}

/// 列名归一化（唯一的归一化入口）
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 按优先级查找逻辑字段的值
///
/// # 返回
/// - Some(&CellValue): 第一个命中且非空的单元格
/// - None: 缺失（该行没有对应列，或对应列为空）
pub fn resolve<'a>(row: &'a Row, candidates: &[&str]) -> Option<&'a CellValue> {
    candidates
        .iter()
        .find_map(|candidate| lookup(row, &normalize_header(candidate)))
}

/// 按优先级返回所有命中的非空单元格
///
/// 用途: 日期等字段需要在首选列无法解析时回退到下一列
pub fn resolve_all<'a>(row: &'a Row, candidates: &[&str]) -> Vec<&'a CellValue> {
    candidates
        .iter()
        .filter_map(|candidate| lookup(row, &normalize_header(candidate)))
        .collect()
}

/// 表头中是否存在该逻辑字段（表级必需列校验）
pub fn has_field(headers: &[String], candidates: &[&str]) -> bool {
    candidates.iter().any(|candidate| {
        let wanted = normalize_header(candidate);
        headers.iter().any(|h| normalize_header(h) == wanted)
    })
}

fn lookup<'a>(row: &'a Row, normalized: &str) -> Option<&'a CellValue> {
    row.iter()
        .find(|(key, _)| normalize_header(key) == normalized)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
