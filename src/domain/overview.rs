// ==========================================
// 酒店营收报表系统 - 经营概览领域模型
// ==========================================
// 职责: 概览聚合的输出结构（供驾驶舱展示）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Overview - 区间经营概览
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub revenue_to_date: f64,
    pub target_to_date: f64,
    pub average_room_rate: Option<f64>, // 仅对有值的天取平均
    pub occupancy_rate: Option<f64>,    // 仅对有值的天取平均
    pub target_variance: f64,           // 目标 - 实际（正数表示落后）
    pub daily_series: Vec<DailySeriesPoint>,
    pub room_types: Vec<RoomTypeRollup>,
}

/// 每日序列点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeriesPoint {
    pub day: u32,
    pub date: DateTime<Utc>,
    pub revenue: Option<f64>,
    pub target: Option<f64>,
    pub occupancy: Option<f64>,
    pub rate: Option<f64>,
}

/// 房型汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeRollup {
    #[serde(rename = "type")]
    pub room_type: String,
    pub available: f64,
    pub sold: f64,
    pub revenue: f64,
    pub rate: Option<f64>,
    pub occupancy: Option<f64>,
}
