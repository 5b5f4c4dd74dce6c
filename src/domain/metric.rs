// ==========================================
// 酒店营收报表系统 - 经营指标领域模型
// ==========================================
// 职责: 三类规范化记录（每日 / 房型 / 年度）
// 红线: 每类记录按自然键唯一，导入只做整行覆盖
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DailyMetric - 每日经营指标
// ==========================================
// 自然键: date（UTC 零点所在的日历日）
// 用途: 每日导入器写入，概览聚合读取，管理表单可编辑 notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetric {
    pub date: NaiveDate,          // 营业日
    pub revenue: Option<f64>,     // 实际营收
    pub target: Option<f64>,      // 营收目标
    pub occupancy: Option<f64>,   // 出租率（0-100）
    pub arr: Option<f64>,         // 平均房价
    pub notes: Option<String>,    // 备注（仅管理表单写入）
}

impl DailyMetric {
    /// 是否为空白行（四项指标全部为零或空）
    pub fn is_blank(&self) -> bool {
        [self.target, self.revenue, self.occupancy, self.arr]
            .iter()
            .all(|v| v.map_or(true, |n| n == 0.0))
    }
}

// ==========================================
// RoomTypeMetric - 房型指标
// ==========================================
// 自然键: (date, room_type)
// 月度快照表的 date 统一为报表月份的最后一天
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeMetric {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub room_type: String,        // 房型名称（已去除首尾空白）
    pub rooms: Option<f64>,       // 房间总数
    pub available: Option<f64>,   // 可售间夜
    pub sold: Option<f64>,        // 已售间夜
    pub revenue: Option<f64>,     // 房型营收
    pub rate: Option<f64>,        // 平均房价
    pub occupancy: Option<f64>,   // 出租率（0-100）
}

// ==========================================
// YearlyMetric - 年度汇总指标
// ==========================================
// 自然键: year（2000..=2100）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyMetric {
    pub year: i32,
    pub rooms_sold: Option<f64>,
    pub occupancy: Option<f64>,
    pub revenue: Option<f64>,
    pub rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(target: Option<f64>, revenue: Option<f64>) -> DailyMetric {
        DailyMetric {
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            revenue,
            target,
            occupancy: None,
            arr: None,
            notes: None,
        }
    }

    #[test]
    fn test_blank_when_all_zero_or_null() {
        assert!(daily(Some(0.0), Some(0.0)).is_blank());
        assert!(daily(None, None).is_blank());
    }

    #[test]
    fn test_not_blank_with_revenue() {
        assert!(!daily(Some(0.0), Some(500.0)).is_blank());
    }

    #[test]
    fn test_room_type_serializes_type_key() {
        let metric = RoomTypeMetric {
            date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            room_type: "Deluxe".to_string(),
            rooms: Some(10.0),
            available: None,
            sold: None,
            revenue: None,
            rate: None,
            occupancy: None,
        };
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["type"], "Deluxe");
        assert_eq!(json["date"], "2025-08-31");
    }
}
