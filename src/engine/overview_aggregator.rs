// ==========================================
// 酒店营收报表系统 - 经营概览聚合引擎
// ==========================================
// 职责: 区间内每日指标与房型指标的汇总
// 输入: MetricRepository 中已落库的记录
// 输出: Overview（驾驶舱展示用）
// 红线: 引擎不拼 SQL，只通过仓储读取
// ==========================================

use crate::domain::metric::{DailyMetric, RoomTypeMetric};
use crate::domain::overview::{DailySeriesPoint, Overview, RoomTypeRollup};
use crate::importer::value_coercer::to_utc_midnight;
use crate::repository::error::RepositoryResult;
use crate::repository::MetricRepository;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// OverviewAggregator - 概览聚合引擎
// ==========================================
pub struct OverviewAggregator {
    repo: Arc<dyn MetricRepository>,
}

impl OverviewAggregator {
    pub fn new(repo: Arc<dyn MetricRepository>) -> Self {
        Self { repo }
    }

    /// 计算闭区间 [from, to] 的经营概览
    ///
    /// # 参数
    /// - from / to: 起止日期（调用方保证 from <= to）
    #[instrument(skip(self))]
    pub async fn compute_overview(&self, from: NaiveDate, to: NaiveDate) -> RepositoryResult<Overview> {
        let daily = self.repo.find_daily_between(from, to).await?;
        let room_types = self.repo.find_room_types_between(from, to).await?;

        tracing::debug!(
            daily_rows = daily.len(),
            room_type_rows = room_types.len(),
            "概览数据读取完成"
        );
        Ok(summarize(&daily, &room_types))
    }

    /// 本月截至 today 的经营概览
    pub async fn month_to_date(&self, today: NaiveDate) -> RepositoryResult<Overview> {
        let first = today.with_day(1).unwrap_or(today);
        self.compute_overview(first, today).await
    }
}

// ==========================================
// 纯函数聚合
// ==========================================

/// 汇总每日与房型记录
pub fn summarize(daily: &[DailyMetric], room_types: &[RoomTypeMetric]) -> Overview {
    let revenue_to_date: f64 = daily.iter().map(|d| d.revenue.unwrap_or(0.0)).sum();
    let target_to_date: f64 = daily.iter().map(|d| d.target.unwrap_or(0.0)).sum();

    let mut ordered: Vec<&DailyMetric> = daily.iter().collect();
    ordered.sort_by_key(|d| d.date);

    Overview {
        revenue_to_date,
        target_to_date,
        average_room_rate: mean(daily.iter().filter_map(|d| d.arr)),
        occupancy_rate: mean(daily.iter().filter_map(|d| d.occupancy)),
        target_variance: target_to_date - revenue_to_date,
        daily_series: ordered
            .into_iter()
            .map(|d| DailySeriesPoint {
                day: d.date.day(),
                date: to_utc_midnight(d.date),
                revenue: d.revenue,
                target: d.target,
                occupancy: d.occupancy,
                rate: d.arr,
            })
            .collect(),
        room_types: rollup_room_types(room_types),
    }
}

/// 按房型分组汇总（按房型名排序）
pub fn rollup_room_types(rows: &[RoomTypeMetric]) -> Vec<RoomTypeRollup> {
    let mut groups: BTreeMap<&str, Vec<&RoomTypeMetric>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.room_type.as_str()).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(room_type, members)| {
            let available: f64 = members
                .iter()
                .map(|m| m.available.unwrap_or(0.0))
                .sum();
            let sold: f64 = members.iter().map(|m| m.sold.unwrap_or(0.0)).sum();
            let revenue: f64 = members.iter().map(|m| m.revenue.unwrap_or(0.0)).sum();

            // 优先使用报表中记录的值，缺失时由汇总量推算
            let rate = mean(members.iter().filter_map(|m| m.rate))
                .or_else(|| (sold > 0.0).then(|| revenue / sold));
            let occupancy = mean(members.iter().filter_map(|m| m.occupancy))
                .or_else(|| (available > 0.0).then(|| sold / available * 100.0));

            RoomTypeRollup {
                room_type: room_type.to_string(),
                available,
                sold,
                revenue,
                rate,
                occupancy,
            }
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn day(d: u32, revenue: Option<f64>, target: Option<f64>, occupancy: Option<f64>, arr: Option<f64>) -> DailyMetric {
        DailyMetric {
            date: ymd(d),
            revenue,
            target,
            occupancy,
            arr,
            notes: None,
        }
    }

    fn room(room_type: &str, rooms: Option<f64>, available: Option<f64>, sold: Option<f64>, revenue: Option<f64>) -> RoomTypeMetric {
        RoomTypeMetric {
            date: ymd(31),
            room_type: room_type.to_string(),
            rooms,
            available,
            sold,
            revenue,
            rate: None,
            occupancy: None,
        }
    }

    #[test]
    fn test_daily_totals() {
        let daily = vec![
            day(2, Some(1200.0), Some(1000.0), Some(80.0), None),
            day(1, Some(800.0), None, None, Some(1500.0)),
            day(3, None, Some(1000.0), Some(60.0), Some(1300.0)),
        ];

        let overview = summarize(&daily, &[]);
        assert_eq!(overview.revenue_to_date, 2000.0);
        assert_eq!(overview.target_to_date, 2000.0);
        assert_eq!(overview.target_variance, 0.0);
        assert_eq!(overview.occupancy_rate, Some(70.0));
        assert_eq!(overview.average_room_rate, Some(1400.0));

        let days: Vec<u32> = overview.daily_series.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![1, 2, 3]);
        assert_eq!(overview.daily_series[0].date.to_rfc3339(), "2025-08-01T00:00:00+00:00");
    }

    #[test]
    fn test_empty_range() {
        let overview = summarize(&[], &[]);
        assert_eq!(overview.revenue_to_date, 0.0);
        assert_eq!(overview.average_room_rate, None);
        assert_eq!(overview.occupancy_rate, None);
        assert!(overview.daily_series.is_empty());
        assert!(overview.room_types.is_empty());
    }

    #[test]
    fn test_room_type_derived_values() {
        let rows = vec![
            room("Suite", Some(4.0), Some(124.0), Some(62.0), Some(186000.0)),
            room("Deluxe", None, Some(620.0), Some(0.0), Some(0.0)),
        ];

        let rollups = rollup_room_types(&rows);
        assert_eq!(rollups[0].room_type, "Deluxe");
        assert_eq!(rollups[0].rate, None);
        assert_eq!(rollups[0].occupancy, Some(0.0));

        let suite = &rollups[1];
        assert_eq!(suite.available, 124.0);
        assert_eq!(suite.rate, Some(3000.0));
        assert_eq!(suite.occupancy, Some(50.0));
    }

    #[test]
    fn test_room_count_is_not_available_nights() {
        // 只有房间数、没有可售间夜时不推算出租率
        let rows = vec![room("Suite", Some(4.0), None, Some(62.0), Some(186000.0))];

        let rollups = rollup_room_types(&rows);
        assert_eq!(rollups[0].available, 0.0);
        assert_eq!(rollups[0].occupancy, None);
        assert_eq!(rollups[0].rate, Some(3000.0));
    }

    #[test]
    fn test_room_type_recorded_values_win() {
        let mut recorded = room("Standard", None, Some(100.0), Some(50.0), Some(50000.0));
        recorded.rate = Some(1100.0);
        recorded.occupancy = Some(48.0);

        let rollups = rollup_room_types(&[recorded]);
        assert_eq!(rollups[0].rate, Some(1100.0));
        assert_eq!(rollups[0].occupancy, Some(48.0));
    }
}
