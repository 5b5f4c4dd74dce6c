// ==========================================
// 酒店营收报表系统 - 经营概览 API
// ==========================================
// 职责: 驾驶舱聚合查询（区间概览 / 本月至今）
// 架构: API 层 → Engine 层 (OverviewAggregator) → Repository 层
// ==========================================

use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::validator::{parse_date_param, validate_date_range};
use crate::domain::overview::Overview;
use crate::engine::OverviewAggregator;

// ==========================================
// OverviewApi - 经营概览 API
// ==========================================
pub struct OverviewApi {
    aggregator: Arc<OverviewAggregator>,
}

impl OverviewApi {
    /// 创建新的OverviewApi实例
    pub fn new(aggregator: Arc<OverviewAggregator>) -> Self {
        Self { aggregator }
    }

    /// 查询区间经营概览
    ///
    /// # 参数
    /// - from / to: 起止日期（闭区间）
    ///
    /// # 返回
    /// - Ok(Overview): 区间汇总
    /// - Err(InvalidInput): from 晚于 to
    pub async fn get_overview(&self, from: NaiveDate, to: NaiveDate) -> ApiResult<Overview> {
        validate_date_range(from, to)?;
        Ok(self.aggregator.compute_overview(from, to).await?)
    }

    /// 查询区间经营概览（日期为 YYYY-MM-DD 字符串）
    pub async fn get_overview_str(&self, from: &str, to: &str) -> ApiResult<Overview> {
        let from = parse_date_param("from", from)?;
        let to = parse_date_param("to", to)?;
        self.get_overview(from, to).await
    }

    /// 查询本月截至 today 的经营概览
    pub async fn get_month_to_date(&self, today: NaiveDate) -> ApiResult<Overview> {
        Ok(self.aggregator.month_to_date(today).await?)
    }
}
