// ==========================================
// 酒店营收报表系统 - 指标管理 API
// ==========================================
// 职责: 管理表单的单日录入、年度汇总查询
// ==========================================

use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_daily_entry;
use crate::domain::metric::{DailyMetric, YearlyMetric};
use crate::repository::MetricRepository;

// ==========================================
// MetricApi - 指标管理 API
// ==========================================
pub struct MetricApi {
    repo: Arc<dyn MetricRepository>,
}

impl MetricApi {
    /// 创建新的MetricApi实例
    pub fn new(repo: Arc<dyn MetricRepository>) -> Self {
        Self { repo }
    }

    /// 保存单日记录（整行覆盖，包括 notes）
    ///
    /// # 返回
    /// - Ok(DailyMetric): 保存后的记录
    /// - Err(ValidationError): 数值越界
    pub async fn save_daily_entry(&self, entry: DailyMetric) -> ApiResult<DailyMetric> {
        validate_daily_entry(&entry)?;

        let date = entry.date;
        self.repo.save_daily_entry(entry).await?;
        tracing::info!(date = %date, "管理表单保存单日记录");

        self.get_daily_entry(date).await
    }

    /// 查询单日记录
    pub async fn get_daily_entry(&self, date: NaiveDate) -> ApiResult<DailyMetric> {
        self.repo
            .find_daily(date)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("DailyMetric(date={})不存在", date)))
    }

    /// 列出全部年度汇总（按年份升序）
    pub async fn list_yearly(&self) -> ApiResult<Vec<YearlyMetric>> {
        Ok(self.repo.find_yearly().await?)
    }
}
