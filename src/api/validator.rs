// ==========================================
// 酒店营收报表系统 - API 参数校验器
// ==========================================
// 职责: 外部传入参数的边界校验（报表月份、日期区间、管理表单）
// 约定: 校验失败一律返回 InvalidInput / ValidationError，带显式原因
// ==========================================

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::metric::DailyMetric;
use crate::domain::report::ReportPeriod;

/// 校验报表月份
///
/// # 参数
/// - year / month: 外部传入的整数（HTTP 参数已解析为整数）
///
/// # 返回
/// - Ok(ReportPeriod): 校验通过
/// - Err(InvalidInput): 年份不在 2000-2100 或月份不在 1-12
pub fn validate_period(year: i64, month: i64) -> ApiResult<ReportPeriod> {
    let period = i32::try_from(year)
        .ok()
        .zip(u32::try_from(month).ok())
        .and_then(|(y, m)| ReportPeriod::new(y, m));

    period.ok_or_else(|| {
        ApiError::InvalidInput(format!(
            "报表月份无效: year={}, month={}（要求 {}-{} 年，1-12 月）",
            year,
            month,
            ReportPeriod::MIN_YEAR,
            ReportPeriod::MAX_YEAR
        ))
    })
}

/// 解析日期参数（YYYY-MM-DD）
pub fn parse_date_param(name: &str, value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        ApiError::InvalidInput(format!("日期参数{}格式错误(期望YYYY-MM-DD): {} ({})", name, value, e))
    })
}

/// 校验日期区间（from <= to）
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> ApiResult<()> {
    if from > to {
        return Err(ApiError::InvalidInput(format!(
            "日期区间无效: from={} 晚于 to={}",
            from, to
        )));
    }
    Ok(())
}

/// 校验管理表单提交的单日记录
///
/// # 规则
/// - 数值字段必须为有限数
/// - 营收、目标、平均房价不得为负
/// - 出租率在 0-100 之间
pub fn validate_daily_entry(entry: &DailyMetric) -> ApiResult<()> {
    let fields = [
        ("revenue", entry.revenue),
        ("target", entry.target),
        ("arr", entry.arr),
    ];
    for (field, value) in fields {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(ApiError::ValidationError(format!(
                    "{}必须为非负数: {}",
                    field, v
                )));
            }
        }
    }

    if let Some(occupancy) = entry.occupancy {
        if !occupancy.is_finite() || !(0.0..=100.0).contains(&occupancy) {
            return Err(ApiError::ValidationError(format!(
                "occupancy必须在0-100之间: {}",
                occupancy
            )));
        }
    }

    Ok(())
}
