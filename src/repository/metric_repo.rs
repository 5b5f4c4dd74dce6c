// ==========================================
// 酒店营收报表系统 - 指标 Repository Trait
// ==========================================
// 职责: 定义指标存储的 upsert / 区间查询接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 约定: 按自然键“插入或整行覆盖”，重放任意次结果一致
// ==========================================

use crate::domain::metric::{DailyMetric, RoomTypeMetric, YearlyMetric};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::NaiveDate;

// ==========================================
// MetricRepository Trait
// ==========================================
// 用途: 导入编排器与概览聚合共享的存储客户端
// 实现者: MetricRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait MetricRepository: Send + Sync {
    // ===== 批量写入（事务化）=====

    /// 批量 upsert 每日指标（冲突时覆盖 target/revenue/occupancy/arr，保留 notes）
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    /// - Err: 数据库错误（整个事务回滚）
    async fn batch_upsert_daily(&self, metrics: Vec<DailyMetric>) -> RepositoryResult<usize>;

    /// 批量 upsert 房型指标（冲突时覆盖全部指标字段）
    async fn batch_upsert_room_types(
        &self,
        metrics: Vec<RoomTypeMetric>,
    ) -> RepositoryResult<usize>;

    /// 批量 upsert 年度指标（冲突时覆盖全部指标字段）
    async fn batch_upsert_yearly(&self, metrics: Vec<YearlyMetric>) -> RepositoryResult<usize>;

    /// 管理表单保存单日记录（整行覆盖，包括 notes）
    async fn save_daily_entry(&self, metric: DailyMetric) -> RepositoryResult<()>;

    // ===== 查询 =====

    /// 查询单日记录
    async fn find_daily(&self, date: NaiveDate) -> RepositoryResult<Option<DailyMetric>>;

    /// 查询闭区间 [from, to] 内的每日记录（按日期升序）
    async fn find_daily_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<DailyMetric>>;

    /// 查询闭区间 [from, to] 内的房型记录（按日期、房型升序）
    async fn find_room_types_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<RoomTypeMetric>>;

    /// 查询全部年度记录（按年份升序）
    async fn find_yearly(&self) -> RepositoryResult<Vec<YearlyMetric>>;
}
