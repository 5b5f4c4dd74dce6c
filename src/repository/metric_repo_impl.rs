// ==========================================
// 酒店营收报表系统 - 指标 Repository 实现
// ==========================================
// 职责: 实现指标数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::metric::{DailyMetric, RoomTypeMetric, YearlyMetric};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::metric_repo::MetricRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 日期列存储格式
const DATE_FMT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

fn parse_date_column(row: &Row, idx: usize) -> SqliteResult<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_daily(row: &Row) -> SqliteResult<DailyMetric> {
    Ok(DailyMetric {
        date: parse_date_column(row, 0)?,
        revenue: row.get(1)?,
        target: row.get(2)?,
        occupancy: row.get(3)?,
        arr: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn map_room_type(row: &Row) -> SqliteResult<RoomTypeMetric> {
    Ok(RoomTypeMetric {
        date: parse_date_column(row, 0)?,
        room_type: row.get(1)?,
        rooms: row.get(2)?,
        available: row.get(3)?,
        sold: row.get(4)?,
        revenue: row.get(5)?,
        rate: row.get(6)?,
        occupancy: row.get(7)?,
    })
}

// ==========================================
// MetricRepositoryImpl
// ==========================================
pub struct MetricRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl MetricRepositoryImpl {
    /// 创建新的 Repository 实例（打开连接并确保表结构存在）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA 与建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl MetricRepository for MetricRepositoryImpl {
    async fn batch_upsert_daily(&self, metrics: Vec<DailyMetric>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO daily_metric (date, revenue, target, occupancy, arr)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(date) DO UPDATE SET
                    revenue = excluded.revenue,
                    target = excluded.target,
                    occupancy = excluded.occupancy,
                    arr = excluded.arr
                "#,
            )?;

            for metric in &metrics {
                stmt.execute(params![
                    format_date(metric.date),
                    metric.revenue,
                    metric.target,
                    metric.occupancy,
                    metric.arr,
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn batch_upsert_room_types(
        &self,
        metrics: Vec<RoomTypeMetric>,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO room_type_metric (
                    date, room_type, rooms, available, sold, revenue, rate, occupancy
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(date, room_type) DO UPDATE SET
                    rooms = excluded.rooms,
                    available = excluded.available,
                    sold = excluded.sold,
                    revenue = excluded.revenue,
                    rate = excluded.rate,
                    occupancy = excluded.occupancy
                "#,
            )?;

            for metric in &metrics {
                stmt.execute(params![
                    format_date(metric.date),
                    metric.room_type,
                    metric.rooms,
                    metric.available,
                    metric.sold,
                    metric.revenue,
                    metric.rate,
                    metric.occupancy,
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn batch_upsert_yearly(&self, metrics: Vec<YearlyMetric>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO yearly_metric (year, rooms_sold, occupancy, revenue, rate)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(year) DO UPDATE SET
                    rooms_sold = excluded.rooms_sold,
                    occupancy = excluded.occupancy,
                    revenue = excluded.revenue,
                    rate = excluded.rate
                "#,
            )?;

            for metric in &metrics {
                stmt.execute(params![
                    metric.year,
                    metric.rooms_sold,
                    metric.occupancy,
                    metric.revenue,
                    metric.rate,
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn save_daily_entry(&self, metric: DailyMetric) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO daily_metric (date, revenue, target, occupancy, arr, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                format_date(metric.date),
                metric.revenue,
                metric.target,
                metric.occupancy,
                metric.arr,
                metric.notes,
            ],
        )?;

        Ok(())
    }

    async fn find_daily(&self, date: NaiveDate) -> RepositoryResult<Option<DailyMetric>> {
        let conn = self.get_conn()?;

        let metric = conn
            .query_row(
                r#"
                SELECT date, revenue, target, occupancy, arr, notes
                FROM daily_metric
                WHERE date = ?1
                "#,
                params![format_date(date)],
                map_daily,
            )
            .optional()?;

        Ok(metric)
    }

    async fn find_daily_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<DailyMetric>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT date, revenue, target, occupancy, arr, notes
            FROM daily_metric
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date
            "#,
        )?;

        let metrics = stmt
            .query_map(params![format_date(from), format_date(to)], map_daily)?
            .collect::<SqliteResult<Vec<DailyMetric>>>()?;

        Ok(metrics)
    }

    async fn find_room_types_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<RoomTypeMetric>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT date, room_type, rooms, available, sold, revenue, rate, occupancy
            FROM room_type_metric
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date, room_type
            "#,
        )?;

        let metrics = stmt
            .query_map(params![format_date(from), format_date(to)], map_room_type)?
            .collect::<SqliteResult<Vec<RoomTypeMetric>>>()?;

        Ok(metrics)
    }

    async fn find_yearly(&self) -> RepositoryResult<Vec<YearlyMetric>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT year, rooms_sold, occupancy, revenue, rate
            FROM yearly_metric
            ORDER BY year
            "#,
        )?;

        let metrics = stmt
            .query_map([], |row| {
                Ok(YearlyMetric {
                    year: row.get(0)?,
                    rooms_sold: row.get(1)?,
                    occupancy: row.get(2)?,
                    revenue: row.get(3)?,
                    rate: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<YearlyMetric>>>()?;

        Ok(metrics)
    }
}
