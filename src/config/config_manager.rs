// ==========================================
// 酒店营收报表系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{ImportConfigReader, DEFAULT_SKIP_SAMPLE_LIMIT};
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
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

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
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

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        tracing::info!(key = %key, value = %value, "配置已更新");
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取布尔配置（true/1/yes/on 视为真，无法识别时使用默认值）
    fn get_bool_or_default(&self, key: &str, default: bool) -> RepositoryResult<bool> {
        let raw = self.get_config_or_default(key, if default { "true" } else { "false" })?;
        let value = match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => {
                tracing::warn!(key = %key, value = %raw, "布尔配置无法识别，使用默认值");
                default
            }
        };
        Ok(value)
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_skip_sample_limit(&self) -> RepositoryResult<usize> {
        let value = self.get_config_or_default(
            config_keys::SKIP_SAMPLE_LIMIT,
            &DEFAULT_SKIP_SAMPLE_LIMIT.to_string(),
        )?;
        Ok(value.trim().parse::<usize>().unwrap_or(DEFAULT_SKIP_SAMPLE_LIMIT))
    }

    async fn get_clamp_percent(&self) -> RepositoryResult<bool> {
        self.get_bool_or_default(config_keys::CLAMP_PERCENT, true)
    }

    async fn get_daily_month_guard(&self) -> RepositoryResult<bool> {
        self.get_bool_or_default(config_keys::DAILY_MONTH_GUARD, true)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入诊断
    pub const SKIP_SAMPLE_LIMIT: &str = "import.skip_sample_limit";

    // 数值归一化
    pub const CLAMP_PERCENT: &str = "import.clamp_percent";

    // 每日表
    pub const DAILY_MONTH_GUARD: &str = "import.daily_month_guard";
}
