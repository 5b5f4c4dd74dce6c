// ==========================================
// 酒店营收报表系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 约定: 全部仓储共享同一个 SQLite 连接
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{ImportApi, MetricApi, OverviewApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::OverviewAggregator;
use crate::importer::{ReportImporter, ReportImporterImpl};
use crate::repository::{MetricRepository, MetricRepositoryImpl};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 报表导入API
    pub import_api: Arc<ImportApi>,

    /// 经营概览API
    pub overview_api: Arc<OverviewApi>,

    /// 指标管理API
    pub metric_api: Arc<MetricApi>,

    /// 配置管理器（用于调整导入参数）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 表示内存库）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库结构: {}", e))?;

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 基于已打开的连接组装应用状态
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let metric_repo: Arc<dyn MetricRepository> = Arc::new(
            MetricRepositoryImpl::from_connection(conn.clone())
                .map_err(|e| format!("无法创建MetricRepository: {}", e))?,
        );

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化导入层 / 引擎层
        // ==========================================
        let importer_config = ConfigManager::from_connection(conn)
            .map_err(|e| format!("无法创建ConfigManager: {}", e))?;
        let importer: Arc<dyn ReportImporter> =
            Arc::new(ReportImporterImpl::new(metric_repo.clone(), importer_config));

        let aggregator = Arc::new(OverviewAggregator::new(metric_repo.clone()));

        // ==========================================
        // 创建API实例
        // ==========================================
        let import_api = Arc::new(ImportApi::new(importer));
        let overview_api = Arc::new(OverviewApi::new(aggregator));
        let metric_api = Arc::new(MetricApi::new(metric_repo));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            import_api,
            overview_api,
            metric_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 HOTEL_REVENUE_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("HOTEL_REVENUE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./hotel_revenue.db");

    // 尝试获取用户数据目录
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("hotel-revenue");
        match std::fs::create_dir_all(&dir) {
            Ok(()) => path = dir.join("hotel_revenue.db"),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "无法创建数据目录，使用当前目录");
            }
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_state() {
        let state = AppState::new(":memory:".to_string()).unwrap();
        assert_eq!(state.db_path, ":memory:");
    }
}
