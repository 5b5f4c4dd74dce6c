// ==========================================
// 酒店营收报表系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 报表导入 + 经营概览（上传/抓取的报表 → 规范化指标）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 汇总规则
pub mod engine;

// 导入层 - 外部报表
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{SheetKind, SkipReason};

// 领域实体
pub use domain::{
    CellValue, DailyMetric, ImportOutcome, Overview, ReportPeriod, RoomTypeMetric, Sheet,
    SheetSummary, Workbook, YearlyMetric,
};

// 引擎
pub use engine::OverviewAggregator;

// 导入
pub use importer::{ReportImporter, ReportImporterImpl};

// API
pub use api::{ImportApi, MetricApi, OverviewApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "酒店营收报表系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
