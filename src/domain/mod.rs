// ==========================================
// 酒店营收报表系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含导入/聚合逻辑
// ==========================================

pub mod metric;
pub mod overview;
pub mod report;
pub mod types;

// 重导出核心类型
pub use metric::{DailyMetric, RoomTypeMetric, YearlyMetric};
pub use overview::{DailySeriesPoint, Overview, RoomTypeRollup};
pub use report::{
    CellValue, ImportOutcome, ReportPeriod, Row, RowSkip, Sheet, SheetImportStats, SheetSummary,
    SkipRecorder, Workbook,
};
pub use types::{SheetKind, SkipReason};
