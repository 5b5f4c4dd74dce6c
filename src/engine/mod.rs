// ==========================================
// 酒店营收报表系统 - 引擎层
// ==========================================
// 职责: 实现汇总规则,不拼 SQL
// ==========================================

pub mod overview_aggregator;

// 重导出核心引擎
pub use overview_aggregator::OverviewAggregator;
