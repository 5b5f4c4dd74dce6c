// ==========================================
// 酒店营收报表系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 层 / CLI 调用
// ==========================================

pub mod error;
pub mod import_api;
pub mod metric_api;
pub mod overview_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse};
pub use metric_api::MetricApi;
pub use overview_api::OverviewApi;
