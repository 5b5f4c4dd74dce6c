// ==========================================
// 酒店营收报表系统 - 导入层
// ==========================================
// 职责: 上传报表 → 规范化指标记录
// 支持: Excel（多工作表）, CSV（单表）
// ==========================================

// 模块声明
pub mod conflict_handler;
pub mod daily_importer;
pub mod error;
pub mod field_resolver;
pub mod file_parser;
pub mod report_importer_impl;
pub mod report_importer_trait;
pub mod room_type_importer;
pub mod sheet_classifier;
pub mod value_coercer;
pub mod yearly_importer;

// 重导出核心类型
pub use conflict_handler::ConflictHandler as ConflictHandlerImpl;
pub use daily_importer::DailyImporter;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use report_importer_impl::ReportImporterImpl;
pub use room_type_importer::RoomTypeImporter;
pub use sheet_classifier::{classify, HeaderFeatures};
pub use yearly_importer::YearlyImporter;

// 重导出 Trait 接口
pub use report_importer_trait::{
    ConflictHandler, NormalizedSheet, ReportImporter, ShapeImportContext, ShapeImporter,
    WorkbookParser,
};
