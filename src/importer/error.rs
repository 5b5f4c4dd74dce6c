// ==========================================
// 酒店营收报表系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分级: 输入级（整个请求失败） / 表级（仅该表失败）
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 输入级错误（整个请求失败） =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("无法识别的工作簿: {0}")]
    UnreadableWorkbook(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("报表期间无效: year={year}, month={month}（要求 2000-2100 年，1-12 月）")]
    InvalidContext { year: i32, month: u32 },

    // ===== 表级错误（由编排器记录到该表汇总） =====
    #[error("工作表 {sheet} 缺少必需列: {field}")]
    MissingColumn { sheet: String, field: String },

    #[error("落库失败: {0}")]
    Repository(#[from] RepositoryError),
}

impl ImportError {
    /// 是否为输入级错误（应整体拒绝请求）
    pub fn is_input_level(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_)
                | ImportError::FileReadError(_)
                | ImportError::UnreadableWorkbook(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
                | ImportError::InvalidContext { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_level_classification() {
        assert!(ImportError::UnreadableWorkbook("x".into()).is_input_level());
        assert!(ImportError::InvalidContext { year: 2025, month: 13 }.is_input_level());
        assert!(!ImportError::MissingColumn {
            sheet: "Daily".into(),
            field: "target".into()
        }
        .is_input_level());
    }

    #[test]
    fn test_missing_column_message() {
        let err = ImportError::MissingColumn {
            sheet: "Daily".into(),
            field: "target".into(),
        };
        assert!(err.to_string().contains("target"));
        assert!(err.to_string().contains("Daily"));
    }
}
