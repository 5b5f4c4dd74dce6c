// ==========================================
// 报表导入API
// ==========================================
// 职责: 封装报表上传导入（字节流 / 临时文件）
// 输出: { ok, batchId, summaries, error? }
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_period;
use crate::domain::report::{ImportOutcome, SheetSummary};
use crate::importer::ReportImporter;

/// 导入API响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportApiResponse {
    /// 请求是否被处理（单表失败不影响该值）
    pub ok: bool,
    /// 批次ID（仅用于日志关联）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    /// 每张工作表一条汇总
    pub summaries: Vec<SheetSummary>,
    /// 输入级错误原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ImportOutcome> for ImportApiResponse {
    fn from(outcome: ImportOutcome) -> Self {
        Self {
            ok: outcome.ok,
            batch_id: Some(outcome.batch_id),
            summaries: outcome.summaries,
            error: None,
        }
    }
}

impl ImportApiResponse {
    /// 输入级失败的响应体
    pub fn failure(err: &ApiError) -> Self {
        Self {
            ok: false,
            batch_id: None,
            summaries: Vec::new(),
            error: Some(err.to_string()),
        }
    }

    /// 折叠 API 结果为统一响应体（供 HTTP 层直接序列化）
    pub fn from_result(result: ApiResult<ImportApiResponse>) -> Self {
        result.unwrap_or_else(|err| Self::failure(&err))
    }
}

// ==========================================
// ImportApi - 报表导入API
// ==========================================
pub struct ImportApi {
    importer: Arc<dyn ReportImporter>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(importer: Arc<dyn ReportImporter>) -> Self {
        Self { importer }
    }

    /// 导入上传的工作簿
    ///
    /// # 参数
    /// - bytes: 文件内容（Excel 或 CSV）
    /// - year / month: 报表所属月份
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): ok=true，含每张表汇总
    /// - Err(ApiError): 报表月份无效或文件无法解码
    pub async fn import_workbook(&self, bytes: &[u8], year: i64, month: i64) -> ApiResult<ImportApiResponse> {
        let period = validate_period(year, month)?;

        let outcome = self
            .importer
            .import_workbook(bytes, period.year, period.month)
            .await?;

        Ok(ImportApiResponse::from(outcome))
    }

    /// 导入已落盘的上传文件
    pub async fn import_file(&self, path: &Path, year: i64, month: i64) -> ApiResult<ImportApiResponse> {
        let period = validate_period(year, month)?;

        let outcome = self
            .importer
            .import_file(path, period.year, period.month)
            .await?;

        Ok(ImportApiResponse::from(outcome))
    }
}
