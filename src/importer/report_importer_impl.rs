// ==========================================
// 酒店营收报表系统 - 报表导入器实现
// ==========================================
// 职责: 整合导入流程，从上传文件到数据库
// 流程: 校验报表月份 → 解码 → 逐表识别形态 → 分形态导入 → 汇总
// 红线: 单表失败只记录在该表汇总中，不中断其他表
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::report::{ImportOutcome, ReportPeriod, Sheet, SheetSummary, Workbook};
use crate::domain::types::SheetKind;
use crate::importer::daily_importer::DailyImporter;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::report_importer_trait::{
    ReportImporter, ShapeImportContext, ShapeImporter, WorkbookParser,
};
use crate::importer::room_type_importer::RoomTypeImporter;
use crate::importer::sheet_classifier::classify;
use crate::importer::yearly_importer::YearlyImporter;
use crate::repository::MetricRepository;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ReportImporterImpl - 报表导入器实现
// ==========================================
pub struct ReportImporterImpl<C>
where
    C: ImportConfigReader,
{
    // 配置读取器
    config: C,

    // 导入组件
    parser: UniversalFileParser,
    shape_importers: Vec<Box<dyn ShapeImporter>>,
}

impl<C> ReportImporterImpl<C>
where
    C: ImportConfigReader,
{
    /// 创建新的 ReportImporter 实例
    ///
    /// # 参数
    /// - repo: 指标仓储（三类导入器共享）
    /// - config: 配置读取器
    pub fn new(repo: Arc<dyn MetricRepository>, config: C) -> Self {
        Self {
            config,
            parser: UniversalFileParser,
            shape_importers: vec![
                Box::new(DailyImporter::new(repo.clone())),
                Box::new(RoomTypeImporter::new(repo.clone())),
                Box::new(YearlyImporter::new(repo)),
            ],
        }
    }

    fn validate_period(year: i32, month: u32) -> ImportResult<ReportPeriod> {
        ReportPeriod::new(year, month).ok_or(ImportError::InvalidContext { year, month })
    }

    fn importer_for(&self, kind: SheetKind) -> Option<&dyn ShapeImporter> {
        self.shape_importers
            .iter()
            .find(|importer| importer.kind() == kind)
            .map(|importer| importer.as_ref())
    }

    /// 导入已解码的工作簿
    ///
    /// # 返回
    /// - Ok(ImportOutcome): ok=true，每张表一条汇总（按工作簿顺序）
    /// - Err: 仅在读取导入配置失败时返回
    #[instrument(skip(self, workbook), fields(batch_id, sheet_count = workbook.sheets.len()))]
    pub async fn import_parsed(
        &self,
        workbook: Workbook,
        period: ReportPeriod,
    ) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let settings = self.config.load_import_settings().await?;
        let ctx = ShapeImportContext::new(period, settings);
        info!(
            batch_id = %batch_id,
            year = period.year,
            month = period.month,
            "开始导入报表"
        );

        let mut summaries = Vec::with_capacity(workbook.sheets.len());
        for sheet in &workbook.sheets {
            summaries.push(self.import_one_sheet(sheet, &ctx).await);
        }

        let outcome = ImportOutcome {
            ok: true,
            batch_id,
            summaries,
        };

        info!(
            batch_id = %outcome.batch_id,
            total_upserts = outcome.total_upserts(),
            failed_sheets = outcome.summaries.iter().filter(|s| s.is_failure()).count(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "报表导入完成"
        );
        Ok(outcome)
    }

    async fn import_one_sheet(&self, sheet: &Sheet, ctx: &ShapeImportContext) -> SheetSummary {
        if sheet.is_empty() {
            debug!(sheet = %sheet.name, "工作表无数据行，跳过");
            return SheetSummary::empty(&sheet.name);
        }

        let kind = classify(sheet);
        let Some(importer) = self.importer_for(kind) else {
            info!(sheet = %sheet.name, headers = ?sheet.headers, "无法识别工作表形态，跳过");
            return SheetSummary::unrecognized(&sheet.name);
        };

        debug!(sheet = %sheet.name, kind = %kind, rows = sheet.rows.len(), "开始导入工作表");
        match importer.import_sheet(sheet, ctx).await {
            Ok(stats) => SheetSummary::imported(&sheet.name, kind, stats),
            Err(e) => {
                warn!(sheet = %sheet.name, kind = %kind, error = %e, "工作表导入失败");
                SheetSummary::failed(&sheet.name, kind, e.to_string())
            }
        }
    }
}

#[async_trait]
impl<C> ReportImporter for ReportImporterImpl<C>
where
    C: ImportConfigReader,
{
    async fn import_workbook(&self, bytes: &[u8], year: i32, month: u32) -> ImportResult<ImportOutcome> {
        let period = Self::validate_period(year, month)?;

        let workbook = self.parser.parse_bytes(bytes).map_err(|e| {
            warn!(error = %e, size = bytes.len(), "工作簿解码失败");
            e
        })?;

        self.import_parsed(workbook, period).await
    }

    async fn import_file(&self, path: &Path, year: i32, month: u32) -> ImportResult<ImportOutcome> {
        let period = Self::validate_period(year, month)?;

        info!(file_path = %path.display(), "读取上传文件");
        let workbook = self.parser.parse_file(path)?;

        self.import_parsed(workbook, period).await
    }
}
