// ==========================================
// 酒店营收报表系统 - 每日经营表导入器
// ==========================================
// 必需列: 日期（或日号）、营收、目标
// 可选列: 出租率、平均房价
// 自然键: date（同表重复以后出现者为准）
// ==========================================

use crate::domain::metric::DailyMetric;
use crate::domain::report::{Row, Sheet, SheetImportStats};
use crate::domain::types::{SheetKind, SkipReason};
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_resolver::{has_field, resolve, resolve_all, synonyms};
use crate::importer::report_importer_trait::{
    ConflictHandler as _, NormalizedSheet, ShapeImportContext, ShapeImporter,
};
use crate::importer::value_coercer::{coerce_number, coerce_percent, resolve_date};
use crate::repository::metric_repo::MetricRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct DailyImporter {
    repo: Arc<dyn MetricRepository>,
}

impl DailyImporter {
    pub fn new(repo: Arc<dyn MetricRepository>) -> Self {
        Self { repo }
    }

    /// 规范化每日表（不落库）
    pub fn normalize(sheet: &Sheet, ctx: &ShapeImportContext) -> ImportResult<NormalizedSheet<DailyMetric>> {
        for (field, candidates) in [
            ("date", synonyms::DATE),
            ("revenue", synonyms::REVENUE),
            ("target", synonyms::TARGET),
        ] {
            if !has_field(&sheet.headers, candidates) {
                return Err(ImportError::MissingColumn {
                    sheet: sheet.name.clone(),
                    field: field.to_string(),
                });
            }
        }

        let clamp = ctx.settings.clamp_percent;
        let mut recorder = ctx.skip_recorder();
        let mut candidates = Vec::with_capacity(sheet.rows.len());

        for (index, row) in sheet.rows.iter().enumerate() {
            let line = sheet.line_number(index);

            let date = match row_date(row, ctx) {
                Ok(date) => date,
                Err(reason) => {
                    recorder.record(line, reason);
                    continue;
                }
            };

            if ctx.settings.daily_month_guard && !ctx.period.contains(date) {
                recorder.record(line, SkipReason::OutOfMonth);
                continue;
            }

            let metric = DailyMetric {
                date,
                revenue: resolve(row, synonyms::REVENUE).and_then(coerce_number),
                target: resolve(row, synonyms::TARGET).and_then(coerce_number),
                occupancy: resolve(row, synonyms::OCCUPANCY).and_then(|c| coerce_percent(c, clamp)),
                arr: resolve(row, synonyms::RATE).and_then(coerce_number),
                notes: None,
            };

            if metric.is_blank() {
                recorder.record(line, SkipReason::EmptyRow);
                continue;
            }

            candidates.push((line, metric));
        }

        let records = ConflictHandler.keep_last(candidates, |m| m.date, &mut recorder);
        Ok(NormalizedSheet { records, recorder })
    }
}

/// 解析行日期: 依次尝试所有日期列，全部失败时返回最具体的原因
fn row_date(row: &Row, ctx: &ShapeImportContext) -> Result<NaiveDate, SkipReason> {
    let mut failure = SkipReason::NoDate;

    for cell in resolve_all(row, synonyms::DATE) {
        match resolve_date(cell, Some(&ctx.period)) {
            Ok(date) => return Ok(date),
            Err(SkipReason::NoDate) => {}
            Err(reason) => {
                if failure == SkipReason::NoDate {
                    failure = reason;
                }
            }
        }
    }

    Err(failure)
}

#[async_trait]
impl ShapeImporter for DailyImporter {
    fn kind(&self) -> SheetKind {
        SheetKind::Daily
    }

    async fn import_sheet(&self, sheet: &Sheet, ctx: &ShapeImportContext) -> ImportResult<SheetImportStats> {
        let NormalizedSheet { records, recorder } = Self::normalize(sheet, ctx)?;

        let upserts = if records.is_empty() {
            0
        } else {
            self.repo.batch_upsert_daily(records).await?
        };

        let stats = recorder.finish(upserts);
        tracing::info!(
            sheet = %sheet.name,
            upserts = stats.upserts,
            skipped_rows = stats.skipped_rows,
            "每日表导入完成"
        );
        Ok(stats)
    }
}
