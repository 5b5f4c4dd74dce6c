// ==========================================
// 酒店营收报表系统 - 年度汇总表导入器
// ==========================================
// 必需列: 年份
// 自然键: year（2000..=2100）
// ==========================================

use crate::domain::metric::YearlyMetric;
use crate::domain::report::{Sheet, SheetImportStats};
use crate::domain::types::{SheetKind, SkipReason};
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_resolver::{has_field, resolve, synonyms};
use crate::importer::report_importer_trait::{
    ConflictHandler as _, NormalizedSheet, ShapeImportContext, ShapeImporter,
};
use crate::importer::value_coercer::{coerce_number, coerce_percent, coerce_year};
use crate::repository::metric_repo::MetricRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub struct YearlyImporter {
    repo: Arc<dyn MetricRepository>,
}

impl YearlyImporter {
    pub fn new(repo: Arc<dyn MetricRepository>) -> Self {
        Self { repo }
    }

    /// 规范化年度表（不落库）
    pub fn normalize(sheet: &Sheet, ctx: &ShapeImportContext) -> ImportResult<NormalizedSheet<YearlyMetric>> {
        if !has_field(&sheet.headers, synonyms::YEAR) {
            return Err(ImportError::MissingColumn {
                sheet: sheet.name.clone(),
                field: "year".to_string(),
            });
        }

        let clamp = ctx.settings.clamp_percent;
        let mut recorder = ctx.skip_recorder();
        let mut candidates = Vec::with_capacity(sheet.rows.len());

        for (index, row) in sheet.rows.iter().enumerate() {
            let line = sheet.line_number(index);

            let Some(year) = resolve(row, synonyms::YEAR).and_then(coerce_year) else {
                recorder.record(line, SkipReason::InvalidYear);
                continue;
            };

            candidates.push((
                line,
                YearlyMetric {
                    year,
                    rooms_sold: resolve(row, synonyms::ROOMS_SOLD).and_then(coerce_number),
                    occupancy: resolve(row, synonyms::OCCUPANCY).and_then(|c| coerce_percent(c, clamp)),
                    revenue: resolve(row, synonyms::REVENUE).and_then(coerce_number),
                    rate: resolve(row, synonyms::RATE).and_then(coerce_number),
                },
            ));
        }

        let records = ConflictHandler.keep_last(candidates, |m| m.year, &mut recorder);
        Ok(NormalizedSheet { records, recorder })
    }
}

#[async_trait]
impl ShapeImporter for YearlyImporter {
    fn kind(&self) -> SheetKind {
        SheetKind::Yearly
    }

    async fn import_sheet(&self, sheet: &Sheet, ctx: &ShapeImportContext) -> ImportResult<SheetImportStats> {
        let NormalizedSheet { records, recorder } = Self::normalize(sheet, ctx)?;

        let upserts = if records.is_empty() {
            0
        } else {
            self.repo.batch_upsert_yearly(records).await?
        };

        let stats = recorder.finish(upserts);
        tracing::info!(
            sheet = %sheet.name,
            upserts = stats.upserts,
            skipped_rows = stats.skipped_rows,
            "年度表导入完成"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::import_config_trait::ImportSettings;
    use crate::domain::report::{CellValue, ReportPeriod};

    fn ctx() -> ShapeImportContext {
        ShapeImportContext::new(ReportPeriod::new(2025, 8).unwrap(), ImportSettings::default())
    }

    fn sheet(headers: &[&str], rows: &[&[CellValue]]) -> Sheet {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|cells| headers.iter().cloned().zip(cells.iter().cloned()).collect())
            .collect();
        Sheet::new("Yearly", headers, rows)
    }

    #[test]
    fn test_normalize_years() {
        let sheet = sheet(
            &["Year", "Rooms Sold", "Occupancy", "Revenue", "ARR"],
            &[
                &[
                    CellValue::Number(2023.0),
                    CellValue::Number(15000.0),
                    CellValue::Number(0.68),
                    CellValue::Number(21_000_000.0),
                    CellValue::Number(1400.0),
                ],
                &[
                    CellValue::Text("2024".to_string()),
                    CellValue::Text("16,200".to_string()),
                    CellValue::Text("71.5".to_string()),
                    CellValue::Text("R 24,300,000".to_string()),
                    CellValue::Empty,
                ],
            ],
        );

        let normalized = YearlyImporter::normalize(&sheet, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.records[0].year, 2023);
        assert_eq!(normalized.records[0].occupancy, Some(68.0));
        assert_eq!(normalized.records[1].rooms_sold, Some(16200.0));
        assert_eq!(normalized.records[1].revenue, Some(24_300_000.0));
        assert_eq!(normalized.records[1].rate, None);
    }

    #[test]
    fn test_invalid_year_skipped() {
        let sheet = sheet(
            &["Year", "Revenue"],
            &[
                &[CellValue::Text("Total".to_string()), CellValue::Number(1.0)],
                &[CellValue::Number(1999.0), CellValue::Number(1.0)],
                &[CellValue::Number(2024.0), CellValue::Number(1.0)],
            ],
        );

        let normalized = YearlyImporter::normalize(&sheet, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 1);

        let stats = normalized.recorder.finish(1);
        assert_eq!(stats.skipped_rows, 2);
        assert!(stats.skips.iter().all(|s| s.reason == SkipReason::InvalidYear));
    }

    #[test]
    fn test_missing_year_column() {
        let sheet = sheet(&["Period", "Revenue"], &[&[CellValue::Number(2024.0), CellValue::Number(1.0)]]);
        assert!(YearlyImporter::normalize(&sheet, &ctx()).is_err());
    }
}
