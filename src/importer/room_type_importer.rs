// ==========================================
// 酒店营收报表系统 - 房型快照表导入器
// ==========================================
// 必需列: 房型
// 日期: 统一取报表月份最后一天（月度快照）
// 自然键: (date, room_type)
// ==========================================

use crate::domain::metric::RoomTypeMetric;
use crate::domain::report::{Sheet, SheetImportStats};
use crate::domain::types::{SheetKind, SkipReason};
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_resolver::{has_field, resolve, synonyms};
use crate::importer::report_importer_trait::{
    ConflictHandler as _, NormalizedSheet, ShapeImportContext, ShapeImporter,
};
use crate::importer::value_coercer::{coerce_number, coerce_percent};
use crate::repository::metric_repo::MetricRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub struct RoomTypeImporter {
    repo: Arc<dyn MetricRepository>,
}

impl RoomTypeImporter {
    pub fn new(repo: Arc<dyn MetricRepository>) -> Self {
        Self { repo }
    }

    /// 规范化房型表（不落库）
    pub fn normalize(sheet: &Sheet, ctx: &ShapeImportContext) -> ImportResult<NormalizedSheet<RoomTypeMetric>> {
        if !has_field(&sheet.headers, synonyms::ROOM_TYPE) {
            return Err(ImportError::MissingColumn {
                sheet: sheet.name.clone(),
                field: "type".to_string(),
            });
        }

        let snapshot_date = ctx.period.month_end();
        let clamp = ctx.settings.clamp_percent;
        let mut recorder = ctx.skip_recorder();
        let mut candidates = Vec::with_capacity(sheet.rows.len());

        for (index, row) in sheet.rows.iter().enumerate() {
            let line = sheet.line_number(index);

            let room_type = resolve(row, synonyms::ROOM_TYPE)
                .map(|c| c.to_text())
                .unwrap_or_default();
            if room_type.is_empty() {
                recorder.record(line, SkipReason::NoType);
                continue;
            }

            candidates.push((
                line,
                RoomTypeMetric {
                    date: snapshot_date,
                    room_type,
                    rooms: resolve(row, synonyms::ROOMS).and_then(coerce_number),
                    available: resolve(row, synonyms::AVAILABLE).and_then(coerce_number),
                    sold: resolve(row, synonyms::SOLD).and_then(coerce_number),
                    revenue: resolve(row, synonyms::REVENUE).and_then(coerce_number),
                    rate: resolve(row, synonyms::RATE).and_then(coerce_number),
                    occupancy: resolve(row, synonyms::OCCUPANCY).and_then(|c| coerce_percent(c, clamp)),
                },
            ));
        }

        let records = ConflictHandler.keep_last(
            candidates,
            |m| (m.date, m.room_type.clone()),
            &mut recorder,
        );
        Ok(NormalizedSheet { records, recorder })
    }
}

#[async_trait]
impl ShapeImporter for RoomTypeImporter {
    fn kind(&self) -> SheetKind {
        SheetKind::RoomTypes
    }

    async fn import_sheet(&self, sheet: &Sheet, ctx: &ShapeImportContext) -> ImportResult<SheetImportStats> {
        let NormalizedSheet { records, recorder } = Self::normalize(sheet, ctx)?;

        let upserts = if records.is_empty() {
            0
        } else {
            self.repo.batch_upsert_room_types(records).await?
        };

        let stats = recorder.finish(upserts);
        tracing::info!(
            sheet = %sheet.name,
            snapshot_date = %ctx.period.month_end(),
            upserts = stats.upserts,
            skipped_rows = stats.skipped_rows,
            "房型表导入完成"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::import_config_trait::ImportSettings;
    use crate::domain::report::{CellValue, ReportPeriod};
    use chrono::NaiveDate;

    fn ctx() -> ShapeImportContext {
        ShapeImportContext::new(ReportPeriod::new(2025, 8).unwrap(), ImportSettings::default())
    }

    fn sheet(headers: &[&str], rows: &[&[CellValue]]) -> Sheet {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|cells| headers.iter().cloned().zip(cells.iter().cloned()).collect())
            .collect();
        Sheet::new("Room Types", headers, rows)
    }

    fn n(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_snapshot_date_is_month_end() {
        let sheet = sheet(
            &["Room Type", "Rooms", "Available", "Sold", "Revenue", "Rate", "Occupancy"],
            &[
                &[t(" Deluxe "), n(20.0), n(620.0), n(480.0), n(720000.0), n(1500.0), n(0.774)],
                &[t("Standard"), n(40.0), n(1240.0), n(900.0), n(900000.0), CellValue::Empty, CellValue::Empty],
            ],
        );

        let normalized = RoomTypeImporter::normalize(&sheet, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 2);

        let deluxe = &normalized.records[0];
        assert_eq!(deluxe.date, NaiveDate::from_ymd_opt(2025, 8, 31).unwrap());
        assert_eq!(deluxe.room_type, "Deluxe");
        assert_eq!(deluxe.occupancy, Some(77.4));

        let standard = &normalized.records[1];
        assert_eq!(standard.rate, None);
        assert_eq!(standard.sold, Some(900.0));
    }

    #[test]
    fn test_blank_type_skipped() {
        let sheet = sheet(
            &["Type", "Revenue"],
            &[&[t("  "), n(100.0)], &[t("Suite"), n(300.0)]],
        );

        let normalized = RoomTypeImporter::normalize(&sheet, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 1);

        let stats = normalized.recorder.finish(1);
        assert_eq!(stats.skipped_rows, 1);
        assert_eq!(stats.skips[0].reason, SkipReason::NoType);
        assert_eq!(stats.skips[0].row, 2);
    }

    #[test]
    fn test_duplicate_type_last_wins() {
        let sheet = sheet(
            &["Type", "Revenue"],
            &[&[t("Suite"), n(100.0)], &[t("Suite"), n(300.0)]],
        );

        let normalized = RoomTypeImporter::normalize(&sheet, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].revenue, Some(300.0));
    }

    #[test]
    fn test_missing_type_column() {
        let sheet = sheet(&["Category Name", "Revenue"], &[&[t("Suite"), n(1.0)]]);
        let err = RoomTypeImporter::normalize(&sheet, &ctx()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { ref field, .. } if field == "type"));
    }
}
