// ==========================================
// 酒店营收报表系统 - 报表形态识别
// ==========================================
// 职责: 根据首行表头判定工作表形态
// 优先级: yearly > roomtypes > daily > unknown
// ==========================================

use crate::domain::report::Sheet;
use crate::domain::types::SheetKind;
use crate::importer::field_resolver::normalize_header;

// ==========================================
// HeaderFeatures - 表头特征
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFeatures {
    pub has_day: bool,       // 含 "day" 或 "date"
    pub has_target: bool,    // 含 "target"
    pub has_revenue: bool,   // 含 "revenue"
    pub has_occupancy: bool, // 含 "occupancy"
    pub has_rate: bool,      // 含 "rate"
    pub has_type: bool,      // 等于 "type" / "room type" / "roomtype"
    pub has_sold: bool,      // 含 "sold" 或 "available"
    pub has_year: bool,      // 等于 "year"
}

impl HeaderFeatures {
    pub fn from_headers(headers: &[String]) -> Self {
        let mut features = HeaderFeatures::default();

        for header in headers.iter().map(|h| normalize_header(h)) {
            features.has_day |= header.contains("day") || header.contains("date");
            features.has_target |= header.contains("target");
            features.has_revenue |= header.contains("revenue");
            features.has_occupancy |= header.contains("occupancy");
            features.has_rate |= header.contains("rate");
            features.has_type |= matches!(header.as_str(), "type" | "room type" | "roomtype");
            features.has_sold |= header.contains("sold") || header.contains("available");
            features.has_year |= header == "year";
        }

        features
    }

    /// 按优先级判定形态
    pub fn kind(&self) -> SheetKind {
        if self.has_year && self.has_revenue {
            SheetKind::Yearly
        } else if self.has_type
            && (self.has_revenue || self.has_rate || self.has_occupancy || self.has_sold)
        {
            SheetKind::RoomTypes
        } else if self.has_day && (self.has_target || self.has_revenue) {
            SheetKind::Daily
        } else {
            SheetKind::Unknown
        }
    }
}

/// 判定工作表形态（无数据行时直接判为 unknown）
pub fn classify(sheet: &Sheet) -> SheetKind {
    if sheet.is_empty() {
        return SheetKind::Unknown;
    }
    HeaderFeatures::from_headers(&sheet.headers).kind()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{CellValue, Row};

    fn sheet(headers: &[&str]) -> Sheet {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let row: Row = headers
            .iter()
            .map(|h| (h.clone(), CellValue::Number(1.0)))
            .collect();
        Sheet::new("Sheet1", headers, vec![row])
    }

    #[test]
    fn test_daily() {
        assert_eq!(classify(&sheet(&["Date", "Target", "Revenue", "Occupancy", "ARR"])), SheetKind::Daily);
        assert_eq!(classify(&sheet(&["Day", "Daily Revenue"])), SheetKind::Daily);
    }

    #[test]
    fn test_room_types() {
        assert_eq!(
            classify(&sheet(&["Room Type", "Rooms", "Available", "Sold", "Revenue", "Rate"])),
            SheetKind::RoomTypes
        );
        assert_eq!(classify(&sheet(&["Type", "Occupancy"])), SheetKind::RoomTypes);
    }

    #[test]
    fn test_yearly_takes_precedence() {
        // 同时满足每日（Date + Revenue）与年度特征
        assert_eq!(
            classify(&sheet(&["Year", "Date", "Revenue", "Target"])),
            SheetKind::Yearly
        );
        assert_eq!(
            classify(&sheet(&["Year", "Room Type", "Revenue"])),
            SheetKind::Yearly
        );
    }

    #[test]
    fn test_type_requires_exact_header() {
        // "Room Category" 不参与形态识别
        assert_eq!(classify(&sheet(&["Room Category", "Revenue"])), SheetKind::Unknown);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(classify(&sheet(&["Name", "Notes"])), SheetKind::Unknown);
        assert_eq!(classify(&sheet(&["Year", "Rooms Sold"])), SheetKind::Unknown);

        let empty = Sheet::new("Blank", vec!["Date".to_string(), "Revenue".to_string()], vec![]);
        assert_eq!(classify(&empty), SheetKind::Unknown);
    }
}
