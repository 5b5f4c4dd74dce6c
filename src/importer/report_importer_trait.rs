// ==========================================
// 酒店营收报表系统 - 报表导入 Trait
// ==========================================
// 职责: 定义报表导入接口（不包含实现）
// 管道: 解码 → 形态识别 → 分形态规范化 → 去重 → 批量落库
// ==========================================

use crate::config::import_config_trait::ImportSettings;
use crate::domain::report::{ImportOutcome, ReportPeriod, Sheet, SheetImportStats, SkipRecorder, Workbook};
use crate::domain::types::SheetKind;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::hash::Hash;
use std::path::Path;

// ==========================================
// ReportImporter Trait
// ==========================================
// 用途: 工作簿导入主接口
// 实现者: ReportImporterImpl
#[async_trait]
pub trait ReportImporter: Send + Sync {
    /// 导入上传的工作簿（Excel 或 CSV 字节流）
    ///
    /// # 参数
    /// - bytes: 上传文件内容
    /// - year / month: 报表所属月份
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 每张表一条汇总（表级失败不影响其他表）
    /// - Err: 报表月份无效、工作簿无法解码等输入级错误
    async fn import_workbook(&self, bytes: &[u8], year: i32, month: u32) -> ImportResult<ImportOutcome>;

    /// 从磁盘文件导入（CSV 以文件名作为工作表名）
    async fn import_file(&self, path: &Path, year: i32, month: u32) -> ImportResult<ImportOutcome>;
}

// ==========================================
// WorkbookParser Trait
// ==========================================
// 用途: 字节流 → 工作簿（阶段 0）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait WorkbookParser: Send + Sync {
    /// 解码字节流
    ///
    /// # 返回
    /// - Ok(Workbook): 每张工作表的表头与数据行
    /// - Err: 无法识别或解码失败
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Workbook>;
}

// ==========================================
// ShapeImportContext - 单次导入的共享上下文
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ShapeImportContext {
    pub period: ReportPeriod,
    pub settings: ImportSettings,
}

impl ShapeImportContext {
    pub fn new(period: ReportPeriod, settings: ImportSettings) -> Self {
        Self { period, settings }
    }

    /// 新建跳过记录器（抽样上限取自配置）
    pub fn skip_recorder(&self) -> SkipRecorder {
        SheetImportStats::with_sample_limit(self.settings.skip_sample_limit)
    }
}

/// 规范化结果: 待落库记录 + 跳过记录
#[derive(Debug)]
pub struct NormalizedSheet<T> {
    pub records: Vec<T>,
    pub recorder: SkipRecorder,
}

// ==========================================
// ShapeImporter Trait
// ==========================================
// 用途: 单一形态的工作表导入（阶段 2-4）
// 实现者: DailyImporter, RoomTypeImporter, YearlyImporter
#[async_trait]
pub trait ShapeImporter: Send + Sync {
    /// 负责的报表形态
    fn kind(&self) -> SheetKind;

    /// 导入一张工作表
    ///
    /// # 返回
    /// - Ok(SheetImportStats): 落库条数 + 跳过统计
    /// - Err: 缺少必需列、落库失败（仅该表失败）
    async fn import_sheet(&self, sheet: &Sheet, ctx: &ShapeImportContext) -> ImportResult<SheetImportStats>;
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// 用途: 同表内自然键去重（阶段 3）
// 实现者: ConflictHandler
pub trait ConflictHandler: Send + Sync {
    /// 按自然键去重，后出现者为准
    ///
    /// # 参数
    /// - records: (源行号, 记录)，按源顺序排列
    /// - key_of: 自然键提取
    /// - recorder: 被覆盖的行记为 DUPLICATE_KEY
    ///
    /// # 返回
    /// - 去重后的记录（保持最后一次出现的相对顺序）
    fn keep_last<T, K, F>(&self, records: Vec<(usize, T)>, key_of: F, recorder: &mut SkipRecorder) -> Vec<T>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K;
}
