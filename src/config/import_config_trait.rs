// ==========================================
// 酒店营收报表系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 跳过明细抽样上限（默认）
pub const DEFAULT_SKIP_SAMPLE_LIMIT: usize = 20;

// ==========================================
// ImportSettings - 单次导入使用的配置快照
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    pub skip_sample_limit: usize, // 每张表最多记录多少条跳过明细
    pub clamp_percent: bool,      // 百分比是否截断到 [0, 100]
    pub daily_month_guard: bool,  // 每日表是否拒绝报表月份以外的日期
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            skip_sample_limit: DEFAULT_SKIP_SAMPLE_LIMIT,
            clamp_percent: true,
            daily_month_guard: true,
        }
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取跳过明细抽样上限
    ///
    /// # 默认值
    /// - 20
    async fn get_skip_sample_limit(&self) -> RepositoryResult<usize>;

    /// 百分比是否截断到 [0, 100]
    ///
    /// # 默认值
    /// - true
    async fn get_clamp_percent(&self) -> RepositoryResult<bool>;

    /// 每日表是否拒绝报表月份以外的完整日期（OUT_OF_MONTH）
    ///
    /// # 默认值
    /// - true
    async fn get_daily_month_guard(&self) -> RepositoryResult<bool>;

    /// 一次性读取导入配置快照
    async fn load_import_settings(&self) -> RepositoryResult<ImportSettings> {
        Ok(ImportSettings {
            skip_sample_limit: self.get_skip_sample_limit().await?,
            clamp_percent: self.get_clamp_percent().await?,
            daily_month_guard: self.get_daily_month_guard().await?,
        })
    }
}
