// ==========================================
// 酒店营收报表系统 - 命令行定义
// ==========================================
// 工具: clap derive
// 数据库: HOTEL_REVENUE_DB_PATH 或用户数据目录
// ==========================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 酒店营收报表系统 - 报表导入与经营概览
#[derive(Parser, Debug)]
#[command(name = "hotel-revenue")]
#[command(version)]
#[command(about = "酒店营收报表导入与经营概览", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// 导入报表文件（xlsx/xls/ods/csv）
    Import {
        /// 报表文件路径
        file: PathBuf,

        /// 报表年份（2000-2100）
        year: i64,

        /// 报表月份（1-12）
        month: i64,
    },

    /// 计算日期区间概览（YYYY-MM-DD）
    Overview { from: String, to: String },

    /// 本月至今概览
    Mtd {
        /// 截止日期（YYYY-MM-DD，默认今天）
        today: Option<String>,
    },

    /// 列出年度汇总
    Yearly,

    /// 写入导入配置（如 import.clamp_percent false）
    Config { key: String, value: String },
}
