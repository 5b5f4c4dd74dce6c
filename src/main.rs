// ==========================================
// 酒店营收报表系统 - 命令行入口
// ==========================================
// 子命令定义见 cli.rs
// ==========================================

mod cli;

use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands};
use hotel_revenue::api::validator::parse_date_param;
use hotel_revenue::api::ImportApiResponse;
use hotel_revenue::app::{get_default_db_path, AppState};
use hotel_revenue::logging;
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    logging::init();

    let db_path = get_default_db_path();
    tracing::info!(version = hotel_revenue::VERSION, db_path = %db_path, "{}", hotel_revenue::APP_NAME);

    let state = AppState::new(db_path).map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Import { file, year, month } => {
            let result = state.import_api.import_file(&file, year, month).await;
            let response = ImportApiResponse::from_result(result);
            print_json(&response)?;

            if !response.ok {
                std::process::exit(1);
            }
        }
        Commands::Overview { from, to } => {
            let overview = state.overview_api.get_overview_str(&from, &to).await?;
            print_json(&overview)?;
        }
        Commands::Mtd { today } => {
            let today = match today {
                Some(value) => parse_date_param("today", &value)?,
                None => Local::now().date_naive(),
            };
            let overview = state.overview_api.get_month_to_date(today).await?;
            print_json(&overview)?;
        }
        Commands::Yearly => {
            let yearly = state.metric_api.list_yearly().await?;
            print_json(&yearly)?;
        }
        Commands::Config { key, value } => {
            state.config_manager.set_config_value(&key, &value)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
