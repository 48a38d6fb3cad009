// ==========================================
// 热处理炉装炉排产系统 - 命令行入口
// ==========================================
// 用法: furnace-aps <材料表> <部品主数据> <炉号> [输出目录] [基准日]
// 配置: SQLite config_kv（默认位于用户数据目录）
// ==========================================

use anyhow::{bail, Context};
use furnace_aps::api::AllocationApi;
use furnace_aps::config::ConfigManager;
use furnace_aps::importer::{parse_date_value, ExcelOptions};
use furnace_aps::{db, logging};
use std::path::PathBuf;
use std::sync::Arc;

/// 配置数据库路径环境变量
const DB_PATH_ENV: &str = "FURNACE_APS_DB";

/// Excel 工作表名环境变量
const SHEET_ENV: &str = "FURNACE_APS_SHEET";

const USAGE: &str = "用法: furnace-aps <items.csv|xlsx> <master.csv> <furnace_id> [out_dir] [today]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("{}", USAGE);
    }

    let items_path = PathBuf::from(&args[0]);
    let master_path = PathBuf::from(&args[1]);
    let furnace_id = args[2].trim().to_string();
    let out_dir = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let today = match args.get(4) {
        Some(raw) => match parse_date_value(raw) {
            Some(date) => Some(date),
            None => bail!("基准日格式无效: {}", raw),
        },
        None => None,
    };

    tracing::info!("==================================================");
    tracing::info!("{}", furnace_aps::APP_NAME);
    tracing::info!("系统版本: {}", furnace_aps::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = std::env::var(DB_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| db::default_db_path());
    tracing::info!("使用配置数据库: {}", db_path.display());

    let config = ConfigManager::new(&db_path.to_string_lossy())
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("无法初始化配置")?;

    let excel_options = ExcelOptions::shop_workbook(std::env::var(SHEET_ENV).ok());
    let api = AllocationApi::new(Arc::new(config), excel_options);

    let report = api
        .allocate_file(&items_path, &master_path, &furnace_id, today)
        .await
        .context("装炉分配失败")?;

    let summary = &report.result.summary;
    println!("选择炉号: {}  装炉重量: {}", summary.furnace_id, summary.total_weight);
    println!(
        "选中热号: {}  选中品番: {}  阶段: {:?}",
        report.result.selection.heat_no,
        report.result.selected_count(),
        report.result.selection.committed_phase
    );
    if !report.rejected_rows.is_empty() {
        println!("导入拒绝行: {}", report.rejected_rows.len());
        for row in &report.rejected_rows {
            println!("  行 {}: {}", row.row_number, row.reason);
        }
    }

    println!("热号评估:");
    for eval in report.group_table() {
        println!(
            "  {:<12} 重量={:<10} 优先分={:<8} 成员={:<4} {}",
            eval.heat_no,
            eval.total_weight,
            eval.total_priority_score,
            eval.member_count,
            match &eval.discard_reason {
                Some(reason) => reason.as_str(),
                None if eval.accepted => "ACCEPTED",
                None => "-",
            }
        );
    }

    let paths = api.export(&report, &out_dir).context("结果导出失败")?;
    tracing::info!(
        summary = %paths.summary.display(),
        result = %paths.result.display(),
        "结果已导出"
    );

    Ok(())
}
