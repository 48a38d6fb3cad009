// ==========================================
// 装炉分配API
// ==========================================
// 职责: 封装 导入 → 分配 → 导出 流程
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AllocationConfigReader;
use crate::domain::item::{Item, RejectedRow};
use crate::domain::selection::{AllocationResult, GroupEvaluation};
use crate::engine::exact_solver::{MultiBinSolution, ValueBasis};
use crate::engine::orchestrator::AllocationOrchestrator;
use crate::exporter::{CsvExporter, ExportPaths};
use crate::importer::{ExcelOptions, ItemImporter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// 分配报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub result: AllocationResult,
    /// 导入阶段被拒绝的行
    pub rejected_rows: Vec<RejectedRow>,
}

impl AllocationReport {
    /// 热号评估表
    pub fn group_table(&self) -> &[GroupEvaluation] {
        &self.result.evaluations
    }
}

pub struct AllocationApi<C>
where
    C: AllocationConfigReader,
{
    orchestrator: AllocationOrchestrator<C>,
    importer: ItemImporter,
    exporter: CsvExporter,
}

impl<C> AllocationApi<C>
where
    C: AllocationConfigReader,
{
    pub fn new(config: Arc<C>, excel_options: ExcelOptions) -> Self {
        Self {
            orchestrator: AllocationOrchestrator::new(config),
            importer: ItemImporter::new(excel_options),
            exporter: CsvExporter,
        }
    }

    /// 从文件导入并分配
    ///
    /// # 参数
    /// - items_path: 材料表（.csv/.xlsx/.xls）
    /// - master_path: 部品主数据表
    /// - furnace_id: 目标炉号
    /// - today: 基准日（None → 配置 → 系统当日）
    #[instrument(skip(self, items_path, master_path))]
    pub async fn allocate_file<P, Q>(
        &self,
        items_path: P,
        master_path: Q,
        furnace_id: &str,
        today: Option<NaiveDate>,
    ) -> ApiResult<AllocationReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        ensure_furnace_id(furnace_id)?;
        let outcome = self.importer.import_file(items_path, master_path)?;
        if outcome.items.is_empty() {
            return Err(ApiError::ValidationError(format!(
                "无可用材料行（拒绝 {} 行）",
                outcome.rejected_rows.len()
            )));
        }

        let result = self
            .orchestrator
            .allocate(&outcome.items, furnace_id, today)
            .await?;

        Ok(AllocationReport {
            result,
            rejected_rows: outcome.rejected_rows,
        })
    }

    /// 对已校验的材料分配（材料须已关联主数据）
    pub async fn allocate_items(
        &self,
        items: &[Item],
        furnace_id: &str,
        today: Option<NaiveDate>,
    ) -> ApiResult<AllocationReport> {
        ensure_furnace_id(furnace_id)?;
        let result = self.orchestrator.allocate(items, furnace_id, today).await?;
        Ok(AllocationReport {
            result,
            rejected_rows: Vec::new(),
        })
    }

    /// 多炉精确分配
    pub async fn solve_exact(
        &self,
        items: &[Item],
        furnace_ids: &[String],
        basis: ValueBasis,
    ) -> ApiResult<MultiBinSolution> {
        Ok(self
            .orchestrator
            .solve_exact(items, furnace_ids, basis)
            .await?)
    }

    /// 导出 summary.csv / result.csv
    pub fn export<P: AsRef<Path>>(&self, report: &AllocationReport, out_dir: P) -> ApiResult<ExportPaths> {
        Ok(self.exporter.export_to_dir(&report.result, out_dir)?)
    }
}

fn ensure_furnace_id(furnace_id: &str) -> ApiResult<()> {
    if furnace_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("炉号不能为空".to_string()));
    }
    Ok(())
}
