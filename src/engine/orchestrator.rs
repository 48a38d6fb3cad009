// ==========================================
// 热处理炉装炉排产系统 - 引擎编排器
// ==========================================
// 用途: 协调分层判定 → 分组排序 → 装炉 → 选炉 → 结果投影
// 红线: 每次调用都是输入表、炉号、配置、基准日的纯函数
// ==========================================

use crate::config::{AllocationConfig, AllocationConfigReader};
use crate::domain::furnace::Furnace;
use crate::domain::item::Item;
use crate::domain::selection::AllocationResult;
use crate::engine::capacity_filler::PackContext;
use crate::engine::eligibility::EligibilityRules;
use crate::engine::error::{AllocationError, EngineResult};
use crate::engine::exact_solver::{Bin, KnapsackItem, MultiBinSolution, MultiBinSolver, ValueBasis};
use crate::engine::group_selector::GroupSelector;
use crate::engine::projection::ResultProjector;
use crate::engine::urgency::UrgencyClassifier;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

// ==========================================
// AllocationOrchestrator - 引擎编排器
// ==========================================
pub struct AllocationOrchestrator<C>
where
    C: AllocationConfigReader,
{
    config: Arc<C>,
    selector: GroupSelector,
    solver: MultiBinSolver,
}

impl<C> AllocationOrchestrator<C>
where
    C: AllocationConfigReader,
{
    pub fn new(config: Arc<C>) -> Self {
        Self {
            config,
            selector: GroupSelector::new(),
            solver: MultiBinSolver::new(),
        }
    }

    /// 读取并校验配置
    pub async fn load_config(&self) -> EngineResult<AllocationConfig> {
        let config = self
            .config
            .load_allocation_config()
            .await
            .map_err(|e| AllocationError::InvalidConfig(e.to_string()))?;
        config.validate().map_err(AllocationError::InvalidConfig)?;
        Ok(config)
    }

    /// 执行单炉装炉分配
    ///
    /// # 参数
    /// - items: 已校验、已关联主数据的材料（导入顺序）
    /// - furnace_id: 目标炉号
    /// - today: 基准日（None → 配置基准日 → 系统当日）
    ///
    /// # 错误
    /// - UnknownFurnace: 炉号未配置
    /// - InvalidItem: 品番重复或重量非法
    /// - NoFeasibleGroup: 无热号达到最低装炉量
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn allocate(
        &self,
        items: &[Item],
        furnace_id: &str,
        today: Option<NaiveDate>,
    ) -> EngineResult<AllocationResult> {
        let config = self.load_config().await?;
        let furnace = resolve_furnace(&config, furnace_id)?;
        validate_items(items)?;

        let today = today.unwrap_or_else(|| config.resolve_today());
        info!(
            furnace_id = %furnace.furnace_id,
            capacity_t = furnace.capacity_t,
            min_fill_t = furnace.min_fill_t,
            items_count = items.len(),
            today = %today,
            "开始执行装炉分配"
        );

        // ==========================================
        // 步骤1: 紧急分层判定
        // ==========================================
        let rules = EligibilityRules::from_config(&config);
        let classifier = UrgencyClassifier::new(config.far_deadline_business_days);
        let assessments = classifier.classify_batch(items, today);

        // ==========================================
        // 步骤2: 准备预投入池（数据集级）
        // ==========================================
        let ctx = PackContext::prepare(
            items,
            furnace,
            &rules,
            &classifier,
            &assessments,
            config.pre_admission_scope,
        );
        debug!(
            deadline_pool = ctx.deadline_pool.len(),
            mid_process_pool = ctx.mid_process_pool.len(),
            scope = %config.pre_admission_scope,
            "预投入池就绪"
        );

        // ==========================================
        // 步骤3: 逐热号装炉并选炉
        // ==========================================
        let chosen = self.selector.select(&ctx, items)?;

        // ==========================================
        // 步骤4: 结果投影
        // ==========================================
        let result = ResultProjector::project(items, chosen);
        info!(
            furnace_id = %result.summary.furnace_id,
            heat_no = %result.selection.heat_no,
            total_weight = result.summary.total_weight,
            selected = result.selected_count(),
            phase = %result.selection.committed_phase,
            "装炉分配完成"
        );

        Ok(result)
    }

    /// 多炉精确分配（整数规划,限时）
    ///
    /// # 参数
    /// - furnace_ids: 参与的炉号（空 → 全部已配置炉）
    /// - basis: 价值口径
    ///
    /// # 规则
    /// - 每个炉的禁止/专用名单转为该炉的排除品番
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn solve_exact(
        &self,
        items: &[Item],
        furnace_ids: &[String],
        basis: ValueBasis,
    ) -> EngineResult<MultiBinSolution> {
        let config = self.load_config().await?;
        validate_items(items)?;

        let furnaces: Vec<&Furnace> = if furnace_ids.is_empty() {
            config.furnaces.iter().collect()
        } else {
            furnace_ids
                .iter()
                .map(|id| resolve_furnace(&config, id))
                .collect::<EngineResult<_>>()?
        };

        let rules = EligibilityRules::from_config(&config);
        let bins: Vec<Bin> = furnaces
            .iter()
            .map(|furnace| {
                let mut bin = Bin::new(furnace.furnace_id.clone(), furnace.capacity_t);
                bin.excluded_items = items
                    .iter()
                    .filter(|item| !rules.allowed(&item.item_id, &furnace.furnace_id))
                    .map(|item| item.item_id.clone())
                    .collect();
                bin
            })
            .collect();

        let knapsack = KnapsackItem::from_items(items, basis);
        let budget = Duration::from_millis(config.solver_time_budget_ms);
        info!(
            items_count = knapsack.len(),
            bins = bins.len(),
            budget_ms = config.solver_time_budget_ms,
            "开始精确求解"
        );

        self.solver.solve_with_budget(knapsack, bins, budget).await
    }
}

fn resolve_furnace<'c>(config: &'c AllocationConfig, furnace_id: &str) -> EngineResult<&'c Furnace> {
    config
        .furnace(furnace_id)
        .ok_or_else(|| AllocationError::UnknownFurnace {
            furnace_id: furnace_id.to_string(),
            known: config.furnaces.iter().map(|f| f.furnace_id.clone()).collect(),
        })
}

/// 批级校验（程序化输入未经导入层时的兜底）
///
/// # 规则
/// - 品番不可重复
/// - 重量、优先等级必须为有限数,重量非负
fn validate_items(items: &[Item]) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for item in items {
        let invalid = |reason: String| AllocationError::InvalidItem {
            row: item.row_number,
            item_id: Some(item.item_id.clone()),
            reason,
        };

        if !seen.insert(item.item_id.as_str()) {
            return Err(invalid("品番重复".to_string()));
        }
        if !item.weight.is_finite() || item.weight < 0.0 {
            return Err(invalid(format!("重量非法: {}", item.weight)));
        }
        if !item.priority_rank.is_finite() {
            return Err(invalid(format!("优先等级非法: {}", item.priority_rank)));
        }
    }
    Ok(())
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigResult, FurnaceRestriction};
    use crate::domain::types::{PreAdmissionScope, ProcessState};
    use async_trait::async_trait;

    struct FixedConfig(AllocationConfig);

    #[async_trait]
    impl AllocationConfigReader for FixedConfig {
        async fn get_furnaces(&self) -> ConfigResult<Vec<Furnace>> {
            Ok(self.0.furnaces.clone())
        }
        async fn get_restrictions(&self) -> ConfigResult<Vec<FurnaceRestriction>> {
            Ok(self.0.restrictions.clone())
        }
        async fn get_preferred_parts(&self) -> ConfigResult<Vec<String>> {
            Ok(self.0.preferred_parts.clone())
        }
        async fn get_far_deadline_business_days(&self) -> ConfigResult<i64> {
            Ok(self.0.far_deadline_business_days)
        }
        async fn get_pre_admission_scope(&self) -> ConfigResult<PreAdmissionScope> {
            Ok(self.0.pre_admission_scope)
        }
        async fn get_solver_time_budget_ms(&self) -> ConfigResult<u64> {
            Ok(self.0.solver_time_budget_ms)
        }
        async fn get_reference_date(&self) -> ConfigResult<Option<NaiveDate>> {
            Ok(self.0.reference_date)
        }
    }

    fn orchestrator() -> AllocationOrchestrator<FixedConfig> {
        let mut config = AllocationConfig::default();
        config.reference_date = NaiveDate::from_ymd_opt(2026, 1, 14);
        AllocationOrchestrator::new(Arc::new(FixedConfig(config)))
    }

    fn item(item_id: &str, heat_no: &str, weight: f64, rank: f64, row: usize) -> Item {
        Item {
            item_id: item_id.to_string(),
            weight,
            priority_rank: rank,
            heat_no: heat_no.to_string(),
            deadline_date: None,
            arrival_date: None,
            process_stage_count: 1,
            process_state: ProcessState::Unknown,
            row_number: row,
        }
    }

    #[tokio::test]
    async fn test_unknown_furnace() {
        let err = orchestrator()
            .allocate(&[item("A", "H", 100.0, 1.0, 1)], "ST99", None)
            .await
            .unwrap_err();
        match err {
            AllocationError::UnknownFurnace { furnace_id, known } => {
                assert_eq!(furnace_id, "ST99");
                assert_eq!(known.len(), 6);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_item_rejected() {
        let items = vec![item("A", "H", 100.0, 1.0, 1), item("A", "H", 100.0, 1.0, 2)];
        let err = orchestrator().allocate(&items, "ST01", None).await.unwrap_err();
        assert!(matches!(err, AllocationError::InvalidItem { row: 2, .. }));
    }

    #[tokio::test]
    async fn test_allocate_end_to_end() {
        let items = vec![
            item("A1", "H1", 12000.0, 2.0, 1),
            item("X1", "H2", 5000.0, 1.0, 2),
            item("A2", "H1", 9000.0, 1.0, 3),
        ];

        let result = orchestrator().allocate(&items, "ST01", None).await.unwrap();
        assert_eq!(result.summary.furnace_id, "ST01");
        assert_eq!(result.summary.total_weight, 21000.0);
        let flags: Vec<bool> = result.annotated_items.iter().map(|a| a.selected).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_solve_exact_respects_eligibility() {
        // ST06 专用品番不得进入 ST01
        let items = vec![
            item("HDA07464", "H1", 8000.0, 1.0, 1),
            item("P2", "H1", 8000.0, 1.0, 2),
        ];
        let solution = orchestrator()
            .solve_exact(&items, &["ST01".to_string()], ValueBasis::Weight)
            .await
            .unwrap();
        assert_eq!(solution.assignments[0].item_ids, vec!["P2"]);
    }
}
