// ==========================================
// 热处理炉装炉排产系统 - 装炉填充引擎
// ==========================================
// 红线: 装炉总重不得超过炉容量；禁止/专用名单在所有阶段强制执行
// ==========================================
// 职责: 单炉 × 单热号的三段式贪心装炉
// 输入: 热号材料（已排序）+ 数据集级分层池 + 炉配置
// 输出: Selection + 被跳过材料（含原因）
// ==========================================
// 阶段选择器:
//   NoneAdmitted → 出货当日预投入 → 二次热处理预投入 → 常规填充
//   某阶段有投入即提交,跳过剩余阶段；三个阶段共享同一容量累加器
// ==========================================

use crate::domain::furnace::{CapacityConstraint, CapacityLoad, Furnace};
use crate::domain::item::Item;
use crate::domain::selection::{Selection, SkippedItem};
use crate::domain::types::{AllocationPhase, PreAdmissionScope, UrgencyTier};
use crate::engine::eligibility::EligibilityRules;
use crate::engine::priority::PrioritySorter;
use crate::engine::urgency::{UrgencyAssessment, UrgencyClassifier};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

// ==========================================
// PackContext - 一次分配请求内所有热号共享的只读上下文
// ==========================================
pub struct PackContext<'a> {
    pub furnace: &'a Furnace,
    pub rules: &'a EligibilityRules,
    pub classifier: &'a UrgencyClassifier,
    pub assessments: &'a HashMap<String, UrgencyAssessment>,
    /// 出货当日预投入候选（数据集级,已排序）
    pub deadline_pool: Vec<&'a Item>,
    /// 二次热处理预投入候选（数据集级,已排序）
    pub mid_process_pool: Vec<&'a Item>,
}

impl<'a> PackContext<'a> {
    /// 构造上下文并准备预投入候选池
    ///
    /// # 规则
    /// - TierItemsOnly: 候选 = 命中分层的材料本身
    /// - WholeHeat: 候选 = 命中分层材料所在热号的全部材料
    ///   （热号按分层列表中首次出现的顺序,热号内按优先级排序）
    pub fn prepare(
        items: &'a [Item],
        furnace: &'a Furnace,
        rules: &'a EligibilityRules,
        classifier: &'a UrgencyClassifier,
        assessments: &'a HashMap<String, UrgencyAssessment>,
        scope: PreAdmissionScope,
    ) -> Self {
        let sorter = PrioritySorter::new();
        let pool = |tier: UrgencyTier| -> Vec<&'a Item> {
            let tier_items = sorter.tier_list(items, assessments, tier);
            match scope {
                PreAdmissionScope::TierItemsOnly => tier_items,
                PreAdmissionScope::WholeHeat => expand_to_whole_heats(items, &tier_items, &sorter),
            }
        };

        Self {
            furnace,
            rules,
            classifier,
            assessments,
            deadline_pool: pool(UrgencyTier::Deadline),
            mid_process_pool: pool(UrgencyTier::MidProcess),
        }
    }

    /// 分层对应的预投入候选池（常规分层无预投入）
    pub fn pre_admission_pool(&self, tier: UrgencyTier) -> &[&'a Item] {
        match tier {
            UrgencyTier::Deadline => &self.deadline_pool,
            UrgencyTier::MidProcess => &self.mid_process_pool,
            UrgencyTier::Normal => &[],
        }
    }
}

fn expand_to_whole_heats<'a>(
    items: &'a [Item],
    tier_items: &[&'a Item],
    sorter: &PrioritySorter,
) -> Vec<&'a Item> {
    let grouped: BTreeMap<String, Vec<&'a Item>> = sorter.group_by_heat(items);
    let mut heat_order: Vec<&str> = Vec::new();
    for item in tier_items {
        if !heat_order.contains(&item.heat_no.as_str()) {
            heat_order.push(item.heat_no.as_str());
        }
    }

    heat_order
        .iter()
        .filter_map(|heat| grouped.get(*heat))
        .flat_map(|members| members.iter().copied())
        .collect()
}

// ==========================================
// PackResult - 单热号装炉结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PackResult {
    pub selection: Selection,
    pub skipped: Vec<SkippedItem>,
}

// ==========================================
// CapacityFiller - 装炉填充引擎
// ==========================================
pub struct CapacityFiller {
    // 无状态引擎,不需要注入依赖
}

impl CapacityFiller {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单热号装炉
    ///
    /// # 参数
    /// - `ctx`: 共享上下文（炉、名单、分层结果、预投入池）
    /// - `heat_no`: 候选热号
    /// - `heat_items`: 该热号材料（已按优先级排序）
    ///
    /// # 返回
    /// PackResult（总重可能为 0: 全部被过滤或均装不下）
    #[instrument(skip(self, ctx, heat_items), fields(
        furnace_id = %ctx.furnace.furnace_id,
        heat_count = heat_items.len()
    ))]
    pub fn pack_heat(&self, ctx: &PackContext<'_>, heat_no: &str, heat_items: &[&Item]) -> PackResult {
        let mut load = CapacityLoad::new(ctx.furnace.capacity_t);
        let mut selection = Selection::empty(heat_no, &ctx.furnace.furnace_id);
        let mut skipped = Vec::new();

        let mut phase = AllocationPhase::NoneAdmitted;
        while let Some(next) = phase.next() {
            let candidates: &[&Item] = match next.tier() {
                Some(tier) => ctx.pre_admission_pool(tier),
                None => heat_items,
            };

            let admitted =
                self.run_phase(ctx, next, candidates, &mut load, &mut selection, &mut skipped);
            if admitted > 0 {
                selection.committed_phase = next;
                tracing::debug!(
                    phase = %next,
                    admitted,
                    fill_ratio = load.fill_ratio(),
                    "阶段提交,跳过剩余阶段"
                );
                break;
            }
            phase = next;
        }

        PackResult { selection, skipped }
    }

    /// 执行单个阶段的贪心投入
    ///
    /// # 规则
    /// 1. 禁止/专用名单 → 跳过（ELIGIBILITY_*）
    /// 2. 常规填充阶段: 远期交期且非优先客户 → 跳过（FAR_DEADLINE_NOT_PREFERRED）
    /// 3. weight ≤ 剩余容量 → 投入；否则跳过（CAPACITY_LIMIT_EXCEEDED）
    ///
    /// # 返回
    /// 本阶段投入数量
    fn run_phase(
        &self,
        ctx: &PackContext<'_>,
        phase: AllocationPhase,
        candidates: &[&Item],
        load: &mut CapacityLoad,
        selection: &mut Selection,
        skipped: &mut Vec<SkippedItem>,
    ) -> usize {
        let furnace_id = ctx.furnace.furnace_id.as_str();
        let mut admitted = 0;

        for item in candidates {
            if selection.contains(&item.item_id) {
                continue;
            }

            if let Some(reason) = ctx.rules.deny_reason(&item.item_id, furnace_id) {
                skipped.push(skip(item, reason));
                continue;
            }

            if phase == AllocationPhase::NormalFill {
                let exclusion = ctx.assessments.get(&item.item_id).and_then(|assessment| {
                    ctx.classifier
                        .far_deadline_exclusion(item, assessment, ctx.rules)
                });
                if let Some(reason) = exclusion {
                    skipped.push(skip(item, reason));
                    continue;
                }
            }

            if !load.can_add(item.weight) {
                skipped.push(skip(
                    item,
                    format!(
                        "CAPACITY_LIMIT_EXCEEDED: weight={} > remaining={} (used={}, capacity={})",
                        item.weight,
                        load.remaining_t(),
                        load.used_t,
                        load.capacity_t
                    ),
                ));
                continue;
            }

            load.used_t += item.weight;
            selection.total_weight += item.weight;
            selection.total_priority_score += item.priority_rank;
            selection.members.push(item.item_id.clone());
            admitted += 1;
        }

        admitted
    }
}

impl Default for CapacityFiller {
    fn default() -> Self {
        Self::new()
    }
}

fn skip(item: &Item, reason: String) -> SkippedItem {
    SkippedItem {
        item_id: item.item_id.clone(),
        reason,
    }
}
