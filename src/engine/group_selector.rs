// ==========================================
// 热处理炉装炉排产系统 - 热号选择引擎
// ==========================================
// 红线: 低于最低装炉量的热号不得胜出；无可行热号必须显式报错
// ==========================================
// 职责: 对每个热号执行装炉 → 最低装炉量过滤 → 选出优先等级合计最小者
// 输入: 全部材料 + PackContext
// 输出: 胜出 Selection + 热号评估明细
// ==========================================

use crate::domain::item::Item;
use crate::domain::selection::{GroupEvaluation, Selection, SkippedItem};
use crate::engine::capacity_filler::{CapacityFiller, PackContext};
use crate::engine::error::{AllocationError, EngineResult};
use crate::engine::priority::PrioritySorter;
use tracing::{info, instrument};

// ==========================================
// GroupSelection - 选炉结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSelection {
    pub selection: Selection,
    pub skipped: Vec<SkippedItem>,
    /// 全部热号的评估明细（热号升序）
    pub evaluations: Vec<GroupEvaluation>,
}

// ==========================================
// GroupSelector - 热号选择引擎
// ==========================================
pub struct GroupSelector {
    filler: CapacityFiller,
    sorter: PrioritySorter,
}

impl GroupSelector {
    pub fn new() -> Self {
        Self {
            filler: CapacityFiller::new(),
            sorter: PrioritySorter::new(),
        }
    }

    /// 选出胜出热号
    ///
    /// # 规则
    /// 1. 每个热号独立装炉（热号按字典序遍历,保证确定性）
    /// 2. total_weight < min_fill_t → 丢弃（BELOW_MIN_FILL）
    /// 3. 存活热号中 total_priority_score 最小者胜出,同分取热号较小者
    ///
    /// # 错误
    /// - NoFeasibleGroup: 没有热号达到最低装炉量
    #[instrument(skip(self, ctx, items), fields(
        furnace_id = %ctx.furnace.furnace_id,
        min_fill_t = ctx.furnace.min_fill_t,
        item_count = items.len()
    ))]
    pub fn select(&self, ctx: &PackContext<'_>, items: &[Item]) -> EngineResult<GroupSelection> {
        let grouped = self.sorter.group_by_heat(items);
        let min_fill_t = ctx.furnace.min_fill_t;

        let mut evaluations = Vec::with_capacity(grouped.len());
        let mut winner: Option<(Selection, Vec<SkippedItem>)> = None;
        let mut best_weight_t: f64 = 0.0;

        for (heat_no, heat_items) in &grouped {
            let packed = self.filler.pack_heat(ctx, heat_no, heat_items);
            let selection = packed.selection;
            best_weight_t = best_weight_t.max(selection.total_weight);

            let discard_reason = if selection.total_weight < min_fill_t {
                Some(format!(
                    "BELOW_MIN_FILL: total_weight={} < min_fill={}",
                    selection.total_weight, min_fill_t
                ))
            } else {
                None
            };

            evaluations.push(GroupEvaluation {
                heat_no: heat_no.clone(),
                total_weight: selection.total_weight,
                total_priority_score: selection.total_priority_score,
                member_count: selection.members.len(),
                committed_phase: selection.committed_phase,
                accepted: discard_reason.is_none(),
                discard_reason: discard_reason.clone(),
            });

            if let Some(reason) = discard_reason {
                tracing::debug!(heat_no = %heat_no, reason = %reason, "热号丢弃");
                continue;
            }

            let better = match &winner {
                None => true,
                // 严格小于: 同分保留先遍历到的（热号较小）
                Some((current, _)) => {
                    selection.total_priority_score < current.total_priority_score
                }
            };
            if better {
                winner = Some((selection, packed.skipped));
            }
        }

        match winner {
            Some((selection, skipped)) => {
                info!(
                    heat_no = %selection.heat_no,
                    total_weight = selection.total_weight,
                    total_priority_score = selection.total_priority_score,
                    members = selection.members.len(),
                    "热号选定"
                );
                Ok(GroupSelection {
                    selection,
                    skipped,
                    evaluations,
                })
            }
            None => Err(AllocationError::NoFeasibleGroup {
                furnace_id: ctx.furnace.furnace_id.clone(),
                group_count: grouped.len(),
                evaluated_count: evaluations.len(),
                min_fill_t,
                best_weight_t,
            }),
        }
    }
}

impl Default for GroupSelector {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::furnace::Furnace;
    use crate::domain::types::{FurnaceClass, PreAdmissionScope, ProcessState};
    use crate::engine::eligibility::EligibilityRules;
    use crate::engine::urgency::UrgencyClassifier;
    use chrono::NaiveDate;

    fn item(item_id: &str, heat_no: &str, weight: f64, rank: f64) -> Item {
        Item {
            item_id: item_id.to_string(),
            weight,
            priority_rank: rank,
            heat_no: heat_no.to_string(),
            deadline_date: None,
            arrival_date: None,
            process_stage_count: 1,
            process_state: ProcessState::Unknown,
            row_number: 0,
        }
    }

    fn large_furnace() -> Furnace {
        Furnace {
            furnace_id: "ST01".to_string(),
            capacity_t: 22000.0,
            furnace_class: FurnaceClass::General,
            min_fill_t: 20000.0,
        }
    }

    fn run(items: &[Item], furnace: &Furnace) -> EngineResult<GroupSelection> {
        let rules = EligibilityRules::default();
        let classifier = UrgencyClassifier::new(5);
        let today = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        let assessments = classifier.classify_batch(items, today);
        let ctx = PackContext::prepare(
            items,
            furnace,
            &rules,
            &classifier,
            &assessments,
            PreAdmissionScope::default(),
        );
        GroupSelector::new().select(&ctx, items)
    }

    #[test]
    fn test_minimum_score_wins() {
        let items = vec![
            item("A1", "G1", 11000.0, 5.0),
            item("A2", "G1", 10000.0, 5.0),
            item("B1", "G2", 12000.0, 1.0),
            item("B2", "G2", 9000.0, 3.0),
        ];

        let result = run(&items, &large_furnace()).unwrap();
        assert_eq!(result.selection.heat_no, "G2");
        assert_eq!(result.selection.total_priority_score, 4.0);
        assert_eq!(result.evaluations.len(), 2);
        assert!(result.evaluations.iter().all(|e| e.accepted));
    }

    #[test]
    fn test_one_unit_below_threshold_is_not_feasible() {
        let items = vec![item("A1", "G1", 19999.0, 1.0)];

        let err = run(&items, &large_furnace()).unwrap_err();
        match err {
            AllocationError::NoFeasibleGroup {
                furnace_id,
                group_count,
                evaluated_count,
                min_fill_t,
                best_weight_t,
            } => {
                assert_eq!(furnace_id, "ST01");
                assert_eq!(group_count, 1);
                assert_eq!(evaluated_count, 1);
                assert_eq!(min_fill_t, 20000.0);
                assert_eq!(best_weight_t, 19999.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_tie_broken_by_heat_no() {
        let items = vec![
            item("B1", "H-B", 20000.0, 2.0),
            item("A1", "H-A", 20000.0, 2.0),
        ];

        let result = run(&items, &large_furnace()).unwrap();
        assert_eq!(result.selection.heat_no, "H-A");
    }

    #[test]
    fn test_below_threshold_group_recorded_as_discarded() {
        let items = vec![
            item("A1", "G1", 8000.0, 1.0),
            item("B1", "G2", 21000.0, 7.0),
        ];

        let result = run(&items, &large_furnace()).unwrap();
        assert_eq!(result.selection.heat_no, "G2");

        let discarded = &result.evaluations[0];
        assert_eq!(discarded.heat_no, "G1");
        assert!(!discarded.accepted);
        assert!(discarded
            .discard_reason
            .as_deref()
            .unwrap()
            .starts_with("BELOW_MIN_FILL"));
    }

    #[test]
    fn test_empty_input_is_not_feasible() {
        let err = run(&[], &large_furnace()).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::NoFeasibleGroup { group_count: 0, .. }
        ));
    }
}
