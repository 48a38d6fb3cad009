// ==========================================
// 热处理炉装炉排产系统 - 结果投影
// ==========================================
// 职责: 胜出 Selection → 单行汇总 + 带"是否计划"标记的输入表
// 红线: 输出行顺序与导入顺序一致
// ==========================================

use crate::domain::item::Item;
use crate::domain::selection::{AllocationResult, AllocationSummary, AnnotatedItem};
use crate::engine::group_selector::GroupSelection;
use std::collections::HashSet;

pub struct ResultProjector;

impl ResultProjector {
    /// 标注输入表并生成汇总
    pub fn project(items: &[Item], chosen: GroupSelection) -> AllocationResult {
        let members: HashSet<&str> = chosen
            .selection
            .members
            .iter()
            .map(String::as_str)
            .collect();

        let annotated_items = items
            .iter()
            .map(|item| AnnotatedItem {
                item: item.clone(),
                selected: members.contains(item.item_id.as_str()),
            })
            .collect();

        AllocationResult {
            summary: AllocationSummary {
                furnace_id: chosen.selection.furnace_id.clone(),
                total_weight: chosen.selection.total_weight,
            },
            selection: chosen.selection,
            annotated_items,
            skipped_items: chosen.skipped,
            evaluations: chosen.evaluations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::selection::Selection;
    use crate::domain::types::ProcessState;

    fn item(item_id: &str, row: usize) -> Item {
        Item {
            item_id: item_id.to_string(),
            weight: 100.0,
            priority_rank: 1.0,
            heat_no: "H".to_string(),
            deadline_date: None,
            arrival_date: None,
            process_stage_count: 1,
            process_state: ProcessState::Unknown,
            row_number: row,
        }
    }

    #[test]
    fn test_annotation_keeps_input_order() {
        let items = vec![item("C", 1), item("A", 2), item("B", 3)];
        let mut selection = Selection::empty("H", "ST01");
        selection.members = vec!["B".to_string(), "C".to_string()];
        selection.total_weight = 200.0;

        let result = ResultProjector::project(
            &items,
            GroupSelection {
                selection,
                skipped: vec![],
                evaluations: vec![],
            },
        );

        let flags: Vec<(&str, bool)> = result
            .annotated_items
            .iter()
            .map(|a| (a.item.item_id.as_str(), a.selected))
            .collect();
        assert_eq!(flags, vec![("C", true), ("A", false), ("B", true)]);
        assert_eq!(result.summary.furnace_id, "ST01");
        assert_eq!(result.summary.total_weight, 200.0);
        assert_eq!(result.selected_count(), 2);
    }
}
