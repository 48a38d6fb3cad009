// ==========================================
// 热处理炉装炉排产系统 - 分组与排序引擎
// ==========================================
// 职责: 按热号分组；组内/跨组分层列表的确定性排序
// 排序键: 优先等级升序 → 重量降序 → 导入顺序（稳定排序）
// ==========================================

use crate::domain::item::Item;
use crate::domain::types::UrgencyTier;
use crate::engine::urgency::UrgencyAssessment;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

// ==========================================
// PrioritySorter - 组内排序引擎
// ==========================================
pub struct PrioritySorter {
    // 无状态引擎,不需要注入依赖
}

impl PrioritySorter {
    pub fn new() -> Self {
        Self {}
    }

    /// 比较两个品番的优先级
    ///
    /// 1. priority_rank 升序（越小越优先）
    /// 2. weight 降序（重者先装）
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        a.priority_rank
            .total_cmp(&b.priority_rank)
            .then_with(|| b.weight.total_cmp(&a.weight))
    }

    /// 排序（稳定,同键保持输入顺序）
    pub fn sort<'a>(&self, mut items: Vec<&'a Item>) -> Vec<&'a Item> {
        items.sort_by(|a, b| self.compare(a, b));
        items
    }

    /// 按热号分组,组内已排序
    ///
    /// # 返回
    /// BTreeMap<热号, 排序后的品番列表>（热号字典序,保证遍历确定）
    pub fn group_by_heat<'a>(&self, items: &'a [Item]) -> BTreeMap<String, Vec<&'a Item>> {
        let mut grouped: BTreeMap<String, Vec<&'a Item>> = BTreeMap::new();

        for item in items {
            grouped.entry(item.heat_no.clone()).or_default().push(item);
        }

        for members in grouped.values_mut() {
            members.sort_by(|a, b| self.compare(a, b));
        }

        grouped
    }

    /// 跨热号的分层列表（如"全部 DEADLINE 品番"）,已排序
    pub fn tier_list<'a>(
        &self,
        items: &'a [Item],
        assessments: &HashMap<String, UrgencyAssessment>,
        tier: UrgencyTier,
    ) -> Vec<&'a Item> {
        let members: Vec<&'a Item> = items
            .iter()
            .filter(|item| {
                assessments
                    .get(&item.item_id)
                    .map(|a| a.tier == tier)
                    .unwrap_or(false)
            })
            .collect();
        self.sort(members)
    }
}

impl Default for PrioritySorter {
    fn default() -> Self {
        Self::new()
    }
}
