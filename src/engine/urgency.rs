// ==========================================
// 热处理炉装炉排产系统 - 紧急分层判定引擎
// ==========================================
// 红线: 紧急分层是"分层制",不是评分制
// ==========================================
// 职责: 计算距交期营业日 + 判定紧急分层 + 远期交期剔除
// 输入: Item + 基准日
// 输出: UrgencyAssessment（不落库,每次评估时计算）
// ==========================================

use crate::domain::item::Item;
use crate::domain::types::UrgencyTier;
use crate::engine::business_calendar::BusinessCalendar;
use crate::engine::eligibility::EligibilityRules;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::instrument;

// ==========================================
// UrgencyAssessment - 单个品番的分层结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyAssessment {
    pub tier: UrgencyTier,
    /// 距交期营业日数（日期缺失 → None）
    pub business_days_to_deadline: Option<i64>,
}

// ==========================================
// UrgencyClassifier - 紧急分层判定引擎
// ==========================================
pub struct UrgencyClassifier {
    far_deadline_business_days: i64,
}

impl UrgencyClassifier {
    /// # 参数
    /// - far_deadline_business_days: 远期交期截止营业日（默认 5）
    pub fn new(far_deadline_business_days: i64) -> Self {
        Self {
            far_deadline_business_days,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 判定单个品番的紧急分层
    ///
    /// # 规则（顺序执行，命中即返回）
    /// 1. 距交期营业日 == 0 → DEADLINE
    /// 2. 热处理次数 == 2 且 状态 == 荒引 → MID_PROCESS
    /// 3. 其他 → NORMAL
    ///
    /// # 边界处理
    /// - 交期缺失 → 营业日差为 None,不属于 DEADLINE
    /// - 交期已过（负数）→ 不属于 DEADLINE
    pub fn classify(&self, item: &Item, today: NaiveDate) -> UrgencyAssessment {
        let business_days_to_deadline = BusinessCalendar::distance(Some(today), item.deadline_date);

        let tier = if business_days_to_deadline == Some(0) {
            UrgencyTier::Deadline
        } else if item.is_awaiting_second_pass() {
            UrgencyTier::MidProcess
        } else {
            UrgencyTier::Normal
        };

        UrgencyAssessment {
            tier,
            business_days_to_deadline,
        }
    }

    /// 批量判定（品番 → 分层结果）
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub fn classify_batch(
        &self,
        items: &[Item],
        today: NaiveDate,
    ) -> HashMap<String, UrgencyAssessment> {
        items
            .iter()
            .map(|item| (item.item_id.clone(), self.classify(item, today)))
            .collect()
    }

    /// 远期交期剔除（仅作用于 NORMAL 分层）
    ///
    /// # 规则
    /// - DEADLINE / MID_PROCESS → 不剔除
    /// - 营业日差 ≥ 截止值 且 非优先客户品番 → 剔除（本次不参与,而非降级）
    /// - 营业日差缺失 → 不剔除
    ///
    /// # 返回
    /// - None: 保留
    /// - Some(reason): 剔除原因
    pub fn far_deadline_exclusion(
        &self,
        item: &Item,
        assessment: &UrgencyAssessment,
        rules: &EligibilityRules,
    ) -> Option<String> {
        if assessment.tier != UrgencyTier::Normal {
            return None;
        }

        match assessment.business_days_to_deadline {
            Some(days) if days >= self.far_deadline_business_days => {
                if rules.is_preferred(&item.item_id) {
                    None
                } else {
                    Some(format!(
                        "FAR_DEADLINE_NOT_PREFERRED: business_days={} >= {}",
                        days, self.far_deadline_business_days
                    ))
                }
            }
            _ => None,
        }
    }
}
