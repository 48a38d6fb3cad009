// ==========================================
// 热处理炉装炉排产系统 - 装炉结果领域模型
// ==========================================
// 依据: 装炉分配规则 - Selection / 汇总 / 标注输出
// ==========================================

use crate::domain::item::Item;
use crate::domain::types::AllocationPhase;
use serde::{Deserialize, Serialize};

// ==========================================
// Selection - 单个(热号, 炉)组合的装炉方案
// ==========================================
// 用途: 每次评估新建,选炉器只保留胜出者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub heat_no: String,            // 候选热号
    pub furnace_id: String,         // 炉号
    pub total_weight: f64,          // 装炉总重
    pub total_priority_score: f64,  // 成员优先等级之和
    pub members: Vec<String>,       // 成员品番（按投入顺序）
    pub committed_phase: AllocationPhase, // 提交投入的阶段
}

impl Selection {
    pub fn empty(heat_no: &str, furnace_id: &str) -> Self {
        Self {
            heat_no: heat_no.to_string(),
            furnace_id: furnace_id.to_string(),
            total_weight: 0.0,
            total_priority_score: 0.0,
            members: Vec::new(),
            committed_phase: AllocationPhase::NoneAdmitted,
        }
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.members.iter().any(|m| m == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ==========================================
// SkippedItem - 装炉时被跳过的材料
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub item_id: String,
    pub reason: String, // 原因代码 + 明细
}

// ==========================================
// GroupEvaluation - 热号评估明细（诊断用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEvaluation {
    pub heat_no: String,
    pub total_weight: f64,
    pub total_priority_score: f64,
    pub member_count: usize,
    pub committed_phase: AllocationPhase,
    pub accepted: bool,
    pub discard_reason: Option<String>,
}

// ==========================================
// AllocationSummary - 单行汇总 {炉号, 装炉总重}
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub furnace_id: String,
    pub total_weight: f64,
}

// ==========================================
// AnnotatedItem - 带"是否计划"标记的输入行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedItem {
    pub item: Item,
    pub selected: bool,
}

// ==========================================
// AllocationResult - 装炉分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub summary: AllocationSummary,
    pub selection: Selection,
    pub annotated_items: Vec<AnnotatedItem>, // 与导入顺序一致
    pub skipped_items: Vec<SkippedItem>,     // 胜出热号装炉时被跳过的材料
    pub evaluations: Vec<GroupEvaluation>,
}

impl AllocationResult {
    /// 被选中的品番数量
    pub fn selected_count(&self) -> usize {
        self.annotated_items.iter().filter(|a| a.selected).count()
    }
}
