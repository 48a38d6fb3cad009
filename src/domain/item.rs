// ==========================================
// 热处理炉装炉排产系统 - 装炉材料领域模型
// ==========================================
// 依据: 装炉分配规则 - 材料（品番）数据定义
// ==========================================

use crate::domain::types::ProcessState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Item - 装炉材料（一行 = 一个品番）
// ==========================================
// 红线: 导入后不可变,引擎只分类与选取,不修改
// 用途: 导入层写入,引擎层只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    // ===== 主键 =====
    pub item_id: String, // 品番（数据集内唯一）

    // ===== 装炉维度 =====
    pub weight: f64,        // 重量（kg,非负）
    pub priority_rank: f64, // 优先等级（越小越优先）
    pub heat_no: String,    // 热号（分组键）

    // ===== 时间信息 =====
    pub deadline_date: Option<NaiveDate>, // 客户出货交期
    pub arrival_date: Option<NaiveDate>,  // 本日入荷・荒引日

    // ===== 工序信息 =====
    pub process_stage_count: u32,     // 热处理次数（由部品主数据补全）
    pub process_state: ProcessState,  // 当前状态

    // ===== 元信息 =====
    pub row_number: usize, // 源数据行号（保证输出顺序与导入一致）
}

impl Item {
    /// 是否处于"二次热处理待投入"状态
    ///
    /// # 规则
    /// - process_stage_count == 2 且 process_state == 荒引
    pub fn is_awaiting_second_pass(&self) -> bool {
        self.process_stage_count == 2 && self.process_state == ProcessState::RoughDrawn
    }
}

// ==========================================
// RawItemRecord - 字段映射后的中间结构
// ==========================================
// 用途: 字段映射 → 校验 之间的过渡,所有字段可缺失
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItemRecord {
    pub item_id: Option<String>,
    pub weight: Option<f64>,
    pub priority_rank: Option<f64>,
    pub heat_no: Option<String>,
    pub deadline_date: Option<NaiveDate>,
    pub arrival_date: Option<NaiveDate>,
    pub process_stage_count: Option<u32>,
    pub process_state: Option<String>,
    pub row_number: usize,
}

// ==========================================
// PartMaster - 部品主数据
// ==========================================
// 用途: 品番 → 补充属性（热处理次数）,分类前关联到输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartMaster {
    pub part_id: String,          // 品番
    pub heat_treatment_count: u32, // 热处理次数
}

// ==========================================
// RejectedRow - 被剔除的行
// ==========================================
// 红线: 单行失败本地恢复,不中断整批；原因必须可解释
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub row_number: usize,
    pub item_id: Option<String>,
    pub reason: String,
}
