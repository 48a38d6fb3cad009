// ==========================================
// 热处理炉装炉排产系统 - 炉领域模型
// ==========================================
// 依据: 装炉分配规则 - 炉容量 / 最低装炉量
// 红线: 装炉重量不得超过炉容量
// ==========================================

use crate::domain::types::FurnaceClass;
use serde::{Deserialize, Serialize};

// ==========================================
// Furnace - 炉（静态配置）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furnace {
    pub furnace_id: String,         // 炉号（ST01..ST06）
    pub capacity_t: f64,            // 容量（kg）
    pub furnace_class: FurnaceClass, // 炉型
    pub min_fill_t: f64,            // 最低装炉量（低于则该热号不计划）
}

// ==========================================
// CapacityLoad - 单次装炉的容量累加器
// ==========================================
// 用途: 三个装炉阶段共享,后阶段可见前阶段已占用容量
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityLoad {
    pub capacity_t: f64,
    pub used_t: f64,
}

impl CapacityLoad {
    pub fn new(capacity_t: f64) -> Self {
        Self {
            capacity_t,
            used_t: 0.0,
        }
    }
}

// ==========================================
// Trait: CapacityConstraint
// ==========================================
// 用途: 装炉填充约束检查接口
pub trait CapacityConstraint {
    /// 检查是否可添加材料
    fn can_add(&self, weight_t: f64) -> bool;

    /// 计算剩余容量
    fn remaining_t(&self) -> f64;

    /// 装炉率（0.0 - 1.0）
    fn fill_ratio(&self) -> f64;
}

impl CapacityConstraint for CapacityLoad {
    /// # 返回
    /// - `true`: 加入后不超过 capacity_t
    /// - `false`: 会超过 capacity_t
    fn can_add(&self, weight_t: f64) -> bool {
        self.used_t + weight_t <= self.capacity_t
    }

    fn remaining_t(&self) -> f64 {
        (self.capacity_t - self.used_t).max(0.0)
    }

    fn fill_ratio(&self) -> f64 {
        if self.capacity_t <= 0.0 {
            return 0.0;
        }
        (self.used_t / self.capacity_t).min(1.0)
    }
}
