// ==========================================
// 热处理炉装炉排产系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 结构性失败必须显式上报,不得伪装成"零重量、零成员"
// ==========================================

use thiserror::Error;

/// 装炉分配错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    // ===== 数据错误（单行,可本地恢复）=====
    #[error("材料数据非法 (行 {row}, 品番 {item_id:?}): {reason}")]
    InvalidItem {
        row: usize,
        item_id: Option<String>,
        reason: String,
    },

    // ===== 结构性失败（中止本次分配）=====
    #[error(
        "无可行热号: furnace={furnace_id}, groups={group_count}, evaluated={evaluated_count}, \
         min_fill={min_fill_t}, best_weight={best_weight_t}"
    )]
    NoFeasibleGroup {
        furnace_id: String,
        group_count: usize,
        evaluated_count: usize,
        min_fill_t: f64,
        best_weight_t: f64,
    },

    #[error("整数规划无可行解: {0}")]
    Infeasible(String),

    #[error("求解超时: budget={budget_ms}ms（可放宽时限后重试）")]
    SolverTimeout { budget_ms: u64 },

    #[error("求解器错误: {0}")]
    Solver(String),

    // ===== 配置错误 =====
    #[error("炉号未配置容量: {furnace_id}（已配置: {known:?}）")]
    UnknownFurnace {
        furnace_id: String,
        known: Vec<String>,
    },

    #[error("配置非法: {0}")]
    InvalidConfig(String),
}

impl AllocationError {
    /// 是否可重试（仅求解超时可放宽时限后重试）
    pub fn is_retryable(&self) -> bool {
        matches!(self, AllocationError::SolverTimeout { .. })
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, AllocationError>;
