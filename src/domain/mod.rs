// ==========================================
// 热处理炉装炉排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod furnace;
pub mod item;
pub mod selection;
pub mod types;

// 重导出核心类型
pub use furnace::{CapacityConstraint, CapacityLoad, Furnace};
pub use item::{Item, PartMaster, RawItemRecord, RejectedRow};
pub use selection::{
    AllocationResult, AllocationSummary, AnnotatedItem, GroupEvaluation, Selection, SkippedItem,
};
pub use types::{AllocationPhase, FurnaceClass, PreAdmissionScope, ProcessState, UrgencyTier};
