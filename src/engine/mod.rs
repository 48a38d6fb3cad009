// ==========================================
// 热处理炉装炉排产系统 - 引擎层
// ==========================================
// 职责: 实现装炉分配规则,不做 I/O
// 红线: 所有跳过/丢弃必须输出 reason
// ==========================================

pub mod business_calendar;
pub mod capacity_filler;
pub mod eligibility;
pub mod error;
pub mod exact_solver;
pub mod group_selector;
pub mod orchestrator;
pub mod priority;
pub mod projection;
pub mod urgency;

// 重导出核心引擎
pub use business_calendar::BusinessCalendar;
pub use capacity_filler::{CapacityFiller, PackContext, PackResult};
pub use eligibility::EligibilityRules;
pub use error::{AllocationError, EngineResult};
pub use exact_solver::{
    Bin, BinAssignment, KnapsackItem, MultiBinSolution, MultiBinSolver, ValueBasis,
};
pub use group_selector::{GroupSelection, GroupSelector};
pub use orchestrator::AllocationOrchestrator;
pub use priority::PrioritySorter;
pub use projection::ResultProjector;
pub use urgency::{UrgencyAssessment, UrgencyClassifier};
