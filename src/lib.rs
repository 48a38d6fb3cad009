// ==========================================
// 热处理炉装炉排产系统 - 核心库
// ==========================================
// 系统定位: 装炉分配引擎（材料 → 炉次热号）
// 技术栈: Rust + SQLite（配置）+ good_lp（精确求解）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 装炉分配规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 结果输出
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AllocationPhase, FurnaceClass, PreAdmissionScope, ProcessState, UrgencyTier};

// 领域实体
pub use domain::{
    AllocationResult, AllocationSummary, AnnotatedItem, Furnace, GroupEvaluation, Item,
    PartMaster, RejectedRow, Selection,
};

// 引擎
pub use engine::{
    AllocationError, AllocationOrchestrator, EligibilityRules, GroupSelector, MultiBinSolver,
    UrgencyClassifier,
};

// API
pub use api::{AllocationApi, AllocationReport, ApiError};

// 配置
pub use config::{AllocationConfig, ConfigManager};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "热处理炉装炉排产系统";
