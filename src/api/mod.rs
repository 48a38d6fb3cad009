// ==========================================
// 热处理炉装炉排产系统 - API 层
// ==========================================
// 职责: 导入 → 分配 → 导出 的业务入口,供命令行/宿主程序调用
// ==========================================

pub mod allocation_api;
pub mod error;

// 重导出核心类型
pub use allocation_api::{AllocationApi, AllocationReport};
pub use error::{ApiError, ApiResult};
