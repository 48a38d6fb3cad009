// ==========================================
// 热处理炉装炉排产系统 - 配置层
// ==========================================
// 职责: 炉表、品番名单、阈值等业务参数的加载与覆写
// 存储: config_kv 表
// ==========================================

pub mod allocation_config;
pub mod allocation_config_reader;
pub mod config_manager;

// 重导出核心配置类型
pub use allocation_config::{AllocationConfig, FurnaceRestriction};
pub use allocation_config_reader::{AllocationConfigReader, ConfigResult};
pub use config_manager::{config_keys, ConfigManager};
