// ==========================================
// 热处理炉装炉排产系统 - 装炉配置读取 Trait
// ==========================================
// 职责: 定义编排器所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::allocation_config::{AllocationConfig, FurnaceRestriction};
use crate::domain::furnace::Furnace;
use crate::domain::types::PreAdmissionScope;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::error::Error;

/// 配置读取结果
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// AllocationConfigReader Trait
// ==========================================
// 用途: 装炉分配所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）、测试用 MockConfig
#[async_trait]
pub trait AllocationConfigReader: Send + Sync {
    // ===== 炉配置 =====

    /// 获取炉表
    ///
    /// # 默认值
    /// - ST01-ST05: 22000 / 最低 20000 / GENERAL
    /// - ST06: 8800 / 最低 8000 / RESTRICTED_SET
    async fn get_furnaces(&self) -> ConfigResult<Vec<Furnace>>;

    /// 获取限定炉品番名单
    async fn get_restrictions(&self) -> ConfigResult<Vec<FurnaceRestriction>>;

    // ===== 品番规则 =====

    /// 获取优先客户品番
    async fn get_preferred_parts(&self) -> ConfigResult<Vec<String>>;

    /// 获取远期交期截止营业日
    ///
    /// # 默认值
    /// - 5
    async fn get_far_deadline_business_days(&self) -> ConfigResult<i64>;

    /// 获取预投入范围
    ///
    /// # 默认值
    /// - TIER_ITEMS_ONLY
    async fn get_pre_admission_scope(&self) -> ConfigResult<PreAdmissionScope>;

    // ===== 运行参数 =====

    /// 获取精确求解时限（毫秒）
    ///
    /// # 默认值
    /// - 30000
    async fn get_solver_time_budget_ms(&self) -> ConfigResult<u64>;

    /// 获取固定基准日（未配置 → None,使用系统当日）
    async fn get_reference_date(&self) -> ConfigResult<Option<NaiveDate>>;

    /// 汇总读取完整配置
    async fn load_allocation_config(&self) -> ConfigResult<AllocationConfig> {
        Ok(AllocationConfig {
            furnaces: self.get_furnaces().await?,
            restrictions: self.get_restrictions().await?,
            preferred_parts: self.get_preferred_parts().await?,
            far_deadline_business_days: self.get_far_deadline_business_days().await?,
            pre_admission_scope: self.get_pre_admission_scope().await?,
            solver_time_budget_ms: self.get_solver_time_budget_ms().await?,
            reference_date: self.get_reference_date().await?,
        })
    }
}
