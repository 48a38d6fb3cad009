// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use chrono::NaiveDate;
use furnace_aps::config::{AllocationConfig, AllocationConfigReader, ConfigResult, FurnaceRestriction};
use furnace_aps::domain::types::{FurnaceClass, PreAdmissionScope};
use furnace_aps::domain::Furnace;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub furnaces: Vec<Furnace>,
    pub restrictions: Vec<FurnaceRestriction>,
    pub preferred_parts: Vec<String>,
    pub far_deadline_business_days: i64,
    pub pre_admission_scope: PreAdmissionScope,
    pub solver_time_budget_ms: u64,
    pub reference_date: Option<NaiveDate>,
}

impl MockConfig {
    /// 现场默认配置,基准日固定为 2026-01-14（周三）
    pub fn default() -> Self {
        let base = AllocationConfig::default();
        Self {
            furnaces: base.furnaces,
            restrictions: base.restrictions,
            preferred_parts: base.preferred_parts,
            far_deadline_business_days: base.far_deadline_business_days,
            pre_admission_scope: base.pre_admission_scope,
            solver_time_budget_ms: base.solver_time_budget_ms,
            reference_date: NaiveDate::from_ymd_opt(2026, 1, 14),
        }
    }

    /// 单炉配置（无限定名单、无优先客户）
    pub fn single_furnace(furnace_id: &str, capacity_t: f64, min_fill_t: f64) -> Self {
        let mut config = Self::default();
        config.furnaces = vec![furnace(furnace_id, capacity_t, min_fill_t, FurnaceClass::General)];
        config.restrictions = Vec::new();
        config.preferred_parts = Vec::new();
        config
    }

    pub fn with_scope(mut self, scope: PreAdmissionScope) -> Self {
        self.pre_admission_scope = scope;
        self
    }

    pub fn with_preferred(mut self, parts: &[&str]) -> Self {
        self.preferred_parts = parts.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_min_fill(mut self, furnace_id: &str, min_fill_t: f64) -> Self {
        if let Some(f) = self.furnaces.iter_mut().find(|f| f.furnace_id == furnace_id) {
            f.min_fill_t = min_fill_t;
        }
        self
    }

    pub fn with_solver_budget_ms(mut self, budget_ms: u64) -> Self {
        self.solver_time_budget_ms = budget_ms;
        self
    }
}

pub fn furnace(furnace_id: &str, capacity_t: f64, min_fill_t: f64, class: FurnaceClass) -> Furnace {
    Furnace {
        furnace_id: furnace_id.to_string(),
        capacity_t,
        furnace_class: class,
        min_fill_t,
    }
}

#[async_trait]
impl AllocationConfigReader for MockConfig {
    async fn get_furnaces(&self) -> ConfigResult<Vec<Furnace>> {
        Ok(self.furnaces.clone())
    }

    async fn get_restrictions(&self) -> ConfigResult<Vec<FurnaceRestriction>> {
        Ok(self.restrictions.clone())
    }

    async fn get_preferred_parts(&self) -> ConfigResult<Vec<String>> {
        Ok(self.preferred_parts.clone())
    }

    async fn get_far_deadline_business_days(&self) -> ConfigResult<i64> {
        Ok(self.far_deadline_business_days)
    }

    async fn get_pre_admission_scope(&self) -> ConfigResult<PreAdmissionScope> {
        Ok(self.pre_admission_scope)
    }

    async fn get_solver_time_budget_ms(&self) -> ConfigResult<u64> {
        Ok(self.solver_time_budget_ms)
    }

    async fn get_reference_date(&self) -> ConfigResult<Option<NaiveDate>> {
        Ok(self.reference_date)
    }
}
