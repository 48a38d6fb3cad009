// ==========================================
// 热处理炉装炉排产系统 - 品番可投入判定
// ==========================================
// 职责: (品番, 炉号) → 允许/禁止；优先客户品番判定
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::config::allocation_config::{AllocationConfig, FurnaceRestriction};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// EligibilityRules - 静态名单 + 纯函数判定
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct EligibilityRules {
    /// 限定炉 → 禁止投入品番
    deny_by_furnace: BTreeMap<String, BTreeSet<String>>,
    /// 专用品番 → 允许的限定炉集合
    exclusive_parts: BTreeMap<String, BTreeSet<String>>,
    /// 优先客户品番
    preferred: BTreeSet<String>,
}

impl EligibilityRules {
    /// 由限定名单与优先客户品番构造
    pub fn new(restrictions: &[FurnaceRestriction], preferred_parts: &[String]) -> Self {
        let mut rules = Self::default();

        for restriction in restrictions {
            rules
                .deny_by_furnace
                .entry(restriction.furnace_id.clone())
                .or_default()
                .extend(restriction.deny_list.iter().cloned());

            for part in &restriction.allow_only_list {
                rules
                    .exclusive_parts
                    .entry(part.clone())
                    .or_default()
                    .insert(restriction.furnace_id.clone());
            }
        }

        rules.preferred = preferred_parts.iter().cloned().collect();
        rules
    }

    /// 由完整配置构造
    pub fn from_config(config: &AllocationConfig) -> Self {
        Self::new(&config.restrictions, &config.preferred_parts)
    }

    /// 品番能否投入指定炉
    ///
    /// # 规则
    /// 1. 该炉的禁止名单包含品番 → 禁止
    /// 2. 品番是某限定炉的专用品番,且本炉不是其限定炉 → 禁止
    /// 3. 其他 → 允许
    pub fn allowed(&self, item_id: &str, furnace_id: &str) -> bool {
        self.deny_reason(item_id, furnace_id).is_none()
    }

    /// 禁止原因（允许时返回 None）
    pub fn deny_reason(&self, item_id: &str, furnace_id: &str) -> Option<String> {
        if let Some(deny) = self.deny_by_furnace.get(furnace_id) {
            if deny.contains(item_id) {
                return Some(format!(
                    "ELIGIBILITY_DENIED: item={} is on deny list of furnace={}",
                    item_id, furnace_id
                ));
            }
        }

        if let Some(home_furnaces) = self.exclusive_parts.get(item_id) {
            if !home_furnaces.contains(furnace_id) {
                return Some(format!(
                    "ELIGIBILITY_EXCLUSIVE: item={} is restricted to furnace(s) {:?}",
                    item_id, home_furnaces
                ));
            }
        }

        None
    }

    /// 是否优先客户品番
    pub fn is_preferred(&self, item_id: &str) -> bool {
        self.preferred.contains(item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_rules() -> EligibilityRules {
        EligibilityRules::from_config(&AllocationConfig::default())
    }

    #[test]
    fn test_deny_list_blocks_restricted_furnace_only() {
        let rules = default_rules();

        assert!(!rules.allowed("NDA06981", "ST06"));
        assert!(!rules.allowed("294157-0143", "ST06"));
        assert!(rules.allowed("NDA06981", "ST01"));
    }

    #[test]
    fn test_allow_only_list_restricted_to_home_furnace() {
        let rules = default_rules();

        assert!(rules.allowed("HDA07464", "ST06"));
        assert!(!rules.allowed("HDA07464", "ST01"));
        assert!(!rules.allowed("TYA05090", "ST05"));
        assert!(rules.allowed("TYA05090", "ST06"));
    }

    #[test]
    fn test_unlisted_part_allowed_everywhere() {
        let rules = default_rules();
        for furnace in ["ST01", "ST02", "ST03", "ST04", "ST05", "ST06"] {
            assert!(rules.allowed("NDA07024", furnace));
        }
    }

    #[test]
    fn test_deny_reason_codes() {
        let rules = default_rules();
        let reason = rules.deny_reason("NDA06981", "ST06").unwrap();
        assert!(reason.starts_with("ELIGIBILITY_DENIED"));

        let reason = rules.deny_reason("HDA07464", "ST02").unwrap();
        assert!(reason.starts_with("ELIGIBILITY_EXCLUSIVE"));
    }

    #[test]
    fn test_preferred_membership() {
        let rules = default_rules();
        assert!(rules.is_preferred("NDA06868"));
        assert!(!rules.is_preferred("NDA06981"));
    }
}
