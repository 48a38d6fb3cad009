// ==========================================
// 热处理炉装炉排产系统 - 领域类型定义
// ==========================================
// 依据: 装炉分配规则 - 紧急分层 / 炉型分类 / 装炉阶段
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 紧急分层 (Urgency Tier)
// ==========================================
// 红线: 分层制,不是评分制；每次评估时计算,不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyTier {
    Deadline,   // 出货当日（营业日差 = 0）
    MidProcess, // 二次热处理待投入（荒引済）
    Normal,     // 常规
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyTier::Deadline => write!(f, "DEADLINE"),
            UrgencyTier::MidProcess => write!(f, "MID_PROCESS"),
            UrgencyTier::Normal => write!(f, "NORMAL"),
        }
    }
}

// ==========================================
// 炉型分类 (Furnace Class)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FurnaceClass {
    General,       // 通用大炉
    RestrictedSet, // 限定品番小炉
}

impl fmt::Display for FurnaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FurnaceClass::General => write!(f, "GENERAL"),
            FurnaceClass::RestrictedSet => write!(f, "RESTRICTED_SET"),
        }
    }
}

impl std::str::FromStr for FurnaceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GENERAL" => Ok(FurnaceClass::General),
            "RESTRICTED_SET" | "RESTRICTED" => Ok(FurnaceClass::RestrictedSet),
            other => Err(format!("未知炉型: {}", other)),
        }
    }
}

// ==========================================
// 工序状态 (Process State)
// ==========================================
// 来源数据为自由文本,仅 "荒引" 参与分层判定,其余原样保留
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessState {
    RoughDrawn,    // 荒引（已完成一次热处理,等待二次投入）
    Other(String), // 其他状态原文
    Unknown,       // 缺失
}

impl ProcessState {
    /// 从源数据文本解析
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => ProcessState::Unknown,
            Some(s) if s == "荒引" || s.eq_ignore_ascii_case("rough-drawn") => {
                ProcessState::RoughDrawn
            }
            Some(s) => ProcessState::Other(s.to_string()),
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::RoughDrawn => write!(f, "荒引"),
            ProcessState::Other(s) => write!(f, "{}", s),
            ProcessState::Unknown => Ok(()),
        }
    }
}

// ==========================================
// 装炉阶段 (Allocation Phase)
// ==========================================
// 三段式阶段选择器：
// NoneAdmitted → 继续尝试下一阶段；某阶段有投入 → 提交并跳过剩余阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationPhase {
    NoneAdmitted,         // 尚无投入
    DeadlinePreAdmission, // 阶段1: 出货当日预投入
    MidProcessPreAdmission, // 阶段2: 二次热处理预投入
    NormalFill,           // 阶段3: 常规填充
}

impl AllocationPhase {
    /// 下一个待尝试阶段（NormalFill 之后无阶段）
    pub fn next(self) -> Option<AllocationPhase> {
        match self {
            AllocationPhase::NoneAdmitted => Some(AllocationPhase::DeadlinePreAdmission),
            AllocationPhase::DeadlinePreAdmission => Some(AllocationPhase::MidProcessPreAdmission),
            AllocationPhase::MidProcessPreAdmission => Some(AllocationPhase::NormalFill),
            AllocationPhase::NormalFill => None,
        }
    }

    /// 阶段对应的紧急分层（常规填充按热号取材,无分层）
    pub fn tier(self) -> Option<UrgencyTier> {
        match self {
            AllocationPhase::DeadlinePreAdmission => Some(UrgencyTier::Deadline),
            AllocationPhase::MidProcessPreAdmission => Some(UrgencyTier::MidProcess),
            _ => None,
        }
    }
}

impl fmt::Display for AllocationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationPhase::NoneAdmitted => write!(f, "NONE_ADMITTED"),
            AllocationPhase::DeadlinePreAdmission => write!(f, "DEADLINE_PRE_ADMISSION"),
            AllocationPhase::MidProcessPreAdmission => write!(f, "MID_PROCESS_PRE_ADMISSION"),
            AllocationPhase::NormalFill => write!(f, "NORMAL_FILL"),
        }
    }
}

// ==========================================
// 预投入范围 (Pre-Admission Scope)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreAdmissionScope {
    /// 仅投入命中分层的材料本身
    #[default]
    TierItemsOnly,
    /// 投入含有命中材料的整个热号
    WholeHeat,
}

impl fmt::Display for PreAdmissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreAdmissionScope::TierItemsOnly => write!(f, "TIER_ITEMS_ONLY"),
            PreAdmissionScope::WholeHeat => write!(f, "WHOLE_HEAT"),
        }
    }
}

impl std::str::FromStr for PreAdmissionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TIER_ITEMS_ONLY" => Ok(PreAdmissionScope::TierItemsOnly),
            "WHOLE_HEAT" => Ok(PreAdmissionScope::WholeHeat),
            other => Err(format!("未知预投入范围: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_state_parse() {
        assert_eq!(ProcessState::parse(Some("荒引")), ProcessState::RoughDrawn);
        assert_eq!(ProcessState::parse(Some(" rough-drawn ")), ProcessState::RoughDrawn);
        assert_eq!(ProcessState::parse(Some("")), ProcessState::Unknown);
        assert_eq!(ProcessState::parse(None), ProcessState::Unknown);
        assert_eq!(
            ProcessState::parse(Some("入荷")),
            ProcessState::Other("入荷".to_string())
        );
    }

    #[test]
    fn test_phase_sequence() {
        let mut phase = AllocationPhase::NoneAdmitted;
        let mut visited = Vec::new();
        while let Some(next) = phase.next() {
            visited.push(next);
            phase = next;
        }
        assert_eq!(
            visited,
            vec![
                AllocationPhase::DeadlinePreAdmission,
                AllocationPhase::MidProcessPreAdmission,
                AllocationPhase::NormalFill,
            ]
        );
        assert_eq!(AllocationPhase::NormalFill.tier(), None);
    }

    #[test]
    fn test_furnace_class_from_str() {
        assert_eq!("general".parse::<FurnaceClass>(), Ok(FurnaceClass::General));
        assert_eq!("RESTRICTED".parse::<FurnaceClass>(), Ok(FurnaceClass::RestrictedSet));
        assert!("oven".parse::<FurnaceClass>().is_err());
    }
}
