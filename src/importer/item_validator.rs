// ==========================================
// 热处理炉装炉排产系统 - 材料数据校验器
// ==========================================
// 职责: RawItemRecord → Item,不合格行转为 RejectedRow
// 红线: 单行失败不中断整批；不做静默修正
// ==========================================

use crate::domain::item::{Item, RawItemRecord, RejectedRow};
use crate::domain::types::ProcessState;
use std::collections::HashSet;

// ==========================================
// 拒绝原因代码
// ==========================================
pub const MISSING_ITEM_ID: &str = "MISSING_ITEM_ID";
pub const DUPLICATE_ITEM_ID: &str = "DUPLICATE_ITEM_ID";
pub const MISSING_WEIGHT: &str = "MISSING_WEIGHT";
pub const INVALID_WEIGHT: &str = "INVALID_WEIGHT";
pub const MISSING_HEAT_NO: &str = "MISSING_HEAT_NO";
pub const MISSING_PRIORITY_RANK: &str = "MISSING_PRIORITY_RANK";

pub struct ItemValidator;

impl ItemValidator {
    /// 校验并转换
    ///
    /// # 规则（顺序执行,首个违规即拒绝该行）
    /// 1. 品番必填,批内唯一（后出现者拒绝）
    /// 2. 重量必填,有限且非负
    /// 3. 热号必填
    /// 4. 优先等级必填
    ///
    /// # 返回
    /// (合格材料, 被拒绝行)，均保持输入顺序
    pub fn validate(&self, records: Vec<RawItemRecord>) -> (Vec<Item>, Vec<RejectedRow>) {
        let mut items = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();

        for record in records {
            match self.validate_one(&record, &mut seen) {
                Ok(item) => items.push(item),
                Err(reason) => {
                    tracing::warn!(
                        row_number = record.row_number,
                        item_id = ?record.item_id,
                        reason = %reason,
                        "行被拒绝"
                    );
                    rejected.push(RejectedRow {
                        row_number: record.row_number,
                        item_id: record.item_id.clone(),
                        reason,
                    });
                }
            }
        }

        (items, rejected)
    }

    fn validate_one(&self, record: &RawItemRecord, seen: &mut HashSet<String>) -> Result<Item, String> {
        let item_id = record
            .item_id
            .clone()
            .ok_or_else(|| MISSING_ITEM_ID.to_string())?;

        let weight = record.weight.ok_or_else(|| MISSING_WEIGHT.to_string())?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(format!("{}: {}", INVALID_WEIGHT, weight));
        }

        let heat_no = record
            .heat_no
            .clone()
            .ok_or_else(|| MISSING_HEAT_NO.to_string())?;

        let priority_rank = record
            .priority_rank
            .ok_or_else(|| MISSING_PRIORITY_RANK.to_string())?;

        // 唯一性最后登记: 被拒绝的行不占用品番
        if !seen.insert(item_id.clone()) {
            return Err(format!("{}: {}", DUPLICATE_ITEM_ID, item_id));
        }

        Ok(Item {
            item_id,
            weight,
            priority_rank,
            heat_no,
            deadline_date: record.deadline_date,
            arrival_date: record.arrival_date,
            process_stage_count: record.process_stage_count.unwrap_or(0),
            process_state: ProcessState::parse(record.process_state.as_deref()),
            row_number: record.row_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, item_id: Option<&str>, weight: Option<f64>) -> RawItemRecord {
        RawItemRecord {
            item_id: item_id.map(str::to_string),
            weight,
            priority_rank: Some(1.0),
            heat_no: Some("H1".to_string()),
            process_state: Some("荒引".to_string()),
            process_stage_count: Some(2),
            row_number: row,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_record_converted() {
        let (items, rejected) = ItemValidator.validate(vec![record(2, Some("P1"), Some(100.0))]);
        assert!(rejected.is_empty());
        assert_eq!(items[0].item_id, "P1");
        assert_eq!(items[0].process_state, ProcessState::RoughDrawn);
        assert!(items[0].is_awaiting_second_pass());
    }

    #[test]
    fn test_bad_rows_rejected_locally() {
        let mut no_heat = record(5, Some("P4"), Some(1.0));
        no_heat.heat_no = None;

        let (items, rejected) = ItemValidator.validate(vec![
            record(2, None, Some(100.0)),
            record(3, Some("P2"), None),
            record(4, Some("P3"), Some(-1.0)),
            no_heat,
            record(6, Some("P5"), Some(10.0)),
        ]);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_id, "P5");
        let reasons: Vec<&str> = rejected.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(reasons[0], MISSING_ITEM_ID);
        assert_eq!(reasons[1], MISSING_WEIGHT);
        assert!(reasons[2].starts_with(INVALID_WEIGHT));
        assert_eq!(reasons[3], MISSING_HEAT_NO);
        assert_eq!(rejected[3].row_number, 5);
    }

    #[test]
    fn test_duplicate_item_id_keeps_first() {
        let (items, rejected) = ItemValidator.validate(vec![
            record(2, Some("P1"), Some(100.0)),
            record(3, Some("P1"), Some(200.0)),
        ]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].weight, 100.0);
        assert!(rejected[0].reason.starts_with(DUPLICATE_ITEM_ID));
    }
}
