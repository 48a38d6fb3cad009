// ==========================================
// 热处理炉装炉排产系统 - 部品主数据关联
// ==========================================
// 职责: 材料 ⋈ 部品主数据（按品番内连接）,分类前执行
// 规则: 主数据缺失 → 拒绝该行（MASTER_NOT_FOUND）
//       热处理次数以主数据为准
// ==========================================

use crate::domain::item::{Item, PartMaster, RejectedRow};
use std::collections::HashMap;

pub const MASTER_NOT_FOUND: &str = "MASTER_NOT_FOUND";

pub struct MasterJoin {
    index: HashMap<String, u32>,
}

impl MasterJoin {
    /// 建立品番索引（重复品番取首条）
    pub fn new(masters: &[PartMaster]) -> Self {
        let mut index = HashMap::with_capacity(masters.len());
        for master in masters {
            if index.contains_key(&master.part_id) {
                tracing::warn!(part_id = %master.part_id, "部品主数据品番重复,保留首条");
                continue;
            }
            index.insert(master.part_id.clone(), master.heat_treatment_count);
        }
        Self { index }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 关联主数据（保持输入顺序）
    pub fn join(&self, items: Vec<Item>) -> (Vec<Item>, Vec<RejectedRow>) {
        let mut joined = Vec::with_capacity(items.len());
        let mut rejected = Vec::new();

        for mut item in items {
            match self.index.get(&item.item_id) {
                Some(count) => {
                    item.process_stage_count = *count;
                    joined.push(item);
                }
                None => rejected.push(RejectedRow {
                    row_number: item.row_number,
                    item_id: Some(item.item_id.clone()),
                    reason: format!("{}: {}", MASTER_NOT_FOUND, item.item_id),
                }),
            }
        }

        (joined, rejected)
    }
}
