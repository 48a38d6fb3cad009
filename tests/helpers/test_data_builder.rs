// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use furnace_aps::domain::types::ProcessState;
use furnace_aps::domain::Item;

// ==========================================
// Item 构建器
// ==========================================

pub struct ItemBuilder {
    item_id: String,
    weight: f64,
    priority_rank: f64,
    heat_no: String,
    deadline_date: Option<NaiveDate>,
    arrival_date: Option<NaiveDate>,
    process_stage_count: u32,
    process_state: ProcessState,
    row_number: usize,
}

impl ItemBuilder {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            weight: 1000.0,
            priority_rank: 5.0,
            heat_no: "H-001".to_string(),
            deadline_date: None,
            arrival_date: None,
            process_stage_count: 1,
            process_state: ProcessState::Unknown,
            row_number: 0,
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn rank(mut self, rank: f64) -> Self {
        self.priority_rank = rank;
        self
    }

    pub fn heat(mut self, heat_no: &str) -> Self {
        self.heat_no = heat_no.to_string();
        self
    }

    pub fn deadline(mut self, date: NaiveDate) -> Self {
        self.deadline_date = Some(date);
        self
    }

    /// 二次热处理待投入（2 次 + 荒引）
    pub fn awaiting_second_pass(mut self) -> Self {
        self.process_stage_count = 2;
        self.process_state = ProcessState::RoughDrawn;
        self
    }

    pub fn row(mut self, row_number: usize) -> Self {
        self.row_number = row_number;
        self
    }

    pub fn build(self) -> Item {
        Item {
            item_id: self.item_id,
            weight: self.weight,
            priority_rank: self.priority_rank,
            heat_no: self.heat_no,
            deadline_date: self.deadline_date,
            arrival_date: self.arrival_date,
            process_stage_count: self.process_stage_count,
            process_state: self.process_state,
            row_number: self.row_number,
        }
    }
}

/// 按输入顺序补行号
pub fn numbered(items: Vec<Item>) -> Vec<Item> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, mut item)| {
            item.row_number = i + 1;
            item
        })
        .collect()
}

/// 基准日 2026-01-14（周三）
pub fn today() -> NaiveDate {
    date(2026, 1, 14)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
