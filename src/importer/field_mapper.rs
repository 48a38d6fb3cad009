// ==========================================
// 热处理炉装炉排产系统 - 字段映射器实现
// ==========================================
// 职责: 源字段 → 标准字段映射 + 类型转换
// 红线: 非法值不做静默修正,转换失败整行上报
// ==========================================

use crate::domain::item::{PartMaster, RawItemRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

// ==========================================
// 标准字段及其列名别名（现场表头 + 英文列名）
// ==========================================
pub const ITEM_ID_ALIASES: &[&str] = &["品番", "item_id", "part_id"];
pub const WEIGHT_ALIASES: &[&str] = &["重量", "weight"];
pub const PRIORITY_RANK_ALIASES: &[&str] = &["優先ランク②", "優先ランク", "priority_rank"];
pub const HEAT_NO_ALIASES: &[&str] = &["ヒート", "ヒートNO", "heat_no", "heat"];
pub const DEADLINE_ALIASES: &[&str] = &["客先（出荷）納期", "客先(出荷)納期", "deadline_date"];
pub const STAGE_COUNT_ALIASES: &[&str] = &["熱処理回数", "process_stage_count", "heat_treatment_count"];
pub const PROCESS_STATE_ALIASES: &[&str] = &["状態", "process_state"];
pub const ARRIVAL_ALIASES: &[&str] = &["本日入荷・荒引き日", "arrival_date"];

/// Excel 序列日期基准（1900 日期系统,含 1900-02-29 偏移）
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// 解析日期文本
///
/// # 支持格式
/// - YYYY-MM-DD / YYYY/MM/DD（可带时间部分）
/// - YYYYMMDD
/// - Excel 序列值（如 46036 或 46036.5）
pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(datetime.date());
        }
    }

    if value.len() == 8 && value.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::parse_from_str(value, "%Y%m%d").ok();
    }

    let serial: f64 = value.parse().ok()?;
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    excel_epoch().map(|epoch| epoch + Duration::days(serial.trunc() as i64))
}

pub struct FieldMapper;

impl FieldMapper {
    /// 映射一行材料数据
    ///
    /// # 错误
    /// - TypeConversionError: 数值列无法解析
    /// - DateFormatError: 日期列无法解析
    pub fn map_item(&self, row: &RawRow) -> ImportResult<RawItemRecord> {
        let fields = &row.fields;
        let row_number = row.row_number;

        Ok(RawItemRecord {
            item_id: get_string(fields, ITEM_ID_ALIASES),
            weight: parse_f64(fields, WEIGHT_ALIASES, row_number)?,
            priority_rank: parse_f64(fields, PRIORITY_RANK_ALIASES, row_number)?,
            heat_no: get_string(fields, HEAT_NO_ALIASES),
            deadline_date: parse_date(fields, DEADLINE_ALIASES, row_number)?,
            arrival_date: parse_date(fields, ARRIVAL_ALIASES, row_number)?,
            process_stage_count: parse_count(fields, STAGE_COUNT_ALIASES, row_number)?,
            process_state: get_string(fields, PROCESS_STATE_ALIASES),
            row_number,
        })
    }

    /// 映射一行部品主数据
    pub fn map_master(&self, row: &RawRow) -> ImportResult<PartMaster> {
        let fields = &row.fields;
        let part_id = get_string(fields, ITEM_ID_ALIASES).ok_or_else(|| {
            ImportError::TypeConversionError {
                row: row.row_number,
                field: ITEM_ID_ALIASES[0].to_string(),
                message: "品番为空".to_string(),
            }
        })?;
        let heat_treatment_count = parse_count(fields, STAGE_COUNT_ALIASES, row.row_number)?
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row.row_number,
                field: STAGE_COUNT_ALIASES[0].to_string(),
                message: "熱処理回数为空".to_string(),
            })?;

        Ok(PartMaster {
            part_id,
            heat_treatment_count,
        })
    }
}

/// 提取字符串字段,按别名顺序取第一个非空值
fn get_string(fields: &HashMap<String, String>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|alias| fields.get(*alias))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_f64(
    fields: &HashMap<String, String>,
    aliases: &[&str],
    row_number: usize,
) -> ImportResult<Option<f64>> {
    match get_string(fields, aliases) {
        None => Ok(None),
        Some(value) => {
            // 千分位逗号
            let normalized = value.replace(',', "");
            match normalized.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(ImportError::TypeConversionError {
                    row: row_number,
                    field: aliases[0].to_string(),
                    message: format!("无法解析为数值: {}", value),
                }),
            }
        }
    }
}

/// 解析次数（接受 "2" 与 Excel 导出的 "2.0"）
fn parse_count(
    fields: &HashMap<String, String>,
    aliases: &[&str],
    row_number: usize,
) -> ImportResult<Option<u32>> {
    let conversion_error = |value: &str| ImportError::TypeConversionError {
        row: row_number,
        field: aliases[0].to_string(),
        message: format!("无法解析为非负整数: {}", value),
    };

    match parse_f64(fields, aliases, row_number) {
        Ok(None) => Ok(None),
        Ok(Some(v)) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(Some(v as u32)),
        Ok(Some(v)) => Err(conversion_error(&v.to_string())),
        Err(_) => Err(conversion_error(
            &get_string(fields, aliases).unwrap_or_default(),
        )),
    }
}

fn parse_date(
    fields: &HashMap<String, String>,
    aliases: &[&str],
    row_number: usize,
) -> ImportResult<Option<NaiveDate>> {
    match get_string(fields, aliases) {
        None => Ok(None),
        Some(value) => parse_date_value(&value)
            .map(Some)
            .ok_or_else(|| ImportError::DateFormatError {
                row: row_number,
                field: aliases[0].to_string(),
                value,
            }),
    }
}
