// ==========================================
// 热处理炉装炉排产系统 - 材料导入器
// ==========================================
// 流程: 文件解析 → 字段映射 → 校验 → 部品主数据关联
// 输出: ImportOutcome（合格材料 + 被拒绝行）
// ==========================================

use crate::domain::item::{Item, PartMaster, RejectedRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{
    FieldMapper, HEAT_NO_ALIASES, ITEM_ID_ALIASES, STAGE_COUNT_ALIASES, WEIGHT_ALIASES,
};
use crate::importer::file_parser::{ExcelOptions, RawRow, UniversalFileParser};
use crate::importer::item_validator::ItemValidator;
use crate::importer::master_join::MasterJoin;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// 合格材料（导入顺序）
    pub items: Vec<Item>,
    /// 被拒绝行（按行号升序）
    pub rejected_rows: Vec<RejectedRow>,
}

// ==========================================
// ItemImporter
// ==========================================
pub struct ItemImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
    validator: ItemValidator,
}

impl ItemImporter {
    pub fn new(excel_options: ExcelOptions) -> Self {
        Self {
            parser: UniversalFileParser::new(excel_options),
            mapper: FieldMapper,
            validator: ItemValidator,
        }
    }

    /// 从文件导入材料并关联部品主数据
    ///
    /// # 错误
    /// - 文件级错误（不存在、格式不支持、缺少必需列）中止导入
    /// - 单行错误转为 rejected_rows
    #[instrument(skip(self, items_path, master_path))]
    pub fn import_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        items_path: P,
        master_path: Q,
    ) -> ImportResult<ImportOutcome> {
        info!(
            items = %items_path.as_ref().display(),
            master = %master_path.as_ref().display(),
            "开始导入材料数据"
        );

        let masters = self.load_masters(master_path)?;
        let rows = self.parser.parse(items_path)?;
        info!(total_rows = rows.len(), masters = masters.len(), "文件解析完成");

        self.import_rows(rows, &masters)
    }

    /// 读取部品主数据（任一行非法即中止）
    pub fn load_masters<P: AsRef<Path>>(&self, master_path: P) -> ImportResult<Vec<PartMaster>> {
        let rows = self.parser.parse(master_path)?;
        check_columns(&rows, &[ITEM_ID_ALIASES, STAGE_COUNT_ALIASES])?;
        rows.iter().map(|row| self.mapper.map_master(row)).collect()
    }

    /// 由已解析的原始行导入
    pub fn import_rows(&self, rows: Vec<RawRow>, masters: &[PartMaster]) -> ImportResult<ImportOutcome> {
        check_columns(&rows, &[ITEM_ID_ALIASES, WEIGHT_ALIASES, HEAT_NO_ALIASES])?;

        // === 步骤 1: 字段映射 ===
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected_rows = Vec::new();
        for row in &rows {
            match self.mapper.map_item(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(row_number = row.row_number, error = %e, "字段映射失败");
                    rejected_rows.push(RejectedRow {
                        row_number: row.row_number,
                        item_id: row
                            .fields
                            .iter()
                            .find(|(k, _)| ITEM_ID_ALIASES.contains(&k.as_str()))
                            .map(|(_, v)| v.clone())
                            .filter(|v| !v.is_empty()),
                        reason: format!("FIELD_CONVERSION: {}", e),
                    });
                }
            }
        }
        debug!(mapped = records.len(), failed = rejected_rows.len(), "字段映射完成");

        // === 步骤 2: 校验 ===
        let (items, invalid) = self.validator.validate(records);
        rejected_rows.extend(invalid);

        // === 步骤 3: 部品主数据关联 ===
        let (items, unmatched) = MasterJoin::new(masters).join(items);
        rejected_rows.extend(unmatched);

        rejected_rows.sort_by_key(|r| r.row_number);
        info!(
            accepted = items.len(),
            rejected = rejected_rows.len(),
            "材料导入完成"
        );

        Ok(ImportOutcome {
            items,
            rejected_rows,
        })
    }
}

impl Default for ItemImporter {
    fn default() -> Self {
        Self::new(ExcelOptions::default())
    }
}

/// 必需列检查（任一别名存在即可）
fn check_columns(rows: &[RawRow], required: &[&[&str]]) -> ImportResult<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    for aliases in required {
        if !aliases.iter().any(|alias| first.fields.contains_key(*alias)) {
            let mut available: Vec<String> = first.fields.keys().cloned().collect();
            available.sort();
            return Err(ImportError::MissingColumn {
                column: aliases[0].to_string(),
                available,
            });
        }
    }
    Ok(())
}
