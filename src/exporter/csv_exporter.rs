// ==========================================
// 热处理炉装炉排产系统 - CSV 导出器
// ==========================================
// 输出:
//   summary.csv  选定炉 + 装炉总重（单行）
//   result.csv   输入表 + 計画有無(1/0),行顺序与导入一致
// 编码: UTF-8
// ==========================================

use crate::domain::selection::{AllocationResult, AllocationSummary, AnnotatedItem};
use chrono::NaiveDate;
use csv::Writer;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 汇总表表头
pub const SUMMARY_HEADER: &[&str] = &["選択した炉", "重量"];

/// 结果表表头（沿用现场列名）
pub const RESULT_HEADER: &[&str] = &[
    "客先（出荷）納期",
    "優先ランク②",
    "品番",
    "重量",
    "ヒート",
    "状態",
    "本日入荷・荒引き日",
    "熱処理回数",
    "計画有無",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("导出文件写入失败: {0}")]
    Io(#[from] io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub summary: PathBuf,
    pub result: PathBuf,
}

pub struct CsvExporter;

impl CsvExporter {
    /// 写出到目录（不存在则创建）
    pub fn export_to_dir<P: AsRef<Path>>(
        &self,
        result: &AllocationResult,
        out_dir: P,
    ) -> Result<ExportPaths, ExportError> {
        let out_dir = out_dir.as_ref();
        fs::create_dir_all(out_dir)?;

        let paths = ExportPaths {
            summary: out_dir.join("summary.csv"),
            result: out_dir.join("result.csv"),
        };

        self.write_summary(&result.summary, File::create(&paths.summary)?)?;
        self.write_result(&result.annotated_items, File::create(&paths.result)?)?;

        tracing::info!(
            summary = %paths.summary.display(),
            result = %paths.result.display(),
            rows = result.annotated_items.len(),
            "结果已导出"
        );
        Ok(paths)
    }

    pub fn write_summary<W: io::Write>(
        &self,
        summary: &AllocationSummary,
        writer: W,
    ) -> Result<(), ExportError> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(SUMMARY_HEADER)?;
        wtr.write_record([summary.furnace_id.clone(), summary.total_weight.to_string()])?;
        wtr.flush()?;
        Ok(())
    }

    pub fn write_result<W: io::Write>(
        &self,
        annotated: &[AnnotatedItem],
        writer: W,
    ) -> Result<(), ExportError> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(RESULT_HEADER)?;

        for row in annotated {
            let item = &row.item;
            wtr.write_record([
                format_date(item.deadline_date),
                item.priority_rank.to_string(),
                item.item_id.clone(),
                item.weight.to_string(),
                item.heat_no.clone(),
                item.process_state.to_string(),
                format_date(item.arrival_date),
                item.process_stage_count.to_string(),
                if row.selected { "1" } else { "0" }.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
