// ==========================================
// 热处理炉装炉排产系统 - 导出层
// ==========================================
// 职责: AllocationResult → 汇总表 / 标注结果表
// ==========================================

pub mod csv_exporter;

pub use csv_exporter::{CsvExporter, ExportError, ExportPaths, RESULT_HEADER, SUMMARY_HEADER};
