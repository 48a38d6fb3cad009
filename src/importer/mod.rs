// ==========================================
// 热处理炉装炉排产系统 - 导入层
// ==========================================
// 职责: 外部文件 → 已校验、已关联主数据的材料表
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod item_importer;
pub mod item_validator;
pub mod master_join;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{parse_date_value, FieldMapper};
pub use file_parser::{CsvParser, ExcelOptions, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use item_importer::{ImportOutcome, ItemImporter};
pub use item_validator::ItemValidator;
pub use master_join::MasterJoin;
