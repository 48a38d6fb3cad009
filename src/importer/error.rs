// ==========================================
// 热处理炉装炉排产系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 文件级错误中止导入；单行错误转为 RejectedRow,不在此处中止
// ==========================================

use thiserror::Error;

/// 导入层错误
///
/// 文件级错误（打开、格式、表头、必需列）中止整个导入；
/// 行级错误（类型转换、日期）由导入器转成被拒绝行
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件级 =====
    #[error("找不到文件: {0}")]
    FileNotFound(String),

    #[error("不支持的扩展名: {0}（可用 .csv / .xlsx / .xls）")]
    UnsupportedFormat(String),

    #[error("读取文件出错: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 读取出错: {0}")]
    Csv(#[from] csv::Error),

    #[error("工作簿读取出错: {0}")]
    Excel(#[from] calamine::Error),

    #[error("工作簿内容无效: {0}")]
    ExcelParseError(String),

    #[error("找不到工作表 {sheet}，现有: {available:?}")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("第 {0} 行应为表头,但数据不足")]
    HeaderRowMissing(usize),

    #[error("缺少列 {column}，现有列: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    // ===== 行级 =====
    #[error("第 {row} 行 {field} 无法转换: {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("第 {row} 行 {field} 不是可识别的日期: {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },
}

pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ImportError = io.into();
        assert!(matches!(err, ImportError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
