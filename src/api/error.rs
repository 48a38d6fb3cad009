// ==========================================
// 热处理炉装炉排产系统 - API层错误类型
// ==========================================
// 职责: 将引擎/导入/导出错误转换为调用方可理解的错误
// 红线: 结构性失败带上诊断上下文（炉号、热号数、阈值）
// ==========================================

use crate::engine::error::AllocationError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 分配失败
    // ==========================================
    #[error("无可行热号: {0}")]
    NoFeasibleGroup(String),

    #[error("无可行分配: {0}")]
    Infeasible(String),

    #[error("求解超时: budget={budget_ms}ms")]
    SolverTimeout { budget_ms: u64 },

    // ==========================================
    // 外部数据
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("结果导出失败: {0}")]
    ExportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 是否可重试（放宽求解时限后）
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::SolverTimeout { .. })
    }
}

impl From<AllocationError> for ApiError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::UnknownFurnace { .. } => ApiError::NotFound(err.to_string()),
            AllocationError::InvalidItem { .. } => ApiError::ValidationError(err.to_string()),
            AllocationError::NoFeasibleGroup { .. } => ApiError::NoFeasibleGroup(err.to_string()),
            AllocationError::Infeasible(msg) => ApiError::Infeasible(msg),
            AllocationError::SolverTimeout { budget_ms } => ApiError::SolverTimeout { budget_ms },
            AllocationError::InvalidConfig(msg) => ApiError::ConfigError(msg),
            AllocationError::Solver(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// API结果类型
pub type ApiResult<T> = Result<T, ApiError>;
