// ==========================================
// 动态停车定价系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换引擎/导入错误为用户友好的错误消息
// 约定: 客户端错误 (4xx) 与服务端错误 (5xx) 可区分, 均不重试
// ==========================================

use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 客户端错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据加载错误
    // ==========================================
    #[error("数据导入失败: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为客户端错误 (传输层据此返回 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::InvalidInput(_) | ApiError::NotFound(_))
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownLot { lot_id } => {
                ApiError::NotFound(format!("停车场(lot_id={})不存在", lot_id))
            }
            EngineError::MalformedTimestamp(raw) => {
                ApiError::InvalidInput(format!("时间戳格式错误: {}", raw))
            }
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
