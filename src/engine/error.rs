// ==========================================
// 动态停车定价系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 引擎为纯计算, 所有错误均确定性可复现, 不做重试
// ==========================================

use crate::domain::types::LotId;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 查询的停车场不在元数据中
    #[error("未知停车场: lot_id={lot_id}")]
    UnknownLot { lot_id: LotId },

    /// 时间戳无法解析或超出可表示范围
    #[error("时间戳格式错误: {0}")]
    MalformedTimestamp(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
