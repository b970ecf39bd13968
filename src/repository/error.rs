// ==========================================
// 动态停车定价系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::LotId;
use thiserror::Error;

/// 仓储层错误类型
///
/// 仅在构建快照/元数据时产生; 构建完成后的只读查询不会失败
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 快照错误 =====
    #[error("快照为空: 至少需要一行历史数据")]
    EmptySnapshot,

    #[error("快照主键重复: {key}")]
    DuplicateSlot { key: String },

    // ===== 停车场元数据错误 =====
    #[error("停车场元数据为空")]
    EmptyLotCatalog,

    #[error("停车场编号重复: lot_id={lot_id}")]
    DuplicateLot { lot_id: LotId },

    #[error("停车场容量无效: lot_id={lot_id}, capacity={capacity}")]
    InvalidCapacity { lot_id: LotId, capacity: u32 },

    #[error("停车场坐标无效: lot_id={lot_id}, lat={latitude}, lon={longitude}")]
    InvalidCoordinates {
        lot_id: LotId,
        latitude: f64,
        longitude: f64,
    },
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
