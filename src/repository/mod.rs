// ==========================================
// 动态停车定价系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供只读的历史快照与停车场元数据
// 约束: 构建后不可变; 重载通过 SnapshotHandle 原子切换
// ==========================================

pub mod error;
pub mod lot_repo;
pub mod snapshot_handle;
pub mod snapshot_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use lot_repo::LotCatalog;
pub use snapshot_handle::{EngineSnapshot, SnapshotHandle};
pub use snapshot_repo::{QueueLengthBounds, SnapshotStore};
