// ==========================================
// 动态停车定价系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod lot;
pub mod quote;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use lot::LotMetadata;
pub use quote::{DerivedFeatures, Query, Quote};
pub use snapshot::{SlotKey, SnapshotColumn, SnapshotRow, TimeSlotKey};
pub use types::{DayOfWeek, LotId, TrafficLevel, VehicleType};
