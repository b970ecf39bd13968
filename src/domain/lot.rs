// ==========================================
// 动态停车定价系统 - 停车场元数据
// ==========================================
// 职责: 停车场静态属性 (容量、坐标、展示名)
// 红线: 进程生命周期内只读
// ==========================================

use crate::domain::types::LotId;
use serde::{Deserialize, Serialize};

// ==========================================
// LotMetadata - 停车场元数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotMetadata {
    pub lot_id: LotId,        // 停车场编号
    pub capacity: u32,        // 车位容量 (> 0, 加载时校验)
    pub latitude: f64,        // 纬度 (度)
    pub longitude: f64,       // 经度 (度)
    pub display_name: String, // 对外展示编码 (如 BHMBCCMKT01)
}

impl LotMetadata {
    pub fn new(
        lot_id: LotId,
        display_name: impl Into<String>,
        capacity: u32,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            lot_id,
            capacity,
            latitude,
            longitude,
            display_name: display_name.into(),
        }
    }
}
