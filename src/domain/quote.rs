// ==========================================
// 动态停车定价系统 - 查询与报价
// ==========================================
// 职责: 单次请求的输入 (Query)、派生特征、输出 (Quote)
// 红线: 均为临时值对象, 不持久化
// ==========================================

use crate::domain::types::{DayOfWeek, LotId, TrafficLevel, VehicleType};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Query - 报价查询
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub lot_id: LotId,
    pub timestamp: NaiveDateTime,
    pub vehicle_type: VehicleType,
}

impl Query {
    pub fn new(lot_id: LotId, timestamp: NaiveDateTime, vehicle_type: VehicleType) -> Self {
        Self {
            lot_id,
            timestamp,
            vehicle_type,
        }
    }
}

// ==========================================
// DerivedFeatures - 派生特征向量
// ==========================================
// 由 Query + 快照 + 元数据确定性计算
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub day_of_week: DayOfWeek,
    pub slot_time: NaiveTime,
    pub vehicle_type: VehicleType,
    pub traffic_condition_nearby: i64,
    pub queue_length: i64,
    pub occupancy: i64,
    pub utilization: f64,   // occupancy / capacity, 4 位小数
    pub queue_pressure: f64, // 不取整
    pub is_special_day: u8, // 周末 = 1
    pub time_category: u8,  // 原始小时 < 12 → 0, 否则 1
}

// ==========================================
// Quote - 报价结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,                     // [5, 20], 2 位小数
    pub reroute_lot_id: Option<LotId>,  // 建议改道的停车场编号
    pub reroute_to: Option<String>,     // 改道停车场展示名
    pub expected_traffic: TrafficLevel, // 周边交通等级
}
