// ==========================================
// 动态停车定价系统 - 历史快照领域模型
// ==========================================
// 职责: 快照主键 (显式复合键) 与快照行
// 红线: 主键唯一, 行加载后不可变
// ==========================================

use crate::domain::types::{DayOfWeek, LotId, VehicleType};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// TimeSlotKey - 完整主键
// ==========================================
// (停车场, 周几, 30 分钟时段, 车型)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlotKey {
    pub lot_id: LotId,
    pub day_of_week: DayOfWeek,
    pub slot_time: NaiveTime,
    pub vehicle_type: VehicleType,
}

impl TimeSlotKey {
    pub fn new(
        lot_id: LotId,
        day_of_week: DayOfWeek,
        slot_time: NaiveTime,
        vehicle_type: VehicleType,
    ) -> Self {
        Self {
            lot_id,
            day_of_week,
            slot_time,
            vehicle_type,
        }
    }

    /// 去掉车型后的时段键
    pub fn slot(&self) -> SlotKey {
        SlotKey {
            lot_id: self.lot_id,
            day_of_week: self.day_of_week,
            slot_time: self.slot_time,
        }
    }
}

impl fmt::Display for TimeSlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lot={} day={} time={} vehicle={}",
            self.lot_id,
            self.day_of_week,
            self.slot_time.format("%H:%M:%S"),
            self.vehicle_type
        )
    }
}

// ==========================================
// SlotKey - 时段键 (忽略车型)
// ==========================================
// 用途: 部分匹配回退、改道候选按时段查找
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub lot_id: LotId,
    pub day_of_week: DayOfWeek,
    pub slot_time: NaiveTime,
}

impl SlotKey {
    /// 补上车型得到完整主键
    pub fn with_vehicle(&self, vehicle_type: VehicleType) -> TimeSlotKey {
        TimeSlotKey::new(self.lot_id, self.day_of_week, self.slot_time, vehicle_type)
    }
}

// ==========================================
// SnapshotRow - 时段历史均值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub avg_queue_length: f64,              // 平均排队长度
    pub avg_occupancy: f64,                 // 平均占用车位数
    pub avg_traffic_condition_nearby: f64,  // 平均周边交通 (0..2)
    pub queue_pressure: f64,                // 排队压力
    pub price: f64,                         // 历史已计算价格 (仅供改道比较)
}

// ==========================================
// SnapshotColumn - 可回退的特征列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotColumn {
    AvgQueueLength,
    AvgOccupancy,
    AvgTrafficConditionNearby,
    QueuePressure,
}

impl SnapshotColumn {
    /// 读取行内该列的值
    pub fn value_of(self, row: &SnapshotRow) -> f64 {
        match self {
            SnapshotColumn::AvgQueueLength => row.avg_queue_length,
            SnapshotColumn::AvgOccupancy => row.avg_occupancy,
            SnapshotColumn::AvgTrafficConditionNearby => row.avg_traffic_condition_nearby,
            SnapshotColumn::QueuePressure => row.queue_pressure,
        }
    }

    /// 与快照 CSV 一致的列名
    pub fn column_name(self) -> &'static str {
        match self {
            SnapshotColumn::AvgQueueLength => "AvgQueueLength",
            SnapshotColumn::AvgOccupancy => "AvgOccupancy",
            SnapshotColumn::AvgTrafficConditionNearby => "AvgTrafficConditionNearby",
            SnapshotColumn::QueuePressure => "QueuePressure",
        }
    }
}

impl fmt::Display for SnapshotColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
