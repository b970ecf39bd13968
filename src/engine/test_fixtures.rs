// ==========================================
// 引擎单元测试共用夹具
// ==========================================

use crate::domain::lot::LotMetadata;
use crate::domain::quote::Query;
use crate::domain::snapshot::{SnapshotRow, TimeSlotKey};
use crate::domain::types::{DayOfWeek, VehicleType};
use crate::repository::{LotCatalog, SnapshotStore};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// 2025-07-08 (周二) 的指定时刻
pub fn tuesday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 7, 8)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// 2025-07-12 (周六) 的指定时刻
pub fn saturday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 7, 12)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn slot(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn key(lot_id: u32, day: u8, time: NaiveTime, vehicle_type: VehicleType) -> TimeSlotKey {
    TimeSlotKey::new(lot_id, DayOfWeek::new(day).unwrap(), time, vehicle_type)
}

pub fn row(queue: f64, occupancy: f64, traffic: f64, pressure: f64, price: f64) -> SnapshotRow {
    SnapshotRow {
        avg_queue_length: queue,
        avg_occupancy: occupancy,
        avg_traffic_condition_nearby: traffic,
        queue_pressure: pressure,
        price,
    }
}

pub fn query(lot_id: u32, timestamp: NaiveDateTime, vehicle_type: VehicleType) -> Query {
    Query::new(lot_id, timestamp, vehicle_type)
}

pub fn store(rows: Vec<(TimeSlotKey, SnapshotRow)>) -> SnapshotStore {
    SnapshotStore::from_rows(rows).unwrap()
}

/// 三个邻近停车场 + 一个远处停车场
///
/// - 0: 原点 (容量 500)
/// - 1: 东侧约 0.5 km
/// - 2: 北侧约 1.5 km
/// - 3: 北侧约 5 km
pub fn nearby_lots() -> LotCatalog {
    LotCatalog::from_lots(vec![
        LotMetadata::new(0, "LOT-ORIGIN", 500, 26.1400, 91.7300),
        LotMetadata::new(1, "LOT-EAST", 400, 26.1400, 91.7350),
        LotMetadata::new(2, "LOT-NORTH", 800, 26.1535, 91.7300),
        LotMetadata::new(3, "LOT-FAR", 1000, 26.1850, 91.7300),
    ])
    .unwrap()
}
