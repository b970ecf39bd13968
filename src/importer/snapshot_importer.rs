// ==========================================
// 动态停车定价系统 - 历史快照导入器
// ==========================================
// 职责: 预计算特征 CSV → SnapshotStore
// 列: SystemCodeNumber, Day, Time, VehicleType, AvgQueueLength, AvgOccupancy,
//     AvgTrafficConditionNearby, QueuePressure, price
// 约定: Day 为 0=周一 .. 6=周日, Time 为 HH:MM:SS
// ==========================================

use crate::domain::snapshot::{SnapshotRow, TimeSlotKey};
use crate::domain::types::{DayOfWeek, LotId, VehicleType};
use crate::engine::time_bucket::snap_time_of_day;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, RawRecord};
use crate::repository::SnapshotStore;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ===== 列名 =====
pub mod columns {
    pub const LOT_ID: &str = "SystemCodeNumber";
    pub const DAY: &str = "Day";
    pub const TIME: &str = "Time";
    pub const VEHICLE_TYPE: &str = "VehicleType";
    pub const AVG_QUEUE_LENGTH: &str = "AvgQueueLength";
    pub const AVG_OCCUPANCY: &str = "AvgOccupancy";
    pub const AVG_TRAFFIC: &str = "AvgTrafficConditionNearby";
    pub const QUEUE_PRESSURE: &str = "QueuePressure";
    pub const PRICE: &str = "price";
}

// ==========================================
// SnapshotImporter
// ==========================================
pub struct SnapshotImporter {
    parser: CsvParser,
    mapper: FieldMapper,
}

impl SnapshotImporter {
    pub fn new() -> Self {
        Self {
            parser: CsvParser,
            mapper: FieldMapper,
        }
    }

    /// 从 CSV 文件导入快照
    pub fn import_file(&self, path: &Path) -> ImportResult<SnapshotStore> {
        let records = self.parser.parse_file(path)?;
        let store = self.build(&records)?;
        info!(path = %path.display(), rows = store.len(), "历史快照导入完成");
        Ok(store)
    }

    /// 从读取器导入快照
    pub fn import_reader<R: Read>(&self, source: R) -> ImportResult<SnapshotStore> {
        let records = self.parser.parse_reader(source)?;
        self.build(&records)
    }

    fn build(&self, records: &[RawRecord]) -> ImportResult<SnapshotStore> {
        let mut off_grid = 0usize;
        let rows = records
            .iter()
            .map(|record| {
                let (key, row) = self.map_record(record)?;
                if snap_time_of_day(key.slot_time) != key.slot_time {
                    off_grid += 1;
                }
                Ok((key, row))
            })
            .collect::<ImportResult<Vec<_>>>()?;

        if off_grid > 0 {
            warn!(off_grid, "快照中存在不在 30 分钟网格上的时段, 这些行只参与全局均值");
        }

        Ok(SnapshotStore::from_rows(rows)?)
    }

    /// 单行映射与校验
    fn map_record(&self, record: &RawRecord) -> ImportResult<(TimeSlotKey, SnapshotRow)> {
        let m = &self.mapper;

        let lot_id =
            m.require_int_in(record, columns::LOT_ID, 0, i64::from(LotId::MAX))? as LotId;
        let day = m.require_int_in(record, columns::DAY, 0, 6)?;
        let slot_time = m.require_time(record, columns::TIME)?;
        let vehicle_code = m.require_int_in(record, columns::VEHICLE_TYPE, 0, 3)?;

        let day_of_week =
            DayOfWeek::new(day as u8).ok_or_else(|| out_of_range(record, columns::DAY, day))?;
        let vehicle_type = VehicleType::from_code(vehicle_code)
            .ok_or_else(|| out_of_range(record, columns::VEHICLE_TYPE, vehicle_code))?;

        let row = SnapshotRow {
            avg_queue_length: m.require_f64_in(record, columns::AVG_QUEUE_LENGTH, 0.0, f64::MAX)?,
            avg_occupancy: m.require_f64_in(record, columns::AVG_OCCUPANCY, 0.0, f64::MAX)?,
            avg_traffic_condition_nearby: m.require_f64_in(record, columns::AVG_TRAFFIC, 0.0, 2.0)?,
            queue_pressure: m.require_f64_in(record, columns::QUEUE_PRESSURE, 0.0, f64::MAX)?,
            price: m.require_f64_in(record, columns::PRICE, 0.0, f64::MAX)?,
        };

        Ok((
            TimeSlotKey::new(lot_id, day_of_week, slot_time, vehicle_type),
            row,
        ))
    }
}

impl Default for SnapshotImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn out_of_range(record: &RawRecord, field: &str, value: i64) -> ImportError {
    ImportError::TypeConversionError {
        row: record.row_number,
        field: field.to_string(),
        message: format!("取值越界: {}", value),
    }
}
