// ==========================================
// 动态停车定价系统 - 历史快照仓储
// ==========================================
// 职责: 按 (停车场, 周几, 时段, 车型) 索引历史均值
// 红线: 启动时一次构建, 之后只读 (可跨线程无锁共享)
// ==========================================

use crate::domain::snapshot::{SlotKey, SnapshotColumn, SnapshotRow, TimeSlotKey};
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::HashMap;

// ==========================================
// QueueLengthBounds - 排队长度分布上下界
// ==========================================
// 用途: 定价引擎 min-max 归一化
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueLengthBounds {
    pub min: f64,
    pub max: f64,
}

impl QueueLengthBounds {
    /// min-max 归一化; 分布退化 (min ≈ max) 时分母取 1
    pub fn normalize(&self, value: f64) -> f64 {
        let denom = if is_close(self.max, self.min) {
            1.0
        } else {
            self.max - self.min
        };
        (value - self.min) / denom
    }
}

/// 相对容差 1e-9 的浮点相等判断
fn is_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

// ==========================================
// ColumnMeans - 全表列均值 (全局回退)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnMeans {
    avg_queue_length: f64,
    avg_occupancy: f64,
    avg_traffic_condition_nearby: f64,
    queue_pressure: f64,
}

impl ColumnMeans {
    fn compute(rows: &[(TimeSlotKey, SnapshotRow)]) -> Self {
        let n = rows.len() as f64;
        let mean = |column: SnapshotColumn| -> f64 {
            rows.iter().map(|(_, row)| column.value_of(row)).sum::<f64>() / n
        };

        Self {
            avg_queue_length: mean(SnapshotColumn::AvgQueueLength),
            avg_occupancy: mean(SnapshotColumn::AvgOccupancy),
            avg_traffic_condition_nearby: mean(SnapshotColumn::AvgTrafficConditionNearby),
            queue_pressure: mean(SnapshotColumn::QueuePressure),
        }
    }

    fn get(&self, column: SnapshotColumn) -> f64 {
        match column {
            SnapshotColumn::AvgQueueLength => self.avg_queue_length,
            SnapshotColumn::AvgOccupancy => self.avg_occupancy,
            SnapshotColumn::AvgTrafficConditionNearby => self.avg_traffic_condition_nearby,
            SnapshotColumn::QueuePressure => self.queue_pressure,
        }
    }
}

// ==========================================
// SnapshotStore - 历史快照 (只读)
// ==========================================
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    rows: Vec<(TimeSlotKey, SnapshotRow)>,
    by_key: HashMap<TimeSlotKey, usize>,
    by_slot: HashMap<SlotKey, Vec<usize>>,
    global_means: ColumnMeans,
    queue_length_bounds: QueueLengthBounds,
}

impl SnapshotStore {
    /// 由历史行构建快照
    ///
    /// # 返回
    /// - Err(EmptySnapshot): 无任何行 (启动级致命错误)
    /// - Err(DuplicateSlot): 主键重复
    pub fn from_rows<I>(rows: I) -> RepositoryResult<Self>
    where
        I: IntoIterator<Item = (TimeSlotKey, SnapshotRow)>,
    {
        let rows: Vec<(TimeSlotKey, SnapshotRow)> = rows.into_iter().collect();
        if rows.is_empty() {
            return Err(RepositoryError::EmptySnapshot);
        }

        let mut by_key = HashMap::with_capacity(rows.len());
        let mut by_slot: HashMap<SlotKey, Vec<usize>> = HashMap::new();

        for (idx, (key, _)) in rows.iter().enumerate() {
            if by_key.insert(*key, idx).is_some() {
                return Err(RepositoryError::DuplicateSlot {
                    key: key.to_string(),
                });
            }
            by_slot.entry(key.slot()).or_default().push(idx);
        }

        let global_means = ColumnMeans::compute(&rows);

        let (min, max) = rows.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), (_, row)| (min.min(row.avg_queue_length), max.max(row.avg_queue_length)),
        );

        Ok(Self {
            rows,
            by_key,
            by_slot,
            global_means,
            queue_length_bounds: QueueLengthBounds { min, max },
        })
    }

    // ==========================================
    // 查询方法
    // ==========================================

    /// 按完整主键精确查找 (无回退)
    pub fn get(&self, key: &TimeSlotKey) -> Option<&SnapshotRow> {
        self.by_key.get(key).map(|&idx| &self.rows[idx].1)
    }

    /// 同一时段的所有行 (忽略车型, 按加载顺序)
    pub fn rows_for_slot(&self, slot: &SlotKey) -> Vec<&SnapshotRow> {
        self.by_slot
            .get(slot)
            .map(|indices| indices.iter().map(|&idx| &self.rows[idx].1).collect())
            .unwrap_or_default()
    }

    /// 全表列均值
    pub fn global_mean(&self, column: SnapshotColumn) -> f64 {
        self.global_means.get(column)
    }

    /// 全表 AvgQueueLength 上下界
    pub fn queue_length_bounds(&self) -> QueueLengthBounds {
        self.queue_length_bounds
    }

    /// 全部行 (按加载顺序)
    pub fn rows(&self) -> impl Iterator<Item = (&TimeSlotKey, &SnapshotRow)> {
        self.rows.iter().map(|(key, row)| (key, row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DayOfWeek, VehicleType};
    use chrono::NaiveTime;

    fn key(lot_id: u32, vehicle_type: VehicleType) -> TimeSlotKey {
        TimeSlotKey::new(
            lot_id,
            DayOfWeek::new(1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            vehicle_type,
        )
    }

    fn row(queue: f64, pressure: f64) -> SnapshotRow {
        SnapshotRow {
            avg_queue_length: queue,
            avg_occupancy: 100.0,
            avg_traffic_condition_nearby: 1.0,
            queue_pressure: pressure,
            price: 10.0,
        }
    }

    #[test]
    fn test_empty_snapshot_is_rejected() {
        let result = SnapshotStore::from_rows(Vec::new());
        assert!(matches!(result, Err(RepositoryError::EmptySnapshot)));
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let result = SnapshotStore::from_rows(vec![
            (key(0, VehicleType::Car), row(1.0, 0.1)),
            (key(0, VehicleType::Car), row(2.0, 0.2)),
        ]);
        assert!(matches!(result, Err(RepositoryError::DuplicateSlot { .. })));
    }

    #[test]
    fn test_slot_index_groups_vehicle_types() {
        let store = SnapshotStore::from_rows(vec![
            (key(0, VehicleType::Car), row(2.0, 0.2)),
            (key(0, VehicleType::Truck), row(4.0, 0.4)),
            (key(1, VehicleType::Car), row(6.0, 0.6)),
        ])
        .unwrap();

        let slot = key(0, VehicleType::Cycle).slot();
        assert_eq!(store.rows_for_slot(&slot).len(), 2);
        assert!(store.get(&key(0, VehicleType::Cycle)).is_none());
        assert_eq!(store.get(&key(1, VehicleType::Car)).unwrap().queue_pressure, 0.6);
    }

    #[test]
    fn test_global_means_and_bounds() {
        let store = SnapshotStore::from_rows(vec![
            (key(0, VehicleType::Car), row(2.0, 0.2)),
            (key(1, VehicleType::Car), row(6.0, 0.6)),
        ])
        .unwrap();

        assert!((store.global_mean(SnapshotColumn::AvgQueueLength) - 4.0).abs() < 1e-12);
        assert!((store.global_mean(SnapshotColumn::QueuePressure) - 0.4).abs() < 1e-12);
        let bounds = store.queue_length_bounds();
        assert_eq!(bounds.min, 2.0);
        assert_eq!(bounds.max, 6.0);
        assert!((bounds.normalize(4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_bounds_use_unit_denominator() {
        let bounds = QueueLengthBounds { min: 3.0, max: 3.0 };
        assert_eq!(bounds.normalize(5.0), 2.0);
        assert_eq!(bounds.normalize(3.0), 0.0);
    }
}
