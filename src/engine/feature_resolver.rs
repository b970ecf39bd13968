// ==========================================
// 动态停车定价系统 - 特征解析引擎
// ==========================================
// 职责: Query + 快照 + 元数据 → 派生特征向量
// 输入: 报价查询 (停车场, 时间戳, 车型)
// 输出: DerivedFeatures
// ==========================================
// 回退链 (按序, 首个非空命中即返回):
// 1) 完整匹配: 停车场 + 周几 + 时段 + 车型
// 2) 部分匹配: 停车场 + 周几 + 时段 (忽略车型)
// 3) 全局均值: 整张快照表该列均值
// 每列独立走回退链
// ==========================================

use crate::domain::quote::{DerivedFeatures, Query};
use crate::domain::snapshot::{SnapshotColumn, TimeSlotKey};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::time_bucket::{bucket_slot_time, day_of_week};
use crate::repository::{LotCatalog, SnapshotStore};
use chrono::Timelike;
use tracing::debug;


// ==========================================
// LookupTier - 回退层级
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTier {
    FullMatch,
    PartialMatch,
    GlobalMean,
}

impl LookupTier {
    /// 回退链求值顺序
    pub const CHAIN: [LookupTier; 3] = [
        LookupTier::FullMatch,
        LookupTier::PartialMatch,
        LookupTier::GlobalMean,
    ];

    /// 在该层级查找列均值; 无匹配行返回 None
    fn lookup(self, store: &SnapshotStore, key: &TimeSlotKey, column: SnapshotColumn) -> Option<f64> {
        match self {
            LookupTier::FullMatch => store.get(key).map(|row| column.value_of(row)),
            LookupTier::PartialMatch => {
                let rows = store.rows_for_slot(&key.slot());
                if rows.is_empty() {
                    None
                } else {
                    let sum: f64 = rows.iter().map(|row| column.value_of(row)).sum();
                    Some(sum / rows.len() as f64)
                }
            }
            LookupTier::GlobalMean => Some(store.global_mean(column)),
        }
    }
}

/// 单列解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedValue {
    pub value: f64,
    pub tier: LookupTier,
}

// ==========================================
// FeatureResolver - 特征解析引擎
// ==========================================
pub struct FeatureResolver {
    // 无状态引擎
}

impl FeatureResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析派生特征
    ///
    /// # 返回
    /// - Err(UnknownLot): 停车场不在元数据中
    ///
    /// 快照缺数据不是错误: 回退链保证至少落到全局均值
    pub fn resolve(
        &self,
        query: &Query,
        store: &SnapshotStore,
        lots: &LotCatalog,
    ) -> EngineResult<DerivedFeatures> {
        let lot = lots.get(query.lot_id).ok_or(EngineError::UnknownLot {
            lot_id: query.lot_id,
        })?;

        let day = day_of_week(&query.timestamp);
        let slot_time = bucket_slot_time(&query.timestamp);
        let key = TimeSlotKey::new(query.lot_id, day, slot_time, query.vehicle_type);

        let traffic = self.resolve_column(store, &key, SnapshotColumn::AvgTrafficConditionNearby);
        let queue = self.resolve_column(store, &key, SnapshotColumn::AvgQueueLength);
        let occupancy = self.resolve_column(store, &key, SnapshotColumn::AvgOccupancy);
        let pressure = self.resolve_column(store, &key, SnapshotColumn::QueuePressure);

        debug!(
            lot_id = query.lot_id,
            %key,
            traffic_tier = ?traffic.tier,
            queue_tier = ?queue.tier,
            occupancy_tier = ?occupancy.tier,
            pressure_tier = ?pressure.tier,
            "特征回退链求值完成"
        );

        let occupancy = round_half_even(occupancy.value);
        // 容量在加载时已校验 > 0
        let utilization = round_to(occupancy as f64 / f64::from(lot.capacity), 4);

        Ok(DerivedFeatures {
            day_of_week: day,
            slot_time,
            vehicle_type: query.vehicle_type,
            traffic_condition_nearby: round_half_even(traffic.value),
            queue_length: round_half_even(queue.value),
            occupancy,
            utilization,
            queue_pressure: pressure.value,
            is_special_day: u8::from(day.is_weekend()),
            time_category: u8::from(query.timestamp.hour() >= 12),
        })
    }

    /// 按回退链解析单列
    pub fn resolve_column(
        &self,
        store: &SnapshotStore,
        key: &TimeSlotKey,
        column: SnapshotColumn,
    ) -> ResolvedValue {
        for tier in LookupTier::CHAIN {
            if let Some(value) = tier.lookup(store, key, column) {
                return ResolvedValue { value, tier };
            }
        }

        // GlobalMean 恒有值, 不会走到这里
        ResolvedValue {
            value: store.global_mean(column),
            tier: LookupTier::GlobalMean,
        }
    }
}

impl Default for FeatureResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 取整工具
// ==========================================

/// 四舍六入五取偶
pub(crate) fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// 保留 places 位小数, 恰在中点时取偶
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
