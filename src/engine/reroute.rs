// ==========================================
// 动态停车定价系统 - 改道建议引擎
// ==========================================
// 职责: 当前停车场拥堵时, 在半径内挑选替代停车场
// 输入: 查询 + 派生特征 + 当前价格 + 快照 + 元数据
// 输出: 替代停车场编号 (可无)
// ==========================================
// 规则 (固定优先级):
// A) 拥堵缓解: 当前压力 > high 且候选压力 < 当前压力
// B) 价格优势: moderate ≤ 当前压力 ≤ high
//              且 (当前价 - 候选价) ≥ price_diff 且候选压力 < 当前压力
// 择优: (候选压力, 候选价格, 距离) 字典序最小
// 候选行: (候选停车场, 周几, 时段) 的历史行; 同时段多车型时优先查询车型
// 红线: 候选只认该时段的历史行, 不走回退链; 永不返回自身
// ==========================================

use crate::domain::quote::{DerivedFeatures, Query};
use crate::domain::snapshot::{SlotKey, SnapshotRow};
use crate::domain::types::{LotId, VehicleType};
use crate::repository::{LotCatalog, SnapshotStore};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

#[cfg(test)]
mod tests;

/// 地球平均半径 (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ==========================================
// RerouteThresholds - 改道阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RerouteThresholds {
    pub queue_pressure_high: f64,
    pub queue_pressure_moderate: f64,
    pub price_diff_threshold: f64,
    pub radius_km: f64,
}

impl Default for RerouteThresholds {
    fn default() -> Self {
        Self {
            queue_pressure_high: 1.1,
            queue_pressure_moderate: 0.95,
            price_diff_threshold: 3.0,
            radius_km: 2.0,
        }
    }
}

// ==========================================
// RerouteRule - 命中规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RerouteRule {
    /// 规则 A: 拥堵缓解
    CongestionRelief,
    /// 规则 B: 价格优势 + 中度压力
    PriceAdvantage,
}

/// 合格候选
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RerouteCandidate {
    pub lot_id: LotId,
    pub distance_km: f64,
    pub price: f64,
    pub queue_pressure: f64,
    pub rule: RerouteRule,
}

impl RerouteCandidate {
    /// 择优比较: 压力 → 价格 → 距离, 均升序
    fn compare(&self, other: &Self) -> Ordering {
        self.queue_pressure
            .total_cmp(&other.queue_pressure)
            .then_with(|| self.price.total_cmp(&other.price))
            .then_with(|| self.distance_km.total_cmp(&other.distance_km))
    }
}

// ==========================================
// RerouteAdvisor - 改道建议引擎
// ==========================================
pub struct RerouteAdvisor {
    thresholds: RerouteThresholds,
}

impl RerouteAdvisor {
    pub fn new(thresholds: RerouteThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RerouteThresholds {
        &self.thresholds
    }

    /// 建议改道目标
    ///
    /// # 参数
    /// - `current_price`: 本次已计算的当前停车场价格
    ///
    /// # 返回
    /// 最优候选停车场编号; 无合格候选返回 None
    pub fn suggest(
        &self,
        query: &Query,
        features: &DerivedFeatures,
        current_price: f64,
        store: &SnapshotStore,
        lots: &LotCatalog,
    ) -> Option<LotId> {
        let best = self
            .qualifying_candidates(query, features, current_price, store, lots)
            .into_iter()
            .min_by(|a, b| a.compare(b));

        debug!(
            lot_id = query.lot_id,
            queue_pressure = features.queue_pressure,
            current_price,
            reroute_to = ?best.map(|c| c.lot_id),
            rule = ?best.map(|c| c.rule),
            "改道建议完成"
        );

        best.map(|c| c.lot_id)
    }

    /// 列出所有合格候选 (按停车场编号升序)
    pub fn qualifying_candidates(
        &self,
        query: &Query,
        features: &DerivedFeatures,
        current_price: f64,
        store: &SnapshotStore,
        lots: &LotCatalog,
    ) -> Vec<RerouteCandidate> {
        let origin = match lots.get(query.lot_id) {
            Some(lot) => lot,
            None => return Vec::new(),
        };

        let current_pressure = features.queue_pressure;
        let mut candidates = Vec::new();

        for other in lots.iter() {
            if other.lot_id == query.lot_id {
                continue;
            }

            let distance_km =
                haversine_km(origin.latitude, origin.longitude, other.latitude, other.longitude);
            if distance_km > self.thresholds.radius_km {
                continue;
            }

            // 仅该时段的历史行合格, 不走回退链
            let slot = SlotKey {
                lot_id: other.lot_id,
                day_of_week: features.day_of_week,
                slot_time: features.slot_time,
            };
            let row = match candidate_row(store, &slot, query.vehicle_type) {
                Some(row) => row,
                None => {
                    debug!(
                        candidate = other.lot_id,
                        day = %slot.day_of_week,
                        time = %slot.slot_time,
                        "候选无该时段历史行, 跳过"
                    );
                    continue;
                }
            };

            let rule =
                self.match_rule(current_pressure, current_price, row.queue_pressure, row.price);
            if let Some(rule) = rule {
                candidates.push(RerouteCandidate {
                    lot_id: other.lot_id,
                    distance_km,
                    price: row.price,
                    queue_pressure: row.queue_pressure,
                    rule,
                });
            }
        }

        candidates
    }

    /// 按固定优先级匹配规则
    fn match_rule(
        &self,
        current_pressure: f64,
        current_price: f64,
        candidate_pressure: f64,
        candidate_price: f64,
    ) -> Option<RerouteRule> {
        let t = &self.thresholds;
        let relieves = candidate_pressure < current_pressure;

        if current_pressure > t.queue_pressure_high && relieves {
            Some(RerouteRule::CongestionRelief)
        } else if t.queue_pressure_moderate <= current_pressure
            && current_pressure <= t.queue_pressure_high
            && (current_price - candidate_price) >= t.price_diff_threshold
            && relieves
        {
            Some(RerouteRule::PriceAdvantage)
        } else {
            None
        }
    }
}

impl Default for RerouteAdvisor {
    fn default() -> Self {
        Self::new(RerouteThresholds::default())
    }
}

/// 候选停车场在该时段的历史行
///
/// 同一时段按车型存多行: 优先取查询车型的行, 否则取车型编号最大的行
fn candidate_row<'a>(
    store: &'a SnapshotStore,
    slot: &SlotKey,
    vehicle_type: VehicleType,
) -> Option<&'a SnapshotRow> {
    store.get(&slot.with_vehicle(vehicle_type)).or_else(|| {
        VehicleType::ALL
            .iter()
            .rev()
            .find_map(|&other| store.get(&slot.with_vehicle(other)))
    })
}

/// 大圆距离 (haversine, km)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}
