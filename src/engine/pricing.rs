// ==========================================
// 动态停车定价系统 - 定价引擎
// ==========================================
// 职责: 派生特征 → 价格
// 规则:
// 1) 高峰覆盖: 排队长度 ≥ 10 且排队压力 ≥ 1.0 → BASE_PRICE × PEAK_MULTIPLIER
// 2) 否则线性模型: 截距 + 权重 · 特征
// 3) 夹紧到 [MIN_PRICE, MAX_PRICE] 并保留 2 位小数
// 红线: 任何输出价格不得超出 [MIN_PRICE, MAX_PRICE]
// ==========================================

use crate::domain::quote::DerivedFeatures;
use crate::engine::feature_resolver::round_to;
use crate::repository::QueueLengthBounds;
use serde::{Deserialize, Serialize};
use tracing::debug;


// ===== 定价常量 =====
pub const BASE_PRICE: f64 = 10.0;
pub const PEAK_MULTIPLIER: f64 = 2.0;
pub const MIN_PRICE: f64 = 5.0;
pub const MAX_PRICE: f64 = 20.0;

// ===== 高峰覆盖阈值 =====
pub const PEAK_QUEUE_LENGTH: i64 = 10;
pub const PEAK_QUEUE_PRESSURE: f64 = 1.0;

// ==========================================
// LinearWeights - 预训练回归权重 (固定)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearWeights {
    pub intercept: f64,
    pub utilization: f64,
    pub queue_pressure: f64,
    pub queue_length_norm: f64,
    pub vehicle_type: f64,     // 作用于 vehicle_type / 3
    pub traffic_nearby: f64,   // 作用于 traffic_condition_nearby / 2
    pub is_special_day: f64,
    pub time_category: f64,    // 作用于 time_category / 2
}

pub const WEIGHTS: LinearWeights = LinearWeights {
    intercept: 10.00488263,
    utilization: 3.5161334,
    queue_pressure: 2.39221267,
    queue_length_norm: 0.94771733,
    vehicle_type: 0.33298709,
    traffic_nearby: 0.25926018,
    is_special_day: 0.491136,
    time_category: 0.5006001,
};

impl LinearWeights {
    /// 线性打分 (未夹紧)
    pub fn score(&self, features: &DerivedFeatures, queue_length_norm: f64) -> f64 {
        self.intercept
            + self.utilization * features.utilization
            + self.queue_pressure * features.queue_pressure
            + self.queue_length_norm * queue_length_norm
            + self.vehicle_type * (f64::from(features.vehicle_type.code()) / 3.0)
            + self.traffic_nearby * (features.traffic_condition_nearby as f64 / 2.0)
            + self.is_special_day * f64::from(features.is_special_day)
            + self.time_category * (f64::from(features.time_category) / 2.0)
    }
}

// ==========================================
// PriceSource - 价格来源 (可解释性)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceSource {
    /// 高峰规则覆盖
    PeakOverride,
    /// 线性模型
    LinearModel { raw_score: f64, queue_length_norm: f64 },
}

/// 定价结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceDecision {
    pub price: f64,
    pub source: PriceSource,
}

// ==========================================
// PricingEngine - 定价引擎
// ==========================================
pub struct PricingEngine {
    weights: LinearWeights,
}

impl PricingEngine {
    pub fn new() -> Self {
        Self { weights: WEIGHTS }
    }

    /// 计算价格
    ///
    /// # 参数
    /// - `features`: 派生特征
    /// - `bounds`: 全表 AvgQueueLength 上下界 (归一化用)
    pub fn price(&self, features: &DerivedFeatures, bounds: QueueLengthBounds) -> PriceDecision {
        let queue_length_norm = bounds.normalize(features.queue_length as f64);

        let (raw, source) = if is_peak(features) {
            (BASE_PRICE * PEAK_MULTIPLIER, PriceSource::PeakOverride)
        } else {
            let raw_score = self.weights.score(features, queue_length_norm);
            (
                raw_score,
                PriceSource::LinearModel {
                    raw_score,
                    queue_length_norm,
                },
            )
        };

        let price = clip_price(raw);

        debug!(
            queue_length = features.queue_length,
            queue_pressure = features.queue_pressure,
            raw_price = raw,
            price,
            ?source,
            "定价完成"
        );

        PriceDecision { price, source }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 是否触发高峰覆盖
pub fn is_peak(features: &DerivedFeatures) -> bool {
    features.queue_length >= PEAK_QUEUE_LENGTH && features.queue_pressure >= PEAK_QUEUE_PRESSURE
}

/// 夹紧到价格区间并保留 2 位小数
///
/// 非有限值 (NaN) 视为下限
pub fn clip_price(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_PRICE;
    }
    round_to(raw.clamp(MIN_PRICE, MAX_PRICE), 2)
}
