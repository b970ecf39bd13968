// ==========================================
// 动态停车定价系统 - 报价编排器
// ==========================================
// 用途: 串联 特征解析 → 定价 → 改道建议 → 交通等级
// 红线: 无状态; 同一快照 + 同一查询 → 逐位相同的报价
// ==========================================

use crate::domain::quote::{DerivedFeatures, Query, Quote};
use crate::domain::types::TrafficLevel;
use crate::engine::error::EngineResult;
use crate::engine::feature_resolver::FeatureResolver;
use crate::engine::pricing::{PriceDecision, PricingEngine};
use crate::engine::reroute::{RerouteAdvisor, RerouteThresholds};
use crate::repository::{LotCatalog, SnapshotStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ==========================================
// QuoteExplanation - 报价明细 (可解释性)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteExplanation {
    pub features: DerivedFeatures,
    pub pricing: PriceDecision,
    pub quote: Quote,
}

// ==========================================
// QuoteOrchestrator - 报价编排器
// ==========================================
pub struct QuoteOrchestrator {
    resolver: FeatureResolver,
    pricing: PricingEngine,
    advisor: RerouteAdvisor,
}

impl QuoteOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - thresholds: 改道阈值
    pub fn new(thresholds: RerouteThresholds) -> Self {
        Self {
            resolver: FeatureResolver::new(),
            pricing: PricingEngine::new(),
            advisor: RerouteAdvisor::new(thresholds),
        }
    }

    pub fn thresholds(&self) -> &RerouteThresholds {
        self.advisor.thresholds()
    }

    /// 生成报价
    pub fn quote(
        &self,
        query: &Query,
        store: &SnapshotStore,
        lots: &LotCatalog,
    ) -> EngineResult<Quote> {
        self.explain(query, store, lots).map(|explanation| explanation.quote)
    }

    /// 生成报价并附带中间结果
    pub fn explain(
        &self,
        query: &Query,
        store: &SnapshotStore,
        lots: &LotCatalog,
    ) -> EngineResult<QuoteExplanation> {
        debug!(
            lot_id = query.lot_id,
            timestamp = %query.timestamp,
            vehicle_type = %query.vehicle_type,
            "开始报价"
        );

        // ==========================================
        // 步骤1: 特征解析
        // ==========================================
        let features = self.resolver.resolve(query, store, lots)?;

        // ==========================================
        // 步骤2: 定价
        // ==========================================
        let pricing = self.pricing.price(&features, store.queue_length_bounds());

        // ==========================================
        // 步骤3: 改道建议
        // ==========================================
        let reroute_lot_id = self
            .advisor
            .suggest(query, &features, pricing.price, store, lots);
        let reroute_to = reroute_lot_id
            .and_then(|id| lots.display_name(id))
            .map(str::to_string);

        // ==========================================
        // 步骤4: 交通等级
        // ==========================================
        let expected_traffic = TrafficLevel::from_code(features.traffic_condition_nearby);

        let quote = Quote {
            price: pricing.price,
            reroute_lot_id,
            reroute_to,
            expected_traffic,
        };

        info!(
            lot_id = query.lot_id,
            price = quote.price,
            reroute_to = ?quote.reroute_to,
            expected_traffic = %quote.expected_traffic,
            "报价完成"
        );

        Ok(QuoteExplanation {
            features,
            pricing,
            quote,
        })
    }
}

impl Default for QuoteOrchestrator {
    fn default() -> Self {
        Self::new(RerouteThresholds::default())
    }
}
