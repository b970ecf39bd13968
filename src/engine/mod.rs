// ==========================================
// 动态停车定价系统 - 引擎层
// ==========================================
// 职责: 特征解析、定价、改道建议、报价编排
// 红线: 引擎为纯函数式计算, 不持有可变状态, 不做 IO
// ==========================================

pub mod error;
pub mod feature_resolver;
pub mod orchestrator;
pub mod pricing;
pub mod reroute;
pub mod time_bucket;

#[cfg(test)]
pub(crate) mod test_fixtures;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use feature_resolver::{FeatureResolver, LookupTier, ResolvedValue};
pub use orchestrator::{QuoteExplanation, QuoteOrchestrator};
pub use pricing::{LinearWeights, PriceDecision, PriceSource, PricingEngine};
pub use reroute::{
    haversine_km, RerouteAdvisor, RerouteCandidate, RerouteRule, RerouteThresholds,
};
pub use time_bucket::{bucket_slot_time, day_of_week, parse_timestamp, snap_time_of_day};
