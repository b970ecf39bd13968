// ==========================================
// 动态停车定价系统 - API 数据传输对象
// ==========================================
// 字段名与既有报价接口保持一致 (SystemCodeNumber / TimeStamp / ...)
// ==========================================

use crate::domain::quote::Quote;
use crate::domain::types::TrafficLevel;
use serde::{Deserialize, Serialize};

/// 报价请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// 停车场编号
    #[serde(rename = "SystemCodeNumber")]
    pub lot_id: i64,

    /// ISO-8601 时间戳
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,

    /// 车型 (0=cycle, 1=bike, 2=car, 3=truck)
    #[serde(rename = "VehicleType")]
    pub vehicle_type: i64,
}

/// 报价响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub price: f64,
    pub reroute_to: Option<String>,
    #[serde(rename = "ExpectedTrafficNearby")]
    pub expected_traffic_nearby: TrafficLevel,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            price: quote.price,
            reroute_to: quote.reroute_to,
            expected_traffic_nearby: quote.expected_traffic,
        }
    }
}

/// 健康检查
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
    pub snapshot_version: u64,
    pub snapshot_rows: usize,
    pub lot_count: usize,
}
