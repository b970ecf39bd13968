// ==========================================
// 动态停车定价系统 - 报价 API
// ==========================================
// 职责: 请求校验 → 报价编排 → 响应映射
// 红线: 每次请求只取一次快照指针
// ==========================================

use crate::api::dto::{HealthStatus, QuoteRequest, QuoteResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::quote::Query;
use crate::domain::types::{LotId, VehicleType};
use crate::engine::orchestrator::{QuoteExplanation, QuoteOrchestrator};
use crate::engine::time_bucket::parse_timestamp;
use crate::repository::SnapshotHandle;
use std::sync::Arc;

// ==========================================
// QuoteApi - 报价API
// ==========================================
pub struct QuoteApi {
    snapshots: Arc<SnapshotHandle>,
    orchestrator: QuoteOrchestrator,
}

impl QuoteApi {
    /// 创建新的QuoteApi实例
    pub fn new(snapshots: Arc<SnapshotHandle>, orchestrator: QuoteOrchestrator) -> Self {
        Self {
            snapshots,
            orchestrator,
        }
    }

    /// 报价
    ///
    /// # 返回
    /// - Err(InvalidInput): 车型/编号/时间戳不合法
    /// - Err(NotFound): 停车场不存在
    pub fn quote(&self, request: &QuoteRequest) -> ApiResult<QuoteResponse> {
        let query = validate_request(request)?;
        let snapshot = self.snapshots.current();

        let quote = self
            .orchestrator
            .quote(&query, &snapshot.store, &snapshot.lots)?;
        Ok(quote.into())
    }

    /// 报价并返回中间特征/定价来源
    pub fn explain(&self, request: &QuoteRequest) -> ApiResult<QuoteExplanation> {
        let query = validate_request(request)?;
        let snapshot = self.snapshots.current();

        Ok(self
            .orchestrator
            .explain(&query, &snapshot.store, &snapshot.lots)?)
    }

    /// 健康检查
    pub fn health(&self) -> HealthStatus {
        let snapshot = self.snapshots.current();
        HealthStatus {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
            model_loaded: !snapshot.store.is_empty(),
            snapshot_version: snapshot.version,
            snapshot_rows: snapshot.store.len(),
            lot_count: snapshot.lots.len(),
        }
    }
}

/// 请求校验并转换为引擎查询
pub fn validate_request(request: &QuoteRequest) -> ApiResult<Query> {
    let lot_id = LotId::try_from(request.lot_id).map_err(|_| {
        ApiError::InvalidInput(format!("停车场编号无效: {}", request.lot_id))
    })?;

    let vehicle_type = VehicleType::from_code(request.vehicle_type).ok_or_else(|| {
        ApiError::InvalidInput(format!(
            "车型无效: {}（仅支持 0/1/2/3）",
            request.vehicle_type
        ))
    })?;

    let timestamp = parse_timestamp(&request.timestamp)?;

    Ok(Query::new(lot_id, timestamp, vehicle_type))
}
