// ==========================================
// 动态停车定价系统 - API 层
// ==========================================
// 职责: 请求校验、DTO 映射、错误分类
// 说明: 传输层 (HTTP 等) 不在本 crate 内
// ==========================================

pub mod dto;
pub mod error;
pub mod quote_api;

// 重导出
pub use dto::{HealthStatus, QuoteRequest, QuoteResponse};
pub use error::{ApiError, ApiResult};
pub use quote_api::{validate_request, QuoteApi};
