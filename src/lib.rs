// ==========================================
// 动态停车定价系统 - 核心库
// ==========================================
// 职责: 基于历史快照的实时报价 + 邻近停车场改道建议
// 技术栈: Rust + CSV 快照 + SQLite (config_kv)
// 系统定位: 只读决策引擎 (快照离线生成, 运行期只查询)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 快照与停车场目录
pub mod repository;

// 引擎层 - 特征解析/定价/改道
pub mod engine;

// 导入层 - CSV 数据
pub mod importer;

// 配置层 - 引擎参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 请求校验与响应
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    DayOfWeek, DerivedFeatures, LotId, LotMetadata, Query, Quote, SnapshotRow, TimeSlotKey,
    TrafficLevel, VehicleType,
};

// 仓储
pub use repository::{LotCatalog, SnapshotHandle, SnapshotStore};

// 引擎
pub use engine::{
    FeatureResolver, PricingEngine, QuoteOrchestrator, RerouteAdvisor, RerouteThresholds,
};

// API
pub use api::{QuoteApi, QuoteRequest, QuoteResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "动态停车定价系统";
