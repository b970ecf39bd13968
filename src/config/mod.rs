// ==========================================
// 动态停车定价系统 - 配置层
// ==========================================
// 职责: 引擎参数覆写 (改道阈值、数据源路径)
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, validate_thresholds, ConfigManager};
