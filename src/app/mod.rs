// ==========================================
// 动态停车定价系统 - 应用层
// ==========================================
// 职责: 组装配置、数据与报价API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DataSources};
