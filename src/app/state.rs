// ==========================================
// 动态停车定价系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 红线: 启动时快照加载失败 → 拒绝启动; 运行中重载失败 → 保留旧版本
// ==========================================

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{ApiError, ApiResult, QuoteApi};
use crate::config::ConfigManager;
use crate::engine::QuoteOrchestrator;
use crate::importer::{LotImporter, SnapshotImporter};
use crate::repository::{LotCatalog, SnapshotHandle, SnapshotStore};

/// 数据源覆盖 (命令行参数优先于 config_kv)
#[derive(Debug, Clone, Default)]
pub struct DataSources {
    pub snapshot_csv: Option<PathBuf>,
    pub lot_csv: Option<PathBuf>,
}

/// 应用状态
///
/// 包含报价API、快照句柄与配置管理器
pub struct AppState {
    /// 配置数据库路径
    pub db_path: String,

    /// 报价API
    pub quote_api: Arc<QuoteApi>,

    /// 快照句柄 (与 quote_api 共享)
    pub snapshots: Arc<SnapshotHandle>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    lot_csv: Option<PathBuf>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 返回
    /// - Err(ConfigError): 配置库不可用 / 阈值无效 / 未配置快照路径
    /// - Err(ImportError): 快照或停车场数据无效
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开配置库并读取改道阈值
    /// 2. 导入快照与停车场目录
    /// 3. 创建报价API
    pub fn new(db_path: String, sources: DataSources) -> ApiResult<Self> {
        tracing::info!("初始化AppState，配置库路径: {}", db_path);

        let config_manager = Arc::new(
            ConfigManager::new(&db_path)
                .map_err(|e| ApiError::ConfigError(format!("无法创建ConfigManager: {}", e)))?,
        );

        let thresholds = config_manager
            .get_reroute_thresholds()
            .map_err(|e| ApiError::ConfigError(format!("改道阈值配置无效: {}", e)))?;

        // ==========================================
        // 解析数据源路径
        // ==========================================
        let snapshot_csv = match sources.snapshot_csv {
            Some(path) => path,
            None => config_manager
                .get_snapshot_csv_path()
                .map_err(|e| ApiError::ConfigError(format!("读取快照路径配置失败: {}", e)))?
                .ok_or_else(|| {
                    ApiError::ConfigError("未配置快照文件路径 (data/snapshot_csv_path)".to_string())
                })?,
        };
        let lot_csv = match sources.lot_csv {
            Some(path) => Some(path),
            None => config_manager
                .get_lot_csv_path()
                .map_err(|e| ApiError::ConfigError(format!("读取停车场路径配置失败: {}", e)))?,
        };

        // ==========================================
        // 加载数据
        // ==========================================
        let (store, lots) = load_data(&snapshot_csv, lot_csv.as_deref())?;
        let snapshots = Arc::new(SnapshotHandle::new(store, lots));

        let quote_api = Arc::new(QuoteApi::new(
            snapshots.clone(),
            QuoteOrchestrator::new(thresholds),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            quote_api,
            snapshots,
            config_manager,
            lot_csv,
        })
    }

    /// 重新加载快照 (停车场目录沿用启动时的数据源)
    ///
    /// # 返回
    /// - Ok(u64): 新快照版本号
    /// - Err(ImportError): 新数据无效, 旧版本继续生效
    pub fn reload_snapshot(&self, snapshot_csv: &Path) -> ApiResult<u64> {
        tracing::info!("重新加载快照: {}", snapshot_csv.display());

        match load_data(snapshot_csv, self.lot_csv.as_deref()) {
            Ok((store, lots)) => Ok(self.snapshots.swap(store, lots)),
            Err(e) => {
                tracing::error!(
                    "快照重载失败, 保留版本 {}: {}",
                    self.snapshots.current().version,
                    e
                );
                Err(e)
            }
        }
    }
}

/// 导入快照与停车场目录 (不持有任何锁)
fn load_data(
    snapshot_csv: &Path,
    lot_csv: Option<&Path>,
) -> ApiResult<(SnapshotStore, LotCatalog)> {
    let lots = match lot_csv {
        Some(path) => LotImporter::new().import_file(path)?,
        None => {
            tracing::info!("未配置停车场文件, 使用内置目录");
            LotCatalog::builtin()
        }
    };

    let store = SnapshotImporter::new().import_file(snapshot_csv)?;

    let orphan_lots = store
        .rows()
        .map(|(key, _)| key.lot_id)
        .filter(|lot_id| !lots.contains(*lot_id))
        .collect::<BTreeSet<_>>();
    if !orphan_lots.is_empty() {
        tracing::warn!(?orphan_lots, "快照中存在目录外的停车场, 这些行仅参与全局均值");
    }

    Ok((store, lots))
}

/// 获取默认配置库路径
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("PARKING_PRICING_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    "./parking_pricing.db".to_string()
}
