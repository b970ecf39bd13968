// ==========================================
// 动态停车定价系统 - 快照句柄 (原子切换)
// ==========================================
// 职责: 持有当前生效的 (快照, 停车场目录) 版本
// 红线: 查询只读取一次指针, 全程使用同一版本
// 红线: 重载在锁外完成构建, 锁内只做指针替换
// ==========================================

use crate::repository::{LotCatalog, SnapshotStore};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tracing::info;

// ==========================================
// EngineSnapshot - 一个完整的只读数据版本
// ==========================================
#[derive(Debug)]
pub struct EngineSnapshot {
    pub version: u64,
    pub store: SnapshotStore,
    pub lots: LotCatalog,
    pub loaded_at: DateTime<Utc>,
}

// ==========================================
// SnapshotHandle
// ==========================================
#[derive(Debug)]
pub struct SnapshotHandle {
    current: RwLock<Arc<EngineSnapshot>>,
}

impl SnapshotHandle {
    /// 以初始数据创建句柄 (版本号 1)
    pub fn new(store: SnapshotStore, lots: LotCatalog) -> Self {
        let snapshot = EngineSnapshot {
            version: 1,
            store,
            lots,
            loaded_at: Utc::now(),
        };
        info!(
            version = snapshot.version,
            rows = snapshot.store.len(),
            lots = snapshot.lots.len(),
            "快照已加载"
        );
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// 当前版本
    pub fn current(&self) -> Arc<EngineSnapshot> {
        // 写锁内只有指针替换, 不会在持锁期间 panic; 中毒时沿用内部值
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// 原子切换到新数据, 返回新版本号
    pub fn swap(&self, store: SnapshotStore, lots: LotCatalog) -> u64 {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let version = guard.version + 1;
        *guard = Arc::new(EngineSnapshot {
            version,
            store,
            lots,
            loaded_at: Utc::now(),
        });

        info!(
            version,
            rows = guard.store.len(),
            lots = guard.lots.len(),
            "快照已切换"
        );
        version
    }
}
