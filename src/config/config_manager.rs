// ==========================================
// 动态停车定价系统 - 配置管理器
// ==========================================
// 职责: 引擎参数加载、查询、覆写
// 存储: config_kv 表 (key-value, scope_id='global')
// 说明: 定价常量与回归权重固定, 不走配置
// ==========================================

use crate::db::{init_config_schema, open_sqlite_connection};
use crate::engine::reroute::RerouteThresholds;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例 (自动建表)
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        init_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值 (UPSERT)
    ///
    /// # 返回
    /// - Err: 键为空; 改道阈值不是有限数值, 或写入后阈值组合无效 (此时不写入)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        self.check_threshold_update(key, value)?;

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, config_value = value, "配置已更新");
        Ok(())
    }

    /// 列出全部 global 配置 (按键排序)
    pub fn list_configs(&self) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut configs = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            configs.insert(key, value);
        }
        Ok(configs)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let configs = self.list_configs()?;
        Ok(serde_json::to_string(&json!(configs))?)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取浮点配置; 格式错误时告警并回落默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %value,
                    default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    // ===== 改道配置 =====

    /// 获取改道阈值
    ///
    /// # 返回
    /// - Err: 阈值组合无效 (moderate > high / radius ≤ 0 / price_diff < 0)
    pub fn get_reroute_thresholds(&self) -> Result<RerouteThresholds, Box<dyn Error>> {
        let thresholds = self.read_reroute_thresholds()?;
        validate_thresholds(&thresholds)?;
        Ok(thresholds)
    }

    /// 读取改道阈值 (不校验组合)
    fn read_reroute_thresholds(&self) -> Result<RerouteThresholds, Box<dyn Error>> {
        let defaults = RerouteThresholds::default();

        let thresholds = RerouteThresholds {
            queue_pressure_high: self
                .get_f64_or_default(config_keys::QUEUE_PRESSURE_HIGH, defaults.queue_pressure_high)?,
            queue_pressure_moderate: self.get_f64_or_default(
                config_keys::QUEUE_PRESSURE_MODERATE,
                defaults.queue_pressure_moderate,
            )?,
            price_diff_threshold: self.get_f64_or_default(
                config_keys::PRICE_DIFF_THRESHOLD,
                defaults.price_diff_threshold,
            )?,
            radius_km: self.get_f64_or_default(config_keys::RADIUS_KM, defaults.radius_km)?,
        };

        Ok(thresholds)
    }

    /// 改道阈值写入前校验: 把新值代入当前组合, 组合无效则拒绝
    fn check_threshold_update(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let mut candidate = self.read_reroute_thresholds()?;
        let Some(slot) = threshold_slot(&mut candidate, key) else {
            return Ok(());
        };

        *slot = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("改道阈值必须为有限数值: {}={}", key, value))?;

        validate_thresholds(&candidate)
    }

    // ===== 数据源配置 =====

    /// 历史快照 CSV 路径 (未配置返回 None)
    pub fn get_snapshot_csv_path(&self) -> Result<Option<PathBuf>, Box<dyn Error>> {
        self.get_path(config_keys::SNAPSHOT_CSV_PATH)
    }

    /// 停车场元数据 CSV 路径 (未配置返回 None, 使用内置目录)
    pub fn get_lot_csv_path(&self) -> Result<Option<PathBuf>, Box<dyn Error>> {
        self.get_path(config_keys::LOT_CSV_PATH)
    }

    fn get_path(&self, key: &str) -> Result<Option<PathBuf>, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from))
    }
}

/// 配置键对应的阈值字段 (非改道键返回 None)
fn threshold_slot<'a>(thresholds: &'a mut RerouteThresholds, key: &str) -> Option<&'a mut f64> {
    match key {
        config_keys::QUEUE_PRESSURE_HIGH => Some(&mut thresholds.queue_pressure_high),
        config_keys::QUEUE_PRESSURE_MODERATE => Some(&mut thresholds.queue_pressure_moderate),
        config_keys::PRICE_DIFF_THRESHOLD => Some(&mut thresholds.price_diff_threshold),
        config_keys::RADIUS_KM => Some(&mut thresholds.radius_km),
        _ => None,
    }
}

/// 校验改道阈值组合
pub fn validate_thresholds(thresholds: &RerouteThresholds) -> Result<(), Box<dyn Error>> {
    if thresholds.queue_pressure_moderate > thresholds.queue_pressure_high {
        return Err(format!(
            "改道阈值无效: queue_pressure_moderate({}) > queue_pressure_high({})",
            thresholds.queue_pressure_moderate, thresholds.queue_pressure_high
        )
        .into());
    }
    if thresholds.radius_km <= 0.0 {
        return Err(format!("改道半径无效: radius_km={}", thresholds.radius_km).into());
    }
    if thresholds.price_diff_threshold < 0.0 {
        return Err(format!(
            "价差阈值无效: price_diff_threshold={}",
            thresholds.price_diff_threshold
        )
        .into());
    }
    Ok(())
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 改道
    pub const QUEUE_PRESSURE_HIGH: &str = "reroute/queue_pressure_high";
    pub const QUEUE_PRESSURE_MODERATE: &str = "reroute/queue_pressure_moderate";
    pub const PRICE_DIFF_THRESHOLD: &str = "reroute/price_diff_threshold";
    pub const RADIUS_KM: &str = "reroute/radius_km";

    // 数据源
    pub const SNAPSHOT_CSV_PATH: &str = "data/snapshot_csv_path";
    pub const LOT_CSV_PATH: &str = "data/lot_csv_path";
}
