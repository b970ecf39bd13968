// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: config_kv 读写、改道阈值解析与校验
// ==========================================

mod test_helpers;

use parking_pricing::config::{config_keys, ConfigManager};
use parking_pricing::engine::RerouteThresholds;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use test_helpers::create_test_db;

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[test]
fn test_defaults_when_unconfigured() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    let thresholds = config_manager.get_reroute_thresholds().unwrap();
    assert_eq!(thresholds, RerouteThresholds::default());
    assert_eq!(config_manager.get_snapshot_csv_path().unwrap(), None);
    assert_eq!(config_manager.get_lot_csv_path().unwrap(), None);
}

#[test]
fn test_overridden_thresholds_are_read() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager
        .set_config_value(config_keys::RADIUS_KM, "3.5")
        .unwrap();
    config_manager
        .set_config_value(config_keys::PRICE_DIFF_THRESHOLD, "1.25")
        .unwrap();

    let thresholds = config_manager.get_reroute_thresholds().unwrap();
    assert_eq!(thresholds.radius_km, 3.5);
    assert_eq!(thresholds.price_diff_threshold, 1.25);
    assert_eq!(thresholds.queue_pressure_high, 1.1);
}

#[test]
fn test_values_persist_across_instances() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    {
        let config_manager = ConfigManager::new(&db_path).unwrap();
        config_manager
            .set_config_value(config_keys::SNAPSHOT_CSV_PATH, " /data/snapshot.csv ")
            .unwrap();
        // UPSERT 覆盖
        config_manager
            .set_config_value(config_keys::RADIUS_KM, "1.0")
            .unwrap();
        config_manager
            .set_config_value(config_keys::RADIUS_KM, "1.5")
            .unwrap();
    }

    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert_eq!(
        config_manager.get_snapshot_csv_path().unwrap(),
        Some(PathBuf::from("/data/snapshot.csv"))
    );
    assert_eq!(config_manager.get_reroute_thresholds().unwrap().radius_km, 1.5);

    let configs = config_manager.list_configs().unwrap();
    assert_eq!(configs.len(), 2);
    assert_eq!(configs.get(config_keys::RADIUS_KM).map(String::as_str), Some("1.5"));
}

#[test]
fn test_malformed_value_falls_back_to_default() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    // 绕过 set_config_value 直接落库 (模拟外部改表)
    let conn = Connection::open(&db_path).unwrap();
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        params![config_keys::QUEUE_PRESSURE_HIGH, "very high"],
    )
    .unwrap();

    let thresholds = config_manager.get_reroute_thresholds().unwrap();
    assert_eq!(thresholds.queue_pressure_high, 1.1);
}

#[test]
fn test_inconsistent_thresholds_are_rejected_before_write() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    // moderate > high
    assert!(config_manager
        .set_config_value(config_keys::QUEUE_PRESSURE_MODERATE, "1.5")
        .is_err());

    assert_eq!(
        config_manager
            .get_config_value(config_keys::QUEUE_PRESSURE_MODERATE)
            .unwrap(),
        None
    );
    assert_eq!(
        config_manager.get_reroute_thresholds().unwrap(),
        RerouteThresholds::default()
    );
}

#[test]
fn test_negative_radius_is_not_stored() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    assert!(config_manager
        .set_config_value(config_keys::RADIUS_KM, "-1")
        .is_err());
    assert!(config_manager
        .set_config_value(config_keys::RADIUS_KM, "0")
        .is_err());

    assert_eq!(
        config_manager.get_config_value(config_keys::RADIUS_KM).unwrap(),
        None
    );
    // 后续启动仍能读取阈值
    let reopened = ConfigManager::new(&db_path).unwrap();
    assert_eq!(
        reopened.get_reroute_thresholds().unwrap(),
        RerouteThresholds::default()
    );
}

#[test]
fn test_non_numeric_threshold_is_not_stored() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    for value in ["very high", "NaN", "inf", ""] {
        assert!(
            config_manager
                .set_config_value(config_keys::QUEUE_PRESSURE_HIGH, value)
                .is_err(),
            "{:?} should be rejected",
            value
        );
    }
    assert_eq!(
        config_manager
            .get_config_value(config_keys::QUEUE_PRESSURE_HIGH)
            .unwrap(),
        None
    );
}

#[test]
fn test_threshold_update_checks_against_stored_values() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager
        .set_config_value(config_keys::QUEUE_PRESSURE_HIGH, "2.0")
        .unwrap();
    // 相对新的 high 有效
    config_manager
        .set_config_value(config_keys::QUEUE_PRESSURE_MODERATE, "1.5")
        .unwrap();
    // 此时 high 不能再低于 moderate
    assert!(config_manager
        .set_config_value(config_keys::QUEUE_PRESSURE_HIGH, "1.2")
        .is_err());

    let thresholds = config_manager.get_reroute_thresholds().unwrap();
    assert_eq!(thresholds.queue_pressure_high, 2.0);
    assert_eq!(thresholds.queue_pressure_moderate, 1.5);
}

#[test]
fn test_non_threshold_keys_are_not_parsed() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager
        .set_config_value(config_keys::LOT_CSV_PATH, "/data/lots.csv")
        .unwrap();
    assert_eq!(
        config_manager.get_lot_csv_path().unwrap(),
        Some(PathBuf::from("/data/lots.csv"))
    );
}

#[test]
fn test_empty_key_is_rejected() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    assert!(config_manager.set_config_value("  ", "1").is_err());
}

#[test]
fn test_config_snapshot_is_json() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();
    config_manager
        .set_config_value(config_keys::RADIUS_KM, "2.5")
        .unwrap();

    let snapshot = config_manager.get_config_snapshot().unwrap();
    let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(value["reroute/radius_km"], "2.5");
}
