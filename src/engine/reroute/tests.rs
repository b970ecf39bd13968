use super::*;
use crate::domain::quote::DerivedFeatures;
use crate::domain::snapshot::{SnapshotRow, TimeSlotKey};
use crate::domain::types::{DayOfWeek, VehicleType};
use crate::engine::test_fixtures::*;

// ==========================================
// 测试辅助函数
// ==========================================

fn features_with_pressure(queue_pressure: f64) -> DerivedFeatures {
    DerivedFeatures {
        day_of_week: DayOfWeek::new(1).unwrap(),
        slot_time: slot(10, 0),
        vehicle_type: VehicleType::Car,
        traffic_condition_nearby: 1,
        queue_length: 5,
        occupancy: 250,
        utilization: 0.5,
        queue_pressure,
        is_special_day: 0,
        time_category: 0,
    }
}

fn car_row(lot_id: u32, pressure: f64, price: f64) -> (TimeSlotKey, SnapshotRow) {
    (
        key(lot_id, 1, slot(10, 0), VehicleType::Car),
        row(5.0, 100.0, 1.0, pressure, price),
    )
}

fn car_query(lot_id: u32) -> crate::domain::quote::Query {
    query(lot_id, tuesday_at(10, 0), VehicleType::Car)
}

// ==========================================
// 规则 A: 拥堵缓解
// ==========================================

#[test]
fn test_rule_a_prefers_lowest_pressure_over_closer_lot() {
    let store = store(vec![
        car_row(0, 1.3, 20.0),
        car_row(1, 1.25, 12.0), // 约 0.5 km
        car_row(2, 0.8, 14.0),  // 约 1.5 km
    ]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.3),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, Some(2));
}

#[test]
fn test_rule_a_requires_strictly_lower_pressure() {
    let store = store(vec![car_row(1, 1.3, 5.0)]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.3),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, None);
}

#[test]
fn test_out_of_radius_lot_never_selected() {
    let store = store(vec![
        car_row(1, 1.0, 12.0),
        car_row(3, 0.01, 5.0), // 约 5 km, 压力最低
    ]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.5),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, Some(1));
}

// ==========================================
// 规则 B: 价格优势 + 中度压力
// ==========================================

#[test]
fn test_rule_b_tie_on_pressure_breaks_on_price() {
    let store = store(vec![car_row(1, 0.6, 9.0), car_row(2, 0.6, 8.0)]);
    let advisor = RerouteAdvisor::default();

    let candidates = advisor.qualifying_candidates(
        &car_query(0),
        &features_with_pressure(1.0),
        15.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(candidates.len(), 2);
    assert!(candidates
        .iter()
        .all(|c| c.rule == RerouteRule::PriceAdvantage));

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.0),
        15.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, Some(2));
}

#[test]
fn test_rule_b_tie_on_pressure_and_price_breaks_on_distance() {
    let store = store(vec![car_row(1, 0.6, 8.0), car_row(2, 0.6, 8.0)]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.0),
        15.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, Some(1));
}

#[test]
fn test_rule_b_requires_price_gap() {
    let store = store(vec![car_row(1, 0.5, 8.0)]);
    let advisor = RerouteAdvisor::default();

    // 10 - 8 = 2 < 3
    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.0),
        10.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, None);

    // 11 - 8 = 3 ≥ 3
    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.0),
        11.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, Some(1));
}

#[test]
fn test_low_pressure_never_reroutes() {
    let store = store(vec![car_row(1, 0.1, 5.0), car_row(2, 0.1, 5.0)]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(0.9),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, None);
}

// ==========================================
// 候选资格
// ==========================================

#[test]
fn test_candidate_without_slot_row_is_ineligible() {
    // 候选只有其他时段的数据, 不走回退
    let store = store(vec![(
        key(1, 1, slot(10, 30), VehicleType::Car),
        row(1.0, 10.0, 0.0, 0.1, 5.0),
    )]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(2.0),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, None);
}

#[test]
fn test_candidate_with_other_vehicle_row_is_eligible() {
    let store = store(vec![(
        key(1, 1, slot(10, 0), VehicleType::Truck),
        row(1.0, 10.0, 0.0, 0.1, 5.0),
    )]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(2.0),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, Some(1));
}

#[test]
fn test_candidate_row_prefers_query_vehicle_type() {
    // 小汽车行压力不低于当前, 卡车行虽低但不被采用
    let store = store(vec![
        car_row(1, 1.6, 5.0),
        (
            key(1, 1, slot(10, 0), VehicleType::Truck),
            row(1.0, 10.0, 0.0, 0.1, 5.0),
        ),
    ]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.5),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, None);
}

#[test]
fn test_candidate_row_falls_back_to_highest_vehicle_code() {
    // 无小汽车行: 取摩托车 (编号 1) 而非自行车 (编号 0)
    let store = store(vec![
        (
            key(1, 1, slot(10, 0), VehicleType::Cycle),
            row(1.0, 10.0, 0.0, 0.1, 5.0),
        ),
        (
            key(1, 1, slot(10, 0), VehicleType::Bike),
            row(1.0, 10.0, 0.0, 1.9, 5.0),
        ),
    ]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(0),
        &features_with_pressure(1.5),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, None);
}

#[test]
fn test_never_returns_own_lot() {
    let store = store(vec![
        car_row(0, 0.0, 5.0),
        car_row(1, 0.0, 5.0),
        car_row(2, 0.0, 5.0),
        car_row(3, 0.0, 5.0),
    ]);
    let advisor = RerouteAdvisor::new(RerouteThresholds {
        radius_km: 100.0,
        ..RerouteThresholds::default()
    });
    let lots = nearby_lots();

    for lot in lots.iter() {
        let result = advisor.suggest(
            &car_query(lot.lot_id),
            &features_with_pressure(3.0),
            20.0,
            &store,
            &lots,
        );
        assert!(result.is_some());
        assert_ne!(result, Some(lot.lot_id));
    }
}

#[test]
fn test_unknown_origin_yields_no_candidates() {
    let store = store(vec![car_row(1, 0.1, 5.0)]);
    let advisor = RerouteAdvisor::default();

    let result = advisor.suggest(
        &car_query(99),
        &features_with_pressure(3.0),
        20.0,
        &store,
        &nearby_lots(),
    );
    assert_eq!(result, None);
}

// ==========================================
// 距离
// ==========================================

#[test]
fn test_haversine_distances() {
    assert_eq!(haversine_km(26.14, 91.73, 26.14, 91.73), 0.0);

    let north = haversine_km(26.1400, 91.7300, 26.1535, 91.7300);
    assert!((north - 1.5011).abs() < 1e-3, "north={}", north);

    let far = haversine_km(26.1400, 91.7300, 26.1850, 91.7300);
    assert!(far > 2.0);
}
