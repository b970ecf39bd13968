// ==========================================
// 动态停车定价系统 - 领域类型定义
// ==========================================
// 职责: 车型、周几、交通等级等基础枚举
// 红线: 周几统一为 0=周一 .. 6=周日 (与快照 Day 列一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 停车场编号 (0..lot_count)
pub type LotId = u32;

// ==========================================
// 车型 (Vehicle Type)
// ==========================================
// 编码与快照 VehicleType 列一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Cycle, // 0 自行车
    Bike,  // 1 摩托车
    Car,   // 2 小汽车
    Truck, // 3 货车
}

impl VehicleType {
    /// 全部车型 (按编码升序)
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Cycle,
        VehicleType::Bike,
        VehicleType::Car,
        VehicleType::Truck,
    ];

    /// 数值编码
    pub fn code(self) -> u8 {
        match self {
            VehicleType::Cycle => 0,
            VehicleType::Bike => 1,
            VehicleType::Car => 2,
            VehicleType::Truck => 3,
        }
    }

    /// 从数值编码解析，超出 0..=3 返回 None
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(VehicleType::Cycle),
            1 => Some(VehicleType::Bike),
            2 => Some(VehicleType::Car),
            3 => Some(VehicleType::Truck),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleType::Cycle => write!(f, "cycle"),
            VehicleType::Bike => write!(f, "bike"),
            VehicleType::Car => write!(f, "car"),
            VehicleType::Truck => write!(f, "truck"),
        }
    }
}

// ==========================================
// 周边交通等级 (Traffic Level)
// ==========================================
// 0 → Low, 1 → Moderate, 2 → High, 其他 → Moderate (兜底)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficLevel {
    Low,
    Moderate,
    High,
}

impl TrafficLevel {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => TrafficLevel::Low,
            1 => TrafficLevel::Moderate,
            2 => TrafficLevel::High,
            _ => TrafficLevel::Moderate,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficLevel::Low => "Low",
            TrafficLevel::Moderate => "Moderate",
            TrafficLevel::High => "High",
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 周几 (Day of Week)
// ==========================================
// 0=周一 .. 6=周日
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const SATURDAY: DayOfWeek = DayOfWeek(5);
    pub const SUNDAY: DayOfWeek = DayOfWeek(6);

    /// 从 0..=6 构造，越界返回 None
    pub fn new(day: u8) -> Option<Self> {
        if day <= 6 {
            Some(DayOfWeek(day))
        } else {
            None
        }
    }

    /// 从 chrono 周几转换 (ISO: 周一为一周第一天)
    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        DayOfWeek(weekday.num_days_from_monday() as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// 周六/周日
    pub fn is_weekend(self) -> bool {
        self == Self::SATURDAY || self == Self::SUNDAY
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_vehicle_type_code_roundtrip() {
        for vt in VehicleType::ALL {
            assert_eq!(VehicleType::from_code(vt.code() as i64), Some(vt));
        }
        assert_eq!(VehicleType::from_code(4), None);
        assert_eq!(VehicleType::from_code(-1), None);
    }

    #[test]
    fn test_traffic_level_defaults_to_moderate() {
        assert_eq!(TrafficLevel::from_code(0), TrafficLevel::Low);
        assert_eq!(TrafficLevel::from_code(1), TrafficLevel::Moderate);
        assert_eq!(TrafficLevel::from_code(2), TrafficLevel::High);
        assert_eq!(TrafficLevel::from_code(3), TrafficLevel::Moderate);
        assert_eq!(TrafficLevel::from_code(-7), TrafficLevel::Moderate);
    }

    #[test]
    fn test_day_of_week_monday_first() {
        assert_eq!(DayOfWeek::from_weekday(Weekday::Mon).index(), 0);
        assert_eq!(DayOfWeek::from_weekday(Weekday::Sun).index(), 6);
        assert!(DayOfWeek::from_weekday(Weekday::Sat).is_weekend());
        assert!(!DayOfWeek::from_weekday(Weekday::Fri).is_weekend());
        assert!(DayOfWeek::new(7).is_none());
    }
}
