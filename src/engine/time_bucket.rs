// ==========================================
// 动态停车定价系统 - 时段分桶
// ==========================================
// 职责: 时间戳 → (周几, 30 分钟时段)
// 规则:
// 1) 分钟四舍五入到 {00, 30}: 0-14 → :00, 15-44 → :30, 45-59 → 下一小时 :00
// 2) 夹紧到 [08:00, 16:30]
// 3) 周几取原始时间戳 (0=周一)
// ==========================================

use crate::domain::types::DayOfWeek;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Timelike};

/// 时段长度 (分钟)
pub const SLOT_MINUTES: u32 = 30;

/// 首个时段 08:00 (自零点起分钟数)
pub const FIRST_SLOT_MINUTE: u32 = 8 * 60;

/// 末个时段 16:30 (自零点起分钟数)
pub const LAST_SLOT_MINUTE: u32 = 16 * 60 + 30;

/// 可接受的无时区时间戳格式
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// 时间戳所在时段 (秒被忽略)
pub fn bucket_slot_time(timestamp: &NaiveDateTime) -> NaiveTime {
    snap_time_of_day(timestamp.time())
}

/// 时间戳所在周几 (0=周一 .. 6=周日)
pub fn day_of_week(timestamp: &NaiveDateTime) -> DayOfWeek {
    DayOfWeek::from_weekday(timestamp.weekday())
}

/// 将一天中的时刻吸附到 30 分钟网格并夹紧到营业时段
///
/// 幂等: 已在网格上且位于 [08:00, 16:30] 的时刻原样返回
pub fn snap_time_of_day(time: NaiveTime) -> NaiveTime {
    let minute_of_day = time.hour() * 60 + time.minute();
    let rounded = (minute_of_day + SLOT_MINUTES / 2) / SLOT_MINUTES * SLOT_MINUTES;
    let clamped = rounded.clamp(FIRST_SLOT_MINUTE, LAST_SLOT_MINUTE);

    // clamped ∈ [480, 990], 必为合法时刻
    NaiveTime::from_hms_opt(clamped / 60, clamped % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// 解析 ISO-8601 时间戳
///
/// 支持:
/// - 无时区: `2025-07-07T10:00:00`, `2025-07-07T10:00`, 空格分隔, 可带小数秒
/// - RFC 3339 带偏移: 取该偏移下的本地墙钟时间
pub fn parse_timestamp(raw: &str) -> EngineResult<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(EngineError::MalformedTimestamp("时间戳为空".to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| EngineError::MalformedTimestamp(value.to_string()))
}
