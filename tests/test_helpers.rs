// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时配置库、CSV 夹具
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

pub const SNAPSHOT_HEADER: &str = "SystemCodeNumber,Day,Time,VehicleType,AvgQueueLength,AvgOccupancy,AvgTrafficConditionNearby,QueuePressure,price";

/// 三个邻近停车场 + 一个约 5 km 外的停车场
pub const NEARBY_LOTS_CSV: &str = "\
LotId,SystemCodeNumber,Capacity,Latitude,Longitude
0,LOT-ORIGIN,500,26.1400,91.7300
1,LOT-EAST,400,26.1400,91.7350
2,LOT-NORTH,800,26.1535,91.7300
3,LOT-FAR,1000,26.1850,91.7300
";

/// 周二 (Day=1) 10:00 时段
///
/// - 停车场 0 小汽车: 高峰 (队列 12, 压力 1.3)
/// - 停车场 0 摩托车: 中度压力 1.0, 非高峰
/// - 停车场 1/2/3: 低压力, 可作为改道目标
pub const TUESDAY_SNAPSHOT_CSV: &str = "\
SystemCodeNumber,Day,Time,VehicleType,AvgQueueLength,AvgOccupancy,AvgTrafficConditionNearby,QueuePressure,price
0,1,10:00:00,2,12,450,2,1.3,18.0
0,1,10:00:00,1,4,300,1,1.0,15.0
1,1,10:00:00,2,3,200,1,0.4,11.0
1,1,10:00:00,1,1,80,1,0.5,5.0
2,1,10:00:00,2,2,300,0,0.2,14.0
3,1,10:00:00,2,0,100,0,0.1,6.0
";

/// 创建临时配置库路径
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时路径不是 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

/// 在目录中写入 CSV
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("写入 CSV 失败");
    path
}

/// 临时目录 + 标准夹具 (snapshot.csv, lots.csv)
pub fn fixture_dir() -> (TempDir, PathBuf, PathBuf) {
    parking_pricing::logging::init_test();

    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let snapshot = write_csv(dir.path(), "snapshot.csv", TUESDAY_SNAPSHOT_CSV);
    let lots = write_csv(dir.path(), "lots.csv", NEARBY_LOTS_CSV);
    (dir, snapshot, lots)
}
