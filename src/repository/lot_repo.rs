// ==========================================
// 动态停车定价系统 - 停车场元数据仓储
// ==========================================
// 职责: 停车场编号 → 容量/坐标/展示名
// 红线: 容量必须 > 0 (利用率计算不做除零兜底)
// ==========================================

use crate::domain::lot::LotMetadata;
use crate::domain::types::LotId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::BTreeMap;

// ==========================================
// LotCatalog - 停车场目录 (只读)
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct LotCatalog {
    lots: BTreeMap<LotId, LotMetadata>,
}

impl LotCatalog {
    /// 由元数据列表构建并校验
    pub fn from_lots<I>(lots: I) -> RepositoryResult<Self>
    where
        I: IntoIterator<Item = LotMetadata>,
    {
        let mut map = BTreeMap::new();

        for lot in lots {
            if lot.capacity == 0 {
                return Err(RepositoryError::InvalidCapacity {
                    lot_id: lot.lot_id,
                    capacity: lot.capacity,
                });
            }
            if !lot.latitude.is_finite()
                || !lot.longitude.is_finite()
                || lot.latitude.abs() > 90.0
                || lot.longitude.abs() > 180.0
            {
                return Err(RepositoryError::InvalidCoordinates {
                    lot_id: lot.lot_id,
                    latitude: lot.latitude,
                    longitude: lot.longitude,
                });
            }
            let lot_id = lot.lot_id;
            if map.insert(lot_id, lot).is_some() {
                return Err(RepositoryError::DuplicateLot { lot_id });
            }
        }

        if map.is_empty() {
            return Err(RepositoryError::EmptyLotCatalog);
        }

        Ok(Self { lots: map })
    }

    /// 内置停车场目录 (14 个停车场, 编号 0..13)
    pub fn builtin() -> Self {
        let lots = [
            (0, "BHMBCCMKT01", 577, 26.14453614, 91.73617216),
            (1, "BHMBCCTHL01", 387, 26.14449459, 91.73620513),
            (2, "BHMEURBRD01", 470, 26.14901995, 91.7395035),
            (3, "BHMMBMMBX01", 687, 20.0000347, 78.00000286),
            (4, "BHMNCPHST01", 1200, 26.14001386, 91.73099967),
            (5, "BHMNCPNST01", 485, 26.14004753, 91.73097233),
            (6, "Broad Street", 690, 26.13795775, 91.74099445),
            (7, "Others-CCCPS105a", 2009, 26.14747299, 91.72804914),
            (8, "Others-CCCPS119a", 2803, 26.14754061, 91.72797041),
            (9, "Others-CCCPS135a", 3883, 26.14749943, 91.72800489),
            (10, "Others-CCCPS202", 2937, 26.14749053, 91.72799688),
            (11, "Others-CCCPS8", 1322, 26.14754886, 91.72799519),
            (12, "Others-CCCPS98", 3103, 26.14749998, 91.72797778),
            (13, "Shopping", 1920, 26.15050395, 91.73353109),
        ];

        Self {
            lots: lots
                .into_iter()
                .map(|(id, name, capacity, lat, lon)| {
                    (id, LotMetadata::new(id, name, capacity, lat, lon))
                })
                .collect(),
        }
    }

    // ==========================================
    // 查询方法
    // ==========================================

    pub fn get(&self, lot_id: LotId) -> Option<&LotMetadata> {
        self.lots.get(&lot_id)
    }

    pub fn contains(&self, lot_id: LotId) -> bool {
        self.lots.contains_key(&lot_id)
    }

    /// 展示名; 未知编号返回 None
    pub fn display_name(&self, lot_id: LotId) -> Option<&str> {
        self.lots.get(&lot_id).map(|lot| lot.display_name.as_str())
    }

    /// 按编号升序遍历
    pub fn iter(&self) -> impl Iterator<Item = &LotMetadata> {
        self.lots.values()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}
