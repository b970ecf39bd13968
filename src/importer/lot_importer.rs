// ==========================================
// 动态停车定价系统 - 停车场元数据导入器
// ==========================================
// 列: LotId, SystemCodeNumber, Capacity, Latitude, Longitude
// ==========================================

use crate::domain::lot::LotMetadata;
use crate::domain::types::LotId;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, RawRecord};
use crate::repository::LotCatalog;
use std::io::Read;
use std::path::Path;
use tracing::info;

// ===== 列名 =====
pub mod columns {
    pub const LOT_ID: &str = "LotId";
    pub const DISPLAY_NAME: &str = "SystemCodeNumber";
    pub const CAPACITY: &str = "Capacity";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
}

pub struct LotImporter {
    parser: CsvParser,
    mapper: FieldMapper,
}

impl LotImporter {
    pub fn new() -> Self {
        Self {
            parser: CsvParser,
            mapper: FieldMapper,
        }
    }

    /// 从 CSV 文件导入停车场目录
    pub fn import_file(&self, path: &Path) -> ImportResult<LotCatalog> {
        let records = self.parser.parse_file(path)?;
        let catalog = self.build(&records)?;
        info!(path = %path.display(), lots = catalog.len(), "停车场元数据导入完成");
        Ok(catalog)
    }

    /// 从读取器导入停车场目录
    pub fn import_reader<R: Read>(&self, source: R) -> ImportResult<LotCatalog> {
        let records = self.parser.parse_reader(source)?;
        self.build(&records)
    }

    fn build(&self, records: &[RawRecord]) -> ImportResult<LotCatalog> {
        let lots = records
            .iter()
            .map(|record| self.map_record(record))
            .collect::<ImportResult<Vec<_>>>()?;
        Ok(LotCatalog::from_lots(lots)?)
    }

    fn map_record(&self, record: &RawRecord) -> ImportResult<LotMetadata> {
        let m = &self.mapper;

        // 容量 0 交给 LotCatalog 统一拒绝
        Ok(LotMetadata {
            lot_id: m.require_int_in(record, columns::LOT_ID, 0, i64::from(LotId::MAX))? as LotId,
            display_name: m.require_str(record, columns::DISPLAY_NAME)?.to_string(),
            capacity: m.require_int_in(record, columns::CAPACITY, 0, i64::from(u32::MAX))? as u32,
            latitude: m.require_f64_in(record, columns::LATITUDE, -90.0, 90.0)?,
            longitude: m.require_f64_in(record, columns::LONGITUDE, -180.0, 180.0)?,
        })
    }
}

impl Default for LotImporter {
    fn default() -> Self {
        Self::new()
    }
}
