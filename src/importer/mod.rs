// ==========================================
// 动态停车定价系统 - 导入层
// ==========================================
// 职责: 外部表格数据 → 只读快照/元数据
// 支持: CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod lot_importer;
pub mod snapshot_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, RawRecord};
pub use lot_importer::LotImporter;
pub use snapshot_importer::SnapshotImporter;
