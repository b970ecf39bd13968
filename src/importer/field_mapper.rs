// ==========================================
// 动态停车定价系统 - 字段映射器
// ==========================================
// 职责: 原始字符串字段 → 强类型值 + 范围校验
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use chrono::NaiveTime;

pub struct FieldMapper;

impl FieldMapper {
    /// 必填字符串
    pub fn require_str<'a>(&self, record: &'a RawRecord, field: &str) -> ImportResult<&'a str> {
        record.get(field).ok_or_else(|| ImportError::MissingField {
            row: record.row_number,
            field: field.to_string(),
        })
    }

    /// 必填浮点数 (须为有限值)
    pub fn require_f64(&self, record: &RawRecord, field: &str) -> ImportResult<f64> {
        let raw = self.require_str(record, field)?;
        let value = raw
            .parse::<f64>()
            .map_err(|_| ImportError::TypeConversionError {
                row: record.row_number,
                field: field.to_string(),
                message: format!("无法解析为浮点数: {}", raw),
            })?;

        if !value.is_finite() {
            return Err(ImportError::TypeConversionError {
                row: record.row_number,
                field: field.to_string(),
                message: format!("非有限数值: {}", raw),
            });
        }
        Ok(value)
    }

    /// 必填浮点数, 带闭区间校验
    pub fn require_f64_in(
        &self,
        record: &RawRecord,
        field: &str,
        min: f64,
        max: f64,
    ) -> ImportResult<f64> {
        let value = self.require_f64(record, field)?;
        if value < min || value > max {
            return Err(ImportError::ValueRangeError {
                row: record.row_number,
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    /// 必填整数, 带闭区间校验
    ///
    /// 兼容 "3.0" 形式的整数值
    pub fn require_int_in(
        &self,
        record: &RawRecord,
        field: &str,
        min: i64,
        max: i64,
    ) -> ImportResult<i64> {
        let raw = self.require_str(record, field)?;
        let value = match raw.parse::<i64>() {
            Ok(v) => v,
            Err(_) => match raw.parse::<f64>() {
                Ok(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
                _ => {
                    return Err(ImportError::TypeConversionError {
                        row: record.row_number,
                        field: field.to_string(),
                        message: format!("无法解析为整数: {}", raw),
                    })
                }
            },
        };

        if value < min || value > max {
            return Err(ImportError::ValueRangeError {
                row: record.row_number,
                field: field.to_string(),
                value: value as f64,
                min: min as f64,
                max: max as f64,
            });
        }
        Ok(value)
    }

    /// 必填时刻 (HH:MM:SS 或 HH:MM)
    pub fn require_time(&self, record: &RawRecord, field: &str) -> ImportResult<NaiveTime> {
        let raw = self.require_str(record, field)?;
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .map_err(|_| ImportError::TimeFormatError {
                row: record.row_number,
                field: field.to_string(),
                value: raw.to_string(),
            })
    }
}
