use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::data_type::DataType;
use super::errors::DataSetError;
use super::schema::TIMESTAMP_COLUMN;

/// An owned value copied out of the current row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Text(String),
    /// Epoch milliseconds of the Time column.
    Timestamp(i64),
}

impl Value {
    /// Decodes the raw big-endian bytes of a non-null column value.
    pub fn decode(data_type: DataType, raw: &[u8], column: &str) -> Result<Self, DataSetError> {
        Ok(match data_type {
            DataType::Boolean => Value::Bool(read_bool(raw, column)?),
            DataType::Int32 => Value::Int32(read_i32(raw, column)?),
            DataType::Int64 => Value::Int64(read_i64(raw, column)?),
            DataType::Float => Value::Float(read_f32(raw, column)?),
            DataType::Double => Value::Double(read_f64(raw, column)?),
            DataType::Text => Value::Text(read_str(raw, column)?.to_string()),
        })
    }

    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Bool(_) => Some(DataType::Boolean),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float(_) => Some(DataType::Float),
            Value::Double(_) => Some(DataType::Double),
            Value::Text(_) => Some(DataType::Text),
            Value::Timestamp(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int32(n) => write!(f, "{n}"),
            Value::Int64(n) | Value::Timestamp(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Double(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn fixed<const N: usize>(raw: &[u8], column: &str) -> Result<[u8; N], DataSetError> {
    raw.try_into().map_err(|_| DataSetError::Truncated {
        what: column.to_string(),
        needed: N,
        remaining: raw.len(),
    })
}

pub(crate) fn read_bool(raw: &[u8], column: &str) -> Result<bool, DataSetError> {
    Ok(fixed::<1>(raw, column)?[0] != 0)
}

pub(crate) fn read_i32(raw: &[u8], column: &str) -> Result<i32, DataSetError> {
    Ok(i32::from_be_bytes(fixed(raw, column)?))
}

pub(crate) fn read_i64(raw: &[u8], column: &str) -> Result<i64, DataSetError> {
    Ok(i64::from_be_bytes(fixed(raw, column)?))
}

pub(crate) fn read_f32(raw: &[u8], column: &str) -> Result<f32, DataSetError> {
    Ok(f32::from_be_bytes(fixed(raw, column)?))
}

pub(crate) fn read_f64(raw: &[u8], column: &str) -> Result<f64, DataSetError> {
    Ok(f64::from_be_bytes(fixed(raw, column)?))
}

pub(crate) fn read_str<'a>(raw: &'a [u8], column: &str) -> Result<&'a str, DataSetError> {
    std::str::from_utf8(raw).map_err(|_| DataSetError::InvalidUtf8 {
        column: column.to_string(),
    })
}

/// A detached copy of one row, safe to keep across advances.
///
/// Fields follow storage slot order, one per distinct column name.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub timestamp: Option<i64>,
    pub fields: Vec<(String, Option<Value>)>,
}

impl RowRecord {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.fields.len() + usize::from(self.timestamp.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(ts) = self.timestamp {
            map.serialize_entry(TIMESTAMP_COLUMN, &ts)?;
        }
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
