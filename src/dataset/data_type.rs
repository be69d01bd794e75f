use std::fmt;
use std::str::FromStr;

use super::errors::DataSetError;

/// Column data types a result page can carry.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean = 0,
    Int32 = 1,
    Int64 = 2,
    Float = 3,
    Double = 4,
    Text = 5,
}

impl DataType {
    /// Bytes one value occupies in a value buffer; `None` for length-prefixed text.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            DataType::Boolean => Some(1),
            DataType::Int32 => Some(4),
            DataType::Int64 => Some(8),
            DataType::Float => Some(4),
            DataType::Double => Some(8),
            DataType::Text => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Text => "TEXT",
        }
    }
}

impl FromStr for DataType {
    type Err = DataSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOLEAN" => Ok(DataType::Boolean),
            "INT32" => Ok(DataType::Int32),
            "INT64" => Ok(DataType::Int64),
            "FLOAT" => Ok(DataType::Float),
            "DOUBLE" => Ok(DataType::Double),
            "TEXT" => Ok(DataType::Text),
            _ => Err(DataSetError::UnsupportedType(s.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
