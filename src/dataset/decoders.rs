use bytes::{Buf, Bytes};

use super::data_type::DataType;
use super::errors::DataSetError;
use super::page::ensure_remaining;

/// Pulls one non-null value of a given type off a column's value buffer.
pub trait ValueDecoder {
    /// Returns the value's raw bytes as a slice of `buf`, advancing past it.
    fn take(&self, buf: &mut Bytes, column: &str) -> Result<Bytes, DataSetError>;
}

pub struct FixedWidthDecoder {
    width: usize,
}

pub struct TextDecoder;

impl ValueDecoder for FixedWidthDecoder {
    fn take(&self, buf: &mut Bytes, column: &str) -> Result<Bytes, DataSetError> {
        ensure_remaining(buf, self.width, column)?;
        Ok(buf.split_to(self.width))
    }
}

impl ValueDecoder for TextDecoder {
    fn take(&self, buf: &mut Bytes, column: &str) -> Result<Bytes, DataSetError> {
        ensure_remaining(buf, 4, column)?;
        let len = buf.get_i32();
        let len = usize::try_from(len).map_err(|_| {
            DataSetError::MalformedPage(format!("negative text length {len} in column {column}"))
        })?;
        ensure_remaining(buf, len, column)?;
        Ok(buf.split_to(len))
    }
}

static BOOLEAN_DECODER: FixedWidthDecoder = FixedWidthDecoder { width: 1 };
static INT32_DECODER: FixedWidthDecoder = FixedWidthDecoder { width: 4 };
static INT64_DECODER: FixedWidthDecoder = FixedWidthDecoder { width: 8 };
static FLOAT_DECODER: FixedWidthDecoder = FixedWidthDecoder { width: 4 };
static DOUBLE_DECODER: FixedWidthDecoder = FixedWidthDecoder { width: 8 };
static TEXT_DECODER: TextDecoder = TextDecoder;

pub fn decoder_for(data_type: DataType) -> &'static dyn ValueDecoder {
    match data_type {
        DataType::Boolean => &BOOLEAN_DECODER,
        DataType::Int32 => &INT32_DECODER,
        DataType::Int64 => &INT64_DECODER,
        DataType::Float => &FLOAT_DECODER,
        DataType::Double => &DOUBLE_DECODER,
        DataType::Text => &TEXT_DECODER,
    }
}
