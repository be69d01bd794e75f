use bytes::{Buf, Bytes};
use tracing::debug;

use super::errors::DataSetError;
use crate::rpc::QueryDataSet;

/// Bytes of one timestamp in the time buffer.
pub const TIME_WIDTH: usize = 8;

/// The page currently being consumed.
///
/// Every buffer is a cursor that only moves forward; decoded values are slices
/// of these buffers, never copies.
#[derive(Debug, Default)]
pub struct PageBuffer {
    time: Bytes,
    bitmaps: Vec<Bytes>,
    values: Vec<Bytes>,
    row_offset: usize,
}

impl PageBuffer {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adopts a server page whose column buffers must line up with `slot_count`.
    pub fn from_data_set(data: QueryDataSet, slot_count: usize) -> Result<Self, DataSetError> {
        if data.time.len() % TIME_WIDTH != 0 {
            return Err(DataSetError::MalformedPage(format!(
                "time buffer of {} bytes is not a multiple of {TIME_WIDTH}",
                data.time.len()
            )));
        }
        if !data.time.is_empty()
            && (data.bitmaps.len() != slot_count || data.values.len() != slot_count)
        {
            return Err(DataSetError::MalformedPage(format!(
                "expected {slot_count} columns, got {} bitmaps and {} value buffers",
                data.bitmaps.len(),
                data.values.len()
            )));
        }
        debug!(
            rows = data.row_count(),
            bytes = data.byte_len(),
            "Installing result page"
        );
        Ok(Self {
            time: data.time,
            bitmaps: data.bitmaps,
            values: data.values,
            row_offset: 0,
        })
    }

    /// True while the time buffer still holds an unread row.
    pub fn has_remaining(&self) -> bool {
        self.time.has_remaining()
    }

    pub fn remaining_rows(&self) -> usize {
        self.time.remaining() / TIME_WIDTH
    }

    /// Rows consumed so far from this page.
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    pub(crate) fn advance_row(&mut self) {
        self.row_offset += 1;
    }

    pub(crate) fn next_time(&mut self) -> Result<i64, DataSetError> {
        ensure_remaining(&self.time, TIME_WIDTH, "time")?;
        Ok(self.time.get_i64())
    }

    pub(crate) fn next_bitmap_byte(
        &mut self,
        slot: usize,
        column: &str,
    ) -> Result<u8, DataSetError> {
        let buf = &mut self.bitmaps[slot];
        if !buf.has_remaining() {
            return Err(DataSetError::Truncated {
                what: format!("null bitmap of {column}"),
                needed: 1,
                remaining: 0,
            });
        }
        Ok(buf.get_u8())
    }

    #[cfg(test)]
    pub(crate) fn bitmap_remaining(&self, slot: usize) -> usize {
        self.bitmaps[slot].remaining()
    }

    pub(crate) fn value_buffer(&mut self, slot: usize) -> &mut Bytes {
        &mut self.values[slot]
    }
}

pub(crate) fn ensure_remaining(
    buf: &Bytes,
    needed: usize,
    what: &str,
) -> Result<(), DataSetError> {
    if buf.remaining() < needed {
        return Err(DataSetError::Truncated {
            what: what.to_string(),
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}
