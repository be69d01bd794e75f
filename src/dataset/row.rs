use bytes::Bytes;

use super::bitmap::NullBitmap;
use super::decoders::decoder_for;
use super::errors::DataSetError;
use super::page::PageBuffer;
use super::schema::ColumnSchema;

/// The one decoded row a result set exposes between two advances.
///
/// Slots hold slices of the page buffers. They are overwritten in place by the
/// next [`MaterializedRow::materialize`], so borrowed values never outlive it.
#[derive(Debug)]
pub struct MaterializedRow {
    time: i64,
    values: Vec<Option<Bytes>>,
    bitmaps: Vec<u8>,
    present: bool,
}

impl MaterializedRow {
    pub fn new(slot_count: usize) -> Self {
        Self {
            time: 0,
            values: vec![None; slot_count],
            bitmaps: vec![0; slot_count],
            present: false,
        }
    }

    /// Decodes the next row of `page` into this row.
    ///
    /// Bitmap bytes are pulled for every slot at the same row, once per 8-row block.
    /// A null slot consumes nothing from its value buffer.
    pub fn materialize(
        &mut self,
        page: &mut PageBuffer,
        schema: &ColumnSchema,
    ) -> Result<(), DataSetError> {
        self.present = false;
        let offset = page.row_offset();
        self.time = page.next_time()?;

        for slot in 0..schema.slot_count() {
            let column = schema.slot_name(slot);
            if NullBitmap::needs_refresh(offset) {
                self.bitmaps[slot] = page.next_bitmap_byte(slot, column)?;
            }
            if NullBitmap::is_null(self.bitmaps[slot], offset) {
                self.values[slot] = None;
                continue;
            }
            let decoder = decoder_for(schema.slot_type(slot));
            self.values[slot] = Some(decoder.take(page.value_buffer(slot), column)?);
        }

        page.advance_row();
        self.present = true;
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.present = false;
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn value(&self, slot: usize) -> Option<&Bytes> {
        self.values.get(slot).and_then(Option::as_ref)
    }

    pub fn is_null(&self, slot: usize) -> bool {
        self.value(slot).is_none()
    }
}
