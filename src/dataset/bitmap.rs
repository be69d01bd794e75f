/// Row-presence bitmap helpers for result pages.
///
/// One byte covers eight consecutive rows, first row in the high bit. A set bit
/// means the row has a value; a clear bit means null.
pub struct NullBitmap;

impl NullBitmap {
    pub const FLAG: u8 = 0x80;

    /// A new bitmap byte is due at the start of every 8-row block.
    #[inline]
    pub fn needs_refresh(row: usize) -> bool {
        row % 8 == 0
    }

    #[inline]
    pub fn is_null(byte: u8, row: usize) -> bool {
        (Self::FLAG >> (row % 8)) & byte == 0
    }
}
