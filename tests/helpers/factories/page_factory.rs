use bytes::Bytes;

use crate::dataset::{DataType, NullBitmap, Value};
use crate::rpc::QueryDataSet;

/// Encodes rows into a page exactly as the server lays one out.
pub struct PageFactory {
    types: Vec<DataType>,
    rows: Vec<(i64, Vec<Option<Value>>)>,
}

impl PageFactory {
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_types(mut self, types: &[DataType]) -> Self {
        self.types = types.to_vec();
        self
    }

    pub fn with_row(mut self, time: i64, values: Vec<Option<Value>>) -> Self {
        assert_eq!(values.len(), self.types.len(), "row width must match types");
        self.rows.push((time, values));
        self
    }

    pub fn create(self) -> QueryDataSet {
        let mut time = Vec::with_capacity(self.rows.len() * 8);
        let mut bitmaps = vec![vec![0u8; bitmap_len(self.rows.len())]; self.types.len()];
        let mut values = vec![Vec::new(); self.types.len()];

        for (row, (ts, cells)) in self.rows.iter().enumerate() {
            time.extend_from_slice(&ts.to_be_bytes());
            for (slot, cell) in cells.iter().enumerate() {
                if let Some(v) = cell {
                    set_present(&mut bitmaps[slot], row);
                    encode_value(self.types[slot], v, &mut values[slot]);
                }
            }
        }

        QueryDataSet::new(
            time,
            bitmaps.into_iter().map(Bytes::from).collect(),
            values.into_iter().map(Bytes::from).collect(),
        )
    }
}

fn encode_value(data_type: DataType, value: &Value, out: &mut Vec<u8>) {
    match (data_type, value) {
        (DataType::Boolean, Value::Bool(b)) => out.push(u8::from(*b)),
        (DataType::Int32, Value::Int32(n)) => out.extend_from_slice(&n.to_be_bytes()),
        (DataType::Int64, Value::Int64(n)) => out.extend_from_slice(&n.to_be_bytes()),
        (DataType::Float, Value::Float(x)) => out.extend_from_slice(&x.to_be_bytes()),
        (DataType::Double, Value::Double(x)) => out.extend_from_slice(&x.to_be_bytes()),
        (DataType::Text, Value::Text(s)) => {
            out.extend_from_slice(&(s.len() as i32).to_be_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        (t, v) => panic!("cannot encode {v:?} into a {t} column"),
    }
}

pub(crate) fn bitmap_len(row_count: usize) -> usize {
    row_count.div_ceil(8)
}

/// Marks `row` as non-null, first row of each byte in the high bit.
pub(crate) fn set_present(bitmap: &mut [u8], row: usize) {
    bitmap[row / 8] |= NullBitmap::FLAG >> (row % 8);
}
