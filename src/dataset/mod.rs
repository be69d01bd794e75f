pub mod bitmap;
pub mod data_type;
pub mod decoders;
pub mod errors;
pub mod page;
pub mod result_set;
pub mod row;
pub mod schema;
pub mod value;

pub use bitmap::NullBitmap;
pub use data_type::DataType;
pub use errors::DataSetError;
pub use page::PageBuffer;
pub use result_set::{CursorState, DataSetOptions, RpcDataSet};
pub use row::MaterializedRow;
pub use schema::{ColumnRef, ColumnSchema, START_INDEX, TIMESTAMP_COLUMN};
pub use value::{RowRecord, Value};
