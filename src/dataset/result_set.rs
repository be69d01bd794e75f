use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::data_type::DataType;
use super::errors::DataSetError;
use super::page::PageBuffer;
use super::row::MaterializedRow;
use super::schema::{ColumnRef, ColumnSchema};
use super::value::{self, RowRecord, Value};
use crate::rpc::{CloseOperationRequest, FetchResultsRequest, QueryDataSet, RpcClient};
use crate::shared::config::ClientConfig;
use crate::shared::time::TimeConverter;

/// Identifiers and knobs a result set is built with.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetOptions {
    pub statement: String,
    pub session_id: i64,
    pub query_id: i64,
    pub fetch_size: i32,
    pub include_timestamp: bool,
}

impl DataSetOptions {
    pub fn new(statement: impl Into<String>, session_id: i64, query_id: i64) -> Self {
        let defaults = ClientConfig::default();
        Self {
            statement: statement.into(),
            session_id,
            query_id,
            fetch_size: defaults.fetch_size,
            include_timestamp: defaults.include_timestamp,
        }
    }

    pub fn from_config(
        cfg: &ClientConfig,
        statement: impl Into<String>,
        session_id: i64,
        query_id: i64,
    ) -> Self {
        Self {
            fetch_size: cfg.fetch_size,
            include_timestamp: cfg.include_timestamp,
            ..Self::new(statement, session_id, query_id)
        }
    }

    pub fn with_fetch_size(mut self, fetch_size: i32) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    pub fn with_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// The current page is drained (or absent); the next advance asks the server.
    NeedsFetch,
    /// A row is materialized and readable.
    HasCachedRow,
    /// The server reported no more data. Never fetches again.
    Empty,
    /// A page failed to decode; the cursor is out of step with the wire and stops.
    Failed,
    Closed,
}

/// Row cursor over a server-side query result delivered in pages.
///
/// Each successful [`advance`](Self::advance) materializes one row; getters read
/// that row until the next advance. Borrowing getters tie their result to `&self`,
/// so the borrow checker rejects holding one across an advance. Use
/// [`current_row`](Self::current_row) to keep a copy.
///
/// Not meant to be shared between threads without outside synchronization.
pub struct RpcDataSet {
    options: DataSetOptions,
    schema: ColumnSchema,
    client: Option<Arc<dyn RpcClient>>,
    page: PageBuffer,
    row: MaterializedRow,
    state: CursorState,
    /// Set once the server reports no more data; later pages never clear it.
    exhausted: bool,
    failure: Option<String>,
}

impl RpcDataSet {
    pub fn new(
        options: DataSetOptions,
        schema: ColumnSchema,
        client: Arc<dyn RpcClient>,
        initial_page: Option<QueryDataSet>,
    ) -> Result<Self, DataSetError> {
        let page = match initial_page {
            Some(data) => PageBuffer::from_data_set(data, schema.slot_count())?,
            None => PageBuffer::empty(),
        };
        let row = MaterializedRow::new(schema.slot_count());
        Ok(Self {
            options,
            schema,
            client: Some(client),
            page,
            row,
            state: CursorState::NeedsFetch,
            exhausted: false,
            failure: None,
        })
    }

    /// Resolves the schema from the server's raw column description, then builds.
    pub fn from_raw(
        options: DataSetOptions,
        raw_names: &[String],
        raw_types: &[String],
        dedup_index: Option<&HashMap<String, usize>>,
        client: Arc<dyn RpcClient>,
        initial_page: Option<QueryDataSet>,
    ) -> Result<Self, DataSetError> {
        let schema = ColumnSchema::resolve(
            raw_names,
            raw_types,
            dedup_index,
            options.include_timestamp,
        )?;
        Self::new(options, schema, client, initial_page)
    }

    /// Moves to the next row, fetching pages as needed. `Ok(false)` means no more rows.
    pub fn advance(&mut self) -> Result<bool, DataSetError> {
        self.ensure_usable()?;
        loop {
            if self.page.has_remaining() {
                if let Err(e) = self.row.materialize(&mut self.page, &self.schema) {
                    self.fail(&e);
                    return Err(e);
                }
                self.state = CursorState::HasCachedRow;
                return Ok(true);
            }
            self.row.invalidate();
            if self.exhausted {
                self.state = CursorState::Empty;
                return Ok(false);
            }
            self.state = CursorState::NeedsFetch;
            if !self.fetch_results()? {
                return Ok(false);
            }
        }
    }

    /// Abandons the half-read page after a decode error.
    fn fail(&mut self, e: &DataSetError) {
        e.log_error();
        self.page = PageBuffer::empty();
        self.row.invalidate();
        self.state = CursorState::Failed;
        self.failure = Some(e.to_string());
    }

    fn fetch_results(&mut self) -> Result<bool, DataSetError> {
        let client = Arc::clone(self.client.as_ref().ok_or(DataSetError::Closed)?);
        let req = FetchResultsRequest {
            session_id: self.options.session_id,
            statement: self.options.statement.clone(),
            fetch_size: self.options.fetch_size,
            query_id: self.options.query_id,
            is_align: true,
        };
        debug!(
            session_id = req.session_id,
            query_id = req.query_id,
            fetch_size = req.fetch_size,
            "Fetching next result page"
        );

        let resp = client
            .fetch_results(&req)
            .map_err(|source| DataSetError::Connection {
                context: "Cannot fetch result from server, because of network connection",
                source,
            })?;
        resp.status.verify_success()?;

        if !resp.has_result_set {
            debug!(query_id = req.query_id, "Server reported no more data");
            self.exhausted = true;
            self.state = CursorState::Empty;
            return Ok(false);
        }
        let data = resp.query_data_set.ok_or_else(|| {
            DataSetError::MalformedPage("response flagged a result set but carried no data".into())
        })?;
        self.page = PageBuffer::from_data_set(data, self.schema.slot_count())?;
        Ok(true)
    }

    /// Replaces the current page; its rows are served before any further fetch.
    pub fn set_page(&mut self, data: QueryDataSet) -> Result<(), DataSetError> {
        self.ensure_usable()?;
        self.page = PageBuffer::from_data_set(data, self.schema.slot_count())?;
        self.row.invalidate();
        if self.state == CursorState::HasCachedRow {
            self.state = CursorState::NeedsFetch;
        }
        Ok(())
    }

    /// Releases the server-side operation. A second call does nothing.
    ///
    /// The result set is closed and its client dropped even when the close request
    /// fails; the failure is still returned.
    pub fn close(&mut self) -> Result<(), DataSetError> {
        if self.state == CursorState::Closed {
            return Ok(());
        }
        let client = self.client.take();
        self.state = CursorState::Closed;
        self.row.invalidate();
        self.page = PageBuffer::empty();

        if let Some(client) = client {
            let req = CloseOperationRequest {
                session_id: self.options.session_id,
                query_id: self.options.query_id,
            };
            let status = client
                .close_operation(&req)
                .map_err(|source| DataSetError::Connection {
                    context: "Error occurs when connecting to server for close operation",
                    source,
                })?;
            status.verify_success()?;
            info!(
                session_id = req.session_id,
                query_id = req.query_id,
                "Closed result set"
            );
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DataSetError> {
        if self.state == CursorState::Closed {
            return Err(DataSetError::Closed);
        }
        Ok(())
    }

    fn ensure_usable(&self) -> Result<(), DataSetError> {
        self.ensure_open()?;
        match &self.failure {
            Some(reason) => Err(DataSetError::Failed(reason.clone())),
            None => Ok(()),
        }
    }

    fn current(&self) -> Result<&MaterializedRow, DataSetError> {
        self.ensure_open()?;
        if !self.row.is_present() {
            return Err(DataSetError::NoCurrentRow);
        }
        Ok(&self.row)
    }

    /// Display name behind a 1-based index, once a row is readable.
    fn name_at(&self, index: usize) -> Result<&str, DataSetError> {
        self.current()?;
        self.schema.name_at(index)
    }

    /// Raw bytes of a non-null data column, checked against the requested type.
    fn raw(&self, column: &str, expected: DataType) -> Result<&Bytes, DataSetError> {
        let row = self.current()?;
        let slot = match self.schema.resolve_name(column)? {
            ColumnRef::Time => {
                return Err(DataSetError::TypeMismatch {
                    column: column.to_string(),
                    expected: expected.as_str(),
                    actual: DataType::Int64,
                });
            }
            ColumnRef::Slot(slot) => slot,
        };
        let actual = self.schema.slot_type(slot);
        if actual != expected {
            return Err(DataSetError::TypeMismatch {
                column: column.to_string(),
                expected: expected.as_str(),
                actual,
            });
        }
        row.value(slot)
            .ok_or_else(|| DataSetError::NullValue(column.to_string()))
    }

    pub fn get_boolean(&self, column: &str) -> Result<bool, DataSetError> {
        value::read_bool(self.raw(column, DataType::Boolean)?, column)
    }

    pub fn get_boolean_at(&self, index: usize) -> Result<bool, DataSetError> {
        self.get_boolean(self.name_at(index)?)
    }

    pub fn get_int(&self, column: &str) -> Result<i32, DataSetError> {
        value::read_i32(self.raw(column, DataType::Int32)?, column)
    }

    pub fn get_int_at(&self, index: usize) -> Result<i32, DataSetError> {
        self.get_int(self.name_at(index)?)
    }

    /// Reads an INT64 column, or the row's timestamp for Time.
    pub fn get_long(&self, column: &str) -> Result<i64, DataSetError> {
        let row = self.current()?;
        if self.schema.resolve_name(column)? == ColumnRef::Time {
            return Ok(row.time());
        }
        value::read_i64(self.raw(column, DataType::Int64)?, column)
    }

    pub fn get_long_at(&self, index: usize) -> Result<i64, DataSetError> {
        self.get_long(self.name_at(index)?)
    }

    pub fn get_float(&self, column: &str) -> Result<f32, DataSetError> {
        value::read_f32(self.raw(column, DataType::Float)?, column)
    }

    pub fn get_float_at(&self, index: usize) -> Result<f32, DataSetError> {
        self.get_float(self.name_at(index)?)
    }

    pub fn get_double(&self, column: &str) -> Result<f64, DataSetError> {
        value::read_f64(self.raw(column, DataType::Double)?, column)
    }

    pub fn get_double_at(&self, index: usize) -> Result<f64, DataSetError> {
        self.get_double(self.name_at(index)?)
    }

    /// Borrows a TEXT value straight out of the page buffer.
    pub fn get_str(&self, column: &str) -> Result<&str, DataSetError> {
        value::read_str(self.raw(column, DataType::Text)?, column)
    }

    pub fn get_str_at(&self, index: usize) -> Result<&str, DataSetError> {
        self.get_str(self.name_at(index)?)
    }

    /// Any column rendered as text: decimal numbers, `true`/`false`, raw text.
    pub fn get_string(&self, column: &str) -> Result<String, DataSetError> {
        Ok(self.get_object(column)?.to_string())
    }

    pub fn get_string_at(&self, index: usize) -> Result<String, DataSetError> {
        self.get_string(self.name_at(index)?)
    }

    /// Any column as an owned [`Value`] of its stored type.
    pub fn get_object(&self, column: &str) -> Result<Value, DataSetError> {
        let row = self.current()?;
        match self.schema.resolve_name(column)? {
            ColumnRef::Time => Ok(Value::Timestamp(row.time())),
            ColumnRef::Slot(slot) => {
                let data_type = self.schema.slot_type(slot);
                let raw = row
                    .value(slot)
                    .ok_or_else(|| DataSetError::NullValue(column.to_string()))?;
                Value::decode(data_type, raw, column)
            }
        }
    }

    pub fn get_object_at(&self, index: usize) -> Result<Value, DataSetError> {
        self.get_object(self.name_at(index)?)
    }

    /// Time, or an INT64 column holding epoch milliseconds, as a UTC instant.
    pub fn get_timestamp(&self, column: &str) -> Result<DateTime<Utc>, DataSetError> {
        let millis = self.get_long(column)?;
        TimeConverter::millis_to_datetime(millis).ok_or(DataSetError::TimestampOutOfRange(millis))
    }

    pub fn get_timestamp_at(&self, index: usize) -> Result<DateTime<Utc>, DataSetError> {
        self.get_timestamp(self.name_at(index)?)
    }

    /// Raw big-endian bytes of a non-null column, whatever its type.
    pub fn get_bytes(&self, column: &str) -> Result<&[u8], DataSetError> {
        let row = self.current()?;
        match self.schema.resolve_name(column)? {
            ColumnRef::Time => Err(DataSetError::TypeMismatch {
                column: column.to_string(),
                expected: "bytes",
                actual: DataType::Int64,
            }),
            ColumnRef::Slot(slot) => row
                .value(slot)
                .map(|b| &b[..])
                .ok_or_else(|| DataSetError::NullValue(column.to_string())),
        }
    }

    pub fn is_null(&self, column: &str) -> Result<bool, DataSetError> {
        let row = self.current()?;
        Ok(match self.schema.resolve_name(column)? {
            ColumnRef::Time => false,
            ColumnRef::Slot(slot) => row.is_null(slot),
        })
    }

    pub fn is_null_at(&self, index: usize) -> Result<bool, DataSetError> {
        self.is_null(self.name_at(index)?)
    }

    /// Owned copy of the current row, valid after later advances.
    pub fn current_row(&self) -> Result<RowRecord, DataSetError> {
        let row = self.current()?;
        let timestamp = self.schema.include_timestamp().then(|| row.time());
        let fields = (0..self.schema.slot_count())
            .map(|slot| -> Result<(String, Option<Value>), DataSetError> {
                let name = self.schema.slot_name(slot);
                let value = row
                    .value(slot)
                    .map(|raw| Value::decode(self.schema.slot_type(slot), raw, name))
                    .transpose()?;
                Ok((name.to_string(), value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RowRecord { timestamp, fields })
    }

    /// 1-based ordinal of a column name.
    pub fn find_column(&self, column: &str) -> Result<usize, DataSetError> {
        self.schema
            .ordinal(column)
            .ok_or_else(|| DataSetError::UnknownColumn(column.to_string()))
    }

    pub fn column_name(&self, index: usize) -> Result<&str, DataSetError> {
        self.schema.name_at(index)
    }

    pub fn column_names(&self) -> &[String] {
        self.schema.column_names()
    }

    pub fn column_types(&self) -> &[DataType] {
        self.schema.column_types()
    }

    pub fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == CursorState::Closed
    }

    /// True once the server has reported that no more data follows.
    pub fn is_empty_result(&self) -> bool {
        self.exhausted
    }

    pub fn session_id(&self) -> i64 {
        self.options.session_id
    }

    pub fn query_id(&self) -> i64 {
        self.options.query_id
    }

    pub fn statement(&self) -> &str {
        &self.options.statement
    }

    pub fn fetch_size(&self) -> i32 {
        self.options.fetch_size
    }
}

impl fmt::Debug for RpcDataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcDataSet")
            .field("options", &self.options)
            .field("schema", &self.schema)
            .field("state", &self.state)
            .field("page_rows_left", &self.page.remaining_rows())
            .finish()
    }
}

impl Drop for RpcDataSet {
    fn drop(&mut self) {
        if self.state == CursorState::Closed {
            return;
        }
        if let Err(e) = self.close() {
            warn!(
                query_id = self.options.query_id,
                "Closing result set on drop failed: {}", e
            );
        }
    }
}
