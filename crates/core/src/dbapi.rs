//! Minimal DBAPI-style connection and cursor over a [`Transport`].
//!
//! A connection is not meant to be shared between threads for concurrent
//! use; the mutex only keeps cursors and the connection consistent.

use std::{
    collections::VecDeque,
    fmt,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::debug;

use crate::{
    CatalogRequest, ColumnDescription, ConnectArgs, Driver, Error, QueryOutcome, Resource,
    Result, ResultSet, TableKind, Transport, Value, WireValue,
};

/// `rowcount` when the number of affected rows is unknown.
pub const ROWCOUNT_UNKNOWN: i64 = -1;

const DEFAULT_ARRAYSIZE: usize = 1;
const POISONED_CONNECTION_MESSAGE: &str = "connection state was poisoned";

pub type Row = Vec<Value>;

/// Converts between typed values and the client library's wire values.
pub trait ValueCodec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<WireValue>;
    fn decode(&self, value: &WireValue, column: &ColumnDescription) -> Result<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct ConnectionState {
    transport: Box<dyn Transport>,
    driver_name: String,
    autocommit: bool,
    closed: bool,
}

type SharedState = Arc<Mutex<ConnectionState>>;

pub struct Connection {
    id: ConnectionId,
    state: SharedState,
    codec: Arc<dyn ValueCodec>,
}

impl Connection {
    pub fn open(
        driver: &dyn Driver,
        args: &ConnectArgs,
        codec: Arc<dyn ValueCodec>,
    ) -> Result<Self> {
        let transport = driver.connect(args).map_err(|source| {
            Error::connection(format!("{} driver could not connect", driver.name()), source)
        })?;
        let id = ConnectionId::next();
        debug!(connection = %id, driver = driver.name(), "opened connection");

        Ok(Self {
            id,
            state: Arc::new(Mutex::new(ConnectionState {
                transport,
                driver_name: driver.name().to_string(),
                autocommit: args.get_bool("autocommit").unwrap_or(true),
                closed: false,
            })),
            codec,
        })
    }

    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    #[must_use]
    pub fn codec(&self) -> &dyn ValueCodec {
        self.codec.as_ref()
    }

    pub fn cursor(&self) -> Result<Cursor> {
        let _state = lock_open(&self.state, "cursor")?;
        Ok(Cursor {
            state: Arc::clone(&self.state),
            codec: Arc::clone(&self.codec),
            closed: false,
            result: CursorResult::Empty,
            rowcount: ROWCOUNT_UNKNOWN,
            arraysize: DEFAULT_ARRAYSIZE,
        })
    }

    pub fn commit(&self) -> Result<()> {
        let mut state = lock_open(&self.state, "commit")?;
        state
            .transport
            .commit()
            .map_err(|source| Error::execution("COMMIT", source))
    }

    pub fn rollback(&self) -> Result<()> {
        let mut state = lock_open(&self.state, "rollback")?;
        state
            .transport
            .rollback()
            .map_err(|source| Error::execution("ROLLBACK", source))
    }

    pub fn autocommit(&self) -> Result<bool> {
        Ok(lock_open(&self.state, "autocommit")?.autocommit)
    }

    pub fn set_autocommit(&self, enabled: bool) -> Result<()> {
        let mut state = lock_open(&self.state, "set_autocommit")?;
        state
            .transport
            .set_autocommit(enabled)
            .map_err(|source| Error::execution("SET AUTOCOMMIT", source))?;
        state.autocommit = enabled;
        Ok(())
    }

    /// Closes the session. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut state = lock_state(&self.state)?;
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        debug!(connection = %self.id, "closing connection");
        state
            .transport
            .close()
            .map_err(|source| Error::connection("failed to close connection", source))
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        lock_state(&self.state).map_or(true, |state| state.closed)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            debug!(connection = %self.id, %error, "best-effort close failed");
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

enum CursorResult {
    Empty,
    RowCount,
    Rows {
        description: Vec<ColumnDescription>,
        rows: VecDeque<Vec<WireValue>>,
    },
}

pub struct Cursor {
    state: SharedState,
    codec: Arc<dyn ValueCodec>,
    closed: bool,
    result: CursorResult,
    rowcount: i64,
    arraysize: usize,
}

impl Cursor {
    pub fn execute(&mut self, sql: &str, params: Option<&[Value]>) -> Result<()> {
        self.ensure_open("execute")?;
        let params = self.encode_params(params.unwrap_or_default())?;

        let outcome = {
            let mut state = lock_open(&self.state, "execute")?;
            state
                .transport
                .execute(sql, &params)
                .map_err(|source| Error::execution(sql, source))?
        };

        match outcome {
            QueryOutcome::Rows(result_set) => self.store_rows(result_set),
            QueryOutcome::RowCount(count) => {
                self.result = CursorResult::RowCount;
                self.rowcount = count;
            }
        }
        Ok(())
    }

    pub fn executemany(&mut self, sql: &str, seq_of_params: &[Vec<Value>]) -> Result<()> {
        self.ensure_open("executemany")?;
        let param_sets = seq_of_params
            .iter()
            .map(|params| self.encode_params(params))
            .collect::<Result<Vec<_>>>()?;

        let count = {
            let mut state = lock_open(&self.state, "executemany")?;
            state
                .transport
                .execute_batch(sql, &param_sets)
                .map_err(|source| Error::execution(sql, source))?
        };

        self.result = CursorResult::RowCount;
        self.rowcount = count;
        Ok(())
    }

    pub fn fetchone(&mut self) -> Result<Option<Row>> {
        self.ensure_open("fetchone")?;
        let row = match &mut self.result {
            CursorResult::Rows { rows, .. } => rows.pop_front(),
            _ => return Err(Error::NoResult),
        };
        row.map(|row| self.decode_row(row)).transpose()
    }

    pub fn fetchmany(&mut self, size: Option<usize>) -> Result<Vec<Row>> {
        self.ensure_open("fetchmany")?;
        let size = size.unwrap_or(self.arraysize);
        let taken = match &mut self.result {
            CursorResult::Rows { rows, .. } => {
                let take = size.min(rows.len());
                rows.drain(..take).collect::<Vec<_>>()
            }
            _ => return Err(Error::NoResult),
        };
        taken.into_iter().map(|row| self.decode_row(row)).collect()
    }

    pub fn fetchall(&mut self) -> Result<Vec<Row>> {
        self.ensure_open("fetchall")?;
        let taken = match &mut self.result {
            CursorResult::Rows { rows, .. } => rows.drain(..).collect::<Vec<_>>(),
            _ => return Err(Error::NoResult),
        };
        taken.into_iter().map(|row| self.decode_row(row)).collect()
    }

    /// Column metadata of the current result; `None` after a statement
    /// that produced no rows.
    pub fn description(&self) -> Result<Option<&[ColumnDescription]>> {
        self.ensure_open("description")?;
        match &self.result {
            CursorResult::Empty => Err(Error::NoResult),
            CursorResult::RowCount => Ok(None),
            CursorResult::Rows { description, .. } => Ok(Some(description.as_slice())),
        }
    }

    /// Index of a result column by case-insensitive name.
    pub fn column_index(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.description()?.and_then(|columns| {
            columns
                .iter()
                .position(|column| column.name.eq_ignore_ascii_case(name))
        }))
    }

    pub fn rowcount(&self) -> Result<i64> {
        self.ensure_open("rowcount")?;
        Ok(self.rowcount)
    }

    #[must_use]
    pub const fn arraysize(&self) -> usize {
        self.arraysize
    }

    pub fn set_arraysize(&mut self, arraysize: usize) -> Result<()> {
        self.ensure_open("arraysize")?;
        if arraysize == 0 {
            return Err(Error::invalid_argument("arraysize must be at least 1"));
        }
        self.arraysize = arraysize;
        Ok(())
    }

    pub fn setinputsizes(&self, _sizes: &[Option<usize>]) -> Result<()> {
        self.ensure_open("setinputsizes")
    }

    pub fn setoutputsize(&self, _size: usize, _column: Option<usize>) -> Result<()> {
        self.ensure_open("setoutputsize")
    }

    pub fn callproc(&mut self, procedure: &str, _params: &[Value]) -> Result<()> {
        self.ensure_open("callproc")?;
        Err(self.unsupported(format!("callproc({procedure})")))
    }

    pub fn nextset(&mut self) -> Result<bool> {
        self.ensure_open("nextset")?;
        Err(self.unsupported("nextset"))
    }

    pub fn schemas(&mut self) -> Result<()> {
        self.catalog(CatalogRequest::Schemas, "schemas")
    }

    pub fn tables(&mut self, schema: &str, kind: TableKind) -> Result<()> {
        let request = CatalogRequest::Tables {
            schema: schema.to_string(),
            kind,
        };
        self.catalog(request, "tables")
    }

    pub fn columns(&mut self, schema: &str, table: Option<&str>) -> Result<()> {
        let request = CatalogRequest::Columns {
            schema: schema.to_string(),
            table: table.map(ToString::to_string),
        };
        self.catalog(request, "columns")
    }

    pub fn primary_keys(&mut self, schema: &str, table: &str) -> Result<()> {
        let request = CatalogRequest::PrimaryKeys {
            schema: schema.to_string(),
            table: table.to_string(),
        };
        self.catalog(request, "primary_keys")
    }

    pub fn foreign_keys(&mut self, schema: &str, table: &str) -> Result<()> {
        let request = CatalogRequest::ForeignKeys {
            schema: schema.to_string(),
            table: table.to_string(),
        };
        self.catalog(request, "foreign_keys")
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.result = CursorResult::Empty;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed || lock_state(&self.state).map_or(true, |state| state.closed)
    }

    fn catalog(&mut self, request: CatalogRequest, operation: &'static str) -> Result<()> {
        self.ensure_open(operation)?;
        let result_set = {
            let mut state = lock_open(&self.state, operation)?;
            state
                .transport
                .catalog(&request)
                .map_err(|source| Error::execution(request.to_string(), source))?
        };
        self.store_rows(result_set);
        Ok(())
    }

    fn store_rows(&mut self, result_set: ResultSet) {
        // Row-producing statements never report a count.
        self.rowcount = ROWCOUNT_UNKNOWN;
        self.result = CursorResult::Rows {
            description: result_set.columns,
            rows: result_set.rows.into(),
        };
    }

    fn decode_row(&self, row: Vec<WireValue>) -> Result<Row> {
        let CursorResult::Rows { description, .. } = &self.result else {
            return Err(Error::NoResult);
        };
        row.iter()
            .enumerate()
            .map(|(index, value)| match description.get(index) {
                Some(column) => self.codec.decode(value, column),
                None => Err(Error::internal(format!(
                    "result row has more values than described columns ({})",
                    description.len()
                ))),
            })
            .collect()
    }

    fn encode_params(&self, params: &[Value]) -> Result<Vec<WireValue>> {
        params.iter().map(|value| self.codec.encode(value)).collect()
    }

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.closed {
            return Err(Error::Closed {
                resource: Resource::Cursor,
                operation,
            });
        }
        lock_open(&self.state, operation).map(|_| ())
    }

    fn unsupported(&self, operation: impl Into<String>) -> Error {
        let driver = lock_state(&self.state)
            .map(|state| state.driver_name.clone())
            .unwrap_or_default();
        Error::unsupported(operation, driver)
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("closed", &self.closed)
            .field("rowcount", &self.rowcount)
            .field("arraysize", &self.arraysize)
            .finish_non_exhaustive()
    }
}

fn lock_state(state: &Mutex<ConnectionState>) -> Result<MutexGuard<'_, ConnectionState>> {
    state
        .lock()
        .map_err(|_| Error::internal(POISONED_CONNECTION_MESSAGE))
}

fn lock_open<'a>(
    state: &'a Mutex<ConnectionState>,
    operation: &'static str,
) -> Result<MutexGuard<'a, ConnectionState>> {
    let guard = lock_state(state)?;
    if guard.closed {
        return Err(Error::Closed {
            resource: Resource::Connection,
            operation,
        });
    }
    Ok(guard)
}
