//! `Driver` implementation on top of an ODBC driver manager.
//!
//! Values cross the boundary as text in both directions; `ExasolCodec`
//! turns them into typed values using the reported column type.
//!
//! ODBC connection handles are not `Send`, so each connection lives on its
//! own worker thread for its whole life. The transport hands that thread
//! jobs over a channel and waits for the reply.

use std::{
    sync::{
        OnceLock,
        mpsc::{self, Receiver, Sender},
    },
    thread::{self, JoinHandle},
};

use exadialect_core::{
    ArgValue, BoxError, CatalogRequest, ColumnDescription, ConnectArgs, Driver, QueryOutcome,
    ResultSet, TableKind, Transport, WireValue, layout,
};
use odbc_api::{
    Connection, ConnectionOptions, Cursor, Environment, IntoParameter, ResultSetMetadata,
    buffers::TextRowSet,
};
use tracing::debug;

const BATCH_SIZE: usize = 1000;
const MAX_TEXT_LENGTH: usize = 65536;
const WORKER_NAME: &str = "exadialect-odbc";

static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

fn environment() -> Result<&'static Environment, BoxError> {
    if let Some(environment) = ENVIRONMENT.get() {
        return Ok(environment);
    }
    let environment = Environment::new()?;
    Ok(ENVIRONMENT.get_or_init(|| environment))
}

type Job = Box<dyn FnOnce(&Connection<'static>) + Send>;

#[derive(Debug, Default, Clone, Copy)]
pub struct OdbcDriver;

impl Driver for OdbcDriver {
    fn name(&self) -> &str {
        "odbc"
    }

    fn connect(&self, args: &ConnectArgs) -> Result<Box<dyn Transport>, BoxError> {
        let Some(ArgValue::Str(connection_string)) = args.positional.first() else {
            return Err("ODBC connect arguments carry no connection string".into());
        };
        let autocommit = args.get_bool("autocommit").unwrap_or(true);
        let transport = OdbcTransport::spawn(connection_string.clone(), autocommit)?;
        debug!("opened ODBC connection");
        Ok(Box::new(transport))
    }
}

struct OdbcTransport {
    jobs: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl OdbcTransport {
    /// Starts the worker and waits until it has connected, so connect
    /// failures surface here rather than on the first statement.
    fn spawn(connection_string: String, autocommit: bool) -> Result<Self, BoxError> {
        let (jobs, queue) = mpsc::channel::<Job>();
        let (ready, connected) = mpsc::channel::<Result<(), BoxError>>();
        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || serve(&connection_string, autocommit, &ready, queue))?;

        connected
            .recv()
            .map_err(|_| BoxError::from("ODBC worker stopped before connecting"))??;
        Ok(Self {
            jobs: Some(jobs),
            worker: Some(worker),
        })
    }

    /// Runs `operation` against the connection on the worker thread.
    fn call<T, F>(&self, operation: F) -> Result<T, BoxError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection<'static>) -> Result<T, BoxError> + Send + 'static,
    {
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| BoxError::from("ODBC connection already closed"))?;
        let (reply, response) = mpsc::channel();
        jobs.send(Box::new(move |connection: &Connection<'static>| {
            // The caller may have given up waiting; nothing to report then.
            let _ = reply.send(operation(connection));
        }))
        .map_err(|_| BoxError::from("ODBC worker is no longer running"))?;
        response
            .recv()
            .map_err(|_| BoxError::from("ODBC worker stopped while running a request"))?
    }
}

/// Worker loop: owns the connection until every sender is gone.
fn serve(
    connection_string: &str,
    autocommit: bool,
    ready: &Sender<Result<(), BoxError>>,
    queue: Receiver<Job>,
) {
    let connection = match open(connection_string, autocommit) {
        Ok(connection) => connection,
        Err(error) => {
            let _ = ready.send(Err(error));
            return;
        }
    };
    if ready.send(Ok(())).is_err() {
        return;
    }
    for job in queue {
        job(&connection);
    }
    debug!("ODBC worker finished");
}

fn open(connection_string: &str, autocommit: bool) -> Result<Connection<'static>, BoxError> {
    let connection = environment()?
        .connect_with_connection_string(connection_string, ConnectionOptions::default())?;
    connection.set_autocommit(autocommit)?;
    Ok(connection)
}

fn run(
    connection: &Connection<'_>,
    sql: &str,
    params: &[WireValue],
) -> Result<QueryOutcome, BoxError> {
    let texts = params.iter().map(WireValue::to_text).collect::<Vec<_>>();
    let bound = texts
        .iter()
        .map(|text| text.as_deref().into_parameter())
        .collect::<Vec<_>>();

    let mut statement = connection.preallocate()?;
    let rows = match statement.execute(sql, &bound[..])? {
        Some(cursor) => Some(read_result_set(cursor)?),
        None => None,
    };
    match rows {
        Some(rows) => Ok(QueryOutcome::Rows(rows)),
        None => {
            let count = statement
                .row_count()?
                .and_then(|count| i64::try_from(count).ok())
                .unwrap_or(-1);
            Ok(QueryOutcome::RowCount(count))
        }
    }
}

fn read_catalog(
    connection: &Connection<'_>,
    request: &CatalogRequest,
) -> Result<ResultSet, BoxError> {
    let result = match request {
        CatalogRequest::Schemas => read_result_set(connection.tables("", "%", "", "")?)?,
        CatalogRequest::Tables { schema, kind } => {
            let table_type = match kind {
                TableKind::Table => "TABLE",
                TableKind::View => "VIEW",
            };
            read_result_set(connection.tables("", schema, "%", table_type)?)?
        }
        CatalogRequest::Columns { schema, table } => read_result_set(connection.columns(
            "",
            schema,
            table.as_deref().unwrap_or("%"),
            "%",
        )?)?,
        CatalogRequest::PrimaryKeys { schema, table } => {
            let mut statement = connection.preallocate()?;
            read_result_set(statement.primary_keys(None, Some(schema.as_str()), table)?)?
        }
        CatalogRequest::ForeignKeys { schema, table } => {
            read_result_set(connection.foreign_keys("", "", "", "", schema, table)?)?
        }
    };
    Ok(relabel_catalog_columns(result))
}

impl Transport for OdbcTransport {
    fn execute(&mut self, sql: &str, params: &[WireValue]) -> Result<QueryOutcome, BoxError> {
        let sql = sql.to_string();
        let params = params.to_vec();
        self.call(move |connection| run(connection, &sql, &params))
    }

    fn execute_batch(
        &mut self,
        sql: &str,
        param_sets: &[Vec<WireValue>],
    ) -> Result<i64, BoxError> {
        let sql = sql.to_string();
        let param_sets = param_sets.to_vec();
        self.call(move |connection| {
            let mut total = 0;
            for params in &param_sets {
                if let QueryOutcome::RowCount(count) = run(connection, &sql, params)?
                    && count > 0
                {
                    total += count;
                }
            }
            Ok(total)
        })
    }

    fn catalog(&mut self, request: &CatalogRequest) -> Result<ResultSet, BoxError> {
        let request = request.clone();
        self.call(move |connection| read_catalog(connection, &request))
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), BoxError> {
        self.call(move |connection| Ok(connection.set_autocommit(enabled)?))
    }

    fn commit(&mut self) -> Result<(), BoxError> {
        self.call(|connection| Ok(connection.commit()?))
    }

    fn rollback(&mut self) -> Result<(), BoxError> {
        self.call(|connection| Ok(connection.rollback()?))
    }

    /// Closing twice is a no-op.
    fn close(&mut self) -> Result<(), BoxError> {
        self.jobs = None;
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| BoxError::from("ODBC worker panicked"))?;
            debug!("closed ODBC connection");
        }
        Ok(())
    }
}

fn read_result_set(mut cursor: impl Cursor + ResultSetMetadata) -> Result<ResultSet, BoxError> {
    let column_count = cursor.num_result_cols()?;
    let mut columns = Vec::new();
    for index in 1..=u16::try_from(column_count)? {
        let name = cursor.col_name(index)?;
        let data_type = cursor.col_data_type(index)?;
        columns.push(describe_column(name, &format!("{data_type:?}")));
    }

    let mut buffers = TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_TEXT_LENGTH))?;
    let mut row_cursor = cursor.bind_buffer(&mut buffers)?;
    let mut rows = Vec::new();
    while let Some(batch) = row_cursor.fetch()? {
        for row_index in 0..batch.num_rows() {
            let row = (0..batch.num_cols())
                .map(|column_index| {
                    batch
                        .at(column_index, row_index)
                        .map_or(WireValue::Null, |bytes| {
                            WireValue::Text(String::from_utf8_lossy(bytes).into_owned())
                        })
                })
                .collect();
            rows.push(row);
        }
    }

    Ok(ResultSet::new(columns, rows))
}

/// Turns the driver's `Debug` rendering of a data type, for example
/// `Decimal { precision: 18, scale: 0 }`, into a type code and sizes.
fn describe_column(name: String, rendered_type: &str) -> ColumnDescription {
    let type_code = rendered_type
        .split([' ', '{', '('])
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    let numbers = rendered_type
        .split(|ch: char| !ch.is_ascii_digit())
        .filter_map(|part| part.parse::<i64>().ok())
        .collect::<Vec<_>>();

    let description = ColumnDescription::new(name, type_code);
    match numbers.as_slice() {
        [precision, scale] => description.with_precision(*precision, *scale),
        [size] => description.with_size(*size),
        _ => description,
    }
}

/// ODBC 2 drivers report a few catalog columns under older names.
fn relabel_catalog_columns(mut result: ResultSet) -> ResultSet {
    for column in &mut result.columns {
        let upper = column.name.to_ascii_uppercase();
        let renamed = match upper.as_str() {
            "TABLE_OWNER" => layout::TABLE_SCHEM,
            "PRECISION" => layout::COLUMN_SIZE,
            "SCALE" => layout::DECIMAL_DIGITS,
            "PKTABLE_OWNER" => layout::PKTABLE_SCHEM,
            _ => continue,
        };
        column.name = renamed.to_string();
    }
    result
}
