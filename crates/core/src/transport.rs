//! The seam to the underlying client library.
//!
//! Everything below this trait boundary (sockets, TLS, wire encoding,
//! statement execution) belongs to the client library. Errors cross the
//! boundary as [`BoxError`] and are wrapped by the DBAPI shim.

use std::fmt;

use crate::{BoxError, ConnectArgs, WireValue};

/// Column names of the native catalog result layouts.
///
/// Layouts follow the ODBC catalog functions. `IS_IDENTITY` and
/// `IS_DISTRIBUTION_KEY` are Exasol extensions; readers treat a missing
/// extension column as `false`.
pub mod layout {
    pub const TABLE_SCHEM: &str = "TABLE_SCHEM";
    pub const TABLE_NAME: &str = "TABLE_NAME";
    pub const TABLE_TYPE: &str = "TABLE_TYPE";
    pub const COLUMN_NAME: &str = "COLUMN_NAME";
    pub const TYPE_NAME: &str = "TYPE_NAME";
    pub const COLUMN_SIZE: &str = "COLUMN_SIZE";
    pub const DECIMAL_DIGITS: &str = "DECIMAL_DIGITS";
    pub const NULLABLE: &str = "NULLABLE";
    pub const COLUMN_DEF: &str = "COLUMN_DEF";
    pub const ORDINAL_POSITION: &str = "ORDINAL_POSITION";
    pub const IS_IDENTITY: &str = "IS_IDENTITY";
    pub const IS_DISTRIBUTION_KEY: &str = "IS_DISTRIBUTION_KEY";
    pub const KEY_SEQ: &str = "KEY_SEQ";
    pub const PK_NAME: &str = "PK_NAME";
    pub const PKTABLE_SCHEM: &str = "PKTABLE_SCHEM";
    pub const PKTABLE_NAME: &str = "PKTABLE_NAME";
    pub const PKCOLUMN_NAME: &str = "PKCOLUMN_NAME";
    pub const FKTABLE_NAME: &str = "FKTABLE_NAME";
    pub const FKCOLUMN_NAME: &str = "FKCOLUMN_NAME";
    pub const FK_NAME: &str = "FK_NAME";

    pub const SCHEMAS: &[&str] = &[TABLE_SCHEM];
    pub const TABLES: &[&str] = &[TABLE_SCHEM, TABLE_NAME, TABLE_TYPE];
    pub const COLUMNS: &[&str] = &[
        TABLE_SCHEM,
        TABLE_NAME,
        COLUMN_NAME,
        TYPE_NAME,
        COLUMN_SIZE,
        DECIMAL_DIGITS,
        NULLABLE,
        COLUMN_DEF,
        ORDINAL_POSITION,
        IS_IDENTITY,
        IS_DISTRIBUTION_KEY,
    ];
    pub const PRIMARY_KEYS: &[&str] = &[TABLE_SCHEM, TABLE_NAME, COLUMN_NAME, KEY_SEQ, PK_NAME];
    pub const FOREIGN_KEYS: &[&str] = &[
        PKTABLE_SCHEM,
        PKTABLE_NAME,
        PKCOLUMN_NAME,
        FKTABLE_NAME,
        FKCOLUMN_NAME,
        KEY_SEQ,
        FK_NAME,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Table,
    View,
}

impl TableKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
        }
    }
}

/// A request on the driver's catalog channel. Schema and table names are in
/// the database's own (upper-case canonical) spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogRequest {
    Schemas,
    Tables { schema: String, kind: TableKind },
    Columns { schema: String, table: Option<String> },
    PrimaryKeys { schema: String, table: String },
    ForeignKeys { schema: String, table: String },
}

impl CatalogRequest {
    #[must_use]
    pub const fn layout(&self) -> &'static [&'static str] {
        match self {
            Self::Schemas => layout::SCHEMAS,
            Self::Tables { .. } => layout::TABLES,
            Self::Columns { .. } => layout::COLUMNS,
            Self::PrimaryKeys { .. } => layout::PRIMARY_KEYS,
            Self::ForeignKeys { .. } => layout::FOREIGN_KEYS,
        }
    }
}

impl fmt::Display for CatalogRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schemas => f.write_str("CATALOG SCHEMAS"),
            Self::Tables { schema, kind } => {
                write!(f, "CATALOG TABLES schema={schema} type={}", kind.as_str())
            }
            Self::Columns { schema, table } => write!(
                f,
                "CATALOG COLUMNS schema={schema} table={}",
                table.as_deref().unwrap_or("%")
            ),
            Self::PrimaryKeys { schema, table } => {
                write!(f, "CATALOG PRIMARY KEYS schema={schema} table={table}")
            }
            Self::ForeignKeys { schema, table } => {
                write!(f, "CATALOG FOREIGN KEYS schema={schema} table={table}")
            }
        }
    }
}

/// One entry of a cursor description: the DBAPI seven-tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    pub type_code: String,
    pub display_size: Option<i64>,
    pub internal_size: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub nullable: Option<bool>,
}

impl ColumnDescription {
    pub fn new(name: impl Into<String>, type_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_code: type_code.into(),
            display_size: None,
            internal_size: None,
            precision: None,
            scale: None,
            nullable: None,
        }
    }

    #[must_use]
    pub fn with_precision(mut self, precision: i64, scale: i64) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: i64) -> Self {
        self.display_size = Some(size);
        self.internal_size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<ColumnDescription>,
    pub rows: Vec<Vec<WireValue>>,
}

impl ResultSet {
    #[must_use]
    pub fn new(columns: Vec<ColumnDescription>, rows: Vec<Vec<WireValue>>) -> Self {
        Self { columns, rows }
    }

    /// Result set whose columns are all text typed, as catalog channels
    /// usually report them.
    #[must_use]
    pub fn with_names(names: &[&str], rows: Vec<Vec<WireValue>>) -> Self {
        let columns = names
            .iter()
            .map(|name| ColumnDescription::new(*name, "VARCHAR"))
            .collect();
        Self { columns, rows }
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(ResultSet),
    RowCount(i64),
}

pub trait Transport: Send {
    fn execute(&mut self, sql: &str, params: &[WireValue]) -> Result<QueryOutcome, BoxError>;
    fn execute_batch(&mut self, sql: &str, param_sets: &[Vec<WireValue>])
    -> Result<i64, BoxError>;
    fn catalog(&mut self, request: &CatalogRequest) -> Result<ResultSet, BoxError>;
    fn set_autocommit(&mut self, enabled: bool) -> Result<(), BoxError>;
    fn commit(&mut self) -> Result<(), BoxError>;
    fn rollback(&mut self) -> Result<(), BoxError>;
    fn close(&mut self) -> Result<(), BoxError>;
}

/// Entry point of an underlying client library.
pub trait Driver: Send + Sync {
    fn name(&self) -> &str;
    fn connect(&self, args: &ConnectArgs) -> Result<Box<dyn Transport>, BoxError>;
}
