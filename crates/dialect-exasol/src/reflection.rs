//! Dual-path metadata reflection.
//!
//! Every operation has a native implementation (the driver's catalog
//! channel) and a fallback implementation (snapshot reads of the `SYS`
//! views). The caller picks the path per call; nothing here switches paths
//! on its own. Both paths feed the same row-to-descriptor conversion so they
//! agree on everything the catalog reports.

use std::collections::{BTreeMap, HashMap};

use exadialect_core::{
    ColumnInfo, Connection, Cursor, DataType, Error, ForeignKeyConstraint, Ident, IndexInfo,
    MetadataReflector, ObjectKind, PrimaryKeyConstraint, ReflectPath, Result, Row, TableKind,
    Value, Version, layout,
};
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, warn};

use crate::{
    export_queries,
    normalize::{denormalize_ident, normalize_name},
};

const STANDARD_INTEGER_PRECISION: i64 = 18;
const WIDE_INTEGER_PRECISION: i64 = 36;

#[derive(Debug, Default, Clone, Copy)]
pub struct ExasolReflector;

impl ExasolReflector {
    pub fn has_schema(
        &self,
        connection: &Connection,
        schema: &Ident,
        path: ReflectPath,
    ) -> Result<bool> {
        let Some(target) = normalize_name(Some(&denormalize_ident(schema))) else {
            return Ok(false);
        };
        Ok(self.get_schema_names(connection, path)?.contains(&target))
    }

    pub fn server_version_info(&self, connection: &Connection) -> Result<Version> {
        let raw = query_scalar(connection, export_queries::SERVER_VERSION_QUERY, &[])?
            .ok_or_else(|| Error::internal("EXA_METADATA reported no product version"))?;
        parse_server_version(&raw).ok_or_else(|| {
            Error::internal(format!("failed to parse Exasol server version `{raw}`"))
        })
    }

    /// The schema a call operates on, in database spelling. `None` means
    /// the session has no current schema.
    fn resolve_schema(
        &self,
        connection: &Connection,
        schema: Option<&Ident>,
    ) -> Result<Option<String>> {
        match schema {
            Some(schema) => Ok(Some(denormalize_ident(schema))),
            None => query_scalar(connection, export_queries::CURRENT_SCHEMA_QUERY, &[]),
        }
    }

    fn object_names(
        &self,
        connection: &Connection,
        schema: Option<&Ident>,
        path: ReflectPath,
        kind: TableKind,
    ) -> Result<Vec<Ident>> {
        let Some(schema) = self.resolve_schema(connection, schema)? else {
            return Ok(Vec::new());
        };
        debug!(kind = kind.as_str(), %schema, path = path.as_str(), "listing objects");

        let mut names = match path {
            ReflectPath::Native => {
                let rows = CatalogRows::catalog(connection, |cursor| {
                    cursor.tables(&schema, kind)
                })?;
                rows.iter()
                    .filter_map(|row| rows.text(row, layout::TABLE_NAME))
                    .collect::<Vec<_>>()
            }
            ReflectPath::Fallback => {
                let sql = match kind {
                    TableKind::Table => export_queries::TABLE_NAMES_QUERY,
                    TableKind::View => export_queries::VIEW_NAMES_QUERY,
                };
                let rows = CatalogRows::query(connection, sql, &[schema.as_str()])?;
                rows.iter()
                    .filter_map(|row| rows.text_at(row, 0))
                    .collect::<Vec<_>>()
            }
        };
        names.sort();

        Ok(names
            .iter()
            .filter_map(|name| normalize_name(Some(name)))
            .collect())
    }

    fn column_records(
        &self,
        connection: &Connection,
        schema: &str,
        table: Option<&str>,
        path: ReflectPath,
    ) -> Result<Vec<ColumnRecord>> {
        match path {
            ReflectPath::Native => {
                let rows =
                    CatalogRows::catalog(connection, |cursor| cursor.columns(schema, table))?;
                // Plain ODBC `SQLColumns` stops at the standard columns.
                let reports_flags =
                    rows.has(layout::IS_IDENTITY) && rows.has(layout::IS_DISTRIBUTION_KEY);
                let flags = if reports_flags {
                    None
                } else {
                    debug!(%schema, "column catalog lacks Exasol flags, reading EXA_ALL_COLUMNS");
                    Some(self.column_flags(connection, schema, table)?)
                };
                let mut records = rows
                    .iter()
                    .map(|row| {
                        let size = rows.int(row, layout::COLUMN_SIZE);
                        let table_name = rows.text(row, layout::TABLE_NAME).unwrap_or_default();
                        let name = rows.text(row, layout::COLUMN_NAME).unwrap_or_default();
                        let (identity, distribution_key) = match &flags {
                            Some(flags) => flags
                                .get(&(table_name.clone(), name.clone()))
                                .copied()
                                .unwrap_or_default(),
                            None => (
                                rows.flag(row, layout::IS_IDENTITY).unwrap_or(false),
                                rows.flag(row, layout::IS_DISTRIBUTION_KEY).unwrap_or(false),
                            ),
                        };
                        (
                            table_name,
                            rows.int(row, layout::ORDINAL_POSITION).unwrap_or_default(),
                            ColumnRecord {
                                name,
                                type_name: rows.text(row, layout::TYPE_NAME).unwrap_or_default(),
                                length: size,
                                precision: size,
                                scale: rows.int(row, layout::DECIMAL_DIGITS),
                                nullable: rows.flag(row, layout::NULLABLE).unwrap_or(true),
                                default: rows.text(row, layout::COLUMN_DEF),
                                identity,
                                distribution_key,
                            },
                        )
                    })
                    .collect::<Vec<_>>();
                records.sort_by(|left, right| (&left.0, left.1).cmp(&(&right.0, right.1)));
                Ok(records.into_iter().map(|(_, _, record)| record).collect())
            }
            ReflectPath::Fallback => {
                let rows = self.system_columns(connection, schema, table)?;
                Ok(rows
                    .iter()
                    .map(|row| {
                        let (identity, distribution_key) = rows.system_column_flags(row);
                        ColumnRecord {
                            name: rows.text_at(row, 0).unwrap_or_default(),
                            type_name: rows.text_at(row, 1).unwrap_or_default(),
                            length: rows.int_at(row, 2),
                            precision: rows.int_at(row, 3),
                            scale: rows.int_at(row, 4),
                            nullable: rows.flag_at(row, 5).unwrap_or(true),
                            default: rows.text_at(row, 6),
                            identity,
                            distribution_key,
                        }
                    })
                    .collect())
            }
        }
    }

    /// Snapshot read of `SYS.EXA_ALL_COLUMNS` for one table or a whole schema.
    fn system_columns(
        &self,
        connection: &Connection,
        schema: &str,
        table: Option<&str>,
    ) -> Result<CatalogRows> {
        match table {
            Some(table) => CatalogRows::query(
                connection,
                export_queries::TABLE_COLUMNS_QUERY,
                &[schema, table],
            ),
            None => CatalogRows::query(connection, export_queries::COLUMNS_QUERY, &[schema]),
        }
    }

    /// `(identity, distribution_key)` per `(table, column)`, for drivers whose
    /// catalog channel does not report them.
    fn column_flags(
        &self,
        connection: &Connection,
        schema: &str,
        table: Option<&str>,
    ) -> Result<HashMap<(String, String), (bool, bool)>> {
        let rows = self.system_columns(connection, schema, table)?;
        Ok(rows
            .iter()
            .map(|row| {
                let key = (
                    rows.text_at(row, 9).unwrap_or_default(),
                    rows.text_at(row, 0).unwrap_or_default(),
                );
                (key, rows.system_column_flags(row))
            })
            .collect())
    }
}

impl MetadataReflector for ExasolReflector {
    fn get_default_schema_name(&self, connection: &Connection) -> Result<Option<Ident>> {
        let schema = query_scalar(connection, export_queries::CURRENT_SCHEMA_QUERY, &[])?;
        Ok(normalize_name(schema.as_deref()))
    }

    fn get_schema_names(&self, connection: &Connection, path: ReflectPath) -> Result<Vec<Ident>> {
        debug!(path = path.as_str(), "listing schemas");
        let mut names = match path {
            ReflectPath::Native => {
                let rows = CatalogRows::catalog(connection, Cursor::schemas)?;
                rows.iter()
                    .filter_map(|row| rows.text(row, layout::TABLE_SCHEM))
                    .collect::<Vec<_>>()
            }
            ReflectPath::Fallback => {
                let rows =
                    CatalogRows::query(connection, export_queries::SCHEMA_NAMES_QUERY, &[])?;
                rows.iter()
                    .filter_map(|row| rows.text_at(row, 0))
                    .collect::<Vec<_>>()
            }
        };
        names.sort();
        names.dedup();

        Ok(names
            .iter()
            .filter_map(|name| normalize_name(Some(name)))
            .collect())
    }

    fn get_table_names(
        &self,
        connection: &Connection,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<Ident>> {
        self.object_names(connection, schema, path, TableKind::Table)
    }

    fn has_table(
        &self,
        connection: &Connection,
        table_name: &Ident,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<bool> {
        let Some(target) = normalize_name(Some(&denormalize_ident(table_name))) else {
            return Ok(false);
        };
        Ok(self.get_table_names(connection, schema, path)?.contains(&target))
    }

    fn get_view_names(
        &self,
        connection: &Connection,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<Ident>> {
        self.object_names(connection, schema, path, TableKind::View)
    }

    fn get_view_definition(
        &self,
        connection: &Connection,
        view_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Option<String>> {
        let Some(view_name) = view_name else {
            return Ok(None);
        };
        let Some(schema) = self.resolve_schema(connection, schema)? else {
            return Ok(None);
        };
        let view = denormalize_ident(view_name);

        let sql = match path {
            ReflectPath::Native => export_queries::VIEW_DEFINITION_QUERY.to_string(),
            ReflectPath::Fallback => format!(
                "{} {}",
                export_queries::SNAPSHOT_HINT,
                export_queries::VIEW_DEFINITION_QUERY
            ),
        };
        let rows = CatalogRows::query(connection, &sql, &[schema.as_str(), view.as_str()])?;

        match rows.rows.as_slice() {
            [] => Ok(None),
            [row] => Ok(rows.text_at(row, 0)),
            _ => Err(Error::internal(format!(
                "found {} definitions for view {schema}.{view}",
                rows.rows.len()
            ))),
        }
    }

    /// With `table_name` of `None` this returns every column of every table
    /// and view in the schema.
    fn get_columns(
        &self,
        connection: &Connection,
        table_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<ColumnInfo>> {
        let table = table_name.map(denormalize_ident);
        let Some(schema) = self.resolve_schema(connection, schema)? else {
            return match table {
                Some(table) => Err(missing_table(None, &table)),
                None => Ok(Vec::new()),
            };
        };
        debug!(%schema, table = table.as_deref(), path = path.as_str(), "reflecting columns");

        let records = self.column_records(connection, &schema, table.as_deref(), path)?;
        if records.is_empty()
            && let Some(table) = table
        {
            return Err(missing_table(Some(&schema), &table));
        }

        Ok(records.iter().filter_map(ColumnRecord::to_column_info).collect())
    }

    fn get_pk_constraint(
        &self,
        connection: &Connection,
        table_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<PrimaryKeyConstraint> {
        let Some(table_name) = table_name else {
            return Ok(PrimaryKeyConstraint::empty());
        };
        let Some(schema) = self.resolve_schema(connection, schema)? else {
            return Ok(PrimaryKeyConstraint::empty());
        };
        let table = denormalize_ident(table_name);

        // (constraint name, column name) in key order
        let entries = match path {
            ReflectPath::Native => {
                let rows = CatalogRows::catalog(connection, |cursor| {
                    cursor.primary_keys(&schema, &table)
                })?;
                let mut entries = rows
                    .iter()
                    .map(|row| {
                        (
                            rows.int(row, layout::KEY_SEQ).unwrap_or_default(),
                            rows.text(row, layout::PK_NAME),
                            rows.text(row, layout::COLUMN_NAME),
                        )
                    })
                    .collect::<Vec<_>>();
                entries.sort_by_key(|(sequence, _, _)| *sequence);
                entries
                    .into_iter()
                    .map(|(_, name, column)| (name, column))
                    .collect::<Vec<_>>()
            }
            ReflectPath::Fallback => {
                let rows = CatalogRows::query(
                    connection,
                    export_queries::PRIMARY_KEY_QUERY,
                    &[schema.as_str(), table.as_str()],
                )?;
                rows.iter()
                    .map(|row| (rows.text_at(row, 0), rows.text_at(row, 1)))
                    .collect::<Vec<_>>()
            }
        };

        let mut constraint = PrimaryKeyConstraint::empty();
        for (name, column) in entries {
            if constraint.name.is_none() {
                constraint.name = normalize_name(name.as_deref());
            }
            if let Some(column) = normalize_name(column.as_deref()) {
                constraint.constrained_columns.push(column);
            }
        }
        Ok(constraint)
    }

    fn get_foreign_keys(
        &self,
        connection: &Connection,
        table_name: &Ident,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<ForeignKeyConstraint>> {
        let requested_schema = schema;
        let Some(schema) = self.resolve_schema(connection, schema)? else {
            return Ok(Vec::new());
        };
        let table = denormalize_ident(table_name);

        let entries = match path {
            ReflectPath::Native => {
                let rows = CatalogRows::catalog(connection, |cursor| {
                    cursor.foreign_keys(&schema, &table)
                })?;
                let mut entries = rows
                    .iter()
                    .map(|row| {
                        (
                            rows.int(row, layout::KEY_SEQ).unwrap_or_default(),
                            ForeignKeyRecord {
                                name: rows.text(row, layout::FK_NAME),
                                column: rows.text(row, layout::FKCOLUMN_NAME),
                                referred_schema: rows.text(row, layout::PKTABLE_SCHEM),
                                referred_table: rows.text(row, layout::PKTABLE_NAME),
                                referred_column: rows.text(row, layout::PKCOLUMN_NAME),
                            },
                        )
                    })
                    .collect::<Vec<_>>();
                entries.sort_by(|left, right| {
                    (&left.1.name, left.0).cmp(&(&right.1.name, right.0))
                });
                entries
                    .into_iter()
                    .map(|(_, record)| record)
                    .collect::<Vec<_>>()
            }
            ReflectPath::Fallback => {
                let rows = CatalogRows::query(
                    connection,
                    export_queries::FOREIGN_KEYS_QUERY,
                    &[schema.as_str(), table.as_str()],
                )?;
                rows.iter()
                    .map(|row| ForeignKeyRecord {
                        name: rows.text_at(row, 0),
                        column: rows.text_at(row, 1),
                        referred_schema: rows.text_at(row, 2),
                        referred_table: rows.text_at(row, 3),
                        referred_column: rows.text_at(row, 4),
                    })
                    .collect::<Vec<_>>()
            }
        };

        let default_schema = if requested_schema.is_none() {
            normalize_name(Some(&schema))
        } else {
            None
        };
        Ok(group_foreign_keys(entries, default_schema.as_ref()))
    }

    /// Exasol creates and drops indexes on its own; there is nothing to
    /// reflect.
    fn get_indexes(
        &self,
        _connection: &Connection,
        _table_name: &Ident,
        _schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<Vec<IndexInfo>> {
        Ok(Vec::new())
    }
}

/// One catalog column row, either path, in database spelling.
#[derive(Debug)]
struct ColumnRecord {
    name: String,
    type_name: String,
    length: Option<i64>,
    precision: Option<i64>,
    scale: Option<i64>,
    nullable: bool,
    default: Option<String>,
    identity: bool,
    distribution_key: bool,
}

impl ColumnRecord {
    fn to_column_info(&self) -> Option<ColumnInfo> {
        let name = normalize_name(Some(&self.name))?;
        let data_type = parse_column_type(&self.type_name, self.length, self.precision, self.scale)
            .unwrap_or_else(|| {
                warn!(
                    column = %self.name,
                    column_type = %self.type_name,
                    "did not recognize column type, reflecting it as untyped"
                );
                DataType::Null
            });

        Some(ColumnInfo {
            name,
            data_type,
            nullable: self.nullable,
            default: self.default.as_ref().map(|value| value.trim().to_string()),
            autoincrement: self.identity,
            is_distribution_key: self.distribution_key,
        })
    }
}

/// Maps a catalog type string such as `VARCHAR(100) UTF8` or
/// `DECIMAL(18,0)` onto the generic taxonomy; `None` if unrecognized.
pub(crate) fn parse_column_type(
    raw: &str,
    length: Option<i64>,
    precision: Option<i64>,
    scale: Option<i64>,
) -> Option<DataType> {
    let base = strip_type_modifiers(raw);
    let length = length.and_then(|value| u32::try_from(value).ok());

    Some(match base.as_str() {
        "BOOLEAN" => DataType::Boolean,
        "SMALLINT" | "TINYINT" => DataType::SmallInt,
        "INTEGER" | "INT" => DataType::Integer,
        "BIGINT" => DataType::BigInt,
        "DECIMAL" | "NUMERIC" => match (precision, scale.unwrap_or(0)) {
            (Some(precision), 0) if precision <= STANDARD_INTEGER_PRECISION => DataType::Integer,
            (Some(WIDE_INTEGER_PRECISION), 0) => DataType::BigInt,
            (precision, scale) => DataType::Decimal {
                precision: precision.and_then(|value| u32::try_from(value).ok()),
                scale: u32::try_from(scale).ok(),
            },
        },
        "DOUBLE" | "DOUBLEPRECISION" | "FLOAT" | "REAL" => DataType::Double,
        "CHAR" | "CHARACTER" => DataType::Char { length },
        "VARCHAR" | "CHARACTERVARYING" => DataType::Varchar { length },
        "LONGVARCHAR" | "CLOB" => DataType::Text,
        "DATE" => DataType::Date,
        "TIMESTAMP" => DataType::Timestamp {
            with_local_time_zone: false,
        },
        "TIMESTAMPWITHLOCALTIMEZONE" => DataType::Timestamp {
            with_local_time_zone: true,
        },
        "INTERVALYEARTOMONTH" => DataType::IntervalYearToMonth,
        "INTERVALDAYTOSECOND" => DataType::IntervalDayToSecond,
        "GEOMETRY" => DataType::Geometry,
        "HASHTYPE" => DataType::HashType,
        _ => return None,
    })
}

/// Drops character-set markers, spaces, and parenthesized size suffixes.
fn strip_type_modifiers(raw: &str) -> String {
    let upper = raw.to_ascii_uppercase().replace("ASCII", "").replace("UTF8", "");
    let mut stripped = String::with_capacity(upper.len());
    let mut depth = 0_usize;
    for ch in upper.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ch if depth == 0 && !ch.is_whitespace() => stripped.push(ch),
            _ => {}
        }
    }
    stripped
}

#[derive(Debug)]
struct ForeignKeyRecord {
    name: Option<String>,
    column: Option<String>,
    referred_schema: Option<String>,
    referred_table: Option<String>,
    referred_column: Option<String>,
}

/// Merges per-column rows into one descriptor per constraint, keeping the
/// row order inside each constraint.
fn group_foreign_keys(
    records: Vec<ForeignKeyRecord>,
    default_schema: Option<&Ident>,
) -> Vec<ForeignKeyConstraint> {
    let mut order = Vec::new();
    let mut grouped: BTreeMap<Option<String>, ForeignKeyConstraint> = BTreeMap::new();

    for record in records {
        let constraint = grouped.entry(record.name.clone()).or_insert_with(|| {
            order.push(record.name.clone());
            let referred_schema = normalize_name(record.referred_schema.as_deref());
            ForeignKeyConstraint {
                name: normalize_name(record.name.as_deref()),
                constrained_columns: Vec::new(),
                referred_schema: match (&referred_schema, default_schema) {
                    (Some(remote), Some(default)) if remote.value == default.value => None,
                    _ => referred_schema,
                },
                referred_table: normalize_name(record.referred_table.as_deref())
                    .unwrap_or_else(|| Ident::unquoted("")),
                referred_columns: Vec::new(),
            }
        });
        if let Some(column) = normalize_name(record.column.as_deref()) {
            constraint.constrained_columns.push(column);
        }
        if let Some(column) = normalize_name(record.referred_column.as_deref()) {
            constraint.referred_columns.push(column);
        }
    }

    order
        .into_iter()
        .filter_map(|name| grouped.remove(&name))
        .collect()
}

pub(crate) fn parse_server_version(raw: &str) -> Option<Version> {
    let mut parts = raw.split_whitespace().next()?.split('.');
    let major = parse_u16_component(parts.next()?)?;
    let minor = parts.next().and_then(parse_u16_component).unwrap_or(0);
    let patch = parts.next().and_then(parse_u16_component).unwrap_or(0);

    Some(Version {
        major,
        minor,
        patch,
    })
}

fn parse_u16_component(raw: &str) -> Option<u16> {
    let digits = raw
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u16>().ok()
}

/// A fully fetched catalog result with by-name (native layouts) and
/// by-position (fallback queries) access.
struct CatalogRows {
    names: Vec<String>,
    rows: Vec<Row>,
}

impl CatalogRows {
    fn catalog(
        connection: &Connection,
        request: impl FnOnce(&mut Cursor) -> Result<()>,
    ) -> Result<Self> {
        let mut cursor = connection.cursor()?;
        request(&mut cursor)?;
        Self::fetch(&mut cursor)
    }

    fn query(connection: &Connection, sql: &str, params: &[&str]) -> Result<Self> {
        let params = params
            .iter()
            .map(|param| Value::from(*param))
            .collect::<Vec<_>>();
        let mut cursor = connection.cursor()?;
        cursor.execute(sql, Some(&params))?;
        Self::fetch(&mut cursor)
    }

    fn fetch(cursor: &mut Cursor) -> Result<Self> {
        let Some(description) = cursor.description()? else {
            return Ok(Self {
                names: Vec::new(),
                rows: Vec::new(),
            });
        };
        let names = description
            .iter()
            .map(|column| column.name.to_ascii_uppercase())
            .collect();
        let rows = cursor.fetchall()?;
        Ok(Self { names, rows })
    }

    fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    fn get<'a>(&self, row: &'a Row, name: &str) -> Option<&'a Value> {
        let index = self.names.iter().position(|candidate| candidate == name)?;
        row.get(index)
    }

    fn text(&self, row: &Row, name: &str) -> Option<String> {
        self.get(row, name).and_then(value_text)
    }

    fn int(&self, row: &Row, name: &str) -> Option<i64> {
        self.get(row, name).and_then(value_i64)
    }

    fn flag(&self, row: &Row, name: &str) -> Option<bool> {
        self.get(row, name).and_then(value_bool)
    }

    fn text_at(&self, row: &Row, index: usize) -> Option<String> {
        row.get(index).and_then(value_text)
    }

    fn int_at(&self, row: &Row, index: usize) -> Option<i64> {
        row.get(index).and_then(value_i64)
    }

    fn flag_at(&self, row: &Row, index: usize) -> Option<bool> {
        row.get(index).and_then(value_bool)
    }

    fn has(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    /// Identity and distribution-key flags of an `EXA_ALL_COLUMNS` row.
    /// `COLUMN_IDENTITY` holds the next identity value, which may be
    /// negative; only NULL means "not an identity column".
    fn system_column_flags(&self, row: &Row) -> (bool, bool) {
        (
            self.text_at(row, 7).is_some(),
            self.flag_at(row, 8).unwrap_or(false),
        )
    }
}

/// `SCHEMA.TABLE` in database spelling, or the bare table when the session
/// has no current schema to qualify it with.
fn missing_table(schema: Option<&str>, table: &str) -> Error {
    let name = match schema {
        Some(schema) => format!("{schema}.{table}"),
        None => table.to_string(),
    };
    Error::not_found(ObjectKind::Table, name)
}

fn query_scalar(connection: &Connection, sql: &str, params: &[&str]) -> Result<Option<String>> {
    let rows = CatalogRows::query(connection, sql, params)?;
    Ok(rows.iter().next().and_then(|row| rows.text_at(row, 0)))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(value) => Some(value.to_string()),
        Value::Integer(value) => Some(value.to_string()),
        Value::Float(value) => Some(value.to_string()),
        Value::Decimal(value) => Some(value.to_string()),
        Value::String(value) => Some(value.clone()),
        Value::Date(value) => Some(value.to_string()),
        Value::Timestamp(value) => Some(value.to_string()),
    }
}

fn value_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(value) => Some(*value),
        Value::Decimal(value) => value.to_i64(),
        Value::Float(value) if value.fract() == 0.0 => value.to_i64(),
        Value::String(value) => value.trim().parse().ok(),
        Value::Bool(value) => Some(i64::from(*value)),
        _ => None,
    }
}

fn value_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(value) => Some(*value),
        Value::Integer(value) => Some(*value != 0),
        Value::Decimal(value) => Some(!value.is_zero()),
        Value::String(value) => match value.trim().to_ascii_uppercase().as_str() {
            "TRUE" | "1" | "Y" | "YES" => Some(true),
            "FALSE" | "0" | "N" | "NO" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_charset_and_size_modifiers() {
        assert_eq!(strip_type_modifiers("VARCHAR(100) UTF8"), "VARCHAR");
        assert_eq!(strip_type_modifiers("CHAR(1) ASCII"), "CHAR");
        assert_eq!(
            strip_type_modifiers("INTERVAL DAY(2) TO SECOND(3)"),
            "INTERVALDAYTOSECOND"
        );
        assert_eq!(strip_type_modifiers("HASHTYPE(16 BYTE)"), "HASHTYPE");
    }

    #[test]
    fn decimal_columns_are_disambiguated_by_precision_and_scale() {
        assert_eq!(
            parse_column_type("DECIMAL(18,0)", None, Some(18), Some(0)),
            Some(DataType::Integer)
        );
        assert_eq!(
            parse_column_type("DECIMAL(9,0)", None, Some(9), Some(0)),
            Some(DataType::Integer)
        );
        assert_eq!(
            parse_column_type("DECIMAL(36,0)", None, Some(36), Some(0)),
            Some(DataType::BigInt)
        );
        assert_eq!(
            parse_column_type("DECIMAL(20,0)", None, Some(20), Some(0)),
            Some(DataType::Decimal {
                precision: Some(20),
                scale: Some(0)
            })
        );
        assert_eq!(
            parse_column_type("DECIMAL(10,2)", None, Some(10), Some(2)),
            Some(DataType::Decimal {
                precision: Some(10),
                scale: Some(2)
            })
        );
    }

    #[test]
    fn character_types_keep_their_length() {
        assert_eq!(
            parse_column_type("VARCHAR(100) UTF8", Some(100), None, None),
            Some(DataType::Varchar { length: Some(100) })
        );
        assert_eq!(
            parse_column_type("CHAR(2) ASCII", Some(2), None, None),
            Some(DataType::Char { length: Some(2) })
        );
        assert_eq!(parse_column_type("MYSTERY", None, None, None), None);
    }

    #[test]
    fn server_version_parses_leading_components() {
        assert_eq!(
            parse_server_version("7.1.17"),
            Some(Version {
                major: 7,
                minor: 1,
                patch: 17
            })
        );
        assert_eq!(
            parse_server_version("8.24 build"),
            Some(Version {
                major: 8,
                minor: 24,
                patch: 0
            })
        );
        assert_eq!(parse_server_version("unknown"), None);
    }
}
