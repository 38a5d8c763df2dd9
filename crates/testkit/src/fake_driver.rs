use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
};

use exadialect_core::{
    BoxError, CatalogRequest, ColumnDescription, ConnectArgs, Driver, QueryOutcome, ResultSet,
    TableKind, Transport, WireValue, layout,
};

use crate::catalog_fixture::{CatalogFixture, ColumnFixture};

pub const FAKE_DRIVER_NAME: &str = "fake-exasol";

/// Everything the fake observed, plus the knobs tests turn.
#[derive(Debug, Default)]
pub struct FakeState {
    pub executed: Vec<(String, Vec<WireValue>)>,
    pub catalog_requests: Vec<CatalogRequest>,
    pub connect_args: Vec<ConnectArgs>,
    pub canned: Vec<(String, ResultSet)>,
    pub fail_connect: Option<String>,
    pub fail_execute: Option<String>,
    pub close_count: usize,
    pub commit_count: usize,
    pub rollback_count: usize,
}

impl FakeState {
    /// Statements sent through the SQL channel.
    pub fn sql_call_count(&self) -> usize {
        self.executed.len()
    }

    /// Requests sent through the driver's catalog channel.
    pub fn native_call_count(&self) -> usize {
        self.catalog_requests.len()
    }
}

/// In-memory stand-in for an Exasol server. Answers catalog requests and
/// the `SYS` view queries of the fallback path from the same fixture, so
/// both paths see one catalog.
#[derive(Debug, Clone)]
pub struct FakeDriver {
    catalog: Arc<CatalogFixture>,
    state: Arc<Mutex<FakeState>>,
    plain_column_catalog: bool,
}

impl FakeDriver {
    pub fn new(catalog: CatalogFixture) -> Self {
        Self {
            catalog: Arc::new(catalog),
            state: Arc::new(Mutex::new(FakeState::default())),
            plain_column_catalog: false,
        }
    }

    /// Column catalog answers stop at the standard ODBC `SQLColumns`
    /// columns, without `IS_IDENTITY` and `IS_DISTRIBUTION_KEY`.
    #[must_use]
    pub fn with_plain_column_catalog(mut self) -> Self {
        self.plain_column_catalog = true;
        self
    }

    /// Any statement containing `fragment` answers with `result` instead of
    /// the fixture.
    pub fn respond_to(&self, fragment: impl Into<String>, result: ResultSet) {
        let fragment = fragment.into();
        self.with_state(|state| state.canned.push((fragment, result)));
    }

    pub fn fail_connect(&self, message: impl Into<String>) {
        let message = message.into();
        self.with_state(|state| state.fail_connect = Some(message));
    }

    pub fn fail_execute(&self, message: impl Into<String>) {
        let message = message.into();
        self.with_state(|state| state.fail_execute = Some(message));
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.with_state(|state| state.executed.iter().map(|(sql, _)| sql.clone()).collect())
    }

    pub fn sql_call_count(&self) -> usize {
        self.with_state(|state| state.sql_call_count())
    }

    pub fn native_call_count(&self) -> usize {
        self.with_state(|state| state.native_call_count())
    }

    pub fn last_connect_args(&self) -> Option<ConnectArgs> {
        self.with_state(|state| state.connect_args.last().cloned())
    }

    pub fn reset_counters(&self) {
        self.with_state(|state| {
            state.executed.clear();
            state.catalog_requests.clear();
        });
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Driver for FakeDriver {
    fn name(&self) -> &str {
        FAKE_DRIVER_NAME
    }

    fn connect(&self, args: &ConnectArgs) -> Result<Box<dyn Transport>, BoxError> {
        let failure = self.with_state(|state| {
            state.connect_args.push(args.clone());
            state.fail_connect.clone()
        });
        if let Some(message) = failure {
            return Err(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                message,
            )));
        }

        Ok(Box::new(FakeTransport {
            driver: self.clone(),
        }))
    }
}

struct FakeTransport {
    driver: FakeDriver,
}

impl Transport for FakeTransport {
    fn execute(&mut self, sql: &str, params: &[WireValue]) -> Result<QueryOutcome, BoxError> {
        let (failure, canned) = self.driver.with_state(|state| {
            state.executed.push((sql.to_string(), params.to_vec()));
            let canned = state
                .canned
                .iter()
                .find(|(fragment, _)| sql.contains(fragment.as_str()))
                .map(|(_, result)| result.clone());
            (state.fail_execute.clone(), canned)
        });
        if let Some(message) = failure {
            return Err(Box::new(io::Error::other(message)));
        }
        if let Some(result) = canned {
            return Ok(QueryOutcome::Rows(result));
        }

        let params = params
            .iter()
            .map(|param| param.to_text().unwrap_or_default())
            .collect::<Vec<_>>();
        Ok(answer_sql(&self.driver.catalog, sql, &params))
    }

    fn execute_batch(
        &mut self,
        sql: &str,
        param_sets: &[Vec<WireValue>],
    ) -> Result<i64, BoxError> {
        let mut total = 0;
        for params in param_sets {
            if let QueryOutcome::RowCount(count) = self.execute(sql, params)? {
                total += count;
            }
        }
        Ok(total)
    }

    fn catalog(&mut self, request: &CatalogRequest) -> Result<ResultSet, BoxError> {
        let failure = self.driver.with_state(|state| {
            state.catalog_requests.push(request.clone());
            state.fail_execute.clone()
        });
        if let Some(message) = failure {
            return Err(Box::new(io::Error::other(message)));
        }
        let answer = answer_catalog(&self.driver.catalog, request);
        if self.driver.plain_column_catalog && matches!(request, CatalogRequest::Columns { .. }) {
            return Ok(without_exasol_column_flags(answer));
        }
        Ok(answer)
    }

    fn set_autocommit(&mut self, _enabled: bool) -> Result<(), BoxError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), BoxError> {
        self.driver.with_state(|state| state.commit_count += 1);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), BoxError> {
        self.driver.with_state(|state| state.rollback_count += 1);
        Ok(())
    }

    fn close(&mut self) -> Result<(), BoxError> {
        self.driver.with_state(|state| state.close_count += 1);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Text,
    Number,
    Flag,
}

impl Kind {
    fn describe(self, name: &str) -> ColumnDescription {
        match self {
            Self::Text => ColumnDescription::new(name, "VARCHAR"),
            Self::Number => ColumnDescription::new(name, "DECIMAL").with_precision(18, 0),
            Self::Flag => ColumnDescription::new(name, "BOOLEAN"),
        }
    }
}

fn result(columns: &[(&str, Kind)], rows: Vec<Vec<WireValue>>) -> ResultSet {
    ResultSet::new(
        columns
            .iter()
            .map(|(name, kind)| kind.describe(name))
            .collect(),
        rows,
    )
}

fn text(value: &str) -> WireValue {
    WireValue::Text(value.to_string())
}

fn optional_text(value: Option<&str>) -> WireValue {
    value.map_or(WireValue::Null, text)
}

fn number(value: Option<i64>) -> WireValue {
    value.map_or(WireValue::Null, WireValue::Int)
}

fn ordinal(index: usize) -> WireValue {
    WireValue::Int(i64::try_from(index + 1).unwrap_or(i64::MAX))
}

fn answer_catalog(catalog: &CatalogFixture, request: &CatalogRequest) -> ResultSet {
    match request {
        CatalogRequest::Schemas => result(
            &[(layout::TABLE_SCHEM, Kind::Text)],
            catalog.schemas.keys().map(|name| vec![text(name)]).collect(),
        ),
        CatalogRequest::Tables { schema, kind } => {
            let names = catalog
                .schema(schema)
                .map(|fixture| match kind {
                    TableKind::Table => fixture.tables.keys().cloned().collect::<Vec<_>>(),
                    TableKind::View => fixture.views.keys().cloned().collect::<Vec<_>>(),
                })
                .unwrap_or_default();
            result(
                &[
                    (layout::TABLE_SCHEM, Kind::Text),
                    (layout::TABLE_NAME, Kind::Text),
                    (layout::TABLE_TYPE, Kind::Text),
                ],
                names
                    .iter()
                    .map(|name| vec![text(schema), text(name), text(kind.as_str())])
                    .collect(),
            )
        }
        CatalogRequest::Columns { schema, table } => {
            let columns = catalog.columns_of(schema, table.as_deref());
            let mut rows = Vec::with_capacity(columns.len());
            let mut previous_object = "";
            let mut position = 0;
            for (object, column) in columns {
                if object != previous_object {
                    previous_object = object;
                    position = 0;
                }
                rows.push(native_column_row(schema, object, column, position));
                position += 1;
            }
            result(
                &[
                    (layout::TABLE_SCHEM, Kind::Text),
                    (layout::TABLE_NAME, Kind::Text),
                    (layout::COLUMN_NAME, Kind::Text),
                    (layout::TYPE_NAME, Kind::Text),
                    (layout::COLUMN_SIZE, Kind::Number),
                    (layout::DECIMAL_DIGITS, Kind::Number),
                    (layout::NULLABLE, Kind::Number),
                    (layout::COLUMN_DEF, Kind::Text),
                    (layout::ORDINAL_POSITION, Kind::Number),
                    (layout::IS_IDENTITY, Kind::Flag),
                    (layout::IS_DISTRIBUTION_KEY, Kind::Flag),
                ],
                rows,
            )
        }
        CatalogRequest::PrimaryKeys { schema, table } => {
            let rows = catalog
                .table(schema, table)
                .and_then(|fixture| fixture.primary_key.as_ref())
                .map(|key| {
                    key.columns
                        .iter()
                        .enumerate()
                        .map(|(index, column)| {
                            vec![
                                text(schema),
                                text(table),
                                text(column),
                                ordinal(index),
                                text(&key.name),
                            ]
                        })
                        .collect()
                })
                .unwrap_or_default();
            result(
                &[
                    (layout::TABLE_SCHEM, Kind::Text),
                    (layout::TABLE_NAME, Kind::Text),
                    (layout::COLUMN_NAME, Kind::Text),
                    (layout::KEY_SEQ, Kind::Number),
                    (layout::PK_NAME, Kind::Text),
                ],
                rows,
            )
        }
        CatalogRequest::ForeignKeys { schema, table } => {
            let mut rows = Vec::new();
            for key in catalog
                .table(schema, table)
                .map(|fixture| fixture.foreign_keys.as_slice())
                .unwrap_or_default()
            {
                let referred_schema = key.referred_schema.as_deref().unwrap_or(schema);
                for (index, (column, referred)) in
                    key.columns.iter().zip(&key.referred_columns).enumerate()
                {
                    rows.push(vec![
                        text(referred_schema),
                        text(&key.referred_table),
                        text(referred),
                        text(table),
                        text(column),
                        ordinal(index),
                        text(&key.name),
                    ]);
                }
            }
            result(
                &[
                    (layout::PKTABLE_SCHEM, Kind::Text),
                    (layout::PKTABLE_NAME, Kind::Text),
                    (layout::PKCOLUMN_NAME, Kind::Text),
                    (layout::FKTABLE_NAME, Kind::Text),
                    (layout::FKCOLUMN_NAME, Kind::Text),
                    (layout::KEY_SEQ, Kind::Number),
                    (layout::FK_NAME, Kind::Text),
                ],
                rows,
            )
        }
    }
}

fn without_exasol_column_flags(mut answer: ResultSet) -> ResultSet {
    let extensions = [layout::IS_IDENTITY, layout::IS_DISTRIBUTION_KEY];
    let keep = answer
        .columns
        .iter()
        .map(|column| !extensions.contains(&column.name.as_str()))
        .collect::<Vec<_>>();
    answer
        .columns
        .retain(|column| !extensions.contains(&column.name.as_str()));
    for row in &mut answer.rows {
        let mut index = 0;
        row.retain(|_| {
            let kept = keep.get(index).copied().unwrap_or(true);
            index += 1;
            kept
        });
    }
    answer
}

fn native_column_row(
    schema: &str,
    object: &str,
    column: &ColumnFixture,
    position: usize,
) -> Vec<WireValue> {
    vec![
        text(schema),
        text(object),
        text(&column.name),
        text(&column.base_type()),
        number(column.size()),
        number(column.scale()),
        WireValue::Int(i64::from(column.nullable)),
        optional_text(column.default.as_deref()),
        ordinal(position),
        WireValue::Bool(column.identity),
        WireValue::Bool(column.distribution_key),
    ]
}

fn fallback_column_row(object: &str, column: &ColumnFixture) -> Vec<WireValue> {
    vec![
        text(&column.name),
        text(&column.column_type),
        number(column.size()),
        number(column.precision()),
        number(column.scale()),
        WireValue::Bool(column.nullable),
        optional_text(column.default.as_deref()),
        if column.identity {
            text("1")
        } else {
            WireValue::Null
        },
        WireValue::Bool(column.distribution_key),
        text(object),
    ]
}

/// Recognizes the system view queries by the view they read and answers
/// from the fixture. Anything unrecognized is treated as DML.
fn answer_sql(catalog: &CatalogFixture, sql: &str, params: &[String]) -> QueryOutcome {
    let param = |index: usize| params.get(index).map(String::as_str).unwrap_or_default();
    let upper = sql.to_ascii_uppercase();

    let rows = if upper.contains("CURRENT_SCHEMA") {
        result(
            &[("CURRENT_SCHEMA", Kind::Text)],
            vec![vec![optional_text(catalog.default_schema.as_deref())]],
        )
    } else if upper.contains("SYS.EXA_METADATA") {
        result(
            &[("PARAM_VALUE", Kind::Text)],
            catalog
                .version
                .iter()
                .map(|version| vec![text(version)])
                .collect(),
        )
    } else if upper.contains("SYS.EXA_SCHEMAS") {
        result(
            &[("SCHEMA_NAME", Kind::Text)],
            catalog.schemas.keys().map(|name| vec![text(name)]).collect(),
        )
    } else if upper.contains("SYS.EXA_ALL_TABLES") {
        result(
            &[("TABLE_NAME", Kind::Text)],
            catalog
                .schema(param(0))
                .map(|fixture| fixture.tables.keys().map(|name| vec![text(name)]).collect())
                .unwrap_or_default(),
        )
    } else if upper.contains("SYS.EXA_ALL_VIEWS") && upper.contains("VIEW_TEXT") {
        result(
            &[("VIEW_TEXT", Kind::Text)],
            catalog
                .view(param(0), param(1))
                .map(|view| vec![vec![text(&view.definition)]])
                .unwrap_or_default(),
        )
    } else if upper.contains("SYS.EXA_ALL_VIEWS") {
        result(
            &[("VIEW_NAME", Kind::Text)],
            catalog
                .schema(param(0))
                .map(|fixture| fixture.views.keys().map(|name| vec![text(name)]).collect())
                .unwrap_or_default(),
        )
    } else if upper.contains("SYS.EXA_ALL_COLUMNS") {
        let object = (params.len() > 1).then(|| param(1));
        result(
            &[
                ("COLUMN_NAME", Kind::Text),
                ("COLUMN_TYPE", Kind::Text),
                ("COLUMN_MAXSIZE", Kind::Number),
                ("COLUMN_NUM_PREC", Kind::Number),
                ("COLUMN_NUM_SCALE", Kind::Number),
                ("COLUMN_IS_NULLABLE", Kind::Flag),
                ("COLUMN_DEFAULT", Kind::Text),
                ("COLUMN_IDENTITY", Kind::Text),
                ("COLUMN_IS_DISTRIBUTION_KEY", Kind::Flag),
                ("COLUMN_TABLE", Kind::Text),
            ],
            catalog
                .columns_of(param(0), object)
                .into_iter()
                .map(|(object, column)| fallback_column_row(object, column))
                .collect(),
        )
    } else if upper.contains("SYS.EXA_ALL_CONSTRAINT_COLUMNS") && upper.contains("'PRIMARY KEY'")
    {
        result(
            &[("CONSTRAINT_NAME", Kind::Text), ("COLUMN_NAME", Kind::Text)],
            catalog
                .table(param(0), param(1))
                .and_then(|fixture| fixture.primary_key.as_ref())
                .map(|key| {
                    key.columns
                        .iter()
                        .map(|column| vec![text(&key.name), text(column)])
                        .collect()
                })
                .unwrap_or_default(),
        )
    } else if upper.contains("SYS.EXA_ALL_CONSTRAINT_COLUMNS") && upper.contains("'FOREIGN KEY'")
    {
        let schema = param(0);
        let mut rows = Vec::new();
        if let Some(fixture) = catalog.table(schema, param(1)) {
            let mut keys = fixture.foreign_keys.iter().collect::<Vec<_>>();
            keys.sort_by(|left, right| left.name.cmp(&right.name));
            for key in keys {
                let referred_schema = key.referred_schema.as_deref().unwrap_or(schema);
                for (column, referred) in key.columns.iter().zip(&key.referred_columns) {
                    rows.push(vec![
                        text(&key.name),
                        text(column),
                        text(referred_schema),
                        text(&key.referred_table),
                        text(referred),
                    ]);
                }
            }
        }
        result(
            &[
                ("CONSTRAINT_NAME", Kind::Text),
                ("COLUMN_NAME", Kind::Text),
                ("REFERENCED_SCHEMA", Kind::Text),
                ("REFERENCED_TABLE", Kind::Text),
                ("REFERENCED_COLUMN", Kind::Text),
            ],
            rows,
        )
    } else if upper.trim_start().starts_with("SELECT") {
        ResultSet::default()
    } else {
        return QueryOutcome::RowCount(0);
    };

    QueryOutcome::Rows(rows)
}
