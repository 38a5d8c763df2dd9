use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use exadialect_core::{
    ArgValue, CallProcedure, ColumnInfo, ConfigError, ConnectArgs, ConnectArgsBuilder, Connection,
    ConnectionUrl, CreateIndex, CreateTable, DataType, DdlCompiler, Dialect, DmlCompiler,
    DropIndex, DropTable, Error, Expr, ForeignKeyConstraint, Ident, IndexInfo, Insert,
    MetadataReflector, PrimaryKeyConstraint, ReflectPath, Result, Select, ValueCodec,
};

use super::scripted_driver::PassthroughCodec;

pub const STUB_DIALECT_NAME: &str = "stub";

#[derive(Debug, Default)]
pub struct StubDialect {
    reflector: CountingReflector,
}

impl Dialect for StubDialect {
    fn name(&self) -> &'static str {
        STUB_DIALECT_NAME
    }

    fn driver(&self) -> &'static str {
        "scripted"
    }

    fn ddl_compiler(&self) -> &dyn DdlCompiler {
        self
    }

    fn dml_compiler(&self) -> &dyn DmlCompiler {
        self
    }

    fn reflector(&self) -> &dyn MetadataReflector {
        &self.reflector
    }

    fn connect_args_builder(&self) -> &dyn ConnectArgsBuilder {
        self
    }

    fn codec(&self) -> Arc<dyn ValueCodec> {
        Arc::new(PassthroughCodec)
    }
}

impl DdlCompiler for StubDialect {
    fn create_table(&self, table: &CreateTable) -> Result<String> {
        Ok(format!("CREATE TABLE {}", table.name.name))
    }

    fn drop_table(&self, drop: &DropTable) -> Result<String> {
        Ok(format!("DROP TABLE {}", drop.name.name))
    }

    fn create_index(&self, _index: &CreateIndex) -> Result<String> {
        Err(Error::unsupported("CREATE INDEX", STUB_DIALECT_NAME))
    }

    fn drop_index(&self, _index: &DropIndex) -> Result<String> {
        Err(Error::unsupported("DROP INDEX", STUB_DIALECT_NAME))
    }

    fn type_name(&self, data_type: &DataType) -> Result<String> {
        Ok(format!("{data_type:?}"))
    }
}

impl DmlCompiler for StubDialect {
    fn select(&self, _select: &Select) -> Result<String> {
        Ok("SELECT 1".to_string())
    }

    fn insert(&self, _insert: &Insert) -> Result<String> {
        Ok("INSERT".to_string())
    }

    fn call(&self, _call: &CallProcedure) -> Result<String> {
        Err(Error::unsupported("CALL", STUB_DIALECT_NAME))
    }

    fn expr(&self, _expr: &Expr) -> Result<String> {
        Ok("1".to_string())
    }
}

impl ConnectArgsBuilder for StubDialect {
    fn build(&self, url: &ConnectionUrl) -> Result<ConnectArgs> {
        if let Some(value) = url.option("mode")
            && value != "fast"
        {
            return Err(ConfigError::InvalidOption {
                key: "mode".to_string(),
                value: value.to_string(),
                expected: "fast".to_string(),
            }
            .into());
        }
        let mut args = ConnectArgs::default();
        args.positional
            .push(ArgValue::from(url.host.clone().unwrap_or_default()));
        Ok(args)
    }
}

/// Answers every question with a fixed value and counts how often it was
/// asked.
#[derive(Debug, Default)]
pub struct CountingReflector {
    calls: AtomicUsize,
    fail_tables: bool,
}

#[allow(dead_code)]
impl CountingReflector {
    pub fn failing_tables() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_tables: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl MetadataReflector for CountingReflector {
    fn get_default_schema_name(&self, _connection: &Connection) -> Result<Option<Ident>> {
        self.record();
        Ok(Some(Ident::unquoted("sys")))
    }

    fn get_schema_names(&self, _connection: &Connection, _path: ReflectPath) -> Result<Vec<Ident>> {
        self.record();
        Ok(vec![Ident::unquoted("sys")])
    }

    fn get_table_names(
        &self,
        _connection: &Connection,
        schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<Vec<Ident>> {
        self.record();
        if self.fail_tables {
            return Err(Error::internal("table listing failed"));
        }
        Ok(match schema {
            Some(schema) => vec![Ident::unquoted(format!("{schema}_orders"))],
            None => vec![Ident::unquoted("orders")],
        })
    }

    fn has_table(
        &self,
        _connection: &Connection,
        table_name: &Ident,
        _schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<bool> {
        self.record();
        Ok(table_name == "orders")
    }

    fn get_view_names(
        &self,
        _connection: &Connection,
        _schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<Vec<Ident>> {
        self.record();
        Ok(Vec::new())
    }

    fn get_view_definition(
        &self,
        _connection: &Connection,
        _view_name: Option<&Ident>,
        _schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<Option<String>> {
        self.record();
        Ok(None)
    }

    fn get_columns(
        &self,
        _connection: &Connection,
        _table_name: Option<&Ident>,
        _schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<Vec<ColumnInfo>> {
        self.record();
        Ok(vec![ColumnInfo {
            name: Ident::unquoted("id"),
            data_type: DataType::Integer,
            nullable: false,
            default: None,
            autoincrement: true,
            is_distribution_key: false,
        }])
    }

    fn get_pk_constraint(
        &self,
        _connection: &Connection,
        _table_name: Option<&Ident>,
        _schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<PrimaryKeyConstraint> {
        self.record();
        Ok(PrimaryKeyConstraint::empty())
    }

    fn get_foreign_keys(
        &self,
        _connection: &Connection,
        _table_name: &Ident,
        _schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<Vec<ForeignKeyConstraint>> {
        self.record();
        Ok(Vec::new())
    }

    fn get_indexes(
        &self,
        _connection: &Connection,
        _table_name: &Ident,
        _schema: Option<&Ident>,
        _path: ReflectPath,
    ) -> Result<Vec<IndexInfo>> {
        self.record();
        Ok(Vec::new())
    }
}
