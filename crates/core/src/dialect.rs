use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::debug;

use crate::{
    CallProcedure, ColumnInfo, ConfigError, ConnectArgs, Connection, ConnectionUrl, CreateIndex,
    CreateTable, DataType, Driver, DropIndex, DropTable, Expr, ForeignKeyConstraint, Ident,
    IndexInfo, Insert, PrimaryKeyConstraint, ReflectPath, Result, Select, ValueCodec,
};

pub trait DdlCompiler: Send + Sync {
    fn create_table(&self, table: &CreateTable) -> Result<String>;
    fn drop_table(&self, drop: &DropTable) -> Result<String>;
    fn create_index(&self, index: &CreateIndex) -> Result<String>;
    fn drop_index(&self, index: &DropIndex) -> Result<String>;
    fn type_name(&self, data_type: &DataType) -> Result<String>;
}

pub trait DmlCompiler: Send + Sync {
    fn select(&self, select: &Select) -> Result<String>;
    fn insert(&self, insert: &Insert) -> Result<String>;
    fn call(&self, call: &CallProcedure) -> Result<String>;
    fn expr(&self, expr: &Expr) -> Result<String>;
}

/// Structural questions about a live database.
///
/// Implementations must only read: every call has to be safe to memoize
/// (see [`crate::CachedReflector`]). Names come in and go out in the
/// calling abstraction's lower-case canonical form.
pub trait MetadataReflector: Send + Sync {
    fn get_default_schema_name(&self, connection: &Connection) -> Result<Option<Ident>>;

    fn get_schema_names(&self, connection: &Connection, path: ReflectPath) -> Result<Vec<Ident>>;

    fn get_table_names(
        &self,
        connection: &Connection,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<Ident>>;

    fn has_table(
        &self,
        connection: &Connection,
        table_name: &Ident,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<bool>;

    fn get_view_names(
        &self,
        connection: &Connection,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<Ident>>;

    fn get_view_definition(
        &self,
        connection: &Connection,
        view_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Option<String>>;

    fn get_columns(
        &self,
        connection: &Connection,
        table_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<ColumnInfo>>;

    fn get_pk_constraint(
        &self,
        connection: &Connection,
        table_name: Option<&Ident>,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<PrimaryKeyConstraint>;

    fn get_foreign_keys(
        &self,
        connection: &Connection,
        table_name: &Ident,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<ForeignKeyConstraint>>;

    fn get_indexes(
        &self,
        connection: &Connection,
        table_name: &Ident,
        schema: Option<&Ident>,
        path: ReflectPath,
    ) -> Result<Vec<IndexInfo>>;
}

pub trait ConnectArgsBuilder: Send + Sync {
    fn build(&self, url: &ConnectionUrl) -> Result<ConnectArgs>;
}

pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;
    fn driver(&self) -> &'static str;
    fn ddl_compiler(&self) -> &dyn DdlCompiler;
    fn dml_compiler(&self) -> &dyn DmlCompiler;
    fn reflector(&self) -> &dyn MetadataReflector;
    fn connect_args_builder(&self) -> &dyn ConnectArgsBuilder;
    fn codec(&self) -> Arc<dyn ValueCodec>;
}

/// Builds connect arguments (failing on configuration errors before any
/// I/O happens) and opens a connection through `driver`.
pub fn open_connection(
    dialect: &dyn Dialect,
    url: &ConnectionUrl,
    driver: &dyn Driver,
) -> Result<Connection> {
    let args = dialect.connect_args_builder().build(url)?;
    debug!(
        dialect = dialect.name(),
        driver = dialect.driver(),
        host = url.host.as_deref().unwrap_or_default(),
        "connecting"
    );
    Connection::open(driver, &args, dialect.codec())
}

pub type DialectFactory = fn() -> Box<dyn Dialect>;

/// Explicit scheme-to-dialect mapping, built once at start-up and passed
/// to whoever needs to resolve a URL.
#[derive(Default, Clone)]
pub struct DialectRegistry {
    factories: BTreeMap<String, DialectFactory>,
}

impl DialectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scheme: impl Into<String>, factory: DialectFactory) -> &mut Self {
        self.factories
            .insert(scheme.into().to_ascii_lowercase(), factory);
        self
    }

    pub fn resolve(&self, scheme: &str) -> Result<Box<dyn Dialect>> {
        self.factories
            .get(&scheme.to_ascii_lowercase())
            .map(|factory| factory())
            .ok_or_else(|| {
                ConfigError::UnknownDialect {
                    scheme: scheme.to_string(),
                }
                .into()
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
