mod coercion;
mod compiler;
mod connect_args;
mod export_queries;
mod merge;
mod normalize;
#[cfg(feature = "odbc")]
mod odbc_transport;
mod reflection;
mod reserved_words;
mod to_sql;

use std::sync::Arc;

pub use coercion::ExasolCodec;
pub use compiler::{ExasolCompiler, UNBOUNDED_LIMIT};
pub use connect_args::{
    DEFAULT_ODBC_DRIVER, DEFAULT_PORT, OdbcConnectArgs, SSL_VERIFY_NONE, WebsocketConnectArgs,
};
use exadialect_core::{
    ConnectArgsBuilder, Connection, ConnectionUrl, DdlCompiler, Dialect, DialectRegistry,
    DmlCompiler, Driver, MetadataReflector, Result, ValueCodec, open_connection,
};
pub use merge::{Assignments, Merge, compile_merge};
pub use normalize::{
    denormalize_ident, denormalize_name, is_reserved_word, normalize_name, quote_identifier,
    render_ident, render_qualified_name, requires_quotes,
};
#[cfg(feature = "odbc")]
pub use odbc_transport::OdbcDriver;
pub use reflection::ExasolReflector;
pub use reserved_words::RESERVED_WORDS;

pub const DIALECT_NAME: &str = "exasol";

pub const WEBSOCKET_DRIVER: &str = "websocket";
pub const ODBC_DRIVER: &str = "odbc";

/// Exasol over one specific transport. The compilers, the reflector, and
/// the codec are shared; only connect-argument translation differs.
pub struct ExasolDialect {
    driver: &'static str,
    compiler: ExasolCompiler,
    reflector: ExasolReflector,
    connect_args: Box<dyn ConnectArgsBuilder>,
}

impl ExasolDialect {
    #[must_use]
    pub fn websocket() -> Self {
        Self {
            driver: WEBSOCKET_DRIVER,
            compiler: ExasolCompiler,
            reflector: ExasolReflector,
            connect_args: Box::new(WebsocketConnectArgs),
        }
    }

    #[must_use]
    pub fn odbc() -> Self {
        Self {
            driver: ODBC_DRIVER,
            compiler: ExasolCompiler,
            reflector: ExasolReflector,
            connect_args: Box::new(OdbcConnectArgs),
        }
    }

    /// The concrete reflector, for the operations outside the generic
    /// reflection contract (`has_schema`, `server_version_info`).
    #[must_use]
    pub const fn exasol_reflector(&self) -> &ExasolReflector {
        &self.reflector
    }
}

impl std::fmt::Debug for ExasolDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExasolDialect")
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

impl Dialect for ExasolDialect {
    fn name(&self) -> &'static str {
        DIALECT_NAME
    }

    fn driver(&self) -> &'static str {
        self.driver
    }

    fn ddl_compiler(&self) -> &dyn DdlCompiler {
        &self.compiler
    }

    fn dml_compiler(&self) -> &dyn DmlCompiler {
        &self.compiler
    }

    fn reflector(&self) -> &dyn MetadataReflector {
        &self.reflector
    }

    fn connect_args_builder(&self) -> &dyn ConnectArgsBuilder {
        self.connect_args.as_ref()
    }

    fn codec(&self) -> Arc<dyn ValueCodec> {
        Arc::new(ExasolCodec)
    }
}

fn websocket_dialect() -> Box<dyn Dialect> {
    Box::new(ExasolDialect::websocket())
}

fn odbc_dialect() -> Box<dyn Dialect> {
    Box::new(ExasolDialect::odbc())
}

/// Registers every URL scheme this crate answers to. The bare `exa` scheme
/// selects the websocket transport.
pub fn register_dialects(registry: &mut DialectRegistry) {
    registry
        .register("exa", websocket_dialect)
        .register("exa+websocket", websocket_dialect)
        .register("exa+odbc", odbc_dialect)
        .register("exa+pyodbc", odbc_dialect);
}

#[must_use]
pub fn default_registry() -> DialectRegistry {
    let mut registry = DialectRegistry::new();
    register_dialects(&mut registry);
    registry
}

/// Parses `url`, resolves its scheme, validates the options, and only then
/// asks `driver` for a connection.
pub fn connect(url: &str, registry: &DialectRegistry, driver: &dyn Driver) -> Result<Connection> {
    let url = ConnectionUrl::parse(url)?;
    let dialect = registry.resolve(&url.scheme)?;
    open_connection(dialect.as_ref(), &url, driver)
}
