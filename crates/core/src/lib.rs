mod cache;
mod config;
mod dbapi;
mod dialect;
mod error;
mod ir;
mod reflect;
mod transport;

pub use cache::{CacheKey, CachedReflector, ReflectionCache};
pub use config::{ArgValue, ConnectArgs, ConnectionUrl, Version};
pub use dbapi::{Connection, ConnectionId, Cursor, ROWCOUNT_UNKNOWN, Row, ValueCodec};
pub use dialect::{
    ConnectArgsBuilder, DdlCompiler, Dialect, DialectFactory, DialectRegistry, DmlCompiler,
    MetadataReflector, open_connection,
};
pub use error::{BoxError, ConfigError, Error, ObjectKind, Resource, Result};
pub use ir::{
    CallProcedure, ColumnDef, ComparisonOp, CreateIndex, CreateTable, DataType, DropIndex,
    DropTable, Expr, ForeignKeyDef, Ident, Insert, IsTest, OrderByExpr, PrimaryKeyDef,
    QualifiedName, ReferentialAction, Select, SelectItem, TableRef, Value, WireValue,
};
pub use reflect::{
    ColumnInfo, ForeignKeyConstraint, IndexInfo, PrimaryKeyConstraint, ReflectPath,
};
pub use transport::{
    CatalogRequest, ColumnDescription, Driver, QueryOutcome, ResultSet, TableKind, Transport,
    layout,
};
