mod expr;
mod ident;
mod statement;
mod types;

pub use expr::{ComparisonOp, Expr, IsTest};
pub use ident::{Ident, QualifiedName};
pub use statement::{
    CallProcedure, ColumnDef, CreateIndex, CreateTable, DropIndex, DropTable, ForeignKeyDef,
    Insert, OrderByExpr, PrimaryKeyDef, ReferentialAction, Select, SelectItem, TableRef,
};
pub use types::{DataType, Value, WireValue};
