use super::{DataType, Expr, Ident, QualifiedName};

/// A relation usable in FROM, MERGE INTO, or MERGE USING position.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: QualifiedName,
    pub alias: Option<Ident>,
    pub columns: Vec<Ident>,
}

impl TableRef {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: QualifiedName::bare(name),
            alias: None,
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<Ident>) -> Self {
        self.name.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<Ident>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Ident>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// The name other clauses use to qualify this relation's columns.
    #[must_use]
    pub fn reference_name(&self) -> &Ident {
        self.alias.as_ref().unwrap_or(&self.name.name)
    }

    pub fn column(&self, name: impl Into<Ident>) -> Expr {
        Expr::QualifiedColumn {
            qualifier: self.reference_name().clone(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn has_column(&self, name: &Ident) -> bool {
        self.columns.iter().any(|column| column == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Wildcard,
    Expr { expr: Expr, alias: Option<Ident> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub distinct: bool,
    pub projection: Vec<SelectItem>,
    pub from: Option<TableRef>,
    pub selection: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub for_update: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableRef,
    pub columns: Vec<Ident>,
    pub values: Vec<Vec<Expr>>,
    pub returning: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: Ident,
    pub data_type: DataType,
    pub nullable: bool,
    pub default: Option<Expr>,
    pub autoincrement: bool,
    pub comment: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<Ident>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            autoincrement: false,
            comment: None,
        }
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn identity(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyDef {
    pub name: Option<Ident>,
    pub columns: Vec<Ident>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    Restrict,
    NoAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub name: Option<Ident>,
    pub columns: Vec<Ident>,
    pub referenced_table: QualifiedName,
    pub referenced_columns: Vec<Ident>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: QualifiedName,
    pub or_replace: bool,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Option<PrimaryKeyDef>,
    pub foreign_keys: Vec<ForeignKeyDef>,
    pub distribute_by: Vec<Ident>,
    pub partition_by: Vec<Ident>,
    pub comment: Option<String>,
}

impl CreateTable {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            or_replace: false,
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            distribute_by: Vec::new(),
            partition_by: Vec::new(),
            comment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndex {
    pub name: Ident,
    pub table: QualifiedName,
    pub columns: Vec<Ident>,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable {
    pub name: QualifiedName,
    pub if_exists: bool,
    pub cascade: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIndex {
    pub name: Ident,
    pub table: Option<QualifiedName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallProcedure {
    pub name: QualifiedName,
    pub args: Vec<Expr>,
}
