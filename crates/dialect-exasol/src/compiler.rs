use std::fmt::Write as _;

use exadialect_core::{
    CallProcedure, ColumnDef, CreateIndex, CreateTable, DataType, DdlCompiler, DmlCompiler,
    DropIndex, DropTable, Error, Expr, ForeignKeyDef, Insert, ReferentialAction, Result, Select,
    SelectItem, TableRef,
};
use tracing::debug;

use crate::{
    DIALECT_NAME,
    merge::{Merge, compile_merge},
    normalize::{render_ident, render_qualified_name},
    to_sql::{render_data_type, render_expr, render_string},
};

/// `LIMIT` value standing in for "no limit" when only an offset is given.
pub const UNBOUNDED_LIMIT: u64 = 1_000_000_000_000_000_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct ExasolCompiler;

impl ExasolCompiler {
    pub fn merge(&self, merge: &Merge) -> Result<String> {
        compile_merge(merge)
    }
}

impl DdlCompiler for ExasolCompiler {
    fn create_table(&self, table: &CreateTable) -> Result<String> {
        if table.columns.is_empty() {
            return Err(Error::invalid_argument(format!(
                "table {} has no columns",
                render_qualified_name(&table.name)
            )));
        }

        let mut definitions = table
            .columns
            .iter()
            .map(render_column)
            .collect::<Result<Vec<_>>>()?;

        if let Some(primary_key) = &table.primary_key {
            let mut sql = String::new();
            if let Some(name) = &primary_key.name {
                write!(sql, "CONSTRAINT {} ", render_ident(name))
                    .expect("writing to String should not fail");
            }
            write!(sql, "PRIMARY KEY ({})", render_ident_list(&primary_key.columns))
                .expect("writing to String should not fail");
            definitions.push(sql);
        }

        for foreign_key in &table.foreign_keys {
            definitions.push(render_foreign_key(foreign_key)?);
        }

        if !table.distribute_by.is_empty() {
            definitions.push(format!(
                "DISTRIBUTE BY {}",
                render_ident_list(&table.distribute_by)
            ));
        }
        if !table.partition_by.is_empty() {
            definitions.push(format!(
                "PARTITION BY {}",
                render_ident_list(&table.partition_by)
            ));
        }

        let mut sql = String::from("CREATE ");
        if table.or_replace {
            sql.push_str("OR REPLACE ");
        }
        write!(
            sql,
            "TABLE {} ({})",
            render_qualified_name(&table.name),
            definitions.join(", ")
        )
        .expect("writing to String should not fail");
        if let Some(comment) = &table.comment {
            write!(sql, " COMMENT IS {}", render_string(comment))
                .expect("writing to String should not fail");
        }
        Ok(sql)
    }

    fn drop_table(&self, drop: &DropTable) -> Result<String> {
        let mut sql = String::from("DROP TABLE ");
        if drop.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&render_qualified_name(&drop.name));
        if drop.cascade {
            sql.push_str(" CASCADE CONSTRAINTS");
        }
        Ok(sql)
    }

    fn create_index(&self, index: &CreateIndex) -> Result<String> {
        Err(Error::unsupported(
            format!("CREATE INDEX {}", index.name),
            DIALECT_NAME,
        ))
    }

    fn drop_index(&self, index: &DropIndex) -> Result<String> {
        Err(Error::unsupported(
            format!("DROP INDEX {}", index.name),
            DIALECT_NAME,
        ))
    }

    fn type_name(&self, data_type: &DataType) -> Result<String> {
        render_data_type(data_type)
    }
}

impl DmlCompiler for ExasolCompiler {
    fn select(&self, select: &Select) -> Result<String> {
        let mut sql = String::from("SELECT ");
        if select.distinct {
            sql.push_str("DISTINCT ");
        }

        if select.projection.is_empty() {
            sql.push('*');
        } else {
            let items = select
                .projection
                .iter()
                .map(|item| match item {
                    SelectItem::Wildcard => "*".to_string(),
                    SelectItem::Expr { expr, alias: None } => render_expr(expr),
                    SelectItem::Expr {
                        expr,
                        alias: Some(alias),
                    } => format!("{} AS {}", render_expr(expr), render_ident(alias)),
                })
                .collect::<Vec<_>>();
            sql.push_str(&items.join(", "));
        }

        match &select.from {
            Some(table) => write!(sql, " FROM {}", render_table_ref(table))
                .expect("writing to String should not fail"),
            None => sql.push_str(" FROM DUAL"),
        }

        if let Some(selection) = &select.selection {
            write!(sql, " WHERE {}", render_expr(selection))
                .expect("writing to String should not fail");
        }

        if !select.order_by.is_empty() {
            let order_by = select
                .order_by
                .iter()
                .map(|item| {
                    if item.descending {
                        format!("{} DESC", render_expr(&item.expr))
                    } else {
                        render_expr(&item.expr)
                    }
                })
                .collect::<Vec<_>>();
            write!(sql, " ORDER BY {}", order_by.join(", "))
                .expect("writing to String should not fail");
        }

        sql.push_str(&limit_clause(select.limit, select.offset));

        if select.for_update {
            debug!("dropping FOR UPDATE, Exasol has no row locks");
        }
        Ok(sql)
    }

    fn insert(&self, insert: &Insert) -> Result<String> {
        if !insert.returning.is_empty() {
            return Err(Error::unsupported("INSERT ... RETURNING", DIALECT_NAME));
        }
        if insert.columns.is_empty() {
            return Err(Error::invalid_argument("INSERT needs at least one column"));
        }

        let rows = if insert.values.is_empty() {
            vec![vec!["?"; insert.columns.len()].join(", ")]
        } else {
            insert
                .values
                .iter()
                .map(|row| {
                    if row.len() != insert.columns.len() {
                        return Err(Error::invalid_argument(format!(
                            "INSERT row has {} values for {} columns",
                            row.len(),
                            insert.columns.len()
                        )));
                    }
                    Ok(row.iter().map(render_expr).collect::<Vec<_>>().join(", "))
                })
                .collect::<Result<Vec<_>>>()?
        };

        Ok(format!(
            "INSERT INTO {} ({}) VALUES {}",
            render_qualified_name(&insert.table.name),
            render_ident_list(&insert.columns),
            rows.iter()
                .map(|row| format!("({row})"))
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn call(&self, call: &CallProcedure) -> Result<String> {
        Err(Error::unsupported(
            format!("CALL {}", render_qualified_name(&call.name)),
            DIALECT_NAME,
        ))
    }

    fn expr(&self, expr: &Expr) -> Result<String> {
        Ok(render_expr(expr))
    }
}

pub(crate) fn limit_clause(limit: Option<u64>, offset: Option<u64>) -> String {
    match (limit, offset) {
        (None, None) => String::new(),
        (Some(limit), None) => format!(" LIMIT {limit}"),
        (Some(limit), Some(offset)) => format!(" LIMIT {limit} OFFSET {offset}"),
        (None, Some(offset)) => format!(" LIMIT {UNBOUNDED_LIMIT} OFFSET {offset}"),
    }
}

pub(crate) fn render_table_ref(table: &TableRef) -> String {
    match &table.alias {
        Some(alias) => format!(
            "{} {}",
            render_qualified_name(&table.name),
            render_ident(alias)
        ),
        None => render_qualified_name(&table.name),
    }
}

pub(crate) fn render_ident_list(idents: &[exadialect_core::Ident]) -> String {
    idents.iter().map(render_ident).collect::<Vec<_>>().join(", ")
}

fn render_column(column: &ColumnDef) -> Result<String> {
    let mut sql = format!(
        "{} {}",
        render_ident(&column.name),
        render_data_type(&column.data_type)?
    );

    if column.autoincrement {
        sql.push_str(" IDENTITY");
    }
    if let Some(default) = &column.default {
        write!(sql, " DEFAULT {}", render_expr(default))
            .expect("writing to String should not fail");
    }
    if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    if let Some(comment) = &column.comment {
        write!(sql, " COMMENT IS {}", render_string(comment))
            .expect("writing to String should not fail");
    }
    Ok(sql)
}

fn render_foreign_key(foreign_key: &ForeignKeyDef) -> Result<String> {
    for action in [foreign_key.on_delete, foreign_key.on_update]
        .into_iter()
        .flatten()
    {
        match action {
            ReferentialAction::Cascade => {
                return Err(Error::unsupported(
                    "foreign key action CASCADE",
                    DIALECT_NAME,
                ));
            }
            ReferentialAction::SetNull => {
                return Err(Error::unsupported(
                    "foreign key action SET NULL",
                    DIALECT_NAME,
                ));
            }
            ReferentialAction::Restrict | ReferentialAction::NoAction => {}
        }
    }

    let mut sql = String::new();
    if let Some(name) = &foreign_key.name {
        write!(sql, "CONSTRAINT {} ", render_ident(name))
            .expect("writing to String should not fail");
    }
    write!(
        sql,
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        render_ident_list(&foreign_key.columns),
        render_qualified_name(&foreign_key.referenced_table),
        render_ident_list(&foreign_key.referenced_columns)
    )
    .expect("writing to String should not fail");
    Ok(sql)
}
