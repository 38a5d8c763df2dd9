//! `MERGE INTO ... USING ... ON (...)` with optional matched and
//! not-matched clauses.

use std::fmt::Write as _;

use exadialect_core::{Error, Expr, Ident, Result, TableRef};

use crate::{
    compiler::{render_ident_list, render_table_ref},
    normalize::render_ident,
    to_sql::render_expr,
};

pub type Assignments = Vec<(Ident, Expr)>;

#[derive(Debug, Clone, PartialEq)]
struct MergeClause {
    values: Assignments,
    condition: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    target: TableRef,
    source: TableRef,
    on: Expr,
    update: Option<MergeClause>,
    delete: Option<Option<Expr>>,
    insert: Option<MergeClause>,
}

impl Merge {
    /// `target` and `source` should carry their column lists: the default
    /// assignments of [`Merge::update`] and [`Merge::insert`] come from them.
    pub fn new(target: TableRef, source: TableRef, on: Expr) -> Self {
        Self {
            target,
            source,
            on,
            update: None,
            delete: None,
            insert: None,
        }
    }

    /// `WHEN MATCHED THEN UPDATE`. Without explicit values, every source
    /// column that also exists in the target and is not used by the join
    /// condition is assigned from the source.
    pub fn update(mut self, values: Option<Assignments>, condition: Option<Expr>) -> Result<Self> {
        if self.delete.is_some() {
            return Err(Error::invalid_argument(
                "MERGE cannot combine WHEN MATCHED UPDATE with WHEN MATCHED DELETE",
            ));
        }
        let values = values.unwrap_or_else(|| self.default_update_values());
        self.update = Some(MergeClause { values, condition });
        Ok(self)
    }

    /// `WHEN NOT MATCHED THEN INSERT`. Without explicit values, every source
    /// column that also exists in the target is inserted.
    #[must_use]
    pub fn insert(mut self, values: Option<Assignments>, condition: Option<Expr>) -> Self {
        let values = values.unwrap_or_else(|| self.default_insert_values());
        self.insert = Some(MergeClause { values, condition });
        self
    }

    /// `WHEN MATCHED THEN DELETE`.
    pub fn delete(mut self, condition: Option<Expr>) -> Result<Self> {
        if self.update.is_some() {
            return Err(Error::invalid_argument(
                "MERGE cannot combine WHEN MATCHED DELETE with WHEN MATCHED UPDATE",
            ));
        }
        self.delete = Some(condition);
        Ok(self)
    }

    fn default_update_values(&self) -> Assignments {
        let join_columns = self.on.referenced_columns();
        self.source
            .columns
            .iter()
            .filter(|column| self.target.has_column(column))
            .filter(|column| !join_columns.contains(column))
            .map(|column| (column.clone(), self.source.column(column.clone())))
            .collect()
    }

    fn default_insert_values(&self) -> Assignments {
        self.source
            .columns
            .iter()
            .filter(|column| self.target.has_column(column))
            .map(|column| (column.clone(), self.source.column(column.clone())))
            .collect()
    }
}

pub fn compile_merge(merge: &Merge) -> Result<String> {
    if merge.update.is_none() && merge.delete.is_none() && merge.insert.is_none() {
        return Err(Error::invalid_argument(
            "MERGE needs at least one WHEN clause",
        ));
    }

    let mut sql = format!(
        "MERGE INTO {} USING {} ON ({})",
        render_table_ref(&merge.target),
        render_table_ref(&merge.source),
        render_expr(&merge.on)
    );

    if let Some(update) = &merge.update {
        if update.values.is_empty() {
            return Err(Error::invalid_argument(
                "MERGE UPDATE has no columns to assign",
            ));
        }
        let assignments = update
            .values
            .iter()
            .map(|(column, value)| format!("{} = {}", render_ident(column), render_expr(value)))
            .collect::<Vec<_>>();
        write!(
            sql,
            " WHEN MATCHED THEN UPDATE SET {}",
            assignments.join(", ")
        )
        .expect("writing to String should not fail");
        push_condition(&mut sql, update.condition.as_ref());
    } else if let Some(condition) = &merge.delete {
        sql.push_str(" WHEN MATCHED THEN DELETE");
        push_condition(&mut sql, condition.as_ref());
    }

    if let Some(insert) = &merge.insert {
        if insert.values.is_empty() {
            return Err(Error::invalid_argument(
                "MERGE INSERT has no columns to insert",
            ));
        }
        let columns = insert
            .values
            .iter()
            .map(|(column, _)| column.clone())
            .collect::<Vec<_>>();
        let values = insert
            .values
            .iter()
            .map(|(_, value)| render_expr(value))
            .collect::<Vec<_>>();
        write!(
            sql,
            " WHEN NOT MATCHED THEN INSERT ({}) VALUES ({})",
            render_ident_list(&columns),
            values.join(", ")
        )
        .expect("writing to String should not fail");
        push_condition(&mut sql, insert.condition.as_ref());
    }

    Ok(sql)
}

fn push_condition(sql: &mut String, condition: Option<&Expr>) {
    if let Some(condition) = condition {
        write!(sql, " WHERE {}", render_expr(condition))
            .expect("writing to String should not fail");
    }
}
