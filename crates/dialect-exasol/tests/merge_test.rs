use exadialect_core::{Expr, Ident, TableRef};
use exadialect_exasol::{ExasolCompiler, Merge, compile_merge};

fn target() -> TableRef {
    TableRef::new("t").with_columns(["id", "name", "age"])
}

fn source() -> TableRef {
    TableRef::new("s").with_columns(["id", "age"])
}

fn join() -> Expr {
    target().column("id").equals(source().column("id"))
}

#[test]
fn default_update_assigns_shared_non_key_columns() {
    let merge = Merge::new(target(), source(), join())
        .update(None, None)
        .expect("update should be accepted");

    let sql = compile_merge(&merge).expect("merge should compile");

    assert_eq!(
        sql,
        "MERGE INTO t USING s ON (t.id = s.id) WHEN MATCHED THEN UPDATE SET age = s.age"
    );
}

#[test]
fn default_insert_copies_every_shared_column() {
    let merge = Merge::new(target(), source(), join()).insert(None, None);

    let sql = compile_merge(&merge).expect("merge should compile");

    assert_eq!(
        sql,
        "MERGE INTO t USING s ON (t.id = s.id) \
WHEN NOT MATCHED THEN INSERT (id, age) VALUES (s.id, s.age)"
    );
}

#[test]
fn explicit_values_and_conditions_are_rendered() {
    let merge = Merge::new(target(), source(), join())
        .update(
            Some(vec![(
                Ident::unquoted("name"),
                Expr::literal("updated"),
            )]),
            Some(source().column("age").greater_than(Expr::literal(18_i64))),
        )
        .expect("update should be accepted")
        .insert(
            Some(vec![
                (Ident::unquoted("id"), source().column("id")),
                (Ident::unquoted("name"), Expr::literal("new")),
            ]),
            None,
        );

    let sql = ExasolCompiler.merge(&merge).expect("merge should compile");

    assert_eq!(
        sql,
        "MERGE INTO t USING s ON (t.id = s.id) \
WHEN MATCHED THEN UPDATE SET name = 'updated' WHERE s.age > 18 \
WHEN NOT MATCHED THEN INSERT (id, name) VALUES (s.id, 'new')"
    );
}

#[test]
fn delete_clause_renders_with_its_condition() {
    let merge = Merge::new(target(), source(), join())
        .delete(Some(source().column("age").is_null()))
        .expect("delete should be accepted");

    let sql = compile_merge(&merge).expect("merge should compile");

    assert_eq!(
        sql,
        "MERGE INTO t USING s ON (t.id = s.id) WHEN MATCHED THEN DELETE WHERE s.age IS NULL"
    );
}

#[test]
fn update_and_delete_are_mutually_exclusive() {
    let after_update = Merge::new(target(), source(), join())
        .update(None, None)
        .expect("update should be accepted")
        .delete(None)
        .expect_err("delete after update should fail");
    let after_delete = Merge::new(target(), source(), join())
        .delete(None)
        .expect("delete should be accepted")
        .update(None, None)
        .expect_err("update after delete should fail");

    assert_eq!(after_update.category(), "argument");
    assert_eq!(after_delete.category(), "argument");
}

#[test]
fn merges_without_clauses_or_assignments_are_rejected() {
    let bare = Merge::new(target(), source(), join());
    let nothing_to_update = Merge::new(
        target(),
        TableRef::new("s").with_columns(["id"]),
        join(),
    )
    .update(None, None)
    .expect("update should be accepted");

    assert_eq!(
        compile_merge(&bare)
            .expect_err("bare merge should fail")
            .category(),
        "argument"
    );
    assert_eq!(
        compile_merge(&nothing_to_update)
            .expect_err("empty update should fail")
            .category(),
        "argument"
    );
}

#[test]
fn aliased_relations_qualify_by_alias() {
    let target = TableRef::new("customers")
        .with_schema("sales")
        .with_alias("c")
        .with_columns(["id", "balance"]);
    let source = TableRef::new("staging")
        .with_alias("x")
        .with_columns(["id", "balance"]);
    let on = target.column("id").equals(source.column("id"));

    let merge = Merge::new(target, source, on)
        .update(None, None)
        .expect("update should be accepted");

    assert_eq!(
        compile_merge(&merge).expect("merge should compile"),
        "MERGE INTO sales.customers c USING staging x ON (c.id = x.id) \
WHEN MATCHED THEN UPDATE SET balance = x.balance"
    );
}
