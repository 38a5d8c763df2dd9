use std::sync::Arc;

use exadialect_core::{
    CachedReflector, ConnectArgs, Connection, Ident, MetadataReflector, ReflectPath,
    ReflectionCache,
};

#[path = "support/scripted_driver.rs"]
mod scripted_driver;
#[path = "support/stub_dialect.rs"]
mod stub_dialect;

use scripted_driver::{PassthroughCodec, ScriptedDriver};
use stub_dialect::CountingReflector;

fn open(driver: &ScriptedDriver) -> Connection {
    Connection::open(driver, &ConnectArgs::default(), Arc::new(PassthroughCodec))
        .expect("scripted driver should connect")
}

#[test]
fn repeated_questions_hit_the_cache() {
    let driver = ScriptedDriver::default();
    let connection = open(&driver);
    let inner = CountingReflector::default();
    let cache = ReflectionCache::new();
    let reflector = CachedReflector::new(&inner, &cache);

    let first = reflector
        .get_table_names(&connection, None, ReflectPath::Native)
        .expect("listing should succeed");
    let second = reflector
        .get_table_names(&connection, None, ReflectPath::Native)
        .expect("cached listing should succeed");

    assert_eq!(first, second);
    assert_eq!(inner.calls(), 1);
    assert_eq!(cache.len().expect("cache len"), 1);
}

#[test]
fn keys_distinguish_schema_path_and_connection() {
    let driver = ScriptedDriver::default();
    let first_connection = open(&driver);
    let second_connection = open(&driver);
    let inner = CountingReflector::default();
    let cache = ReflectionCache::new();
    let reflector = CachedReflector::new(&inner, &cache);
    let sales = Ident::unquoted("sales");

    let in_sales = reflector
        .get_table_names(&first_connection, Some(&sales), ReflectPath::Native)
        .expect("listing should succeed");
    reflector
        .get_table_names(&first_connection, None, ReflectPath::Native)
        .expect("listing should succeed");
    reflector
        .get_table_names(&first_connection, None, ReflectPath::Fallback)
        .expect("listing should succeed");
    reflector
        .get_table_names(&second_connection, None, ReflectPath::Native)
        .expect("listing should succeed");

    assert_eq!(in_sales, vec![Ident::unquoted("sales_orders")]);
    assert_eq!(inner.calls(), 4);

    cache
        .invalidate_connection(first_connection.id())
        .expect("invalidate should succeed");
    assert_eq!(cache.len().expect("cache len"), 1);

    cache.clear().expect("clear should succeed");
    assert!(cache.is_empty().expect("cache is_empty"));
}

#[test]
fn operations_with_the_same_arguments_do_not_share_entries() {
    let driver = ScriptedDriver::default();
    let connection = open(&driver);
    let inner = CountingReflector::default();
    let cache = ReflectionCache::new();
    let reflector = CachedReflector::new(&inner, &cache);
    let orders = Ident::unquoted("orders");

    let columns = reflector
        .get_columns(&connection, Some(&orders), None, ReflectPath::Native)
        .expect("columns should reflect");
    let exists = reflector
        .has_table(&connection, &orders, None, ReflectPath::Native)
        .expect("has_table should answer");
    let keys = reflector
        .get_foreign_keys(&connection, &orders, None, ReflectPath::Native)
        .expect("foreign keys should reflect");

    assert_eq!(columns.len(), 1);
    assert!(exists);
    assert!(keys.is_empty());
    assert_eq!(inner.calls(), 3);
}

#[test]
fn failures_are_not_cached() {
    let driver = ScriptedDriver::default();
    let connection = open(&driver);
    let inner = CountingReflector::failing_tables();
    let cache = ReflectionCache::new();
    let reflector = CachedReflector::new(&inner, &cache);

    for _ in 0..2 {
        reflector
            .get_table_names(&connection, None, ReflectPath::Native)
            .expect_err("listing should fail");
    }

    assert_eq!(inner.calls(), 2);
    assert!(cache.is_empty().expect("cache is_empty"));
}
