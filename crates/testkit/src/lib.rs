mod catalog_fixture;
mod fake_driver;

pub use catalog_fixture::{
    CatalogFixture, ColumnFixture, ForeignKeyFixture, PrimaryKeyFixture, SchemaFixture,
    TableFixture, ViewFixture, load_catalog_fixture_from_str,
};
pub use fake_driver::{FAKE_DRIVER_NAME, FakeDriver, FakeState};

/// Environment switch for tests that need a running Exasol server.
pub const LIVE_TESTS_ENV: &str = "EXADIALECT_ENABLE_IGNORED";

pub fn live_tests_enabled() -> bool {
    std::env::var(LIVE_TESTS_ENV).is_ok_and(|value| value == "1")
}
