use std::collections::BTreeMap;

use exadialect_core::{Error, Result};
use serde::Deserialize;

const FIXTURE_SOURCE_LABEL: &str = "catalog fixture";

/// The contents of a fake Exasol catalog. Every name is written in the
/// database's own spelling (upper case unless created quoted).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogFixture {
    pub default_schema: Option<String>,
    pub version: Option<String>,
    pub schemas: BTreeMap<String, SchemaFixture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaFixture {
    pub tables: BTreeMap<String, TableFixture>,
    pub views: BTreeMap<String, ViewFixture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableFixture {
    pub columns: Vec<ColumnFixture>,
    pub primary_key: Option<PrimaryKeyFixture>,
    pub foreign_keys: Vec<ForeignKeyFixture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewFixture {
    pub definition: String,
    pub columns: Vec<ColumnFixture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnFixture {
    pub name: String,
    /// Catalog type string, e.g. `DECIMAL(18,0)` or `VARCHAR(100) UTF8`.
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub identity: bool,
    #[serde(default)]
    pub distribution_key: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnFixture {
    /// Type name without size or character set, as ODBC reports it.
    pub fn base_type(&self) -> String {
        let upper = self.column_type.to_ascii_uppercase();
        let base = upper.split('(').next().unwrap_or_default();
        base.replace("UTF8", "").replace("ASCII", "").trim().to_string()
    }

    fn dimensions(&self) -> Vec<i64> {
        let Some((_, rest)) = self.column_type.split_once('(') else {
            return Vec::new();
        };
        let inner = rest.split(')').next().unwrap_or_default();
        inner
            .split(',')
            .filter_map(|part| {
                part.split_whitespace()
                    .next()
                    .and_then(|number| number.parse().ok())
            })
            .collect()
    }

    fn is_numeric(&self) -> bool {
        matches!(self.base_type().as_str(), "DECIMAL" | "NUMERIC")
    }

    /// Character length or numeric precision, whichever the type has.
    pub fn size(&self) -> Option<i64> {
        self.dimensions().first().copied()
    }

    pub fn precision(&self) -> Option<i64> {
        if self.is_numeric() { self.size() } else { None }
    }

    pub fn scale(&self) -> Option<i64> {
        if self.is_numeric() {
            Some(self.dimensions().get(1).copied().unwrap_or(0))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrimaryKeyFixture {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForeignKeyFixture {
    pub name: String,
    pub columns: Vec<String>,
    /// Defaults to the schema of the constrained table.
    pub referred_schema: Option<String>,
    pub referred_table: String,
    pub referred_columns: Vec<String>,
}

impl CatalogFixture {
    pub fn schema(&self, name: &str) -> Option<&SchemaFixture> {
        self.schemas.get(name)
    }

    pub fn table(&self, schema: &str, table: &str) -> Option<&TableFixture> {
        self.schema(schema)?.tables.get(table)
    }

    pub fn view(&self, schema: &str, view: &str) -> Option<&ViewFixture> {
        self.schema(schema)?.views.get(view)
    }

    /// Columns of every table and view in the schema, ordered by object
    /// name, then by ordinal position.
    pub fn columns_of(&self, schema: &str, object: Option<&str>) -> Vec<(&str, &ColumnFixture)> {
        let Some(fixture) = self.schema(schema) else {
            return Vec::new();
        };
        let mut objects = fixture
            .tables
            .iter()
            .map(|(name, table)| (name.as_str(), &table.columns))
            .chain(
                fixture
                    .views
                    .iter()
                    .map(|(name, view)| (name.as_str(), &view.columns)),
            )
            .filter(|(name, _)| object.is_none_or(|object| object == *name))
            .collect::<Vec<_>>();
        objects.sort_by_key(|(name, _)| *name);

        objects
            .into_iter()
            .flat_map(|(name, columns)| columns.iter().map(move |column| (name, column)))
            .collect()
    }
}

pub fn load_catalog_fixture_from_str(yaml: &str) -> Result<CatalogFixture> {
    serde_yaml::from_str(yaml).map_err(|source| parse_yaml_error(yaml, &source))
}

fn parse_yaml_error(yaml: &str, source: &serde_yaml::Error) -> Error {
    let position = source
        .location()
        .map(|location| format!(" at line {}, column {}", location.line(), location.column()))
        .unwrap_or_default();
    Error::invalid_argument(format!(
        "{FIXTURE_SOURCE_LABEL}{position}: {source} in `{}`",
        source_excerpt(yaml)
    ))
}

fn source_excerpt(yaml: &str) -> String {
    const MAX_CHARS: usize = 120;

    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return FIXTURE_SOURCE_LABEL.to_string();
    }
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }

    let mut excerpt: String = trimmed.chars().take(MAX_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}
