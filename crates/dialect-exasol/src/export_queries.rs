// System catalog reads for the SQL fallback path. Every catalog query runs
// under the snapshot hint so it never waits on catalog locks held by
// concurrent DDL. Bind parameters use the qmark style and take names in
// the database's own spelling.

pub(crate) const SNAPSHOT_HINT: &str = "/*snapshot execution*/";

pub(crate) const CURRENT_SCHEMA_QUERY: &str = "SELECT CURRENT_SCHEMA FROM DUAL";

pub(crate) const SERVER_VERSION_QUERY: &str = "/*snapshot execution*/ \
SELECT PARAM_VALUE FROM SYS.EXA_METADATA \
WHERE PARAM_NAME = 'databaseProductVersion'";

pub(crate) const SCHEMA_NAMES_QUERY: &str = "/*snapshot execution*/ \
SELECT SCHEMA_NAME FROM SYS.EXA_SCHEMAS \
ORDER BY SCHEMA_NAME";

pub(crate) const TABLE_NAMES_QUERY: &str = "/*snapshot execution*/ \
SELECT TABLE_NAME FROM SYS.EXA_ALL_TABLES \
WHERE TABLE_SCHEMA = ? \
ORDER BY TABLE_NAME";

pub(crate) const VIEW_NAMES_QUERY: &str = "/*snapshot execution*/ \
SELECT VIEW_NAME FROM SYS.EXA_ALL_VIEWS \
WHERE VIEW_SCHEMA = ? \
ORDER BY VIEW_NAME";

/// Exasol has no catalog function for view text; both paths read it from
/// the system view, only the fallback path adds the snapshot hint.
pub(crate) const VIEW_DEFINITION_QUERY: &str = "SELECT VIEW_TEXT FROM SYS.EXA_ALL_VIEWS \
WHERE VIEW_SCHEMA = ? AND VIEW_NAME = ?";

// Column positions: 0 name, 1 type, 2 max size, 3 precision, 4 scale,
// 5 nullable, 6 default, 7 identity, 8 distribution key, 9 table.
pub(crate) const COLUMNS_QUERY: &str = "/*snapshot execution*/ \
SELECT COLUMN_NAME, COLUMN_TYPE, COLUMN_MAXSIZE, COLUMN_NUM_PREC, COLUMN_NUM_SCALE, \
COLUMN_IS_NULLABLE, COLUMN_DEFAULT, COLUMN_IDENTITY, COLUMN_IS_DISTRIBUTION_KEY, COLUMN_TABLE \
FROM SYS.EXA_ALL_COLUMNS \
WHERE COLUMN_OBJECT_TYPE IN ('TABLE', 'VIEW') AND COLUMN_SCHEMA = ? \
ORDER BY COLUMN_TABLE, COLUMN_ORDINAL_POSITION";

pub(crate) const TABLE_COLUMNS_QUERY: &str = "/*snapshot execution*/ \
SELECT COLUMN_NAME, COLUMN_TYPE, COLUMN_MAXSIZE, COLUMN_NUM_PREC, COLUMN_NUM_SCALE, \
COLUMN_IS_NULLABLE, COLUMN_DEFAULT, COLUMN_IDENTITY, COLUMN_IS_DISTRIBUTION_KEY, COLUMN_TABLE \
FROM SYS.EXA_ALL_COLUMNS \
WHERE COLUMN_OBJECT_TYPE IN ('TABLE', 'VIEW') AND COLUMN_SCHEMA = ? AND COLUMN_TABLE = ? \
ORDER BY COLUMN_ORDINAL_POSITION";

pub(crate) const PRIMARY_KEY_QUERY: &str = "/*snapshot execution*/ \
SELECT CONSTRAINT_NAME, COLUMN_NAME \
FROM SYS.EXA_ALL_CONSTRAINT_COLUMNS \
WHERE CONSTRAINT_TYPE = 'PRIMARY KEY' AND CONSTRAINT_SCHEMA = ? AND CONSTRAINT_TABLE = ? \
ORDER BY ORDINAL_POSITION";

pub(crate) const FOREIGN_KEYS_QUERY: &str = "/*snapshot execution*/ \
SELECT CONSTRAINT_NAME, COLUMN_NAME, REFERENCED_SCHEMA, REFERENCED_TABLE, REFERENCED_COLUMN \
FROM SYS.EXA_ALL_CONSTRAINT_COLUMNS \
WHERE CONSTRAINT_TYPE = 'FOREIGN KEY' AND CONSTRAINT_SCHEMA = ? AND CONSTRAINT_TABLE = ? \
ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION";
